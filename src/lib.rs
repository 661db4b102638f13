//! # wikt-reader
//!
//! Random-access reader for Wiktionary XML dumps.
//!
//! A dump is several gigabytes of XML; this crate never loads it. Instead it
//! builds a `key,offset` index once, answers lookups by reading that index
//! lazily, seeks straight to the entry and splits its wikitext into
//! heading-delimited sections for field extraction.
//!
//! ```no_run
//! use wikt_reader::Wiktionary;
//!
//! let mut dict = Wiktionary::local("dewiktionary-pages-articles.xml").unwrap();
//! if let Some(lemma) = dict.query("Haus").unwrap() {
//!     println!("{:?}", lemma.root);
//! }
//! ```
//!
//! Only the German Wiktionary entry layout is supported.
pub mod wikt;

// Re-export the main types for convenience
pub use wikt::{
    Edition, German, RecordSource, Result, WiktError, Wiktionary, WiktionaryStore,
    detect_line_ending, index_path_for,
    format::{
        index::{Entries, IndexReader, build_index},
        record::{RecordLimits, extract_record},
        sections::{Headings, Sections, split_sections},
    },
    lemma::{LemmaParser, PatternTable},
    types::{
        models::{
            Category, HeadingSpan, IndexEntry, IndexSummary, Inflection, Lemma, LineEnding,
            Section, Translation,
        },
        options::StoreOptions,
    },
};

#[cfg(feature = "remote")]
pub use wikt::remote::RemoteApiStore;
