//! Core data structures shared by the index, the extractor and the parsers.

use std::fmt;

/// Line terminator convention of a dump file, detected from its raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\n` (Unix).
    #[default]
    Lf,
    /// `\r\n` (Windows).
    CrLf,
    /// `\r` (classic Mac).
    Cr,
}

impl LineEnding {
    /// Number of bytes the terminator occupies on disk.
    pub fn width(&self) -> u64 {
        match self {
            LineEnding::Lf | LineEnding::Cr => 1,
            LineEnding::CrLf => 2,
        }
    }

    /// The byte a raw line read stops at.
    pub fn delimiter(&self) -> u8 {
        match self {
            LineEnding::Lf | LineEnding::CrLf => b'\n',
            LineEnding::Cr => b'\r',
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LineEnding::Lf => write!(f, "LF"),
            LineEnding::CrLf => write!(f, "CRLF"),
            LineEnding::Cr => write!(f, "CR"),
        }
    }
}

/// A single `key,offset` pair from the index file.
///
/// `offset` is the position of the first byte of the dump line that carries
/// the key's title marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: String,
    pub offset: u64,
}

/// Counters reported by a completed index build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSummary {
    /// Physical lines read from the dump.
    pub lines: u64,
    /// Entries written to the index.
    pub entries: u64,
    /// Terminator convention the offsets were computed with.
    pub line_ending: LineEnding,
}

/// Position of one heading inside a record's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingSpan {
    /// Byte position of the first `=` of the opening run.
    pub start: usize,
    /// Byte position just past the closing run.
    pub end: usize,
    /// Length of the opening `=` run.
    pub level: usize,
}

/// One heading-delimited unit of a record.
///
/// Sections come out as a flat sequence; `level` encodes the nesting depth.
/// Headings of level 5 and deeper never form their own section, they stay
/// inside the body of the section before them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub level: usize,
    /// Heading including its `=` delimiters, e.g. `=== {{Wortart|Substantiv|Deutsch}} ===`.
    pub heading: &'a str,
    pub body: &'a str,
}

impl<'a> Section<'a> {
    /// Heading text without delimiters and surrounding whitespace.
    pub fn title(&self) -> &'a str {
        self.heading.trim_matches('=').trim()
    }
}

/// A named inflection form, e.g. `Nominativ Plural` → `Häuser`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inflection {
    pub name: String,
    pub value: String,
}

/// A translation of a lemma into another language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Language code as used by the `{{Ü}}` template, e.g. `en`.
    pub lang: String,
    /// Translated word, followed by `, <gender>` when the entry carries one.
    pub value: String,
}

/// One part-of-speech block of a lemma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Display name, e.g. `Substantiv, n`.
    pub name: String,
    /// First `{{Wortart}}` of the heading, used to select extraction patterns.
    pub word_class: String,
    pub gender: Option<String>,
    pub inflections: Vec<Inflection>,
    pub translations: Vec<Translation>,
}

/// Structured description of one looked-up word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lemma {
    /// The word as it was requested.
    pub term: String,
    /// Raw record text the fields were extracted from.
    pub wikitext: String,
    /// Key of the head section; `None` when the record has no German head.
    pub root: Option<String>,
    pub categories: Vec<Category>,
}

impl Lemma {
    /// Returns true if at least one category produced inflection data.
    pub fn has_inflections(&self) -> bool {
        self.categories.iter().any(|c| !c.inflections.is_empty())
    }
}
