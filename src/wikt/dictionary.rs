//! High-level lookups: word in, [`Lemma`] out.

use std::path::Path;
use log::debug;

use super::lemma::{LemmaParser, PatternTable};
use super::reader::WiktionaryStore;
use super::source::RecordSource;
use super::types::edition::German;
use super::types::error::Result;
use super::types::models::Lemma;
use super::types::options::StoreOptions;

/// A German dictionary backed by one [`RecordSource`], chosen at construction.
pub struct Wiktionary {
    source: Box<dyn RecordSource>,
    patterns: PatternTable,
}

impl Wiktionary {
    /// Look words up in a local dump, building its index on first use.
    pub fn local(path: impl AsRef<Path>) -> Result<Self> {
        Self::local_with(path, StoreOptions::default())
    }

    pub fn local_with(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let store = WiktionaryStore::<German>::open_with(path, options)?;
        Ok(Self::with_source(store))
    }

    /// Look words up through the de.wiktionary.org API.
    #[cfg(feature = "remote")]
    pub fn remote() -> Result<Self> {
        Ok(Self::with_source(super::remote::RemoteApiStore::new()?))
    }

    /// Use any retrieval backend with the built-in German pattern table.
    pub fn with_source(source: impl RecordSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            patterns: PatternTable::german(),
        }
    }

    /// Replace the extraction pattern table.
    pub fn with_patterns(mut self, patterns: PatternTable) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    /// Raw entry text for `word`, or `None` if the word does not exist.
    pub fn wikitext(&mut self, word: &str) -> Result<Option<String>> {
        self.source.fetch(word)
    }

    /// Look up `word` and extract its lemma description.
    ///
    /// Returns `Ok(None)` if the word does not exist. An existing entry that
    /// is not a German lemma comes back with `root == None`.
    pub fn query(&mut self, word: &str) -> Result<Option<Lemma>> {
        let Some(wikitext) = self.source.fetch(word)? else {
            debug!("'{}' not found", word);
            return Ok(None);
        };
        Ok(Some(LemmaParser::new(&self.patterns).parse(word, &wikitext)))
    }
}
