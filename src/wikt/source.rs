//! Retrieval capability shared by the local and remote backends.

use super::types::error::Result;

/// Anything that can hand out the raw wikitext of an entry by key.
///
/// Implemented by the indexed dump store and, with the `remote` feature, by
/// the MediaWiki API client, so callers need not know which one is active.
pub trait RecordSource {
    /// Fetch the wikitext for `key`. Keys are case-sensitive.
    ///
    /// Returns `Ok(None)` when the key does not exist in this source.
    fn fetch(&mut self, key: &str) -> Result<Option<String>>;
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn fetch(&mut self, key: &str) -> Result<Option<String>> {
        (**self).fetch(key)
    }
}
