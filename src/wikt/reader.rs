use std::fs::File;
use std::io::BufReader;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};

use super::format::index::{self, IndexReader};
use super::format::record::{self, RecordLimits};
use super::lemma::{LemmaParser, PatternTable};
use super::source::RecordSource;
use super::types::edition::Edition;
use super::types::error::{Result, WiktError};
use super::types::models::{IndexSummary, LineEnding};
use super::types::options::StoreOptions;
use super::utils;

/// Indexed, random-access store over a Wiktionary XML dump.
///
/// The dump and its index stay open for the lifetime of the store and are
/// closed when it is dropped. Every lookup goes through `&mut self`, so a
/// store shared between threads must sit behind a lock.
#[derive(Debug)]
pub struct WiktionaryStore<E: Edition> {
    corpus_path: PathBuf,
    index_path: PathBuf,
    corpus: BufReader<File>,
    index: IndexReader<BufReader<File>>,
    line_ending: LineEnding,
    limits: RecordLimits,
    progress_interval: u64,
    _edition: PhantomData<E>,
}

impl<E: Edition> WiktionaryStore<E> {
    /// Open a dump with default [`StoreOptions`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, StoreOptions::default())
    }

    /// Open a dump and its index.
    ///
    /// If the index file does not exist and `options.build_missing_index` is
    /// set, it is built first. This full pass over the dump is by far the most
    /// expensive step and only happens once.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The dump cannot be opened ([`WiktError::CorpusNotFound`](crate::WiktError::CorpusNotFound) when missing)
    /// - The index is missing and building it is disabled
    /// - Building or opening the index fails
    pub fn open_with(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let corpus_path = path.as_ref().to_path_buf();
        info!("Opening {} dump: {}", E::DEBUG_NAME, corpus_path.display());

        let mut corpus = utils::open_corpus(&corpus_path)?;
        let line_ending = utils::detect_line_ending(&mut corpus)?;
        debug!("Dump uses {} line endings", line_ending);

        let index_path = options
            .index_path
            .clone()
            .unwrap_or_else(|| utils::index_path_for(&corpus_path));
        if options.build_missing_index && !index_path.exists() {
            info!("Index file not found: {}", index_path.display());
            index::build_index::<E>(&corpus_path, &index_path, options.progress_interval)?;
        }
        let index = IndexReader::open(&index_path)?;

        Ok(Self {
            corpus_path,
            index_path,
            corpus: BufReader::new(corpus),
            index,
            line_ending,
            limits: RecordLimits::from(&options),
            progress_interval: options.progress_interval,
            _edition: PhantomData,
        })
    }

    /// Rebuild the index from the dump and restart lazy reading from scratch.
    ///
    /// Required whenever the dump file has been replaced or re-encoded. The
    /// dump is reopened by path, so a file swapped in under the same name is
    /// the one read from afterwards.
    pub fn rebuild_index(&mut self) -> Result<IndexSummary> {
        let summary =
            index::build_index::<E>(&self.corpus_path, &self.index_path, self.progress_interval)?;
        self.corpus = BufReader::new(utils::open_corpus(&self.corpus_path)?);
        self.index = IndexReader::open(&self.index_path)?;
        self.line_ending = summary.line_ending;
        debug!("Reopened dump with {} line endings", self.line_ending);
        Ok(summary)
    }

    /// Collect the distinct category names of every indexed entry, in index order.
    ///
    /// This extracts and parses the whole dump, one entry at a time. Entries
    /// whose offset is stale or whose text is unterminated are skipped with a
    /// warning. Afterwards every key is cached, so later lookups never touch
    /// the index file.
    pub fn category_names(&mut self, patterns: &PatternTable) -> Result<Vec<String>> {
        info!("Surveying categories over {}", self.index_path.display());
        let parser = LemmaParser::new(patterns);
        let mut index = IndexReader::open(&self.index_path)?;
        let mut names: Vec<String> = Vec::new();
        let mut surveyed = 0u64;

        for entry in index.entries() {
            let entry = entry?;
            if self.progress_interval > 0 && surveyed % self.progress_interval == 0 {
                info!("Surveyed {} entries, {} categories", surveyed, names.len());
            }
            surveyed += 1;

            let text = match self.extract(entry.offset, &entry.key) {
                Ok(text) => text,
                Err(
                    e @ (WiktError::TitleMarkerMissing { .. }
                    | WiktError::UnterminatedRecord { .. }),
                ) => {
                    warn!("Skipping '{}': {}", entry.key, e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            for category in parser.parse(&entry.key, &text).categories {
                if !names.contains(&category.name) {
                    debug!("New category '{}' in '{}'", category.name, entry.key);
                    names.push(category.name);
                }
            }
        }

        info!("Surveyed {} entries: {} distinct categories", surveyed, names.len());
        self.index = index;
        Ok(names)
    }

    /// Find the byte offset of the line holding `key`'s title marker.
    ///
    /// Returns `Ok(None)` if the key is not indexed.
    pub fn lookup(&mut self, key: &str) -> Result<Option<u64>> {
        self.index.lookup(key)
    }

    /// Read the text of the record for `key` starting on the line at `offset`.
    pub fn extract(&mut self, offset: u64, key: &str) -> Result<String> {
        record::extract_record::<E, _>(&mut self.corpus, offset, key, self.line_ending, self.limits)
    }

    /// Look up `key` and return its record text, or `None` if it is not indexed.
    pub fn get_wikitext(&mut self, key: &str) -> Result<Option<String>> {
        match self.lookup(key)? {
            Some(offset) => self.extract(offset, key).map(Some),
            None => Ok(None),
        }
    }

    pub fn corpus_path(&self) -> &Path {
        &self.corpus_path
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Terminator convention detected when the dump was opened.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// The lazy index reader, for inspecting scan and cache counters.
    pub fn index(&self) -> &IndexReader<BufReader<File>> {
        &self.index
    }
}

impl<E: Edition> RecordSource for WiktionaryStore<E> {
    fn fetch(&mut self, key: &str) -> Result<Option<String>> {
        self.get_wikitext(key)
    }
}
