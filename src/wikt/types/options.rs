//! Store configuration.

use std::path::PathBuf;

/// Options applied when opening a [`WiktionaryStore`](crate::WiktionaryStore).
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Explicit index location. Defaults to `<dump stem>-index.csv` next to the dump.
    pub index_path: Option<PathBuf>,
    /// Build the index on open when the index file is missing.
    pub build_missing_index: bool,
    /// Maximum number of lines one record may span.
    pub max_record_lines: usize,
    /// Maximum number of bytes read while extracting one record.
    pub max_record_bytes: usize,
    /// Lines between two progress messages during an index build.
    pub progress_interval: u64,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            index_path: None,
            build_missing_index: true,
            max_record_lines: 100_000,
            max_record_bytes: 64 * 1024 * 1024,
            progress_interval: 1_000_000,
        }
    }
}
