//! Custom error types for the wikt-reader crate.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in this crate.
///
/// A key that simply does not exist is not an error: lookups report it as
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum WiktError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dump file does not exist.
    #[error("Corpus file not found: {}", .0.display())]
    CorpusNotFound(PathBuf),

    /// The index file does not exist and building it was disabled.
    #[error("Index file not found: {}", .0.display())]
    IndexNotFound(PathBuf),

    /// The line at an indexed offset does not carry the key's title marker.
    ///
    /// This happens when the index was built from a different version of the
    /// dump, or the dump's line endings changed after the build.
    #[error("Title marker for '{key}' not found at offset {offset}; the index may be stale")]
    TitleMarkerMissing { key: String, offset: u64 },

    /// The closing sentinel was not found before the end of file or before the
    /// configured extraction bound was exceeded.
    #[error("Record '{key}' at offset {offset} is unterminated after {lines} lines ({bytes} bytes)")]
    UnterminatedRecord {
        key: String,
        offset: u64,
        lines: usize,
        bytes: usize,
    },

    /// A pattern in the extractor table failed to compile.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// The remote lookup failed at the transport, HTTP or payload level.
    #[error("Remote lookup failed: {0}")]
    Remote(String),
}

/// A convenience `Result` type alias using the crate's `WiktError` type.
pub type Result<T> = std::result::Result<T, WiktError>;
