//! Core Wiktionary dump reader module

pub mod dictionary;
pub mod format;
pub mod lemma;
pub mod reader;
#[cfg(feature = "remote")]
pub mod remote;
pub mod source;
pub mod types;
mod utils;

pub use dictionary::Wiktionary;
pub use reader::WiktionaryStore;
pub use source::RecordSource;
pub use types::edition::{Edition, German};
pub use types::error::{Result, WiktError};
pub use utils::{detect_line_ending, index_path_for};
