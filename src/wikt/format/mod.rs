//! Dump access layer for Wiktionary XML dumps.
//!
//! This module provides the mid-level layer between raw file I/O and the
//! high-level [`WiktionaryStore`](crate::wikt::reader::WiktionaryStore).
//!
//! # Module Organization
//!
//! - [`index`]: Builds the `key,offset` index and reads it lazily
//! - [`record`]: Extracts one entry's text from an indexed offset
//! - [`sections`]: Splits entry text into heading-delimited sections
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐  build_index()   ┌──────────────┐
//! │  XML dump       │ ───────────────► │  index.csv   │
//! │  (read-only)    │                  └──────┬───────┘
//! │                 │                         │ IndexReader::lookup()
//! │                 │ ◄──── offset ───────────┘
//! │                 │
//! │                 │ ── extract_record() ──► record text
//! └─────────────────┘                             │
//!                                                 ▼ split_sections()
//!                                          [Section, ...]
//! ```

pub mod index;
pub mod record;
pub mod sections;
