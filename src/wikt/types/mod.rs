//! Foundational data structures, error types, configuration and edition definitions.

pub mod edition;
pub mod error;
pub mod models;
pub mod options;
