//! # Dictionary Model
//!
//! The single persisted entity (a `ja`/`en` translation pair) and the
//! configuration naming its table, keys and read cap.

pub mod config;
pub mod entry;

pub use config::{DictionaryConfig, DEFAULT_MAX_BATCH, DEFAULT_MAX_ROWS, MAX_BATCH_LIMIT};
pub use entry::{Column, DictionaryEntry, Term};
