//! # Persistence Gateway
//!
//! Executes normalized dictionary operations against the relational store.
//!
//! Every operation returns either rows or a `GatewayError` carrying one of
//! three codes:
//!
//! - `InvalidQuery` (-1): rejected by the normalizer, store never touched
//! - `ConstraintViolation` (23505): a unique index refused the write
//! - `StoreError`: anything else the store reported
//!
//! Zero rows from an id-scoped operation is not an error; callers treat it
//! as not-found.

pub mod errors;
pub mod outcome;
pub mod schema;
pub mod sql;
pub mod sqlite;

use serde_json::Value;

use crate::dictionary::{DictionaryConfig, DictionaryEntry};

pub use errors::{ErrorCode, GatewayError, GatewayResult, INVALID_QUERY, UNIQUE_VIOLATION};
pub use outcome::QueryOutcome;
pub use sqlite::{SqliteGateway, SAMPLE_ROWS};

/// Dictionary operations over raw client input.
///
/// Ids and bodies arrive as parsed JSON; implementations validate them
/// before touching the store.
pub trait DictionaryStore: Send + Sync {
    /// Table configuration, used when rendering rows
    fn config(&self) -> &DictionaryConfig;

    /// Up to `max_rows` rows in id order
    fn fetch_all(&self) -> GatewayResult<Vec<DictionaryEntry>>;

    /// Zero or one row; non-integer ids are `InvalidQuery`
    fn fetch_by_id(&self, id: &Value) -> GatewayResult<Vec<DictionaryEntry>>;

    /// Rows matching a `{ja?, en?}` filter, capped at `max_rows`
    fn fetch_by_filter(&self, filter: &Value) -> GatewayResult<Vec<DictionaryEntry>>;

    /// Insert one object or a batch; returns rows in insertion order
    fn insert(&self, body: &Value) -> GatewayResult<Vec<DictionaryEntry>>;

    /// Update the recognized keys present in `body`
    fn update_by_id(&self, id: &Value, body: &Value) -> GatewayResult<Vec<DictionaryEntry>>;

    /// Delete one row, returning it
    fn delete_by_id(&self, id: &Value) -> GatewayResult<Vec<DictionaryEntry>>;
}
