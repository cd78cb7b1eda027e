//! # Query Normalization Errors

use thiserror::Error;

/// Result type for normalization
pub type QueryResult<T> = Result<T, QueryError>;

/// Client input rejected before any store access.
///
/// Every variant is reported to callers as `InvalidQuery`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Query must be a JSON object")]
    NotAMapping,

    #[error("Insert body must be a JSON object or an array of objects")]
    NotABatch,

    #[error("Insert batch is empty")]
    EmptyBatch,

    #[error("Insert batch has {len} entries, more than the limit of {max}")]
    BatchTooLarge { len: usize, max: usize },

    #[error("Invalid entry at index {index}: {source}")]
    InvalidBatchEntry {
        index: usize,
        #[source]
        source: Box<QueryError>,
    },

    #[error("Query has no recognized keys")]
    NoRecognizedKeys,

    #[error("At least one of the recognized keys must hold a non-blank value")]
    NoValue,

    #[error("Unsupported value for key '{0}'")]
    UnsupportedValue(String),

    #[error("Id must be an integer, got {0}")]
    InvalidId(String),
}
