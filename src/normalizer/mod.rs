//! # Query Normalization Layer
//!
//! Validates and canonicalizes client-supplied `{ja?, en?}` mappings into
//! filters and write payloads, before anything reaches the store.

pub mod errors;
pub mod filter;
#[allow(clippy::module_inception)]
pub mod normalizer;
pub mod payload;

pub use errors::{QueryError, QueryResult};
pub use filter::{FilterSpec, Predicate};
pub use normalizer::{deduplicate_batch, parse_id, QueryNormalizer};
pub use payload::{CanonicalPayload, WriteMode};
