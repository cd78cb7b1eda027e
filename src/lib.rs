//! dict-api - a ja/en dictionary served over REST
//!
//! Layers, outermost first:
//!
//! - `http_server` / `cli`: transport glue
//! - `normalizer`: blank-aware validation and canonicalization of client input
//! - `gateway`: SQL execution and the `{rows, errorCode, errorMessage}` outcome

pub mod cli;
pub mod config;
pub mod dictionary;
pub mod gateway;
pub mod http_server;
pub mod normalizer;
pub mod observability;
