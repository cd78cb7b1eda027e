//! # HTTP Server Module
//!
//! Axum server exposing the dictionary over REST.
//!
//! # Endpoints
//!
//! - `/` - Plain-text liveness banner
//! - `/health` - Health check
//! - `/item` - List (filtered by `?ja=&en=`) and create entries
//! - `/item/:id` - Read, update and delete one entry

pub mod config;
pub mod errors;
pub mod item_routes;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ItemError, ItemResult};
pub use server::HttpServer;
