//! CLI module for dict-api
//!
//! Provides command-line interface for:
//! - init: Create the dictionary table and unique indexes
//! - seed: Insert the sample rows
//! - serve: Run the REST API
//! - query: One-shot operation read from stdin

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{execute, init, open_gateway, query, run, run_command, seed, serve, QueryOp, QueryRequest};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_json, write_response};
