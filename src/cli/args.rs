//! CLI argument definitions using clap
//!
//! Commands:
//! - dict-api init --config <path>
//! - dict-api seed --config <path>
//! - dict-api serve --config <path> [--port <port>]
//! - dict-api query --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dict-api - a ja/en dictionary over REST
#[derive(Parser, Debug)]
#[command(name = "dict-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the dictionary table and its unique indexes
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./dict-api.json")]
        config: PathBuf,
    },

    /// Insert the sample translation pairs
    Seed {
        /// Path to configuration file
        #[arg(long, default_value = "./dict-api.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./dict-api.json")]
        config: PathBuf,

        /// Override the configured HTTP port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Execute a single operation read from stdin and exit
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./dict-api.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_with_port() {
        let cli = Cli::try_parse_from(["dict-api", "serve", "--config", "c.json", "--port", "8080"]).unwrap();
        match cli.command {
            Command::Serve { config, port } => {
                assert_eq!(config, PathBuf::from("c.json"));
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["dict-api", "query"]).unwrap();
        assert!(matches!(cli.command, Command::Query { config } if config == PathBuf::from("./dict-api.json")));
    }
}
