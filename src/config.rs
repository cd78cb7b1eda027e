//! Service configuration
//!
//! A single JSON file; every field has a default, so `{}` is a valid config.
//!
//! ```json
//! {
//!   "database_path": "./dict.sqlite3",
//!   "log_level": "info",
//!   "http": { "host": "0.0.0.0", "port": 3000 },
//!   "dictionary": { "table": "dict", "source_key": "ja", "target_key": "en", "max_rows": 256, "max_batch": 1000 }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::dictionary::DictionaryConfig;
use crate::http_server::HttpServerConfig;

/// Path that selects a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file, or ":memory:" (default: "./dict.sqlite3")
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Tracing filter used when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub dictionary: DictionaryConfig,
}

fn default_database_path() -> String {
    "./dict.sqlite3".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_level: default_log_level(),
            http: HttpServerConfig::default(),
            dictionary: DictionaryConfig::default(),
        }
    }
}

impl Config {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::Invalid("database_path must not be empty".to_string()));
        }

        EnvFilter::try_new(&self.log_level)
            .map_err(|e| ConfigError::Invalid(format!("Invalid log_level '{}': {}", self.log_level, e)))?;

        self.dictionary.validate().map_err(ConfigError::Invalid)?;

        Ok(())
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == IN_MEMORY
    }
}
