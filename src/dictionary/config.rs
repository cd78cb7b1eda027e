//! Dictionary Configuration
//!
//! Names the table, the two recognized translation keys and the row cap
//! shared by the normalizer and the gateway.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::entry::Column;

/// Default row cap for every read
pub const DEFAULT_MAX_ROWS: usize = 256;

/// Default cap on entries in one batch insert
pub const DEFAULT_MAX_BATCH: usize = 1000;

/// Largest batch whose two bound values per row fit SQLite's
/// default `SQLITE_MAX_VARIABLE_NUMBER` of 32766
pub const MAX_BATCH_LIMIT: usize = 32766 / 2;

/// Dictionary table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Table name (default: "dict")
    #[serde(default = "default_table")]
    pub table: String,

    /// Key and column holding the source term (default: "ja")
    #[serde(default = "default_source_key")]
    pub source_key: String,

    /// Key and column holding the target term (default: "en")
    #[serde(default = "default_target_key")]
    pub target_key: String,

    /// Maximum rows returned by a read (default: 256)
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    /// Maximum entries accepted by one batch insert (default: 1000)
    #[serde(default = "default_max_batch")]
    pub max_batch: usize,
}

fn default_table() -> String {
    "dict".to_string()
}

fn default_source_key() -> String {
    "ja".to_string()
}

fn default_target_key() -> String {
    "en".to_string()
}

fn default_max_rows() -> usize {
    DEFAULT_MAX_ROWS
}

fn default_max_batch() -> usize {
    DEFAULT_MAX_BATCH
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            source_key: default_source_key(),
            target_key: default_target_key(),
            max_rows: default_max_rows(),
            max_batch: default_max_batch(),
        }
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
    })
}

impl DictionaryConfig {
    /// Key (and column name) for a column
    pub fn key(&self, column: Column) -> &str {
        match column {
            Column::Ja => &self.source_key,
            Column::En => &self.target_key,
        }
    }

    /// Recognized keys in column order
    pub fn keys(&self) -> [(Column, &str); 2] {
        [
            (Column::Ja, self.source_key.as_str()),
            (Column::En, self.target_key.as_str()),
        ]
    }

    /// Validate names and limits.
    ///
    /// Table and key names are spliced into SQL as quoted identifiers, so they
    /// are restricted to plain ASCII identifiers.
    pub fn validate(&self) -> Result<(), String> {
        for (what, name) in [
            ("table", &self.table),
            ("source_key", &self.source_key),
            ("target_key", &self.target_key),
        ] {
            if !identifier_pattern().is_match(name) {
                return Err(format!("Invalid {}: '{}'", what, name));
            }
        }

        if self.source_key == self.target_key {
            return Err("source_key and target_key must differ".to_string());
        }

        if self.source_key == "id" || self.target_key == "id" {
            return Err("'id' is reserved for the primary key".to_string());
        }

        if self.max_rows == 0 {
            return Err("max_rows must be > 0".to_string());
        }

        if self.max_batch == 0 || self.max_batch > MAX_BATCH_LIMIT {
            return Err(format!("max_batch must be between 1 and {}", MAX_BATCH_LIMIT));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DictionaryConfig::default();
        assert_eq!(config.table, "dict");
        assert_eq!(config.key(Column::Ja), "ja");
        assert_eq!(config.key(Column::En), "en");
        assert_eq!(config.max_rows, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DictionaryConfig = serde_json::from_str(r#"{"max_rows": 10}"#).unwrap();
        assert_eq!(config.max_rows, 10);
        assert_eq!(config.table, "dict");
    }

    #[test]
    fn test_rejects_bad_identifiers() {
        let config = DictionaryConfig {
            table: "dict; DROP TABLE dict".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = DictionaryConfig {
            target_key: "ja".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_batch_cap_bounds() {
        assert_eq!(DictionaryConfig::default().max_batch, DEFAULT_MAX_BATCH);

        for max_batch in [0, MAX_BATCH_LIMIT + 1] {
            let config = DictionaryConfig {
                max_batch,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        let config = DictionaryConfig {
            max_batch: MAX_BATCH_LIMIT,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_row_cap() {
        let config = DictionaryConfig {
            max_rows: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
