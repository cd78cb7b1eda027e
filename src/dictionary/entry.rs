//! Dictionary entry and field value types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::config::DictionaryConfig;

/// One of the two translation columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    /// Source term
    Ja,
    /// Target term
    En,
}

/// A canonical field value.
///
/// `null` and `""` collapse into `Blank`; the store only ever receives
/// `NULL` for a blank field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Blank,
    Text(String),
}

impl Term {
    /// Build a term from a stored or client-supplied string
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            Term::Blank
        } else {
            Term::Text(text)
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank)
    }

    /// Value bound into SQL: `None` is `NULL`
    pub fn as_sql(&self) -> Option<&str> {
        match self {
            Term::Blank => None,
            Term::Text(s) => Some(s),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Term::Blank => Value::Null,
            Term::Text(s) => Value::String(s.clone()),
        }
    }
}

impl From<Option<String>> for Term {
    fn from(value: Option<String>) -> Self {
        value.map(Term::from_text).unwrap_or(Term::Blank)
    }
}

/// A stored dictionary row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub id: i64,
    pub ja: Option<String>,
    pub en: Option<String>,
}

impl DictionaryEntry {
    pub fn new(id: i64, ja: Option<String>, en: Option<String>) -> Self {
        Self { id, ja, en }
    }

    /// Stored value of a column
    pub fn get(&self, column: Column) -> Option<&str> {
        match column {
            Column::Ja => self.ja.as_deref(),
            Column::En => self.en.as_deref(),
        }
    }

    /// Render with the configured key names, `id` first
    pub fn to_json(&self, config: &DictionaryConfig) -> Value {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(self.id));
        for (column, key) in config.keys() {
            let value = self
                .get(column)
                .map(|s| Value::String(s.to_string()))
                .unwrap_or(Value::Null);
            map.insert(key.to_string(), value);
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_text_is_blank() {
        assert_eq!(Term::from_text(""), Term::Blank);
        assert_eq!(Term::from(None), Term::Blank);
        assert_eq!(Term::from_text(" "), Term::Text(" ".to_string()));
    }

    #[test]
    fn test_blank_binds_as_null() {
        assert_eq!(Term::Blank.as_sql(), None);
        assert_eq!(Term::Text("相棒".to_string()).as_sql(), Some("相棒"));
    }

    #[test]
    fn test_entry_json_uses_configured_keys() {
        let entry = DictionaryEntry::new(7, Some("相棒".to_string()), None);
        assert_eq!(
            entry.to_json(&DictionaryConfig::default()),
            json!({"id": 7, "ja": "相棒", "en": null})
        );

        let config = DictionaryConfig {
            source_key: "source".to_string(),
            target_key: "target".to_string(),
            ..Default::default()
        };
        assert_eq!(
            entry.to_json(&config),
            json!({"id": 7, "source": "相棒", "target": null})
        );
    }
}
