//! # Canonical Write Payloads

use serde_json::{Map, Value};

use crate::dictionary::{Column, DictionaryConfig, Term};

/// How a write payload is validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// At least one recognized key must hold a non-blank value
    Insert,
    /// At least one recognized key must be present
    Update,
}

/// A write-ready payload: recognized keys only, blanks collapsed.
///
/// `None` means the key was absent from the client input. An insert stores
/// an absent key as `NULL`; an update leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalPayload {
    ja: Option<Term>,
    en: Option<Term>,
}

impl CanonicalPayload {
    pub fn new(ja: Option<Term>, en: Option<Term>) -> Self {
        Self { ja, en }
    }

    /// Payload with both keys present as plain strings (`""` is blank)
    pub fn pair(ja: &str, en: &str) -> Self {
        Self::new(Some(Term::from_text(ja)), Some(Term::from_text(en)))
    }

    pub fn get(&self, column: Column) -> Option<&Term> {
        match column {
            Column::Ja => self.ja.as_ref(),
            Column::En => self.en.as_ref(),
        }
    }

    pub(crate) fn set(&mut self, column: Column, term: Term) {
        match column {
            Column::Ja => self.ja = Some(term),
            Column::En => self.en = Some(term),
        }
    }

    /// True when no recognized key is present
    pub fn is_empty(&self) -> bool {
        self.ja.is_none() && self.en.is_none()
    }

    /// True when some present key holds a non-blank value
    pub fn has_value(&self) -> bool {
        [&self.ja, &self.en]
            .into_iter()
            .any(|t| t.as_ref().is_some_and(|t| !t.is_blank()))
    }

    /// Present keys in column order
    pub fn present(&self) -> impl Iterator<Item = (Column, &Term)> {
        [(Column::Ja, &self.ja), (Column::En, &self.en)]
            .into_iter()
            .filter_map(|(column, term)| term.as_ref().map(|t| (column, t)))
    }

    /// Value the store holds after inserting this payload
    pub fn stored(&self, column: Column) -> Option<&str> {
        self.get(column).and_then(Term::as_sql)
    }

    /// Uniqueness identity: absent and blank both count as `NULL`
    pub fn identity(&self) -> (Option<&str>, Option<&str>) {
        (self.stored(Column::Ja), self.stored(Column::En))
    }

    /// Render present keys with the configured names
    pub fn to_json(&self, config: &DictionaryConfig) -> Value {
        let mut map = Map::new();
        for (column, term) in self.present() {
            map.insert(config.key(column).to_string(), term.to_json());
        }
        Value::Object(map)
    }
}
