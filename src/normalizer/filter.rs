//! # Row Filters
//!
//! Per-column predicates produced by `QueryNormalizer::normalize_for_filter`.
//! Predicates on different columns combine with AND.

use crate::dictionary::{Column, DictionaryEntry};

/// Constraint on one column
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Predicate {
    /// Key absent: no constraint
    #[default]
    Any,
    /// Column is `NULL` or `''`
    Blank,
    /// Column contains the text, case-sensitive
    Contains(String),
}

impl Predicate {
    /// Evaluate against a stored value
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Predicate::Any => true,
            Predicate::Blank => value.map_or(true, str::is_empty),
            Predicate::Contains(needle) => value.is_some_and(|v| v.contains(needle.as_str())),
        }
    }
}

/// A normalized filter over both columns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    ja: Predicate,
    en: Predicate,
}

impl FilterSpec {
    /// Filter with no restriction
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn new(ja: Predicate, en: Predicate) -> Self {
        Self { ja, en }
    }

    pub fn get(&self, column: Column) -> &Predicate {
        match column {
            Column::Ja => &self.ja,
            Column::En => &self.en,
        }
    }

    pub(crate) fn set(&mut self, column: Column, predicate: Predicate) {
        match column {
            Column::Ja => self.ja = predicate,
            Column::En => self.en = predicate,
        }
    }

    /// True when the filter matches every row
    pub fn is_unrestricted(&self) -> bool {
        self.ja == Predicate::Any && self.en == Predicate::Any
    }

    /// Evaluate against an entry
    pub fn matches(&self, entry: &DictionaryEntry) -> bool {
        self.ja.matches(entry.get(Column::Ja)) && self.en.matches(entry.get(Column::En))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ja: Option<&str>, en: Option<&str>) -> DictionaryEntry {
        DictionaryEntry::new(1, ja.map(String::from), en.map(String::from))
    }

    #[test]
    fn test_blank_matches_null_and_empty() {
        assert!(Predicate::Blank.matches(None));
        assert!(Predicate::Blank.matches(Some("")));
        assert!(!Predicate::Blank.matches(Some("x")));
    }

    #[test]
    fn test_contains_is_case_sensitive() {
        let p = Predicate::Contains("Hunter".to_string());
        assert!(p.matches(Some("Hunter × Hunter")));
        assert!(!p.matches(Some("hunter")));
        assert!(!p.matches(None));
    }

    #[test]
    fn test_columns_combine_with_and() {
        let filter = FilterSpec::new(Predicate::Contains("相".to_string()), Predicate::Blank);
        assert!(filter.matches(&entry(Some("相棒"), None)));
        assert!(!filter.matches(&entry(Some("相棒"), Some("AIBOU"))));
        assert!(!filter.matches(&entry(None, None)));
    }

    #[test]
    fn test_match_all() {
        let filter = FilterSpec::match_all();
        assert!(filter.is_unrestricted());
        assert_eq!(filter.get(Column::Ja), &Predicate::Any);
        assert!(filter.matches(&entry(None, None)));
    }
}
