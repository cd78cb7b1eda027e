//! # Query Normalizer
//!
//! Turns raw client JSON into canonical payloads and filters. This is the only
//! place that knows `null` and `""` are the same value; everything downstream
//! sees `Term::Blank` or `Predicate::Blank`.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::dictionary::{DictionaryConfig, Term};

use super::errors::{QueryError, QueryResult};
use super::filter::{FilterSpec, Predicate};
use super::payload::{CanonicalPayload, WriteMode};

/// Validates and canonicalizes client input for one dictionary table
#[derive(Debug, Clone, Default)]
pub struct QueryNormalizer {
    config: DictionaryConfig,
}

impl QueryNormalizer {
    pub fn new(config: DictionaryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    /// Normalize a single insert or update payload.
    ///
    /// Unrecognized keys are dropped. Insert mode requires a non-blank value
    /// somewhere; update mode requires at least one recognized key.
    pub fn normalize_for_write(&self, input: &Value, mode: WriteMode) -> QueryResult<CanonicalPayload> {
        let map = as_mapping(input)?;
        if map.is_empty() {
            return Err(QueryError::NoRecognizedKeys);
        }

        let mut payload = CanonicalPayload::default();
        for (column, key) in self.config.keys() {
            if let Some(value) = map.get(key) {
                payload.set(column, term_from_json(key, value)?);
            }
        }

        match mode {
            WriteMode::Insert if !payload.has_value() => Err(QueryError::NoValue),
            WriteMode::Update if payload.is_empty() => Err(QueryError::NoRecognizedKeys),
            _ => Ok(payload),
        }
    }

    /// Normalize a filter. Absent keys match anything; an empty mapping
    /// matches every row.
    pub fn normalize_for_filter(&self, input: &Value) -> QueryResult<FilterSpec> {
        let map = as_mapping(input)?;

        let mut filter = FilterSpec::match_all();
        for (column, key) in self.config.keys() {
            let Some(value) = map.get(key) else {
                continue;
            };
            let predicate = match term_from_json(key, value)? {
                Term::Blank => Predicate::Blank,
                Term::Text(text) => Predicate::Contains(text),
            };
            filter.set(column, predicate);
        }

        Ok(filter)
    }

    /// Normalize an insert body: one object, or an array of objects.
    ///
    /// Every array element must be a valid insert payload and the array may
    /// hold at most `max_batch` elements. The result is de-duplicated,
    /// keeping first occurrences.
    pub fn normalize_insert(&self, input: &Value) -> QueryResult<Vec<CanonicalPayload>> {
        match input {
            Value::Object(_) => Ok(vec![self.normalize_for_write(input, WriteMode::Insert)?]),
            Value::Array(items) => {
                if items.is_empty() {
                    return Err(QueryError::EmptyBatch);
                }
                if items.len() > self.config.max_batch {
                    return Err(QueryError::BatchTooLarge {
                        len: items.len(),
                        max: self.config.max_batch,
                    });
                }

                let payloads = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        self.normalize_for_write(item, WriteMode::Insert)
                            .map_err(|e| QueryError::InvalidBatchEntry {
                                index,
                                source: Box::new(e),
                            })
                    })
                    .collect::<QueryResult<Vec<_>>>()?;

                Ok(deduplicate_batch(payloads))
            }
            _ => Err(QueryError::NotABatch),
        }
    }
}

/// Keep the first occurrence of each distinct `(ja, en)` pair, in order
pub fn deduplicate_batch(entries: Vec<CanonicalPayload>) -> Vec<CanonicalPayload> {
    let mut seen: HashSet<(Option<String>, Option<String>)> = HashSet::new();
    entries
        .into_iter()
        .filter(|payload| {
            let (ja, en) = payload.identity();
            seen.insert((ja.map(String::from), en.map(String::from)))
        })
        .collect()
}

/// Validate a record id: JSON integers only.
///
/// Integral floats (`3.0`) are accepted; strings are not, even numeric ones.
pub fn parse_id(id: &Value) -> QueryResult<i64> {
    let invalid = || QueryError::InvalidId(id.to_string());

    let Value::Number(n) = id else {
        return Err(invalid());
    };

    if let Some(i) = n.as_i64() {
        return Ok(i);
    }

    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(invalid()),
    }
}

fn as_mapping(input: &Value) -> QueryResult<&Map<String, Value>> {
    input.as_object().ok_or(QueryError::NotAMapping)
}

fn term_from_json(key: &str, value: &Value) -> QueryResult<Term> {
    match value {
        Value::Null => Ok(Term::Blank),
        Value::String(s) => Ok(Term::from_text(s.as_str())),
        Value::Number(n) => Ok(Term::Text(n.to_string())),
        Value::Bool(b) => Ok(Term::Text(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(QueryError::UnsupportedValue(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Column;
    use serde_json::json;

    fn normalizer() -> QueryNormalizer {
        QueryNormalizer::default()
    }

    #[test]
    fn test_write_collapses_empty_string() {
        let payload = normalizer()
            .normalize_for_write(&json!({"ja": "", "en": "x"}), WriteMode::Insert)
            .unwrap();

        assert_eq!(payload.get(Column::Ja), Some(&Term::Blank));
        assert_eq!(payload.get(Column::En), Some(&Term::Text("x".to_string())));
        assert_eq!(
            payload.to_json(normalizer().config()),
            json!({"ja": null, "en": "x"})
        );
    }

    #[test]
    fn test_write_drops_unrecognized_keys() {
        let payload = normalizer()
            .normalize_for_write(&json!({"en": "Feels Good Man", "extra": "x"}), WriteMode::Insert)
            .unwrap();

        assert_eq!(payload.get(Column::Ja), None);
        assert_eq!(
            payload.to_json(normalizer().config()),
            json!({"en": "Feels Good Man"})
        );
    }

    #[test]
    fn test_insert_requires_a_value() {
        let n = normalizer();
        for input in [
            json!({}),
            json!({"ja": null}),
            json!({"ja": "", "en": null}),
            json!({"extra": "only"}),
        ] {
            assert!(n.normalize_for_write(&input, WriteMode::Insert).is_err(), "{input}");
        }
    }

    #[test]
    fn test_update_accepts_all_blank() {
        let payload = normalizer()
            .normalize_for_write(&json!({"en": ""}), WriteMode::Update)
            .unwrap();
        assert_eq!(payload.get(Column::En), Some(&Term::Blank));
        assert_eq!(payload.get(Column::Ja), None);
    }

    #[test]
    fn test_update_requires_a_recognized_key() {
        let n = normalizer();
        assert_eq!(
            n.normalize_for_write(&json!({}), WriteMode::Update),
            Err(QueryError::NoRecognizedKeys)
        );
        assert_eq!(
            n.normalize_for_write(&json!({"extra": 1}), WriteMode::Update),
            Err(QueryError::NoRecognizedKeys)
        );
    }

    #[test]
    fn test_write_rejects_non_mappings() {
        let n = normalizer();
        for input in [json!(null), json!("相棒"), json!([{"ja": "a"}]), json!(3)] {
            assert_eq!(
                n.normalize_for_write(&input, WriteMode::Update),
                Err(QueryError::NotAMapping)
            );
        }
    }

    #[test]
    fn test_write_rejects_nested_values() {
        assert_eq!(
            normalizer().normalize_for_write(&json!({"ja": {"x": 1}}), WriteMode::Insert),
            Err(QueryError::UnsupportedValue("ja".to_string()))
        );
    }

    #[test]
    fn test_scalar_values_become_text() {
        let payload = normalizer()
            .normalize_for_write(&json!({"ja": 42}), WriteMode::Insert)
            .unwrap();
        assert_eq!(payload.stored(Column::Ja), Some("42"));
    }

    #[test]
    fn test_filter_predicates() {
        let filter = normalizer()
            .normalize_for_filter(&json!({"ja": null, "en": "Hunter"}))
            .unwrap();
        assert_eq!(filter.get(Column::Ja), &Predicate::Blank);
        assert_eq!(filter.get(Column::En), &Predicate::Contains("Hunter".to_string()));

        let filter = normalizer().normalize_for_filter(&json!({"en": ""})).unwrap();
        assert_eq!(filter.get(Column::Ja), &Predicate::Any);
        assert_eq!(filter.get(Column::En), &Predicate::Blank);
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let n = normalizer();
        assert!(n.normalize_for_filter(&json!({})).unwrap().is_unrestricted());
        assert!(n.normalize_for_filter(&json!({"other": 1})).unwrap().is_unrestricted());
        assert_eq!(n.normalize_for_filter(&json!([])), Err(QueryError::NotAMapping));
    }

    #[test]
    fn test_deduplicate_keeps_first_occurrence() {
        let batch = vec![
            CanonicalPayload::pair("A", "B"),
            CanonicalPayload::pair("C", "D"),
            CanonicalPayload::pair("A", "B"),
        ];

        let deduped = deduplicate_batch(batch);
        assert_eq!(
            deduped,
            vec![CanonicalPayload::pair("A", "B"), CanonicalPayload::pair("C", "D")]
        );
    }

    #[test]
    fn test_deduplicate_compares_blanks_canonically() {
        let batch = vec![
            CanonicalPayload::pair("A", ""),
            CanonicalPayload::new(Some(Term::from_text("A")), None),
            CanonicalPayload::new(Some(Term::from_text("A")), Some(Term::Blank)),
        ];
        assert_eq!(deduplicate_batch(batch).len(), 1);
    }

    #[test]
    fn test_insert_batch() {
        let n = normalizer();
        let batch = n
            .normalize_insert(&json!([
                {"ja": "A", "en": "B"},
                {"ja": "C", "en": "D", "extra": true},
                {"ja": "A", "en": "B"}
            ]))
            .unwrap();
        assert_eq!(batch.len(), 2);

        assert_eq!(n.normalize_insert(&json!([])), Err(QueryError::EmptyBatch));
        assert_eq!(n.normalize_insert(&json!("A")), Err(QueryError::NotABatch));
        assert!(matches!(
            n.normalize_insert(&json!([{"ja": "A"}, {"ja": ""}])),
            Err(QueryError::InvalidBatchEntry { index: 1, .. })
        ));
    }

    #[test]
    fn test_insert_batch_cap() {
        let n = QueryNormalizer::new(DictionaryConfig {
            max_batch: 2,
            ..Default::default()
        });

        assert_eq!(n.normalize_insert(&json!([{"ja": "A"}, {"ja": "B"}])).unwrap().len(), 2);
        assert_eq!(
            n.normalize_insert(&json!([{"ja": "A"}, {"ja": "B"}, {"ja": "A"}])),
            Err(QueryError::BatchTooLarge { len: 3, max: 2 })
        );
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(&json!(12)), Ok(12));
        assert_eq!(parse_id(&json!(-3)), Ok(-3));
        assert_eq!(parse_id(&json!(4.0)), Ok(4));
        assert!(parse_id(&json!(4.5)).is_err());
        assert!(parse_id(&json!("a")).is_err());
        assert!(parse_id(&json!("12")).is_err());
        assert!(parse_id(&json!(null)).is_err());
    }
}
