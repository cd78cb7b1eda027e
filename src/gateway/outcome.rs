//! # Query Outcome
//!
//! The flattened `{rows, errorCode, errorMessage}` view of a gateway result.
//! Exactly one of `rows` and `errorCode` is set.

use serde::Serialize;
use serde_json::Value;

use crate::dictionary::{DictionaryConfig, DictionaryEntry};

use super::errors::GatewayResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOutcome {
    pub rows: Option<Vec<Value>>,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
}

impl QueryOutcome {
    pub fn from_result(result: GatewayResult<Vec<DictionaryEntry>>, config: &DictionaryConfig) -> Self {
        match result {
            Ok(rows) => Self {
                rows: Some(rows.iter().map(|e| e.to_json(config)).collect()),
                error_code: None,
                error_message: None,
            },
            Err(err) => Self {
                rows: None,
                error_code: Some(err.code().as_i64()),
                error_message: Some(err.message()),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error_code.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::errors::GatewayError;
    use crate::normalizer::QueryError;
    use serde_json::json;

    #[test]
    fn test_success_outcome() {
        let rows = vec![DictionaryEntry::new(1, Some("X".to_string()), Some("Y".to_string()))];
        let outcome = QueryOutcome::from_result(Ok(rows), &DictionaryConfig::default());

        assert!(outcome.is_ok());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "rows": [{"id": 1, "ja": "X", "en": "Y"}],
                "errorCode": null,
                "errorMessage": null
            })
        );
    }

    #[test]
    fn test_empty_rows_is_not_an_error() {
        let outcome = QueryOutcome::from_result(Ok(vec![]), &DictionaryConfig::default());
        assert!(outcome.is_ok());
        assert_eq!(outcome.rows, Some(vec![]));
    }

    #[test]
    fn test_error_outcome() {
        let outcome = QueryOutcome::from_result(
            Err(GatewayError::from(QueryError::NotAMapping)),
            &DictionaryConfig::default(),
        );

        assert!(!outcome.is_ok());
        assert_eq!(outcome.rows, None);
        assert_eq!(outcome.error_code, Some(-1));
        assert!(outcome.error_message.is_some());
    }
}
