//! # Gateway Errors
//!
//! Store outcomes folded into the three-way taxonomy callers branch on.

use rusqlite::ffi;
use thiserror::Error;

use crate::normalizer::QueryError;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// SQLSTATE `unique_violation`, reported for every uniqueness conflict
pub const UNIQUE_VIOLATION: i64 = 23505;

/// Code reported for pre-validation failures
pub const INVALID_QUERY: i64 = -1;

/// Error category surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed or insufficient input; the store was not touched
    InvalidQuery,
    /// The store rejected a write on a uniqueness constraint
    ConstraintViolation,
    /// Any other store failure, with the store-native code
    StoreError(i32),
}

impl ErrorCode {
    /// Numeric code for the `{rows, errorCode, errorMessage}` contract
    pub fn as_i64(&self) -> i64 {
        match self {
            ErrorCode::InvalidQuery => INVALID_QUERY,
            ErrorCode::ConstraintViolation => UNIQUE_VIOLATION,
            ErrorCode::StoreError(code) => i64::from(*code),
        }
    }
}

/// Gateway errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Store error ({code}): {message}")]
    Store { code: i32, message: String },
}

impl GatewayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::InvalidQuery(_) => ErrorCode::InvalidQuery,
            GatewayError::ConstraintViolation(_) => ErrorCode::ConstraintViolation,
            GatewayError::Store { code, .. } => ErrorCode::StoreError(*code),
        }
    }

    /// Diagnostic message without the category prefix
    pub fn message(&self) -> String {
        match self {
            GatewayError::InvalidQuery(e) => e.to_string(),
            GatewayError::ConstraintViolation(msg) => msg.clone(),
            GatewayError::Store { message, .. } => message.clone(),
        }
    }

    pub(crate) fn store(message: impl Into<String>) -> Self {
        GatewayError::Store {
            code: ffi::SQLITE_ERROR,
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for GatewayError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, msg) => {
                let message = msg.clone().unwrap_or_else(|| failure.to_string());
                let unique = failure.code == rusqlite::ErrorCode::ConstraintViolation
                    && matches!(
                        failure.extended_code,
                        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    );

                if unique {
                    GatewayError::ConstraintViolation(message)
                } else {
                    GatewayError::Store {
                        code: failure.extended_code,
                        message,
                    }
                }
            }
            other => GatewayError::store(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_codes() {
        assert_eq!(ErrorCode::InvalidQuery.as_i64(), -1);
        assert_eq!(ErrorCode::ConstraintViolation.as_i64(), 23505);
        assert_eq!(ErrorCode::StoreError(1).as_i64(), 1);
    }

    #[test]
    fn test_query_error_is_invalid_query() {
        let err = GatewayError::from(QueryError::NoValue);
        assert_eq!(err.code(), ErrorCode::InvalidQuery);
        assert_eq!(err.message(), QueryError::NoValue.to_string());
    }

    #[test]
    fn test_unique_failure_maps_to_constraint_violation() {
        let failure = ffi::Error::new(ffi::SQLITE_CONSTRAINT_UNIQUE);
        let err = GatewayError::from(rusqlite::Error::SqliteFailure(
            failure,
            Some("UNIQUE constraint failed: dict.ja".to_string()),
        ));
        assert_eq!(err.code(), ErrorCode::ConstraintViolation);
        assert_eq!(err.message(), "UNIQUE constraint failed: dict.ja");
    }

    #[test]
    fn test_other_failure_keeps_native_code() {
        let failure = ffi::Error::new(ffi::SQLITE_CONSTRAINT_NOTNULL);
        let err = GatewayError::from(rusqlite::Error::SqliteFailure(failure, None));
        assert_eq!(err.code(), ErrorCode::StoreError(ffi::SQLITE_CONSTRAINT_NOTNULL));
    }
}
