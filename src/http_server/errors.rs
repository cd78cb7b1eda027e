//! # Item Route Errors
//!
//! Maps gateway codes onto HTTP statuses:
//! `InvalidQuery` → 400, zero rows on a point operation → 404,
//! `ConstraintViolation` → 409, store failures → 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::gateway::{ErrorCode, GatewayError};

/// Result type for item handlers
pub type ItemResult<T> = Result<T, ItemError>;

#[derive(Debug, Clone, Error)]
pub enum ItemError {
    // ==================
    // Client Errors (4xx)
    // ==================
    #[error("ID is required.")]
    MissingId,

    #[error("Path parameter is invalid: {0}")]
    InvalidPath(String),

    #[error("Request body is invalid: {0}")]
    InvalidBody(String),

    #[error("Request is invalid: {0}")]
    InvalidQuery(String),

    #[error("Record not found")]
    NotFound,

    #[error("Record already exists: {0}")]
    Conflict(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Store failure; the detail is logged, only the code reaches the client
    #[error("DB error occurred (code {0})")]
    Store(i64),

    #[error("Server error occurred: {0}")]
    Internal(String),
}

impl ItemError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ItemError::MissingId => StatusCode::BAD_REQUEST,
            ItemError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ItemError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ItemError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ItemError::NotFound => StatusCode::NOT_FOUND,
            ItemError::Conflict(_) => StatusCode::CONFLICT,
            ItemError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ItemError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GatewayError> for ItemError {
    fn from(err: GatewayError) -> Self {
        match err.code() {
            ErrorCode::InvalidQuery => ItemError::InvalidQuery(err.message()),
            ErrorCode::ConstraintViolation => ItemError::Conflict(err.message()),
            ErrorCode::StoreError(code) => ItemError::Store(i64::from(code)),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<ItemError> for ErrorResponse {
    fn from(err: ItemError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::QueryError;

    #[test]
    fn test_status_codes() {
        assert_eq!(ItemError::MissingId.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ItemError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ItemError::Conflict("x".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ItemError::Store(1).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_gateway_error_mapping() {
        let err = ItemError::from(GatewayError::from(QueryError::NoValue));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = ItemError::from(GatewayError::ConstraintViolation("dup".to_string()));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err = ItemError::from(GatewayError::Store {
            code: 1,
            message: "disk I/O error".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "DB error occurred (code 1)");
    }
}
