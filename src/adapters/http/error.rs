//! JSON error bodies shared by the REST handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Standard error body: `{ "error": ..., "code": ... }`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(err: &DomainError) -> Self {
        Self {
            error: err.message.clone(),
            code: err.code.to_string(),
            details: (!err.details.is_empty()).then(|| err.details.clone()),
        }
    }
}

/// Maps a domain error to a status code and JSON body.
pub fn domain_error_response(err: DomainError) -> Response {
    let status = match err.code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::BookingNotFound | ErrorCode::ReviewNotFound => StatusCode::NOT_FOUND,
        ErrorCode::StorageFailure | ErrorCode::InternalError => {
            tracing::error!(code = %err.code, "Request failed: {}", err.message);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Internal server error")),
            )
                .into_response();
        }
    };

    (status, Json(ErrorResponse::from(&err))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_maps_to_400_with_field() {
        let response = domain_error_response(DomainError::validation("email", "Invalid email"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_failure_hides_details() {
        let response = domain_error_response(DomainError::storage("connection reset"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_response_carries_code_and_details() {
        let err = DomainError::validation("rating", "Rating out of range");
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();

        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["error"], "Rating out of range");
        assert_eq!(body["details"]["field"], "rating");
    }

    #[test]
    fn details_are_omitted_when_empty() {
        let body = serde_json::to_value(ErrorResponse::bad_request("nope")).unwrap();
        assert!(body.get("details").is_none());
    }
}
