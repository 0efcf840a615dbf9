//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.
//!
//! The set of variants is closed: every service failure is classified
//! into one of them, and each maps to exactly one status code.

use crate::repositories::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use blog_shared::types::{ErrorDetail, ErrorResponse};
use blog_shared::ValidationError;
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Absent resource, or one the caller does not own
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Re-classify a storage failure for the given resource and operation
    ///
    /// Database failures keep their cause chain for logging, but only the
    /// generic internal message reaches the client.
    pub fn from_store(err: StoreError, resource: &str, operation: &str) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound(format!("{} not found", resource)),
            StoreError::Conflict(constraint) => {
                ApiError::Conflict(conflict_message(resource, &constraint))
            }
            StoreError::MissingReference(_) => {
                ApiError::NotFound("Referenced resource not found".to_string())
            }
            StoreError::Database(e) => ApiError::Internal(
                anyhow::Error::new(e).context(format!("{} {} failed", operation, resource)),
            ),
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthenticated(_) => "UNAUTHENTICATED",
            ApiError::InvalidCredentials => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

fn conflict_message(resource: &str, constraint: &str) -> String {
    if constraint.contains("email") {
        "Email already registered".to_string()
    } else {
        format!("{} already exists", resource)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let (message, field) = match &self {
            ApiError::Validation(err) => (err.user_message(), Some(err.field.clone())),
            ApiError::BadRequest(msg)
            | ApiError::Unauthenticated(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => (msg.clone(), None),
            ApiError::InvalidCredentials => ("Invalid email or password".to_string(), None),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                ("An internal error occurred".to_string(), None)
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ApiError::Validation(ValidationError::new("email", "Invalid email format")), StatusCode::BAD_REQUEST)]
    #[case(ApiError::BadRequest("bad id".to_string()), StatusCode::BAD_REQUEST)]
    #[case(ApiError::Unauthenticated("Missing authorization header".to_string()), StatusCode::UNAUTHORIZED)]
    #[case(ApiError::InvalidCredentials, StatusCode::UNAUTHORIZED)]
    #[case(ApiError::NotFound("Post not found".to_string()), StatusCode::NOT_FOUND)]
    #[case(ApiError::Conflict("Email already registered".to_string()), StatusCode::CONFLICT)]
    #[case(ApiError::Internal(anyhow::anyhow!("boom")), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_error_status(#[case] error: ApiError, #[case] expected: StatusCode) {
        assert_eq!(error.status(), expected);
        let response = error.into_response();
        assert_eq!(response.status(), expected);
    }

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let error = ApiError::from_store(StoreError::NotFound, "Post", "update");
        assert!(matches!(error, ApiError::NotFound(ref msg) if msg == "Post not found"));
    }

    #[test]
    fn test_store_conflict_on_email() {
        let error = ApiError::from_store(
            StoreError::Conflict("users_email_key".to_string()),
            "User",
            "create",
        );
        assert!(matches!(error, ApiError::Conflict(ref msg) if msg == "Email already registered"));
    }

    #[test]
    fn test_store_missing_reference_maps_to_not_found() {
        let error = ApiError::from_store(
            StoreError::MissingReference("comments_post_id_fkey".to_string()),
            "Comment",
            "create",
        );
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_database_error_is_internal_with_context() {
        let error = ApiError::from_store(
            StoreError::Database(sqlx::Error::PoolTimedOut),
            "Post",
            "list",
        );
        match error {
            ApiError::Internal(err) => assert_eq!(err.to_string(), "list Post failed"),
            other => panic!("expected internal error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_internal_error_body_hides_details() {
        let response = ApiError::Internal(anyhow::anyhow!("password=hunter2")).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert!(!body.error.message.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_validation_error_body_names_field() {
        let response =
            ApiError::Validation(ValidationError::new("title", "Title is required")).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.field.as_deref(), Some("title"));
    }
}
