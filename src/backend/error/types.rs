/**
 * Backend Error Types
 *
 * This module defines the error type every HTTP handler returns. Domain
 * errors from the access engine, the account rules and the stores convert
 * into it with `?`; see `conversion.rs` for those `From` impls and the
 * `IntoResponse` implementation.
 *
 * # Status Mapping
 *
 * - `HandlerError` - carries its own status (404, 401, 403, 409, 400)
 * - `Expired` - 403 with an `expired: true` marker in the body
 * - `SharedError` - 400, the input can never be valid
 * - `Store` - 409 for unique violations, 500 otherwise
 * - `Internal` - 500, message not exposed to clients
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Message returned for unknown snippet tokens
pub const SNIPPET_NOT_FOUND: &str = "No such code snippet";
/// Message returned for snippets that can no longer be viewed
pub const SNIPPET_EXPIRED: &str = "The code snippet has expired.";

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use codenest::backend::error::BackendError;
///
/// let err = BackendError::not_found("Group not found");
/// assert_eq!(err.status_code().as_u16(), 404);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request-level failure with an explicit status
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// The snippet exists but is no longer accessible
    #[error("snippet {token} has expired")]
    Expired { token: String },

    /// Invalid input (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Unexpected failure outside the store (hashing, token signing)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::CONFLICT, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Expired { .. } => StatusCode::FORBIDDEN,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::Conflict { .. }) => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing error message
    ///
    /// Server-side failures return a generic message; the detail is logged
    /// when the response is built.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Expired { .. } => SNIPPET_EXPIRED.to_string(),
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
            Self::SharedError(err) => err.to_string(),
            Self::Store(StoreError::Conflict { .. }) => "Resource already exists".to_string(),
            Self::Store(_) | Self::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error() {
        let error = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
        match error {
            BackendError::HandlerError { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Invalid request");
            }
            _ => panic!("Expected HandlerError"),
        }
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(BackendError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(BackendError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(BackendError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(BackendError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            BackendError::Expired { token: "t".into() }.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            BackendError::Store(StoreError::conflict("tags_name_key")).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            BackendError::Store(StoreError::Unavailable("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_shared_error() {
        let backend_error: BackendError = SharedError::validation("content", "empty").into();
        assert_eq!(backend_error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(backend_error.message(), "empty");
    }

    #[test]
    fn test_store_detail_not_exposed() {
        let error = BackendError::Store(StoreError::Unavailable("password=hunter2".into()));
        assert!(!error.message().contains("hunter2"));
    }
}
