/**
 * Error Conversion
 *
 * `From` implementations that map domain errors onto `BackendError`, and the
 * `IntoResponse` implementation that renders it.
 *
 * # Response Format
 *
 * ```json
 * { "success": false, "message": "No such code snippet", "status": 404 }
 * ```
 *
 * Expired snippets additionally carry `"expired": true`.
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::backend::auth::users::AccountError;
use crate::backend::groups::GroupError;
use crate::backend::messaging::MessageError;
use crate::backend::error::types::{BackendError, SNIPPET_NOT_FOUND};
use crate::backend::snippets::access::AccessError;
use crate::backend::snippets::SnippetError;

impl From<AccessError> for BackendError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotFound => BackendError::not_found(SNIPPET_NOT_FOUND),
            AccessError::Expired { token } => BackendError::Expired { token },
            AccessError::Store(e) => BackendError::Store(e),
        }
    }
}

impl From<SnippetError> for BackendError {
    fn from(err: SnippetError) -> Self {
        match err {
            SnippetError::Invalid(e) => BackendError::SharedError(e),
            SnippetError::NotFound => BackendError::not_found(SNIPPET_NOT_FOUND),
            SnippetError::Forbidden => {
                BackendError::forbidden("Only the author can modify this snippet")
            }
            SnippetError::Store(e) => BackendError::Store(e),
        }
    }
}

impl From<AccountError> for BackendError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Invalid(message) => BackendError::bad_request(message),
            AccountError::UsernameTaken | AccountError::EmailTaken => {
                BackendError::conflict(err.to_string())
            }
            AccountError::BadCredentials => BackendError::unauthorized(err.to_string()),
            AccountError::Hash(e) => BackendError::internal(e.to_string()),
            AccountError::Store(e) => BackendError::Store(e),
        }
    }
}

impl From<GroupError> for BackendError {
    fn from(err: GroupError) -> Self {
        match err {
            GroupError::Invalid(message) => BackendError::bad_request(message),
            GroupError::NotFound(message) => BackendError::not_found(message),
            GroupError::Forbidden(message) => BackendError::forbidden(message),
            GroupError::AlreadyMember => BackendError::bad_request(err.to_string()),
            GroupError::Store(e) => BackendError::Store(e),
        }
    }
}

impl From<MessageError> for BackendError {
    fn from(err: MessageError) -> Self {
        match err {
            MessageError::Invalid(message) => BackendError::bad_request(message),
            MessageError::NotFound(message) => BackendError::not_found(message),
            MessageError::Store(e) => BackendError::Store(e),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for BackendError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        BackendError::internal(format!("token signing failed: {err}"))
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
        }

        let mut body = serde_json::json!({
            "success": false,
            "message": message,
            "status": status.as_u16(),
        });
        if self.is_expired() {
            body["expired"] = serde_json::Value::Bool(true);
        }

        (status, Json(body)).into_response()
    }
}
