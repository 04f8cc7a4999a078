//! Shared Error Types
//!
//! This module defines error types that are shared between the domain model
//! and the HTTP layer. These errors represent input that can never become a
//! valid snippet, user, group or message, independently of any store state.
//!
//! # Error Categories
//!
//! - `ValidationError` - A request field failed validation
//! - `PolicyError` - An expiration policy could not be parsed from the wire
//!
//! # Usage
//!
//! ```rust
//! use codenest::shared::error::SharedError;
//!
//! let error = SharedError::validation("content", "Snippet content cannot be empty");
//! ```
use thiserror::Error;

/// Shared error types raised while validating domain input
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Unknown or malformed expiration policy
    #[error("Invalid expiration policy: {message}")]
    PolicyError {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new policy error
    pub fn policy(message: impl Into<String>) -> Self {
        Self::PolicyError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = SharedError::validation("email", "Invalid email format");
        match error {
            SharedError::ValidationError { field, message } => {
                assert_eq!(field, "email");
                assert_eq!(message, "Invalid email format");
            }
            _ => panic!("Expected ValidationError"),
        }
    }

    #[test]
    fn test_policy_error_display() {
        let error = SharedError::policy("unknown expiration type 'DAYS'");
        let display = format!("{}", error);
        assert!(display.contains("Invalid expiration policy"));
        assert!(display.contains("DAYS"));
    }

    #[test]
    fn test_error_clone() {
        let error = SharedError::validation("field", "message");
        assert_eq!(error.clone(), error);
    }
}
