//! Backend Error Module
//!
//! This module defines the error type returned by every HTTP handler and
//! how domain errors map onto HTTP responses.
//!
//! # Architecture
//!
//! - **`types`** - `BackendError` and its status/message mapping
//! - **`conversion`** - `From` impls for domain errors and `IntoResponse`
//!
//! # Error Sources
//!
//! - `AccessError` - snippet view outcomes (not found, expired, store)
//! - `SnippetError` - authoring and soft delete
//! - `AccountError` - registration, login and profile rules
//! - `GroupError` - group membership and sharing rules
//! - `MessageError` - recipient resolution
//! - `SharedError` - input that can never be valid
//! - `StoreError` - persistence failures

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{BackendError, SNIPPET_EXPIRED, SNIPPET_NOT_FOUND};
