//! Shared Module
//!
//! This module contains the domain model and wire types that do not depend
//! on the server stack: snippets and their expiration rules, groups, direct
//! messages, configuration and the shared error type.
//!
//! # Overview
//!
//! Everything here is plain data plus pure functions. The accessibility
//! evaluator and quota calculator live in `snippet::policy` so they can be
//! tested without a store or a runtime.

/// Snippets, expiration policy and access logs
pub mod snippet;

/// Group membership and sharing
pub mod groups;

/// Direct messages
pub mod messaging;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Timestamp display format
pub mod time;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use snippet::{ExpirationPolicy, ExpirationReason, Quota, Snippet};
