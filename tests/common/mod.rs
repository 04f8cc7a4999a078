//! Common test utilities and helpers
//!
//! Shared by the integration test binaries:
//! - Custom assertion macros
//! - Account and HTTP helpers over an in-memory app
//! - PostgreSQL fixture that is skipped when no database is configured

#![allow(dead_code)]

pub mod assertions;
pub mod auth_helpers;
pub mod database;

pub use auth_helpers::*;
pub use database::*;
