//! Middleware Module
//!
//! Request processing that runs before handlers.
//!
//! - **`auth`** - `CurrentUser` / `MaybeUser` extractors resolving the
//!   session cookie or bearer token to a stored user
//!
//! Request tracing and cookie management are tower layers applied in
//! `routes::router`.

pub mod auth;

pub use auth::{CurrentUser, MaybeUser};
