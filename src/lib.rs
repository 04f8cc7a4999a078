//! codenest - Main Library
//!
//! codenest is a snippet-sharing web backend. Users publish code snippets
//! that expire after a time window or a number of views, share them into
//! groups and point each other at them in direct messages.
//!
//! # Overview
//!
//! At the centre is the snippet access engine: every view of a snippet is
//! evaluated against its expiration policy and, if allowed, counted and
//! logged in a single unit of work. A view-limited snippet records exactly
//! one expiration entry, on the view that reaches its limit, however many
//! requests race for it.
//!
//! # Module Structure
//!
//! - **`shared`** - Domain model and wire types without server dependencies
//!   - Snippets, expiration policy, quotas
//!   - Groups and direct messages
//!   - Configuration and error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server, routes, session extractors
//!   - Access engine, snippet authoring, tags
//!   - Accounts, groups, messaging
//!   - Store traits with in-memory and PostgreSQL implementations
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - the server stack (axum, sqlx, bcrypt, jsonwebtoken)
//!
//! # Usage
//!
//! ```rust,no_run
//! use codenest::backend::server::{config::load_config, create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(load_config()?).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `Result<T, E>` with `thiserror` enums at each layer
//! - `Option<T>` for lookups that may find nothing
//! - `backend::error::BackendError` renders every failure as JSON

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
