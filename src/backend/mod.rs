//! Backend Module
//!
//! All server-side code: the Axum HTTP server, the snippet access engine and
//! the persistence behind it. Only compiled when the `ssr` feature is
//! enabled.
//!
//! # Architecture
//!
//! - **`server`** - application state, configuration loading, app creation
//! - **`routes`** - route table and tower layers
//! - **`snippets`** - access engine, authoring, tags, snippet handlers
//! - **`groups`** - group membership and sharing
//! - **`messaging`** - direct messages
//! - **`auth`** - accounts, bcrypt, JWT sessions
//! - **`middleware`** - session extractors
//! - **`store`** - store traits, `MemoryStore`, `PgStore`
//! - **`error`** - `BackendError` and HTTP error mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── snippets/       - Snippet access and authoring
//! ├── groups/         - Groups
//! ├── messaging/      - Direct messages
//! ├── auth/           - Authentication
//! ├── middleware/     - Request extractors
//! ├── store/          - Persistence
//! └── error/          - Error types
//! ```
//!
//! # Thread Safety
//!
//! - The store is shared as `Arc<dyn Store>`; implementations are `Send + Sync`
//! - A snippet view holds the snippet exclusively until it commits
//! - Axum handlers are `Send`

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Request extractors
pub mod middleware;

/// Persistence traits and implementations
pub mod store;

/// Snippet access engine and handlers
pub mod snippets;

/// Snippet sharing groups
pub mod groups;

/// Direct messages
pub mod messaging;

pub use error::BackendError;
pub use server::create_app;
pub use store::{MemoryStore, PgStore, Store, StoreError};
