//! Server Module
//!
//! Server-side setup for the Axum HTTP server.
//!
//! # Architecture
//!
//! - **`state`** - `AppState` (store + configuration) and `FromRef` impls
//! - **`config`** - configuration loading and store selection
//! - **`init`** - application assembly
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Configuration and store loading
//! └── init.rs         - App creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration**: defaults, optional TOML file, environment
//! 2. **Store**: PostgreSQL when a database URL is set, memory otherwise
//! 3. **Router**: routes plus tracing and cookie layers
//!
//! # Example
//!
//! ```rust,no_run
//! use codenest::backend::server::{config::load_config, create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config()?;
//! let app = create_app(config).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use init::{build_app, create_app};
pub use state::AppState;
