//! Route Configuration Module
//!
//! - **`router`** - router creation and tower layers
//! - **`api_routes`** - the `/api/*` endpoints
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API endpoint table
//! ```

/// Main router creation
pub mod router;

/// API endpoint table
pub mod api_routes;

pub use router::create_router;
