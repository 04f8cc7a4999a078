//! Authentication Handlers Module
//!
//! HTTP handlers for account and session endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Request and response types
//! ├── register.rs  - User registration handler
//! ├── login.rs     - Login and logout handlers
//! └── me.rs        - Current user and profile handlers
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/register
//! - **`login`** - POST /api/login
//! - **`logout`** - POST /api/logout
//! - **`get_me`** - GET /api/auth/me
//! - **`update`** - PUT /api/user/profile
//!
//! Register and login set the session cookie and also return the token in
//! the body.

pub mod login;
pub mod me;
pub mod register;
pub mod types;

pub use login::{login, logout};
pub use me::{get_me, update as update_profile};
pub use register::register;
