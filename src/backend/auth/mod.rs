//! Authentication Module
//!
//! Accounts, sessions and the HTTP handlers for both.
//!
//! # Architecture
//!
//! - **`users`** - user model, validation, bcrypt hashing, profile updates
//! - **`sessions`** - JWT session tokens and the session cookie
//! - **`handlers`** - HTTP handlers for register/login/logout/me/profile
//!
//! # Authentication Flow
//!
//! 1. **Register**: username, email and password → user stored → session issued
//! 2. **Login**: email and password verified → session issued
//! 3. **Requests**: session cookie or bearer token → `CurrentUser` / `MaybeUser`
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Session tokens expire together with their cookie
//! - Invalid credentials return 401 (no information leakage)

/// User data model and account operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::types::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
pub use handlers::{get_me, login, logout, register, update_profile};
