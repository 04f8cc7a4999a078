/**
 * Login and Logout Handlers
 *
 * POST /api/login verifies the email and password and issues a session.
 * With `remember` the cookie lives for roughly two weeks, otherwise for a
 * few minutes. POST /api/logout clears the cookie.
 *
 * # Security
 *
 * - Passwords are verified using bcrypt
 * - Unknown email and wrong password both return 401 with the same message
 * - Password hashes are never returned in responses
 */

use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use tower_cookies::Cookies;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::backend::auth::sessions::{create_token, removal_cookie, session_cookie, session_max_age};
use crate::backend::auth::users::authenticate;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Login handler
///
/// # Example Request
///
/// ```http
/// POST /api/login HTTP/1.1
/// Content-Type: application/json
///
/// { "email": "alice@example.com", "password": "hunter2hunter2", "remember": true }
/// ```
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let user = authenticate(&*state.store, &request.email, &request.password).await?;

    let max_age = session_max_age(request.remember);
    let token = create_token(&state.config.jwt_secret, &user, max_age)?;
    cookies.add(session_cookie(&state.config.session_cookie, token.clone(), max_age));

    tracing::info!("User logged in: {} ({})", user.username, user.uuid);

    Ok(Json(AuthResponse {
        success: true,
        token,
        user: UserResponse::from(&user),
    }))
}

/// Logout handler; succeeds with or without a session
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Json<Value> {
    cookies.remove(removal_cookie(&state.config.session_cookie));
    Json(json!({ "success": true, "message": "Logged out" }))
}
