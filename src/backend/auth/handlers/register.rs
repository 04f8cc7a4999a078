/**
 * Registration Handler
 *
 * POST /api/register
 *
 * 1. Validate username, email and password
 * 2. Hash the password with bcrypt at the configured cost
 * 3. Store the user
 * 4. Issue a long-lived session token and set it as the session cookie
 */

use axum::{extract::State, http::StatusCode, response::Json};
use tower_cookies::Cookies;

use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest, UserResponse};
use crate::backend::auth::sessions::{create_token, session_cookie, REMEMBER_MAX_AGE_SECS};
use crate::backend::auth::users::register_user;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid username, email or password
/// * `409 Conflict` - username or email already taken
///
/// # Example Request
///
/// ```http
/// POST /api/register HTTP/1.1
/// Content-Type: application/json
///
/// { "username": "alice", "email": "alice@example.com", "password": "hunter2hunter2" }
/// ```
pub async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    tracing::info!("Register request for: {}", request.username);

    let user = register_user(
        &*state.store,
        &request.username,
        &request.email,
        &request.password,
        state.config.bcrypt_cost,
    )
    .await?;

    let token = create_token(&state.config.jwt_secret, &user, REMEMBER_MAX_AGE_SECS)?;
    cookies.add(session_cookie(
        &state.config.session_cookie,
        token.clone(),
        REMEMBER_MAX_AGE_SECS,
    ));

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            token,
            user: UserResponse::from(&user),
        }),
    ))
}
