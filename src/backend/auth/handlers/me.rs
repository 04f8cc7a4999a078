/**
 * Current User Handlers
 *
 * GET /api/auth/me returns the authenticated user. PUT /api/user/profile
 * changes username, email or profile links. Both require a session.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{ProfileUpdateRequest, UserResponse};
use crate::backend::auth::users::update_profile;
use crate::backend::error::BackendError;
use crate::backend::middleware::CurrentUser;
use crate::backend::server::state::AppState;

/// Get current user handler
///
/// # Example Response
///
/// ```json
/// {
///   "uuid": "123e4567-e89b-12d3-a456-426614174000",
///   "username": "alice",
///   "email": "alice@example.com",
///   "personal": null,
///   "github": "https://github.com/alice",
///   "linkedin": null
/// }
/// ```
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// Update the caller's profile
///
/// # Errors
///
/// * `400 Bad Request` - malformed username or email
/// * `409 Conflict` - username or email belongs to another account
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<ProfileUpdateRequest>,
) -> Result<Json<UserResponse>, BackendError> {
    let updated = update_profile(&*state.store, user, request.into()).await?;
    Ok(Json(UserResponse::from(&updated)))
}
