/**
 * Authentication Extractors
 *
 * Resolves the requesting user from the session token. The token is read
 * from the session cookie, falling back to an `Authorization: Bearer`
 * header. It is verified and its subject looked up in the store; a token
 * for a user that no longer exists counts as no session.
 *
 * - `CurrentUser` rejects with 401 when there is no valid session.
 * - `MaybeUser` never rejects; anonymous requests get `None`.
 */

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    RequestPartsExt,
};
use tower_cookies::Cookies;

use crate::backend::auth::sessions::get_user_uuid_from_token;
use crate::backend::auth::users::User;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::backend::store::UserStore;

/// Authenticated user, required
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Authenticated user, if any
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<User>);

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

async fn cookie_token(parts: &mut Parts, cookie_name: &str) -> Option<String> {
    let cookies = parts.extract::<Cookies>().await.ok()?;
    cookies
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Extract the session token from cookie or bearer header
pub async fn session_token(parts: &mut Parts, cookie_name: &str) -> Option<String> {
    match cookie_token(parts, cookie_name).await {
        Some(token) => Some(token),
        None => bearer_token(parts),
    }
}

async fn resolve_user(parts: &mut Parts, state: &AppState) -> Result<Option<User>, BackendError> {
    let Some(token) = session_token(parts, &state.config.session_cookie).await else {
        return Ok(None);
    };

    let uuid = match get_user_uuid_from_token(&state.config.jwt_secret, &token) {
        Ok(uuid) => uuid,
        Err(e) => {
            tracing::warn!("Invalid session token: {}", e);
            return Ok(None);
        }
    };

    let user = state.store.user_by_uuid(uuid).await?;
    if user.is_none() {
        tracing::warn!("Session token for unknown user {}", uuid);
    }
    Ok(user)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_user(parts, state).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                tracing::warn!("Unauthenticated request to {}", parts.uri.path());
                Err(BackendError::unauthorized("Authentication required"))
            }
        }
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolve_user(parts, state).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_bearer_token() {
        let (parts, _) = Request::builder()
            .header(AUTHORIZATION, "Bearer abc.def")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts).as_deref(), Some("abc.def"));

        let (parts, _) = Request::builder()
            .header(AUTHORIZATION, "Basic xyz")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), None);
    }
}
