/**
 * Session Management and JWT Tokens
 *
 * Sessions are HS256 JWTs carried in an HttpOnly cookie. The token's `exp`
 * matches the cookie max-age so an expired cookie and an expired token mean
 * the same thing.
 */

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tower_cookies::cookie::time::Duration;
use tower_cookies::Cookie;

use crate::backend::auth::users::User;

/// Cookie lifetime when "remember me" is set, and after registration
pub const REMEMBER_MAX_AGE_SECS: u64 = 1_166_000;
/// Cookie lifetime for a plain login
pub const SHORT_MAX_AGE_SECS: u64 = 360;

pub fn session_max_age(remember: bool) -> u64 {
    if remember {
        REMEMBER_MAX_AGE_SECS
    } else {
        SHORT_MAX_AGE_SECS
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Public user uuid
    pub sub: String,
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Create a session token for a user
pub fn create_token(
    secret: &str,
    user: &User,
    max_age_secs: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = u64::try_from(Utc::now().timestamp()).unwrap_or(0);

    let claims = Claims {
        sub: user.uuid.to_string(),
        username: user.username.clone(),
        exp: now + max_age_secs,
        iat: now,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a session token
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}

/// Extract the user uuid from a token
pub fn get_user_uuid_from_token(secret: &str, token: &str) -> Result<uuid::Uuid, String> {
    let claims =
        verify_token(secret, token).map_err(|e| format!("Token verification failed: {}", e))?;
    uuid::Uuid::parse_str(&claims.sub).map_err(|e| format!("Invalid user ID in token: {}", e))
}

/// HttpOnly session cookie scoped to the whole site
pub fn session_cookie(name: &str, token: String, max_age_secs: u64) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.to_string(), token);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_max_age(Duration::seconds(i64::try_from(max_age_secs).unwrap_or(i64::MAX)));
    cookie
}

/// Cookie that, once removed from the jar, clears the session
pub fn removal_cookie(name: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.to_string(), "");
    cookie.set_path("/");
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn user() -> User {
        User {
            id: 1,
            uuid: uuid::Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: String::new(),
            personal: None,
            github: None,
            linkedin: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let user = user();
        let token = create_token(SECRET, &user, SHORT_MAX_AGE_SECS).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, user.uuid.to_string());
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, SHORT_MAX_AGE_SECS);
        assert_eq!(get_user_uuid_from_token(SECRET, &token).unwrap(), user.uuid);
    }

    #[test]
    fn test_verify_rejects_wrong_secret_and_garbage() {
        let token = create_token(SECRET, &user(), REMEMBER_MAX_AGE_SECS).unwrap();
        assert!(verify_token("other-secret", &token).is_err());
        assert!(verify_token(SECRET, "invalid.token.here").is_err());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("session", "abc".to_string(), session_max_age(true));
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.max_age().map(|d| d.whole_seconds()),
            Some(REMEMBER_MAX_AGE_SECS as i64)
        );
        assert_eq!(session_max_age(false), 360);
    }
}
