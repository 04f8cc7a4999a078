/**
 * Authentication Handler Types
 *
 * Request and response types used by the register, login, me and profile
 * handlers.
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::users::{ProfileChanges, User};

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    /// Chosen username (3-30 chars, alphanumeric + underscore)
    pub username: String,
    pub email: String,
    /// Plain password, hashed before storage
    pub password: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Keep the session cookie for the long lifetime
    #[serde(default)]
    pub remember: bool,
}

/// Auth response
///
/// Returned by register and login. The token is also set as the session
/// cookie; clients without cookies send it as a bearer token.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserResponse,
}

/// User information safe to return to clients
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub uuid: String,
    pub username: String,
    pub email: String,
    pub personal: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            uuid: user.uuid.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            personal: user.personal.clone(),
            github: user.github.clone(),
            linkedin: user.linkedin.clone(),
        }
    }
}

/// Profile update request; omitted fields stay as they are
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ProfileUpdateRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub personal: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
}

impl From<ProfileUpdateRequest> for ProfileChanges {
    fn from(request: ProfileUpdateRequest) -> Self {
        Self {
            username: request.username,
            email: request.email,
            personal: request.personal,
            github: request.github,
            linkedin: request.linkedin,
        }
    }
}
