/**
 * User Model and Account Operations
 *
 * This module holds the stored user record and the account rules that sit
 * between the HTTP handlers and the `UserStore`: field validation, bcrypt
 * hashing, registration, credential checks and profile updates.
 */

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::store::{StoreError, UserStore};
use crate::shared::snippet::AuthorInfo;

/// User struct representing a stored account
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Internal surrogate key
    pub id: i64,
    /// Public identifier carried in session tokens
    pub uuid: Uuid,
    /// Username (unique, 3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// User email address (unique)
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub personal: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn author_info(&self) -> AuthorInfo {
        AuthorInfo {
            uuid: self.uuid.to_string(),
            username: self.username.clone(),
        }
    }
}

/// Fields needed to insert a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub uuid: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Requested profile changes; `None` leaves a field untouched
///
/// A link set to an empty string is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub personal: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    Invalid(String),
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid email or password")]
    BadCredentials,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
pub fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn is_valid_email(email: &str) -> bool {
    email.contains('@')
}

pub const MIN_PASSWORD_LEN: usize = 8;

fn conflict_to_account(err: StoreError) -> AccountError {
    match &err {
        StoreError::Conflict { constraint } if constraint.contains("username") => {
            AccountError::UsernameTaken
        }
        StoreError::Conflict { constraint } if constraint.contains("email") => {
            AccountError::EmailTaken
        }
        _ => AccountError::Store(err),
    }
}

/// Validate and create an account
pub async fn register_user<S>(
    store: &S,
    username: &str,
    email: &str,
    password: &str,
    bcrypt_cost: u32,
) -> Result<User, AccountError>
where
    S: UserStore + ?Sized,
{
    let username = username.trim();
    let email = email.trim();

    if !is_valid_username(username) {
        tracing::warn!("Invalid username format: {}", username);
        return Err(AccountError::Invalid(
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores".to_string(),
        ));
    }
    if !is_valid_email(email) {
        tracing::warn!("Invalid email format: {}", email);
        return Err(AccountError::Invalid("Invalid email format".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        tracing::warn!("Password too short");
        return Err(AccountError::Invalid(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    if store.user_by_username(username).await?.is_some() {
        tracing::warn!("Username already exists: {}", username);
        return Err(AccountError::UsernameTaken);
    }
    if store.user_by_email(email).await?.is_some() {
        tracing::warn!("Email already exists: {}", email);
        return Err(AccountError::EmailTaken);
    }

    let password_hash = bcrypt::hash(password, bcrypt_cost)?;
    let user = store
        .insert_user(NewUser {
            uuid: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            created_at: Utc::now(),
        })
        .await
        .map_err(conflict_to_account)?;

    tracing::info!("User registered: {} ({})", user.username, user.uuid);
    Ok(user)
}

/// Look up a user by email and check the password
pub async fn authenticate<S>(store: &S, email: &str, password: &str) -> Result<User, AccountError>
where
    S: UserStore + ?Sized,
{
    let Some(user) = store.user_by_email(email.trim()).await? else {
        tracing::warn!("Failed login attempt for email: {}", email);
        return Err(AccountError::BadCredentials);
    };

    if !bcrypt::verify(password, &user.password_hash)? {
        tracing::warn!("Failed login attempt for email: {}", email);
        return Err(AccountError::BadCredentials);
    }

    Ok(user)
}

/// Apply profile changes, keeping username and email unique
pub async fn update_profile<S>(
    store: &S,
    mut user: User,
    changes: ProfileChanges,
) -> Result<User, AccountError>
where
    S: UserStore + ?Sized,
{
    if let Some(username) = changes.username.map(|u| u.trim().to_string()) {
        if !username.is_empty() && username != user.username {
            if !is_valid_username(&username) {
                return Err(AccountError::Invalid("Invalid username format".to_string()));
            }
            if store.user_by_username(&username).await?.is_some() {
                return Err(AccountError::UsernameTaken);
            }
            user.username = username;
        }
    }

    if let Some(email) = changes.email.map(|e| e.trim().to_string()) {
        if !email.is_empty() && !email.eq_ignore_ascii_case(&user.email) {
            if !is_valid_email(&email) {
                return Err(AccountError::Invalid("Invalid email format".to_string()));
            }
            if store.user_by_email(&email).await?.is_some() {
                return Err(AccountError::EmailTaken);
            }
            user.email = email;
        }
    }

    let link = |value: String| {
        let value = value.trim().to_string();
        (!value.is_empty()).then_some(value)
    };
    if let Some(personal) = changes.personal {
        user.personal = link(personal);
    }
    if let Some(github) = changes.github {
        user.github = link(github);
    }
    if let Some(linkedin) = changes.linkedin {
        user.linkedin = link(linkedin);
    }

    let updated = store.update_user(&user).await.map_err(conflict_to_account)?;
    tracing::info!("Profile updated for user {}", updated.uuid);
    Ok(updated)
}
