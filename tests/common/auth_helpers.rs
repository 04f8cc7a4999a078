//! Account and HTTP test helpers
//!
//! `TestApp` runs the full router over a fresh `MemoryStore`. Requests
//! authenticate with a bearer token so the server does not need to keep
//! cookies between calls.

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderValue};
use axum_test::{TestRequest, TestServer};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use codenest::backend::auth::users::{NewUser, User};
use codenest::backend::server::{build_app, AppState};
use codenest::backend::store::{MemoryStore, UserStore};
use codenest::shared::config::AppConfig;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Configuration with the cheapest bcrypt cost
pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .jwt_secret("integration-test-secret")
        .bcrypt_cost(4)
        .build()
        .expect("test configuration is valid")
}

/// Account created through the API
pub struct TestUser {
    pub uuid: String,
    pub username: String,
    pub email: String,
    pub token: String,
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), test_config());
        let server = TestServer::new(build_app(state)).expect("test server starts");
        Self { server, store }
    }

    /// Register `username` with `<username>@example.com`
    pub async fn register(&self, username: &str) -> TestUser {
        let email = format!("{username}@example.com");
        let response = self
            .server
            .post("/api/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": TEST_PASSWORD,
            }))
            .await;
        assert_eq!(response.status_code(), 201, "register {username}: {}", response.text());

        let body: Value = response.json();
        TestUser {
            uuid: body["user"]["uuid"].as_str().unwrap_or_default().to_string(),
            username: username.to_string(),
            email,
            token: body["token"].as_str().unwrap_or_default().to_string(),
        }
    }

    /// Create a snippet as `user` and return its token
    pub async fn create_snippet(&self, user: &TestUser, body: Value) -> String {
        let response = authed(self.server.post("/api/code/new"), &user.token)
            .json(&body)
            .await;
        assert_eq!(response.status_code(), 200, "create snippet: {}", response.text());
        let body: Value = response.json();
        body["uuid"].as_str().unwrap_or_default().to_string()
    }

    /// Store-level id of a registered user
    pub async fn user_id(&self, user: &TestUser) -> i64 {
        let uuid = Uuid::parse_str(&user.uuid).expect("uuid in register response");
        self.store
            .user_by_uuid(uuid)
            .await
            .expect("store available")
            .expect("user exists")
            .id
    }
}

/// Attach a bearer token to a request
pub fn authed(request: TestRequest, token: &str) -> TestRequest {
    let value = HeaderValue::from_str(&auth_header(token)).expect("token is a valid header value");
    request.add_header(AUTHORIZATION, value)
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Insert a user straight into a store, bypassing password hashing
pub async fn insert_user<S>(store: &S, username: &str) -> User
where
    S: UserStore + ?Sized,
{
    store
        .insert_user(NewUser {
            uuid: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
            created_at: Utc::now(),
        })
        .await
        .expect("insert user")
}
