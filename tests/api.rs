//! HTTP API integration tests
//!
//! Drives the full router with `axum-test` over an in-memory store.

mod common;

use axum::http::{header::SET_COOKIE, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use codenest::backend::store::SnippetStore;

use common::{authed, TestApp, TEST_PASSWORD};

#[tokio::test]
async fn test_register_login_me_logout() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    assert!(!alice.token.is_empty());

    let response = authed(app.server.get("/api/auth/me"), &alice.token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert!(body.get("password_hash").is_none());

    let response = app
        .server
        .post("/api/login")
        .json(&json!({ "email": "alice@example.com", "password": TEST_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    crate::assert_contains!(cookie, "session=");
    crate::assert_contains!(cookie, "HttpOnly");
    crate::assert_contains!(cookie, "Max-Age=360");

    let response = app
        .server
        .post("/api/login")
        .json(&json!({ "email": "alice@example.com", "password": TEST_PASSWORD, "remember": true }))
        .await;
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    crate::assert_contains!(cookie, "Max-Age=1166000");

    let response = app.server.post("/api/logout").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_and_login_failures() {
    let app = TestApp::new();
    app.register("alice").await;

    let response = app
        .server
        .post("/api/register")
        .json(&json!({ "username": "alice", "email": "other@example.com", "password": TEST_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = app
        .server
        .post("/api/register")
        .json(&json!({ "username": "bob", "email": "bob@example.com", "password": "short" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/api/login")
        .json(&json!({ "email": "alice@example.com", "password": "wrong-password" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app.server.get("/api/auth/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = authed(app.server.get("/api/auth/me"), "not-a-jwt").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_update() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    app.register("bob").await;

    let response = authed(app.server.put("/api/user/profile"), &alice.token)
        .json(&json!({ "github": "https://github.com/alice", "personal": "" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["github"], "https://github.com/alice");
    assert_eq!(body["personal"], Value::Null);

    let response = authed(app.server.put("/api/user/profile"), &alice.token)
        .json(&json!({ "username": "bob" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_snippet_view_limit_over_http() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let token = app
        .create_snippet(
            &alice,
            json!({
                "title": "limited",
                "content": "SELECT 1;",
                "expirationType": "VIEWS",
                "expirationValue": 2,
                "tags": ["sql", "sql"]
            }),
        )
        .await;

    let path = format!("/api/code/{token}");

    let response = app
        .server
        .get(&path)
        .add_query_param("skipIncrement", "true")
        .await;
    crate::assert_status!(response, StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["snippet"]["viewCount"], 0);
    assert_eq!(body["snippet"]["remainingViews"], 2);
    assert_eq!(body["snippet"]["expirationType"], "VIEWS");
    assert_eq!(body["snippet"]["tags"], json!(["sql"]));
    assert_eq!(body["tags"], json!(["sql"]));
    assert_eq!(body["author"]["username"], "alice");
    assert_eq!(body["snippet"]["author"], body["author"]);

    let response = authed(app.server.get(&path), &bob.token).await;
    let body: Value = response.json();
    assert_eq!(body["snippet"]["viewCount"], 1);
    assert_eq!(body["snippet"]["isAccessible"], true);

    // The view that reaches the limit is served but reports no views left
    let response = app.server.get(&path).await;
    let body: Value = response.json();
    assert_eq!(body["snippet"]["viewCount"], 2);
    assert_eq!(body["snippet"]["remainingViews"], 0);
    assert_eq!(body["snippet"]["isAccessible"], false);

    let response = app.server.get(&path).await;
    let body =
        crate::assert_error_response!(response, StatusCode::FORBIDDEN, "The code snippet has expired.");
    assert_eq!(body["expired"], true);

    let response = authed(app.server.get(&format!("{path}/stats")), &alice.token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let stats: Value = response.json();
    assert_eq!(stats["viewCount"], 2);
    assert_eq!(stats["viewLogs"].as_array().map(Vec::len), Some(1));
    assert_eq!(stats["viewLogs"][0]["viewer"], bob.uuid.as_str());
    assert_eq!(stats["expirationLogs"][0]["reason"], "VIEWS");

    let response = authed(app.server.get(&format!("{path}/stats")), &bob.token).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_snippet_errors_and_delete() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let response = app.server.get("/api/code/does-not-exist").await;
    crate::assert_error_response!(response, StatusCode::NOT_FOUND, "No such code snippet");

    let response = app
        .server
        .post("/api/code/new")
        .json(&json!({ "content": "x" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    for bad in [
        json!({ "content": "   " }),
        json!({ "content": "x", "expirationType": "FOREVER", "expirationValue": 1 }),
        json!({ "content": "x", "expirationType": "TIME", "expirationValue": -5 }),
    ] {
        let response = authed(app.server.post("/api/code/new"), &alice.token)
            .json(&bad)
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{bad}");
    }
    assert!(app
        .store
        .snippets_by_owner(app.user_id(&alice).await)
        .await
        .unwrap()
        .is_empty());

    let token = app
        .create_snippet(&alice, json!({ "content": "fn main() {}", "expirationType": "TIME", "expirationValue": 3600 }))
        .await;
    let path = format!("/api/code/{token}");

    let response = authed(app.server.delete(&path), &bob.token).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = authed(app.server.delete(&path), &alice.token).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app.server.get(&path).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let snippet = app.store.snippet_by_token(&token).await.unwrap().unwrap();
    assert!(snippet.is_deleted);
    assert_eq!(snippet.view_count, 0);
}

#[tokio::test]
async fn test_overlong_tag_is_rejected_before_storing() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = authed(app.server.post("/api/code/new"), &alice.token)
        .json(&json!({ "content": "fn main() {}", "tags": ["ok", "x".repeat(101)] }))
        .await;
    crate::assert_error_response!(
        response,
        StatusCode::BAD_REQUEST,
        "Tag names cannot exceed 100 characters"
    );

    let owner_id = app.user_id(&alice).await;
    assert!(app.store.snippets_by_owner(owner_id).await.unwrap().is_empty());
    let latest: Value = app.server.get("/api/code/latest").await.json();
    assert_eq!(latest["snippets"], json!([]));

    // Exactly at the limit is fine
    let token = app
        .create_snippet(&alice, json!({ "content": "fn main() {}", "tags": ["y".repeat(100)] }))
        .await;
    let body: Value = app.server.get(&format!("/api/code/{token}")).await.json();
    assert_eq!(body["tags"][0].as_str().map(str::len), Some(100));
}

#[tokio::test]
async fn test_latest_and_own_snippets() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let first = app.create_snippet(&alice, json!({ "content": "one" })).await;
    app.create_snippet(&bob, json!({ "content": "two" })).await;
    let deleted = app.create_snippet(&alice, json!({ "content": "three" })).await;
    authed(app.server.delete(&format!("/api/code/{deleted}")), &alice.token).await;

    let body: Value = app.server.get("/api/code/latest").await.json();
    let latest = body["snippets"].as_array().cloned().unwrap_or_default();
    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0]["content"], "two");
    assert_eq!(body["authors"][0]["username"], "bob");
    assert_eq!(body["authors"][1]["username"], "alice");

    let mine: Value = authed(app.server.get("/api/user/snippets"), &alice.token)
        .await
        .json();
    let mine = mine.as_array().cloned().unwrap_or_default();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["uuid"], first.as_str());
}

#[tokio::test]
async fn test_group_flow() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let carol = app.register("carol").await;

    let response = authed(app.server.post("/api/groups"), &alice.token)
        .json(&json!({ "name": "reviewers" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    let group_id = body["group"]["id"].as_i64().unwrap();

    let members_path = format!("/api/groups/{group_id}/members");
    let response = authed(app.server.post(&members_path), &alice.token)
        .json(&json!({ "email": "bob@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = authed(app.server.post(&members_path), &alice.token)
        .json(&json!({ "email": "bob@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = authed(app.server.post(&members_path), &bob.token)
        .json(&json!({ "email": "carol@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = authed(app.server.get(&members_path), &carol.token).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let members: Value = authed(app.server.get(&members_path), &bob.token).await.json();
    assert_eq!(members.as_array().map(Vec::len), Some(2));

    let snippet = app
        .create_snippet(&bob, json!({ "content": "shared", "expirationType": "VIEWS", "expirationValue": 5 }))
        .await;
    let snippets_path = format!("/api/groups/{group_id}/snippets");
    let response = authed(app.server.post(&snippets_path), &bob.token)
        .json(&json!({ "snippetUuid": snippet }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = authed(app.server.post(&snippets_path), &bob.token)
        .json(&json!({ "snippetUuid": snippet }))
        .await;
    let body: Value = response.json();
    assert_eq!(body["message"], "Snippet is already shared with this group");

    let listed: Value = authed(app.server.get(&snippets_path), &alice.token).await.json();
    assert_eq!(listed[0]["uuid"], snippet.as_str());
    assert_eq!(listed[0]["sharedBy"]["username"], "bob");
    // Listing does not count as a view
    assert_eq!(listed[0]["viewCount"], 0);

    let groups: Value = authed(app.server.get("/api/groups/my"), &bob.token).await.json();
    assert_eq!(groups["joined"][0]["name"], "reviewers");
    assert_eq!(groups["joined"][0]["memberCount"], 2);

    let bob_id = app.user_id(&bob).await;
    let alice_id = app.user_id(&alice).await;
    let response = authed(
        app.server.delete(&format!("/api/groups/{group_id}/members/{alice_id}")),
        &alice.token,
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = authed(
        app.server.delete(&format!("/api/groups/{group_id}/members/{bob_id}")),
        &alice.token,
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_messages() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let bob_id = app.user_id(&bob).await;
    let alice_id = app.user_id(&alice).await;

    let snippet = app.create_snippet(&alice, json!({ "content": "look" })).await;

    let response = authed(app.server.post("/api/messages"), &alice.token)
        .json(&json!({ "receiverEmail": "bob@example.com", "content": "see this", "snipUuid": snippet }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert!(body["messageId"].as_i64().is_some());

    let response = authed(app.server.post("/api/messages"), &bob.token)
        .json(&json!({ "receiverId": alice_id, "content": "thanks" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = authed(app.server.post("/api/messages"), &alice.token)
        .json(&json!({ "content": "to nobody" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = authed(app.server.post("/api/messages"), &alice.token)
        .json(&json!({ "receiverId": alice_id, "content": "me" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let inbox: Value = authed(app.server.get("/api/messages/inbox"), &bob.token).await.json();
    assert_eq!(inbox["messages"][0]["senderName"], "alice");
    assert_eq!(inbox["messages"][0]["snipUuid"], snippet.as_str());

    let sent: Value = authed(app.server.get("/api/messages/sent"), &alice.token).await.json();
    assert_eq!(sent["messages"][0]["receiverName"], "bob");

    let conversation: Value = authed(
        app.server.get(&format!("/api/messages/conversation/{bob_id}")),
        &alice.token,
    )
    .await
    .json();
    let messages = conversation["messages"].as_array().cloned().unwrap_or_default();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["direction"], "sent");
    assert_eq!(messages[1]["direction"], "received");
}
