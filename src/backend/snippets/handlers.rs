/**
 * Snippet Handlers
 *
 * HTTP handlers for the snippet endpoints.
 *
 * # Endpoints
 *
 * - `POST   /api/code/new`           - create a snippet (auth required)
 * - `GET    /api/code/latest`        - newest public snippets
 * - `GET    /api/code/{token}`       - view a snippet through the access engine
 * - `DELETE /api/code/{token}`       - soft delete (owner only)
 * - `GET    /api/code/{token}/stats` - view and expiration logs (owner only)
 * - `GET    /api/user/snippets`      - the caller's own snippets
 *
 * Viewing is the only endpoint with side effects on read: unless
 * `?skipIncrement=true` is given it counts the view, logs identified viewers
 * and records the expiration of view-limited snippets.
 */

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::Utc;

use crate::backend::error::BackendError;
use crate::backend::middleware::{CurrentUser, MaybeUser};
use crate::backend::server::state::AppState;
use crate::backend::snippets::{
    create_snippet, record_access, render_snippet, render_snippets, render_view, snippet_stats,
    soft_delete,
};
use crate::backend::store::SnippetStore;
use crate::shared::snippet::{
    CreateSnippetRequest, LatestSnippetsResponse, SnippetResponse, SnippetStatsResponse,
    SnippetViewResponse, ViewParams,
};

/// Create a snippet owned by the caller
///
/// # Example Request
///
/// ```http
/// POST /api/code/new HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "title": "hello",
///   "content": "fn main() {}",
///   "expirationType": "VIEWS",
///   "expirationValue": 3,
///   "tags": ["rust"]
/// }
/// ```
///
/// # Errors
///
/// * `400 Bad Request` - blank content, negative value or unknown expiration type
/// * `401 Unauthorized` - no session
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateSnippetRequest>,
) -> Result<Json<SnippetResponse>, BackendError> {
    let new = request.into_new_snippet()?;
    let now = Utc::now();

    let snippet = create_snippet(&*state.store, user.id, new, now).await?;
    let response = render_snippet(&*state.store, &snippet, now).await?;
    Ok(Json(response))
}

/// The most recently created snippets that are not deleted
///
/// Responds with `{ "snippets": [...], "authors": [...] }`. Snippets past
/// their limit are still listed; `isAccessible` tells clients which ones can
/// be opened.
pub async fn latest(
    State(state): State<AppState>,
) -> Result<Json<LatestSnippetsResponse>, BackendError> {
    let snippets = state
        .store
        .latest_snippets(state.config.latest_limit)
        .await?;
    let rendered = render_snippets(&*state.store, &snippets, Utc::now()).await?;
    Ok(Json(rendered.into()))
}

/// View a snippet by token
///
/// Responds with `{ "snippet": {...}, "author": {...}, "tags": [...] }`.
///
/// # Errors
///
/// * `404 Not Found` - unknown token
/// * `403 Forbidden` - deleted or expired; the body carries `"expired": true`
pub async fn view(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(params): Query<ViewParams>,
    MaybeUser(viewer): MaybeUser,
) -> Result<Json<SnippetViewResponse>, BackendError> {
    let viewer_id = viewer.as_ref().map(|u| u.id);
    let view = record_access(
        &*state.store,
        &token,
        viewer_id,
        params.skip_increment,
        Utc::now(),
    )
    .await?;

    Ok(Json(render_view(&*state.store, &view).await?))
}

/// Soft delete a snippet owned by the caller
pub async fn delete(
    State(state): State<AppState>,
    Path(token): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<serde_json::Value>, BackendError> {
    soft_delete(&*state.store, &token, user.id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Snippet deleted"
    })))
}

/// Access statistics; only the owner may read them
pub async fn stats(
    State(state): State<AppState>,
    Path(token): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<SnippetStatsResponse>, BackendError> {
    let stats = snippet_stats(&*state.store, &token, user.id, Utc::now()).await?;
    Ok(Json(stats))
}

/// The caller's own snippets, newest first
pub async fn my_snippets(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<SnippetResponse>>, BackendError> {
    let snippets = state.store.snippets_by_owner(user.id).await?;
    tracing::debug!(user_id = user.id, count = snippets.len(), "listing own snippets");

    let rendered = render_snippets(&*state.store, &snippets, Utc::now()).await?;
    Ok(Json(rendered))
}
