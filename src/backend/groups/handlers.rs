/**
 * Group Handlers
 *
 * # Endpoints
 *
 * - `POST   /api/groups`                          - create a group
 * - `GET    /api/groups/my`                       - created and joined groups
 * - `POST   /api/groups/{id}/members`             - add a member by email (creator)
 * - `DELETE /api/groups/{id}/members/{userId}`    - remove a member (creator)
 * - `GET    /api/groups/{id}/members`             - list members (member)
 * - `GET    /api/groups/{id}/snippets`            - accessible shared snippets (member)
 * - `POST   /api/groups/{id}/snippets`            - share a snippet (member)
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use super::{
    add_member, create_group, group_snippets, list_members, my_groups, remove_member,
    share_snippet, ShareOutcome,
};
use crate::backend::error::BackendError;
use crate::backend::middleware::CurrentUser;
use crate::backend::server::state::AppState;
use crate::shared::groups::{
    AddMemberRequest, CreateGroupRequest, GroupSnippetResponse, MemberResponse, MyGroupsResponse,
    ShareSnippetRequest,
};
use crate::shared::time::display_timestamp;

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Value>), BackendError> {
    let group = create_group(&*state.store, user.id, &request.name, Utc::now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "group": {
                "id": group.id,
                "name": group.name,
                "createdAt": display_timestamp(&group.created_at),
            }
        })),
    ))
}

pub async fn mine(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MyGroupsResponse>, BackendError> {
    Ok(Json(my_groups(&*state.store, user.id).await?))
}

pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(group_id): Path<i64>,
    Json(request): Json<AddMemberRequest>,
) -> Result<Json<Value>, BackendError> {
    add_member(&*state.store, group_id, user.id, &request.email, Utc::now()).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Member added"
    })))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((group_id, member_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, BackendError> {
    remove_member(&*state.store, group_id, user.id, member_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Member removed"
    })))
}

pub async fn members(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(group_id): Path<i64>,
) -> Result<Json<Vec<MemberResponse>>, BackendError> {
    Ok(Json(list_members(&*state.store, group_id, user.id).await?))
}

pub async fn snippets(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(group_id): Path<i64>,
) -> Result<Json<Vec<GroupSnippetResponse>>, BackendError> {
    Ok(Json(
        group_snippets(&*state.store, group_id, user.id, Utc::now()).await?,
    ))
}

/// Share a snippet into the group; sharing it again is a no-op
pub async fn share(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(group_id): Path<i64>,
    Json(request): Json<ShareSnippetRequest>,
) -> Result<Json<Value>, BackendError> {
    let outcome = share_snippet(
        &*state.store,
        group_id,
        user.id,
        &request.snippet_uuid,
        Utc::now(),
    )
    .await?;

    let message = match outcome {
        ShareOutcome::Shared => "Snippet shared with group",
        ShareOutcome::AlreadyShared => "Snippet is already shared with this group",
    };
    Ok(Json(json!({ "success": true, "message": message })))
}
