//! Messaging HTTP Handlers
//!
//! - `POST /api/messages` - send a message
//! - `GET  /api/messages/inbox` - received, newest first
//! - `GET  /api/messages/sent` - sent, newest first
//! - `GET  /api/messages/conversation/{otherUserId}` - both directions, oldest first

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use super::{render_messages, send_message, Listing};
use crate::backend::error::BackendError;
use crate::backend::middleware::CurrentUser;
use crate::backend::server::state::AppState;
use crate::backend::store::MessageStore;
use crate::shared::messaging::{ListMessagesResponse, SendMessageRequest, SendMessageResponse};

/// Send a direct message
pub async fn send(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, BackendError> {
    let message = send_message(&*state.store, user.id, request, Utc::now()).await?;
    Ok(Json(SendMessageResponse {
        success: true,
        message_id: message.id,
    }))
}

pub async fn inbox(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ListMessagesResponse>, BackendError> {
    let messages = state.store.inbox(user.id).await?;
    let messages = render_messages(&*state.store, user.id, messages, Listing::Inbox).await?;
    Ok(Json(ListMessagesResponse {
        success: true,
        messages,
    }))
}

pub async fn sent(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ListMessagesResponse>, BackendError> {
    let messages = state.store.sent(user.id).await?;
    let messages = render_messages(&*state.store, user.id, messages, Listing::Sent).await?;
    Ok(Json(ListMessagesResponse {
        success: true,
        messages,
    }))
}

/// Messages exchanged with one other user
pub async fn conversation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(other_user_id): Path<i64>,
) -> Result<Json<ListMessagesResponse>, BackendError> {
    let messages = state.store.conversation(user.id, other_user_id).await?;
    tracing::debug!(user_id = user.id, other_user_id, count = messages.len(), "conversation loaded");

    let messages =
        render_messages(&*state.store, user.id, messages, Listing::Conversation).await?;
    Ok(Json(ListMessagesResponse {
        success: true,
        messages,
    }))
}
