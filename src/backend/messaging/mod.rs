//! Messaging Module
//!
//! Direct messages between users, optionally pointing at a snippet.
//!
//! A message names its recipient by id or by email. A snippet reference that
//! does not resolve is dropped rather than rejected. Listings show the other
//! party's username and the referenced snippet's token when they still exist.

pub mod handlers;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::backend::store::{MessageStore, SnippetStore, StoreError, UserStore};
use crate::shared::messaging::{Direction, DirectMessage, MessageResponse, NewMessage, SendMessageRequest};
use crate::shared::time::display_timestamp;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("{0}")]
    Invalid(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Which listing a message is rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Inbox,
    Sent,
    Conversation,
}

/// Send a message from `sender_id`
///
/// # Errors
///
/// * `Invalid` - empty content, no recipient given, or recipient is the sender
/// * `NotFound` - the recipient id or email is unknown
pub async fn send_message<S>(
    store: &S,
    sender_id: i64,
    request: SendMessageRequest,
    now: DateTime<Utc>,
) -> Result<DirectMessage, MessageError>
where
    S: MessageStore + UserStore + SnippetStore + ?Sized,
{
    let receiver = if let Some(id) = request.receiver_id {
        store
            .user_by_id(id)
            .await?
            .ok_or(MessageError::NotFound("Recipient user ID not found"))?
    } else if let Some(email) = request
        .receiver_email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
    {
        store
            .user_by_email(email)
            .await?
            .ok_or(MessageError::NotFound("Recipient email not found"))?
    } else {
        return Err(MessageError::Invalid("Recipient ID or Email is required"));
    };

    if receiver.id == sender_id {
        return Err(MessageError::Invalid("Cannot send messages to yourself"));
    }
    if request.content.trim().is_empty() {
        return Err(MessageError::Invalid("Message content is required"));
    }

    let snippet_id = match request.snip_uuid.as_deref().filter(|t| !t.is_empty()) {
        Some(token) => store.snippet_by_token(token).await?.map(|s| s.id),
        None => match request.snip_id {
            Some(id) => store.snippet_by_id(id).await?.map(|s| s.id),
            None => None,
        },
    };

    let message = store
        .insert_message(NewMessage {
            sender_id,
            receiver_id: receiver.id,
            snippet_id,
            content: request.content,
            sent_at: now,
        })
        .await?;

    tracing::info!(
        message_id = message.id,
        sender_id,
        receiver_id = receiver.id,
        "message sent"
    );
    Ok(message)
}

async fn username<S>(store: &S, user_id: i64) -> Result<Option<String>, StoreError>
where
    S: UserStore + ?Sized,
{
    Ok(store.user_by_id(user_id).await?.map(|u| u.username))
}

/// Render `messages` for `viewer_id` in the shape of `listing`
pub async fn render_messages<S>(
    store: &S,
    viewer_id: i64,
    messages: Vec<DirectMessage>,
    listing: Listing,
) -> Result<Vec<MessageResponse>, StoreError>
where
    S: UserStore + SnippetStore + ?Sized,
{
    let mut rendered = Vec::with_capacity(messages.len());
    for message in messages {
        let snip_uuid = match message.snippet_id {
            Some(id) => store.snippet_by_id(id).await?.map(|s| s.token),
            None => None,
        };

        let mut response = MessageResponse {
            id: message.id,
            sender_id: None,
            sender_name: None,
            receiver_id: None,
            receiver_name: None,
            direction: None,
            content: message.content,
            sent_at: display_timestamp(&message.sent_at),
            snip_uuid,
        };

        match listing {
            Listing::Inbox => {
                response.sender_id = Some(message.sender_id);
                response.sender_name = username(store, message.sender_id).await?;
            }
            Listing::Sent => {
                response.receiver_id = Some(message.receiver_id);
                response.receiver_name = username(store, message.receiver_id).await?;
            }
            Listing::Conversation => {
                response.sender_id = Some(message.sender_id);
                response.sender_name = username(store, message.sender_id).await?;
                response.receiver_id = Some(message.receiver_id);
                response.receiver_name = username(store, message.receiver_id).await?;
                response.direction = Some(if message.sender_id == viewer_id {
                    Direction::Sent
                } else {
                    Direction::Received
                });
            }
        }
        rendered.push(response);
    }
    Ok(rendered)
}
