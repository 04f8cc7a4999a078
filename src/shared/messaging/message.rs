//! Direct Message Data Structure
//!
//! Represents a message from one user to another, optionally pointing at a
//! snippet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored direct message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMessage {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    /// Referenced snippet, if any
    pub snippet_id: Option<i64>,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// Fields needed to store a new message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub snippet_id: Option<i64>,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// Send message request
///
/// The recipient is named by `receiverId` or, failing that, `receiverEmail`.
/// A snippet may be referenced by `snipUuid` (preferred) or `snipId`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub receiver_id: Option<i64>,
    #[serde(default)]
    pub receiver_email: Option<String>,
    #[serde(default)]
    pub snip_id: Option<i64>,
    #[serde(default)]
    pub snip_uuid: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub success: bool,
    pub message_id: i64,
}

/// Whether a conversation entry was sent or received by the requester
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

/// A message as listed in an inbox, outbox or conversation
///
/// Inbox entries carry the sender, outbox entries the receiver and
/// conversation entries both plus a direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub content: String,
    pub sent_at: String,
    /// Token of the referenced snippet, `None` if absent or gone
    pub snip_uuid: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListMessagesResponse {
    pub success: bool,
    pub messages: Vec<MessageResponse>,
}
