//! Group Types
//!
//! Groups let users share snippets with a fixed set of members. The creator
//! is always a member and is the only one who can add or remove others.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::snippet::{AuthorInfo, SnippetResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub creator_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub group_id: i64,
    pub user_id: i64,
    pub joined_at: DateTime<Utc>,
}

/// A snippet shared into a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupShare {
    pub group_id: i64,
    pub snippet_id: i64,
    pub shared_by_id: i64,
    pub shared_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateGroupRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AddMemberRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ShareSnippetRequest {
    #[serde(default)]
    pub snippet_uuid: String,
}

/// Role of the requesting user within a listed group
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GroupRole {
    Creator,
    Member,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub member_count: u64,
    pub role: GroupRole,
    /// Only present for groups the user joined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MyGroupsResponse {
    pub created: Vec<GroupResponse>,
    pub joined: Vec<GroupResponse>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: i64,
    pub uuid: String,
    pub username: String,
    pub joined_at: String,
    pub is_creator: bool,
}

/// Snippet listed in a group, with who shared it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupSnippetResponse {
    #[serde(flatten)]
    pub snippet: SnippetResponse,
    pub shared_by: Option<AuthorInfo>,
    pub shared_at: String,
}
