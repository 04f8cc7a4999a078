//! Groups Module
//!
//! Snippet sharing among a fixed set of users.
//!
//! - The creator is enrolled as a member when the group is made.
//! - Only the creator adds or removes members, and cannot remove themselves.
//! - Any member may list members, list shared snippets and share a snippet.
//! - Listing shared snippets never counts a view; snippets that are no
//!   longer accessible are left out.

pub mod handlers;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::backend::store::{GroupStore, SnippetStore, Store, StoreError, UserStore};
use crate::backend::snippets::render_snippet;
use crate::shared::groups::{
    Group, GroupMember, GroupResponse, GroupRole, GroupShare, GroupSnippetResponse,
    MemberResponse, MyGroupsResponse,
};
use crate::shared::time::display_timestamp;

const MAX_GROUP_NAME_LEN: usize = 100;

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("User is already a member of this group")]
    AlreadyMember,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of sharing a snippet into a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    AlreadyShared,
}

async fn load_group<S>(store: &S, group_id: i64) -> Result<Group, GroupError>
where
    S: GroupStore + ?Sized,
{
    store
        .group_by_id(group_id)
        .await?
        .ok_or(GroupError::NotFound("Group not found"))
}

async fn require_member<S>(store: &S, group_id: i64, user_id: i64) -> Result<Group, GroupError>
where
    S: GroupStore + ?Sized,
{
    let group = load_group(store, group_id).await?;
    if store.membership(group_id, user_id).await?.is_none() {
        tracing::warn!(group_id, user_id, "group access refused: not a member");
        return Err(GroupError::Forbidden("You are not a member of this group"));
    }
    Ok(group)
}

async fn require_creator<S>(store: &S, group_id: i64, user_id: i64) -> Result<Group, GroupError>
where
    S: GroupStore + ?Sized,
{
    let group = load_group(store, group_id).await?;
    if group.creator_id != user_id {
        tracing::warn!(group_id, user_id, "group change refused: not the creator");
        return Err(GroupError::Forbidden("Only the group creator can manage members"));
    }
    Ok(group)
}

/// Create a group named `name`; `creator_id` becomes its first member
pub async fn create_group<S>(
    store: &S,
    creator_id: i64,
    name: &str,
    now: DateTime<Utc>,
) -> Result<Group, GroupError>
where
    S: GroupStore + ?Sized,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(GroupError::Invalid("Group name is required".to_string()));
    }
    if name.chars().count() > MAX_GROUP_NAME_LEN {
        return Err(GroupError::Invalid(format!(
            "Group name must be at most {MAX_GROUP_NAME_LEN} characters"
        )));
    }

    let group = store.create_group(name, creator_id, now).await?;
    tracing::info!(group_id = group.id, creator_id, "group created");
    Ok(group)
}

async fn group_response<S>(
    store: &S,
    group: &Group,
    role: GroupRole,
    membership: Option<&GroupMember>,
) -> Result<GroupResponse, GroupError>
where
    S: GroupStore + ?Sized,
{
    Ok(GroupResponse {
        id: group.id,
        name: group.name.clone(),
        created_at: display_timestamp(&group.created_at),
        member_count: store.member_count(group.id).await?,
        role,
        joined_at: membership.map(|m| display_timestamp(&m.joined_at)),
    })
}

/// Groups the user created and groups they were added to
pub async fn my_groups<S>(store: &S, user_id: i64) -> Result<MyGroupsResponse, GroupError>
where
    S: GroupStore + ?Sized,
{
    let mut created = Vec::new();
    for group in store.groups_created_by(user_id).await? {
        created.push(group_response(store, &group, GroupRole::Creator, None).await?);
    }

    let mut joined = Vec::new();
    for (group, member) in store.groups_joined_by(user_id).await? {
        joined.push(group_response(store, &group, GroupRole::Member, Some(&member)).await?);
    }

    Ok(MyGroupsResponse { created, joined })
}

/// Add the user registered under `email` to the group
///
/// # Errors
///
/// * `Forbidden` - the requester did not create the group
/// * `Invalid` - no email given
/// * `NotFound` - unknown group or email
/// * `AlreadyMember` - the user is already in the group
pub async fn add_member<S>(
    store: &S,
    group_id: i64,
    requester_id: i64,
    email: &str,
    now: DateTime<Utc>,
) -> Result<GroupMember, GroupError>
where
    S: GroupStore + UserStore + ?Sized,
{
    require_creator(store, group_id, requester_id).await?;

    let email = email.trim();
    if email.is_empty() {
        return Err(GroupError::Invalid("Email is required".to_string()));
    }
    let user = store
        .user_by_email(email)
        .await?
        .ok_or(GroupError::NotFound("No user with this email"))?;

    match store.add_member(group_id, user.id, now).await {
        Ok(member) => {
            tracing::info!(group_id, user_id = user.id, "member added");
            Ok(member)
        }
        Err(e) if e.is_conflict() => Err(GroupError::AlreadyMember),
        Err(e) => Err(e.into()),
    }
}

/// Remove a member; the creator cannot be removed
pub async fn remove_member<S>(
    store: &S,
    group_id: i64,
    requester_id: i64,
    user_id: i64,
) -> Result<(), GroupError>
where
    S: GroupStore + ?Sized,
{
    let group = require_creator(store, group_id, requester_id).await?;
    if user_id == group.creator_id {
        return Err(GroupError::Invalid(
            "The group creator cannot be removed".to_string(),
        ));
    }

    if !store.remove_member(group_id, user_id).await? {
        return Err(GroupError::NotFound("User is not a member of this group"));
    }
    tracing::info!(group_id, user_id, "member removed");
    Ok(())
}

/// Members of the group, oldest first; requester must be a member
pub async fn list_members<S>(
    store: &S,
    group_id: i64,
    requester_id: i64,
) -> Result<Vec<MemberResponse>, GroupError>
where
    S: GroupStore + UserStore + ?Sized,
{
    let group = require_member(store, group_id, requester_id).await?;

    let mut members = Vec::new();
    for member in store.members(group_id).await? {
        // Accounts can disappear under a membership row.
        let Some(user) = store.user_by_id(member.user_id).await? else {
            continue;
        };
        members.push(MemberResponse {
            id: user.id,
            uuid: user.uuid.to_string(),
            username: user.username,
            joined_at: display_timestamp(&member.joined_at),
            is_creator: member.user_id == group.creator_id,
        });
    }
    Ok(members)
}

/// Share the snippet with token `snippet_token` into the group
///
/// A snippet the requester does not own must still be accessible.
pub async fn share_snippet<S>(
    store: &S,
    group_id: i64,
    requester_id: i64,
    snippet_token: &str,
    now: DateTime<Utc>,
) -> Result<ShareOutcome, GroupError>
where
    S: GroupStore + SnippetStore + ?Sized,
{
    let snippet_token = snippet_token.trim();
    if snippet_token.is_empty() {
        return Err(GroupError::Invalid("Snippet UUID is required".to_string()));
    }
    require_member(store, group_id, requester_id).await?;

    let snippet = store
        .snippet_by_token(snippet_token)
        .await?
        .ok_or(GroupError::NotFound("No such code snippet"))?;
    if snippet.owner_id != requester_id && !snippet.is_accessible(now) {
        return Err(GroupError::Forbidden("This snippet is no longer accessible"));
    }

    let shared = store
        .share_snippet(GroupShare {
            group_id,
            snippet_id: snippet.id,
            shared_by_id: requester_id,
            shared_at: now,
        })
        .await?;

    if shared {
        tracing::info!(group_id, snippet_id = snippet.id, "snippet shared");
        Ok(ShareOutcome::Shared)
    } else {
        Ok(ShareOutcome::AlreadyShared)
    }
}

/// Accessible snippets shared into the group, newest share first
pub async fn group_snippets<S>(
    store: &S,
    group_id: i64,
    requester_id: i64,
    now: DateTime<Utc>,
) -> Result<Vec<GroupSnippetResponse>, GroupError>
where
    S: Store + ?Sized,
{
    require_member(store, group_id, requester_id).await?;

    let mut listed = Vec::new();
    for share in store.group_shares(group_id).await? {
        let Some(snippet) = store.snippet_by_id(share.snippet_id).await? else {
            continue;
        };
        if !snippet.is_accessible(now) {
            continue;
        }
        let shared_by = store
            .user_by_id(share.shared_by_id)
            .await?
            .map(|u| u.author_info());
        listed.push(GroupSnippetResponse {
            snippet: render_snippet(store, &snippet, now).await?,
            shared_by,
            shared_at: display_timestamp(&share.shared_at),
        });
    }
    Ok(listed)
}
