//! Persistence Module
//!
//! Collaborator traits for everything the server persists, plus the two
//! implementations:
//!
//! - **`memory`** - `MemoryStore`, process-local state behind a tokio mutex.
//!   Used when no database is configured and by the test suite.
//! - **`postgres`** - `PgStore`, sqlx over PostgreSQL with embedded migrations.
//!
//! # Access Units
//!
//! Viewing a snippet is a read-modify-write: load, evaluate, bump the view
//! count, append logs. `SnippetStore::begin_access` opens a `SnippetAccess`
//! that holds the snippet exclusively until `commit`. Dropping it without
//! committing discards every write made through it.
//!
//! # Trait Objects
//!
//! The server holds `Arc<dyn Store>`. Engine functions are generic over the
//! narrower trait they need (`S: SnippetStore + ?Sized`) so they accept both
//! `dyn Store` and a concrete store in tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::users::{NewUser, User};
use crate::shared::groups::{Group, GroupMember, GroupShare};
use crate::shared::messaging::{DirectMessage, NewMessage};
use crate::shared::snippet::{
    ExpirationLogEntry, ExpirationReason, Snippet, SnippetDraft, Tag, ViewLogEntry,
};

pub use memory::{FaultPoint, MemoryStore};
pub use postgres::PgStore;

/// Errors raised by a store implementation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("unique constraint violated: {constraint}")]
    Conflict { constraint: String },

    /// The backing store could not complete the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored row violates a model invariant
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn conflict(constraint: impl Into<String>) -> Self {
        Self::Conflict {
            constraint: constraint.into(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Exclusive unit of work over one snippet
///
/// Writes are only visible to other requests after `commit` succeeds.
#[async_trait]
pub trait SnippetAccess: Send {
    /// Snippet as loaded, reflecting writes made through this unit
    fn snippet(&self) -> &Snippet;

    async fn save_view_count(&mut self, view_count: u64) -> Result<(), StoreError>;

    async fn append_view_log(
        &mut self,
        viewer_id: i64,
        viewed_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn append_expiration_log(
        &mut self,
        reason: ExpirationReason,
        expired_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Make every write durable. The unit cannot be used afterwards.
    async fn commit(&mut self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait SnippetStore: Send + Sync {
    async fn insert_snippet(&self, draft: SnippetDraft) -> Result<Snippet, StoreError>;

    async fn snippet_by_token(&self, token: &str) -> Result<Option<Snippet>, StoreError>;

    async fn snippet_by_id(&self, id: i64) -> Result<Option<Snippet>, StoreError>;

    /// Newest first, excluding soft-deleted snippets
    async fn latest_snippets(&self, limit: usize) -> Result<Vec<Snippet>, StoreError>;

    /// Newest first, excluding soft-deleted snippets
    async fn snippets_by_owner(&self, owner_id: i64) -> Result<Vec<Snippet>, StoreError>;

    /// Ordered by tag name
    async fn tags_for_snippet(&self, snippet_id: i64) -> Result<Vec<Tag>, StoreError>;

    /// Oldest first
    async fn view_logs(&self, snippet_id: i64) -> Result<Vec<ViewLogEntry>, StoreError>;

    /// Oldest first
    async fn expiration_logs(&self, snippet_id: i64)
        -> Result<Vec<ExpirationLogEntry>, StoreError>;

    /// Set the soft-delete flag. Setting it twice is a no-op.
    async fn mark_deleted(&self, snippet_id: i64) -> Result<(), StoreError>;

    /// Remove a snippet that was never handed to a client, with its tag links
    async fn discard_snippet(&self, snippet_id: i64) -> Result<(), StoreError>;

    /// Open an access unit, `None` when no snippet has this token
    async fn begin_access(&self, token: &str)
        -> Result<Option<Box<dyn SnippetAccess>>, StoreError>;
}

#[async_trait]
pub trait TagStore: Send + Sync {
    async fn find_tag(&self, name: &str) -> Result<Option<Tag>, StoreError>;

    /// Fails with `Conflict` when the name already exists
    async fn create_tag(&self, name: &str) -> Result<Tag, StoreError>;

    /// Idempotent
    async fn link_tag(&self, snippet_id: i64, tag_id: i64) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` on a duplicate username or email
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn user_by_uuid(&self, uuid: Uuid) -> Result<Option<User>, StoreError>;

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Persist username, email and profile links
    async fn update_user(&self, user: &User) -> Result<User, StoreError>;
}

#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Create a group and enrol its creator as the first member
    async fn create_group(
        &self,
        name: &str,
        creator_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Group, StoreError>;

    async fn group_by_id(&self, id: i64) -> Result<Option<Group>, StoreError>;

    async fn groups_created_by(&self, user_id: i64) -> Result<Vec<Group>, StoreError>;

    /// Memberships of `user_id` in groups created by someone else
    async fn groups_joined_by(&self, user_id: i64)
        -> Result<Vec<(Group, GroupMember)>, StoreError>;

    async fn membership(
        &self,
        group_id: i64,
        user_id: i64,
    ) -> Result<Option<GroupMember>, StoreError>;

    /// Oldest member first
    async fn members(&self, group_id: i64) -> Result<Vec<GroupMember>, StoreError>;

    async fn member_count(&self, group_id: i64) -> Result<u64, StoreError>;

    /// Fails with `Conflict` when already a member
    async fn add_member(
        &self,
        group_id: i64,
        user_id: i64,
        joined_at: DateTime<Utc>,
    ) -> Result<GroupMember, StoreError>;

    /// Returns whether a membership was removed
    async fn remove_member(&self, group_id: i64, user_id: i64) -> Result<bool, StoreError>;

    /// Returns `false` when the snippet was already shared into the group
    async fn share_snippet(&self, share: GroupShare) -> Result<bool, StoreError>;

    /// Newest share first
    async fn group_shares(&self, group_id: i64) -> Result<Vec<GroupShare>, StoreError>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert_message(&self, message: NewMessage) -> Result<DirectMessage, StoreError>;

    /// Received by `user_id`, newest first
    async fn inbox(&self, user_id: i64) -> Result<Vec<DirectMessage>, StoreError>;

    /// Sent by `user_id`, newest first
    async fn sent(&self, user_id: i64) -> Result<Vec<DirectMessage>, StoreError>;

    /// Both directions between two users, oldest first
    async fn conversation(&self, user_id: i64, other_id: i64)
        -> Result<Vec<DirectMessage>, StoreError>;
}

/// Everything the HTTP layer needs from persistence
pub trait Store: UserStore + SnippetStore + TagStore + GroupStore + MessageStore {}

impl<T> Store for T where T: UserStore + SnippetStore + TagStore + GroupStore + MessageStore {}
