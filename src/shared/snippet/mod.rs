//! Snippet Domain Model
//!
//! Stored snippets, their tags and the two append-only logs written by the
//! access engine.
//!
//! # Module Structure
//!
//! - **`policy`** - Expiration policy, accessibility evaluator, quota calculator
//! - **`api`** - Request/response payloads for the JSON API
//!
//! # Identifiers
//!
//! A snippet has an internal numeric `id` used for joins and an opaque
//! `token` (UUID v4 string) that is the only identifier exposed to clients.

pub mod api;
pub mod policy;

use chrono::{DateTime, Utc};

pub use api::{
    AuthorInfo, CreateSnippetRequest, ExpirationLogResponse, LatestSnippetsResponse,
    SnippetResponse, SnippetStatsResponse, SnippetViewResponse, ViewLogResponse, ViewParams,
};
pub use policy::{
    expires_at, is_accessible, remaining, ExpirationKind, ExpirationPolicy, ExpirationReason,
    Quota,
};

/// Longest tag name the `tags` table accepts, in characters
pub const MAX_TAG_LENGTH: usize = 100;

/// A stored snippet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// Internal surrogate key
    pub id: i64,
    /// Opaque external identifier
    pub token: String,
    pub owner_id: i64,
    pub title: Option<String>,
    pub content: String,
    /// Fixed at creation
    pub policy: ExpirationPolicy,
    pub created_at: DateTime<Utc>,
    /// Monotonically non-decreasing
    pub view_count: u64,
    /// Once set, never cleared
    pub is_deleted: bool,
}

impl Snippet {
    pub fn is_accessible(&self, now: DateTime<Utc>) -> bool {
        policy::is_accessible(self, now)
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Quota {
        policy::remaining(self, now)
    }

    /// Expiry instant for time-limited snippets, otherwise the creation time
    pub fn expiry_date(&self) -> DateTime<Utc> {
        policy::expires_at(self).unwrap_or(self.created_at)
    }
}

/// Validated input for creating a snippet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewSnippet {
    pub title: Option<String>,
    pub content: String,
    pub policy: ExpirationPolicy,
    pub tags: Vec<String>,
}

/// Fields the store needs to insert a snippet row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetDraft {
    pub token: String,
    pub owner_id: i64,
    pub title: Option<String>,
    pub content: String,
    pub policy: ExpirationPolicy,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub id: i64,
    /// Globally unique, case-sensitive
    pub name: String,
}

/// One successful, identified view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLogEntry {
    pub id: i64,
    pub snippet_id: i64,
    pub viewer_id: i64,
    pub viewed_at: DateTime<Utc>,
}

/// Records the moment a snippet stopped being accessible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpirationLogEntry {
    pub id: i64,
    pub snippet_id: i64,
    pub reason: ExpirationReason,
    pub expired_at: DateTime<Utc>,
}
