//! Snippets Module
//!
//! Everything the server does with snippets: creating them, serving views
//! through the access engine, soft deletion, tag association and rendering
//! them for the JSON API.
//!
//! # Architecture
//!
//! - **`access`** - view orchestration (count, logs, expiration)
//! - **`tags`** - tag find-or-create and linking
//! - **`handlers`** - HTTP handlers for `/api/code/*` and `/api/user/snippets`
//!
//! Authoring, deletion and rendering live in this file; they are thin
//! compositions over the store traits.

pub mod access;
pub mod handlers;
pub mod tags;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::store::{SnippetStore, Store, StoreError, TagStore, UserStore};
use crate::shared::error::SharedError;
use crate::shared::snippet::{
    ExpirationLogResponse, NewSnippet, Snippet, SnippetDraft, SnippetResponse,
    SnippetStatsResponse, SnippetViewResponse, ViewLogResponse, MAX_TAG_LENGTH,
};

pub use access::{record_access, AccessError, SnippetView};
pub use tags::attach_tags;

/// Errors from authoring and deleting snippets
#[derive(Debug, Error)]
pub enum SnippetError {
    #[error(transparent)]
    Invalid(#[from] SharedError),

    #[error("no snippet with this token")]
    NotFound,

    #[error("only the owner may modify this snippet")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Store a new snippet for `owner_id` and attach its tags
///
/// The token is a fresh UUID v4; the view count starts at zero. The title is
/// trimmed and dropped when blank. If tagging fails the inserted row is
/// removed again, so callers never see a half-created snippet.
///
/// # Errors
///
/// * `SnippetError::Invalid` - content is blank or a tag name is too long
/// * `SnippetError::Store` - insert or tagging failed
pub async fn create_snippet<S>(
    store: &S,
    owner_id: i64,
    new: NewSnippet,
    now: DateTime<Utc>,
) -> Result<Snippet, SnippetError>
where
    S: SnippetStore + TagStore + ?Sized,
{
    if new.content.trim().is_empty() {
        return Err(SharedError::validation("content", "Snippet content cannot be empty").into());
    }
    if new
        .tags
        .iter()
        .any(|tag| tag.trim().chars().count() > MAX_TAG_LENGTH)
    {
        return Err(SharedError::validation(
            "tags",
            format!("Tag names cannot exceed {MAX_TAG_LENGTH} characters"),
        )
        .into());
    }

    let title = new
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let snippet = store
        .insert_snippet(SnippetDraft {
            token: Uuid::new_v4().to_string(),
            owner_id,
            title,
            content: new.content,
            policy: new.policy,
            created_at: now,
        })
        .await?;

    if let Err(err) = attach_tags(store, snippet.id, &new.tags).await {
        tracing::error!(token = %snippet.token, error = %err, "tagging failed, discarding snippet");
        if let Err(cleanup) = store.discard_snippet(snippet.id).await {
            tracing::error!(token = %snippet.token, error = %cleanup, "could not discard snippet");
        }
        return Err(err.into());
    }

    tracing::info!(
        token = %snippet.token,
        owner_id,
        policy = ?snippet.policy,
        "snippet created"
    );
    Ok(snippet)
}

/// Permanently hide a snippet; only its owner may do this
///
/// Deleting an already-deleted snippet succeeds without changes.
pub async fn soft_delete<S>(store: &S, token: &str, requester_id: i64) -> Result<(), SnippetError>
where
    S: SnippetStore + ?Sized,
{
    let snippet = store
        .snippet_by_token(token)
        .await?
        .ok_or(SnippetError::NotFound)?;

    if snippet.owner_id != requester_id {
        tracing::warn!(token, requester_id, "delete refused: not the owner");
        return Err(SnippetError::Forbidden);
    }

    if !snippet.is_deleted {
        store.mark_deleted(snippet.id).await?;
        tracing::info!(token, "snippet deleted");
    }
    Ok(())
}

/// Render a snippet with its author and tag names
pub async fn render_snippet<S>(
    store: &S,
    snippet: &Snippet,
    now: DateTime<Utc>,
) -> Result<SnippetResponse, StoreError>
where
    S: Store + ?Sized,
{
    let author = store
        .user_by_id(snippet.owner_id)
        .await?
        .map(|u| u.author_info());
    let tags = store
        .tags_for_snippet(snippet.id)
        .await?
        .into_iter()
        .map(|t| t.name)
        .collect();
    Ok(SnippetResponse::build(snippet, author, tags, now))
}

/// Render the outcome of an access with the engine's own decision and quota
pub async fn render_view<S>(store: &S, view: &SnippetView) -> Result<SnippetViewResponse, StoreError>
where
    S: Store + ?Sized,
{
    let snippet = &view.snippet;
    let author = store
        .user_by_id(snippet.owner_id)
        .await?
        .map(|u| u.author_info());
    let tags = store
        .tags_for_snippet(snippet.id)
        .await?
        .into_iter()
        .map(|t| t.name)
        .collect();
    Ok(
        SnippetResponse::with_quota(snippet, author, tags, view.quota, view.still_accessible)
            .into(),
    )
}

pub async fn render_snippets<S>(
    store: &S,
    snippets: &[Snippet],
    now: DateTime<Utc>,
) -> Result<Vec<SnippetResponse>, StoreError>
where
    S: Store + ?Sized,
{
    let mut rendered = Vec::with_capacity(snippets.len());
    for snippet in snippets {
        rendered.push(render_snippet(store, snippet, now).await?);
    }
    Ok(rendered)
}

/// Access statistics for the owner of a snippet
pub async fn snippet_stats<S>(
    store: &S,
    token: &str,
    requester_id: i64,
    now: DateTime<Utc>,
) -> Result<SnippetStatsResponse, SnippetError>
where
    S: Store + ?Sized,
{
    let snippet = store
        .snippet_by_token(token)
        .await?
        .ok_or(SnippetError::NotFound)?;
    if snippet.owner_id != requester_id {
        return Err(SnippetError::Forbidden);
    }

    let mut view_logs = Vec::new();
    for entry in store.view_logs(snippet.id).await? {
        let viewer = store
            .user_by_id(entry.viewer_id)
            .await?
            .map(|u| u.uuid.to_string());
        view_logs.push(ViewLogResponse::build(&entry, viewer));
    }
    let expiration_logs = store
        .expiration_logs(snippet.id)
        .await?
        .iter()
        .map(ExpirationLogResponse::from)
        .collect();

    let quota = snippet.remaining(now);
    Ok(SnippetStatsResponse {
        uuid: snippet.token.clone(),
        view_count: snippet.view_count,
        is_deleted: snippet.is_deleted,
        is_accessible: snippet.is_accessible(now),
        remaining_views: quota.remaining_views,
        remaining_seconds: quota.remaining_seconds,
        view_logs,
        expiration_logs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::{FaultPoint, MemoryStore};
    use crate::shared::snippet::ExpirationPolicy;
    use assert_matches::assert_matches;

    fn new_snippet(content: &str) -> NewSnippet {
        NewSnippet {
            title: Some("  hello ".to_string()),
            content: content.to_string(),
            policy: ExpirationPolicy::Views(2),
            tags: vec!["rust".to_string(), " rust ".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_snippet() {
        let store = MemoryStore::new();
        let snippet = create_snippet(&store, 1, new_snippet("fn main() {}"), Utc::now())
            .await
            .unwrap();
        assert_eq!(snippet.title.as_deref(), Some("hello"));
        assert_eq!(snippet.view_count, 0);
        assert!(!snippet.is_deleted);
        assert!(Uuid::parse_str(&snippet.token).is_ok());
        assert_eq!(store.tags_for_snippet(snippet.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_content() {
        let store = MemoryStore::new();
        assert_matches!(
            create_snippet(&store, 1, new_snippet("  \n"), Utc::now()).await,
            Err(SnippetError::Invalid(_))
        );
    }

    #[tokio::test]
    async fn test_create_rejects_overlong_tag_without_storing() {
        let store = MemoryStore::new();
        let mut new = new_snippet("fn main() {}");
        new.tags = vec!["ok".to_string(), "t".repeat(MAX_TAG_LENGTH + 1)];

        assert_matches!(
            create_snippet(&store, 1, new, Utc::now()).await,
            Err(SnippetError::Invalid(SharedError::ValidationError { .. }))
        );
        assert!(store.snippets_by_owner(1).await.unwrap().is_empty());
        assert!(store.find_tag("ok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_tagging_discards_the_snippet() {
        let store = MemoryStore::new();
        store.fail_on(FaultPoint::LinkTag).await;

        assert_matches!(
            create_snippet(&store, 1, new_snippet("fn main() {}"), Utc::now()).await,
            Err(SnippetError::Store(StoreError::Unavailable(_)))
        );
        assert!(store.snippets_by_owner(1).await.unwrap().is_empty());
        assert!(store.latest_snippets(10).await.unwrap().is_empty());

        store.clear_faults().await;
        let snippet = create_snippet(&store, 1, new_snippet("fn main() {}"), Utc::now())
            .await
            .unwrap();
        assert_eq!(store.tags_for_snippet(snippet.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_view_renders_engine_decision() {
        let store = MemoryStore::new();
        let mut new = new_snippet("fn main() {}");
        new.policy = ExpirationPolicy::Time(60);
        let created = Utc::now();
        let snippet = create_snippet(&store, 1, new, created).await.unwrap();

        // Accessed one second before the window closes
        let at = created + chrono::TimeDelta::seconds(59);
        let view = record_access(&store, &snippet.token, None, false, at)
            .await
            .unwrap();
        let rendered = render_view(&store, &view).await.unwrap();

        assert!(rendered.snippet.is_accessible);
        assert_eq!(rendered.snippet.remaining_seconds, 1);
        assert_eq!(rendered.snippet.view_count, 1);
        assert_eq!(rendered.tags, vec!["rust".to_string()]);
        assert_eq!(rendered.author, None);
    }

    #[tokio::test]
    async fn test_soft_delete_owner_only() {
        let store = MemoryStore::new();
        let snippet = create_snippet(&store, 1, new_snippet("x"), Utc::now())
            .await
            .unwrap();

        assert_matches!(
            soft_delete(&store, &snippet.token, 2).await,
            Err(SnippetError::Forbidden)
        );
        assert_matches!(soft_delete(&store, "nope", 1).await, Err(SnippetError::NotFound));

        soft_delete(&store, &snippet.token, 1).await.unwrap();
        soft_delete(&store, &snippet.token, 1).await.unwrap();

        let stored = store.snippet_by_id(snippet.id).await.unwrap().unwrap();
        assert!(stored.is_deleted);
        assert!(store.expiration_logs(snippet.id).await.unwrap().is_empty());
    }
}
