//! Snippet Access Engine
//!
//! Orchestrates one view of a snippet: load it exclusively, decide whether it
//! may be shown, and if so account for the view. Accounting is the view-count
//! bump, a view-log entry for identified viewers and, for the access that
//! makes a view-limited snippet reach its limit, a single VIEWS expiration
//! entry. All of it commits together or not at all.
//!
//! ```text
//! begin_access ─┬─ None ─────────────────────────────► NotFound
//!               └─ unit ─ is_accessible? ─ no ───────► Expired (unit dropped)
//!                                        └ yes ─ skip? ─ yes ─► view (no writes)
//!                                                       └ no ─► count+1, logs, commit
//! ```

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::backend::store::{SnippetStore, StoreError};
use crate::shared::snippet::{ExpirationPolicy, ExpirationReason, Quota, Snippet};

/// Why a view could not be served
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("no snippet with this token")]
    NotFound,

    #[error("snippet {token} is no longer accessible")]
    Expired { token: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a successful access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetView {
    /// Snippet state after this access was accounted for
    pub snippet: Snippet,
    /// Remaining allowance after this access
    pub quota: Quota,
    /// Whether a further view would be served, at the instant of this access
    pub still_accessible: bool,
    /// Whether this access made the view count reach the limit
    pub crossed_threshold: bool,
}

/// Whether going from `before` to `after` views reaches the limit of `policy`
fn crosses_view_limit(policy: ExpirationPolicy, before: u64, after: u64) -> bool {
    match policy {
        ExpirationPolicy::Views(limit) if limit > 0 => before < limit && after >= limit,
        _ => false,
    }
}

/// Serve one view of the snippet identified by `token` at `now`
///
/// `viewer_id` is the requesting user, if identified; anonymous views are
/// counted but not logged. With `skip_increment` the snippet is evaluated
/// and returned without any write.
///
/// # Errors
///
/// * `AccessError::NotFound` - no snippet has this token
/// * `AccessError::Expired` - the snippet is deleted or past its limit
/// * `AccessError::Store` - a read or write failed; nothing was persisted
pub async fn record_access<S>(
    store: &S,
    token: &str,
    viewer_id: Option<i64>,
    skip_increment: bool,
    now: DateTime<Utc>,
) -> Result<SnippetView, AccessError>
where
    S: SnippetStore + ?Sized,
{
    let mut access = store.begin_access(token).await?.ok_or(AccessError::NotFound)?;

    if !access.snippet().is_accessible(now) {
        tracing::info!(token, "rejected view of expired snippet");
        return Err(AccessError::Expired {
            token: token.to_string(),
        });
    }

    if skip_increment {
        let snippet = access.snippet().clone();
        drop(access);
        tracing::debug!(token, "view served without counting");
        return Ok(SnippetView {
            quota: snippet.remaining(now),
            still_accessible: true,
            snippet,
            crossed_threshold: false,
        });
    }

    let before = access.snippet().view_count;
    let after = before.saturating_add(1);
    let policy = access.snippet().policy;

    access.save_view_count(after).await?;

    if let Some(viewer_id) = viewer_id {
        access.append_view_log(viewer_id, now).await?;
    }

    let crossed_threshold = crosses_view_limit(policy, before, after);
    if crossed_threshold {
        access
            .append_expiration_log(ExpirationReason::Views, now)
            .await?;
    }

    let snippet = access.snippet().clone();
    access.commit().await?;

    if crossed_threshold {
        tracing::info!(token, view_count = after, "snippet reached its view limit");
    } else {
        tracing::debug!(token, view_count = after, "view recorded");
    }

    Ok(SnippetView {
        quota: snippet.remaining(now),
        still_accessible: snippet.is_accessible(now),
        snippet,
        crossed_threshold,
    })
}
