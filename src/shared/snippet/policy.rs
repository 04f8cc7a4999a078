//! Expiration Policy and Accessibility Rules
//!
//! A snippet carries exactly one expiration policy, fixed at creation. The
//! evaluator in this module is the only authority on whether a snippet may be
//! viewed; the quota calculator is informational and never gates access.
//!
//! Both functions are pure: they read the snippet and a caller-supplied `now`,
//! so the same inputs always produce the same answer.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::snippet::Snippet;

/// Wire literal for time-based expiration
pub const KIND_TIME: &str = "TIME";
/// Wire literal for view-count expiration
pub const KIND_VIEWS: &str = "VIEWS";

/// Expiration policy of a snippet
///
/// A zero threshold means unrestricted, matching how clients submit
/// "no limit" alongside a selected kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExpirationPolicy {
    /// Never expires
    #[default]
    None,
    /// Expires this many seconds after creation
    Time(u64),
    /// Expires once the view count reaches this value
    Views(u64),
}

/// Kind of expiration policy as stored and sent over the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExpirationKind {
    /// Elapsed-time policy
    Time,
    /// View-count policy
    Views,
}

impl ExpirationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpirationKind::Time => KIND_TIME,
            ExpirationKind::Views => KIND_VIEWS,
        }
    }

    /// Parse the case-sensitive wire literal
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            KIND_TIME => Some(ExpirationKind::Time),
            KIND_VIEWS => Some(ExpirationKind::Views),
            _ => None,
        }
    }
}

impl ExpirationPolicy {
    /// Build a policy from its stored or submitted parts
    ///
    /// An absent kind means unrestricted regardless of the value. An absent
    /// value with a kind is treated as zero.
    ///
    /// # Errors
    ///
    /// Returns `SharedError::PolicyError` when the kind is not one of the
    /// `"TIME"` / `"VIEWS"` literals.
    pub fn from_wire(kind: Option<&str>, value: Option<u64>) -> Result<Self, SharedError> {
        let kind = match kind.map(str::trim) {
            None | Some("") => return Ok(ExpirationPolicy::None),
            Some(kind) => ExpirationKind::parse(kind)
                .ok_or_else(|| SharedError::policy(format!("unknown expiration type '{kind}'")))?,
        };
        Ok(Self::from_kind(kind, value.unwrap_or(0)))
    }

    pub fn from_kind(kind: ExpirationKind, threshold: u64) -> Self {
        match kind {
            ExpirationKind::Time => ExpirationPolicy::Time(threshold),
            ExpirationKind::Views => ExpirationPolicy::Views(threshold),
        }
    }

    pub fn kind(&self) -> Option<ExpirationKind> {
        match self {
            ExpirationPolicy::None => None,
            ExpirationPolicy::Time(_) => Some(ExpirationKind::Time),
            ExpirationPolicy::Views(_) => Some(ExpirationKind::Views),
        }
    }

    /// Threshold in the policy's unit, zero for `None`
    pub fn threshold(&self) -> u64 {
        match self {
            ExpirationPolicy::None => 0,
            ExpirationPolicy::Time(seconds) => *seconds,
            ExpirationPolicy::Views(limit) => *limit,
        }
    }
}

/// Why a snippet stopped being accessible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExpirationReason {
    Time,
    Views,
    Deleted,
}

impl ExpirationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpirationReason::Time => "TIME",
            ExpirationReason::Views => "VIEWS",
            ExpirationReason::Deleted => "DELETED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TIME" => Some(ExpirationReason::Time),
            "VIEWS" => Some(ExpirationReason::Views),
            "DELETED" => Some(ExpirationReason::Deleted),
            _ => None,
        }
    }
}

/// Remaining allowance of a snippet, for display only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quota {
    pub remaining_seconds: u64,
    pub remaining_views: u64,
}

/// Instant at which a time-limited snippet expires
///
/// `None` when the policy is not a positive time limit, or when the limit
/// lies beyond the representable range (which never expires).
pub fn expires_at(snippet: &Snippet) -> Option<DateTime<Utc>> {
    match snippet.policy {
        ExpirationPolicy::Time(seconds) if seconds > 0 => {
            let seconds = i64::try_from(seconds).ok()?;
            let delta = TimeDelta::try_seconds(seconds)?;
            snippet.created_at.checked_add_signed(delta)
        }
        _ => None,
    }
}

/// Whether the snippet may be viewed at `now`
pub fn is_accessible(snippet: &Snippet, now: DateTime<Utc>) -> bool {
    if snippet.is_deleted {
        tracing::debug!(token = %snippet.token, "snippet inaccessible: deleted");
        return false;
    }

    let accessible = match snippet.policy {
        ExpirationPolicy::None => true,
        ExpirationPolicy::Time(0) | ExpirationPolicy::Views(0) => true,
        ExpirationPolicy::Time(_) => match expires_at(snippet) {
            Some(expiry) => now < expiry,
            None => true,
        },
        ExpirationPolicy::Views(limit) => snippet.view_count < limit,
    };

    tracing::debug!(
        token = %snippet.token,
        policy = ?snippet.policy,
        view_count = snippet.view_count,
        accessible,
        "evaluated snippet accessibility"
    );
    accessible
}

/// Remaining seconds and views for client display
pub fn remaining(snippet: &Snippet, now: DateTime<Utc>) -> Quota {
    let remaining_seconds = match expires_at(snippet) {
        Some(expiry) if now < expiry => {
            u64::try_from((expiry - now).num_seconds()).unwrap_or(0)
        }
        _ => 0,
    };

    let remaining_views = match snippet.policy {
        ExpirationPolicy::Views(limit) if limit > 0 => limit.saturating_sub(snippet.view_count),
        _ => 0,
    };

    Quota {
        remaining_seconds,
        remaining_views,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snippet(policy: ExpirationPolicy, view_count: u64) -> Snippet {
        Snippet {
            id: 1,
            token: "token".to_string(),
            owner_id: 1,
            title: None,
            content: "fn main() {}".to_string(),
            policy,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            view_count,
            is_deleted: false,
        }
    }

    #[test]
    fn test_time_boundary_excludes_equality() {
        let s = snippet(ExpirationPolicy::Time(60), 0);
        let expiry = s.created_at + TimeDelta::seconds(60);
        assert!(is_accessible(&s, expiry - TimeDelta::seconds(1)));
        assert!(!is_accessible(&s, expiry));
        assert!(!is_accessible(&s, expiry + TimeDelta::seconds(1)));
    }

    #[test]
    fn test_views_policy_ignores_time() {
        let s = snippet(ExpirationPolicy::Views(2), 1);
        let far_future = s.created_at + TimeDelta::days(3650);
        assert!(is_accessible(&s, far_future));
        assert!(!is_accessible(&snippet(ExpirationPolicy::Views(2), 2), s.created_at));
    }

    #[test]
    fn test_time_policy_ignores_views() {
        let s = snippet(ExpirationPolicy::Time(60), 10_000);
        assert!(is_accessible(&s, s.created_at));
    }

    #[test]
    fn test_zero_threshold_is_unrestricted() {
        let s = snippet(ExpirationPolicy::Time(0), 0);
        assert!(is_accessible(&s, s.created_at + TimeDelta::days(365)));
        let s = snippet(ExpirationPolicy::Views(0), 42);
        assert!(is_accessible(&s, s.created_at));
    }

    #[test]
    fn test_deleted_wins_over_policy() {
        let mut s = snippet(ExpirationPolicy::None, 0);
        s.is_deleted = true;
        assert!(!is_accessible(&s, s.created_at));
    }

    #[test]
    fn test_huge_time_limit_never_expires() {
        let s = snippet(ExpirationPolicy::Time(u64::MAX), 0);
        assert_eq!(expires_at(&s), None);
        assert!(is_accessible(&s, s.created_at + TimeDelta::days(365 * 100)));
    }

    #[test]
    fn test_remaining_quota() {
        let s = snippet(ExpirationPolicy::Time(60), 0);
        let quota = remaining(&s, s.created_at + TimeDelta::seconds(15));
        assert_eq!(quota, Quota { remaining_seconds: 45, remaining_views: 0 });
        assert_eq!(remaining(&s, s.created_at + TimeDelta::seconds(90)).remaining_seconds, 0);

        let s = snippet(ExpirationPolicy::Views(3), 1);
        assert_eq!(remaining(&s, s.created_at), Quota { remaining_seconds: 0, remaining_views: 2 });
        let s = snippet(ExpirationPolicy::Views(3), 5);
        assert_eq!(remaining(&s, s.created_at).remaining_views, 0);
    }

    #[test]
    fn test_from_wire() {
        assert_eq!(ExpirationPolicy::from_wire(None, Some(30)), Ok(ExpirationPolicy::None));
        assert_eq!(ExpirationPolicy::from_wire(Some("TIME"), Some(30)), Ok(ExpirationPolicy::Time(30)));
        assert_eq!(ExpirationPolicy::from_wire(Some("VIEWS"), None), Ok(ExpirationPolicy::Views(0)));
        assert_eq!(ExpirationPolicy::from_wire(Some(""), Some(5)), Ok(ExpirationPolicy::None));
        assert!(ExpirationPolicy::from_wire(Some("views"), Some(5)).is_err());
        assert!(ExpirationPolicy::from_wire(Some("DAYS"), Some(5)).is_err());
    }

    #[test]
    fn test_reason_literals() {
        for reason in [ExpirationReason::Time, ExpirationReason::Views, ExpirationReason::Deleted] {
            assert_eq!(ExpirationReason::parse(reason.as_str()), Some(reason));
        }
        assert_eq!(ExpirationReason::parse("views"), None);
    }
}
