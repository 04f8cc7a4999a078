//! Property-based tests for the accessibility evaluator
//!
//! Uses proptest to check the expiration rules over arbitrary thresholds,
//! view counts and instants.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use proptest::prelude::*;

use codenest::shared::snippet::{ExpirationPolicy, Snippet};

fn created() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn snippet(policy: ExpirationPolicy, view_count: u64, is_deleted: bool) -> Snippet {
    Snippet {
        id: 1,
        token: "prop".to_string(),
        owner_id: 1,
        title: None,
        content: "x".to_string(),
        policy,
        created_at: created(),
        view_count,
        is_deleted,
    }
}

proptest! {
    #[test]
    fn test_unrestricted_is_always_accessible(
        view_count in any::<u64>(),
        offset in 0i64..=10_000_000_000,
    ) {
        let s = snippet(ExpirationPolicy::None, view_count, false);
        prop_assert!(s.is_accessible(created() + TimeDelta::seconds(offset)));
    }

    #[test]
    fn test_time_boundary(
        limit in 1u64..=100_000_000,
        offset in 0i64..=200_000_000,
        view_count in any::<u64>(),
    ) {
        let s = snippet(ExpirationPolicy::Time(limit), view_count, false);
        let now = created() + TimeDelta::seconds(offset);
        prop_assert_eq!(s.is_accessible(now), (offset as u64) < limit);
    }

    #[test]
    fn test_view_limit(limit in 1u64..=1_000, view_count in 0u64..=2_000) {
        let s = snippet(ExpirationPolicy::Views(limit), view_count, false);
        let far = created() + TimeDelta::days(100_000);
        prop_assert_eq!(s.is_accessible(far), view_count < limit);

        let quota = s.remaining(far);
        prop_assert_eq!(quota.remaining_views, limit.saturating_sub(view_count));
        prop_assert_eq!(quota.remaining_seconds, 0);
    }

    #[test]
    fn test_deleted_is_never_accessible(
        threshold in any::<u64>(),
        view_count in any::<u64>(),
        kind in 0u8..3,
    ) {
        let policy = match kind {
            0 => ExpirationPolicy::None,
            1 => ExpirationPolicy::Time(threshold),
            _ => ExpirationPolicy::Views(threshold),
        };
        prop_assert!(!snippet(policy, view_count, true).is_accessible(created()));
    }

    #[test]
    fn test_remaining_seconds_counts_down(limit in 1u64..=1_000_000, offset in 0i64..=1_000_000) {
        let s = snippet(ExpirationPolicy::Time(limit), 0, false);
        let quota = s.remaining(created() + TimeDelta::seconds(offset));
        prop_assert_eq!(quota.remaining_seconds, limit.saturating_sub(offset as u64));
    }
}
