use std::collections::HashSet;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::badges::repo::Badge;

/// Progress snapshot computed from the catalog and the user's unlock history.
#[derive(Debug, Clone)]
pub struct BadgeProgress {
    pub current_streak: i64,
    pub earned: Vec<Badge>,
    pub locked: Vec<Badge>,
    pub next_milestone: Option<NextMilestone>,
}

#[derive(Debug, Clone)]
pub struct NextMilestone {
    pub badge: Badge,
    pub days_remaining: i64,
    /// 0..=100, clamped.
    pub progress: f64,
}

/// Whole days of membership, truncated. A join date 23 hours ago counts as 0;
/// a join date in the future (clock skew) clamps to 0.
pub fn elapsed_days(joined_at: OffsetDateTime, now: OffsetDateTime) -> i64 {
    (now - joined_at).whole_days().max(0)
}

/// Walks the catalog (ascending `days_required`) and reports which badges the
/// user has earned, which remain locked, and which crossed their threshold in
/// this call. Pure: the caller persists `newly_unlocked`, and repeated calls
/// with the same inputs return the same answer.
pub fn compute_badge_progress(
    joined_at: OffsetDateTime,
    now: OffsetDateTime,
    catalog: &[Badge],
    already_unlocked: &HashSet<Uuid>,
) -> (Vec<Uuid>, BadgeProgress) {
    let days = elapsed_days(joined_at, now);

    let mut unlocked = already_unlocked.clone();
    let mut newly_unlocked = Vec::new();
    for badge in catalog {
        if days >= i64::from(badge.days_required) && !unlocked.contains(&badge.id) {
            unlocked.insert(badge.id);
            newly_unlocked.push(badge.id);
        }
    }

    let mut earned = Vec::new();
    let mut locked = Vec::new();
    for badge in catalog {
        if unlocked.contains(&badge.id) {
            earned.push(badge.clone());
        } else {
            locked.push(badge.clone());
        }
    }

    let next_milestone = locked.first().map(|badge| NextMilestone {
        badge: badge.clone(),
        days_remaining: (i64::from(badge.days_required) - days).max(0),
        progress: (days as f64 / f64::from(badge.days_required) * 100.0).min(100.0),
    });

    let progress = BadgeProgress {
        current_streak: days,
        earned,
        locked,
        next_milestone,
    };
    (newly_unlocked, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn badge(n: u128, days_required: i32) -> Badge {
        Badge {
            id: Uuid::from_u128(n),
            name: format!("{days_required} days"),
            name_localized: format!("{days_required}일"),
            description: String::new(),
            description_localized: String::new(),
            icon: "star".into(),
            days_required,
        }
    }

    fn now() -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + Duration::days(20_000)
    }

    #[test]
    fn week_old_account_unlocks_first_badge() {
        let catalog = vec![badge(1, 7), badge(2, 21)];
        let joined = now() - Duration::days(7);

        let (newly, report) = compute_badge_progress(joined, now(), &catalog, &HashSet::new());

        assert_eq!(newly, vec![catalog[0].id]);
        assert_eq!(report.current_streak, 7);
        assert_eq!(report.earned.len(), 1);
        assert_eq!(report.earned[0].id, catalog[0].id);

        let milestone = report.next_milestone.expect("21-day badge still ahead");
        assert_eq!(milestone.badge.id, catalog[1].id);
        assert_eq!(milestone.days_remaining, 14);
        assert!((milestone.progress - 100.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn threshold_is_inclusive_and_partial_days_truncate() {
        let catalog = vec![badge(1, 7)];

        // 6 full days: not yet.
        let (newly, report) =
            compute_badge_progress(now() - Duration::days(6), now(), &catalog, &HashSet::new());
        assert!(newly.is_empty());
        assert!(report.earned.is_empty());
        assert_eq!(report.next_milestone.unwrap().days_remaining, 1);

        // 6 days 23 hours still truncates to 6.
        let joined = now() - Duration::days(6) - Duration::hours(23);
        let (newly, _) = compute_badge_progress(joined, now(), &catalog, &HashSet::new());
        assert!(newly.is_empty());

        // Exactly 7 days: earned.
        let (newly, report) =
            compute_badge_progress(now() - Duration::days(7), now(), &catalog, &HashSet::new());
        assert_eq!(newly.len(), 1);
        assert_eq!(report.earned.len(), 1);
        assert!(report.next_milestone.is_none());
    }

    #[test]
    fn already_unlocked_badges_are_not_reported_again() {
        let catalog = vec![badge(1, 7), badge(2, 21)];
        let unlocked: HashSet<Uuid> = [catalog[0].id].into_iter().collect();

        let (newly, report) =
            compute_badge_progress(now() - Duration::days(30), now(), &catalog, &unlocked);

        assert_eq!(newly, vec![catalog[1].id]);
        assert_eq!(report.earned.len(), 2);
        assert!(report.locked.is_empty());
        assert!(report.next_milestone.is_none());
    }

    #[test]
    fn recomputation_with_same_inputs_is_idempotent() {
        let catalog = vec![badge(1, 7), badge(2, 21), badge(3, 90)];
        let unlocked = HashSet::new();
        let joined = now() - Duration::days(25);

        let (first_newly, first) = compute_badge_progress(joined, now(), &catalog, &unlocked);
        let (second_newly, second) = compute_badge_progress(joined, now(), &catalog, &unlocked);

        assert_eq!(first_newly, second_newly);
        assert_eq!(first.current_streak, second.current_streak);
        assert_eq!(
            first.earned.iter().map(|b| b.id).collect::<Vec<_>>(),
            second.earned.iter().map(|b| b.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn more_elapsed_days_never_locks_an_earned_badge() {
        let catalog = vec![badge(1, 7), badge(2, 21), badge(3, 90)];
        let mut previously_earned = 0;
        for days in [0, 6, 7, 20, 21, 89, 90, 400] {
            let joined = now() - Duration::days(days);
            let (_, report) = compute_badge_progress(joined, now(), &catalog, &HashSet::new());
            assert!(report.earned.len() >= previously_earned);
            previously_earned = report.earned.len();
        }
    }

    #[test]
    fn empty_catalog_yields_empty_report() {
        let (newly, report) =
            compute_badge_progress(now() - Duration::days(100), now(), &[], &HashSet::new());
        assert!(newly.is_empty());
        assert!(report.earned.is_empty());
        assert!(report.locked.is_empty());
        assert!(report.next_milestone.is_none());
    }

    #[test]
    fn future_join_date_clamps_to_zero() {
        let catalog = vec![badge(1, 7)];
        let joined = now() + Duration::days(3);

        let (newly, report) = compute_badge_progress(joined, now(), &catalog, &HashSet::new());

        assert!(newly.is_empty());
        assert_eq!(report.current_streak, 0);
        let milestone = report.next_milestone.unwrap();
        assert_eq!(milestone.days_remaining, 7);
        assert_eq!(milestone.progress, 0.0);
    }

    #[test]
    fn unsorted_or_duplicate_thresholds_stay_clamped() {
        // A catalog shape the seed never produces, but the arithmetic must
        // not go negative or past 100 for it either.
        let catalog = vec![badge(1, 30), badge(2, 7), badge(3, 7)];
        let unlocked: HashSet<Uuid> = [catalog[1].id, catalog[2].id].into_iter().collect();

        let (newly, report) =
            compute_badge_progress(now() - Duration::days(10), now(), &catalog, &unlocked);

        assert!(newly.is_empty());
        let milestone = report.next_milestone.unwrap();
        assert_eq!(milestone.badge.id, catalog[0].id);
        assert_eq!(milestone.days_remaining, 20);
        assert!(milestone.progress <= 100.0);
    }
}
