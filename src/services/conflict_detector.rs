//! Panelist double-booking checks.
//!
//! Intervals are half-open: an interview ending at 10:00 does not conflict
//! with one starting at 10:00. Only `Scheduled` interviews block a panelist.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::models::{Interview, InterviewStatus};

/// Whether `[a_start, a_end)` and `[b_start, b_end)` intersect.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Stateless conflict checks over a snapshot of existing interviews.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector;

impl ConflictDetector {
    /// Whether `panelist_id` is already booked during `[start, end)`.
    pub fn has_conflict(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        panelist_id: Uuid,
        existing: &[Interview],
    ) -> bool {
        Self::blocking(existing, None).any(|i| {
            i.has_panelist(panelist_id) && overlaps(start, end, i.scheduled_start, i.scheduled_end)
        })
    }

    /// Like [`ConflictDetector::has_conflict`] but ignores the interview `exclude_id`.
    pub fn has_conflict_excluding(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        panelist_id: Uuid,
        existing: &[Interview],
        exclude_id: Uuid,
    ) -> bool {
        Self::blocking(existing, Some(exclude_id)).any(|i| {
            i.has_panelist(panelist_id) && overlaps(start, end, i.scheduled_start, i.scheduled_end)
        })
    }

    /// Panelists from `panelists` booked during `[start, end)`, in the order given.
    pub fn conflicting_panelists(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        panelists: &[Uuid],
        existing: &[Interview],
        exclude_id: Option<Uuid>,
    ) -> Vec<Uuid> {
        // Narrow to interviews overlapping the window once, then test membership.
        let overlapping: Vec<&Interview> = Self::blocking(existing, exclude_id)
            .filter(|i| overlaps(start, end, i.scheduled_start, i.scheduled_end))
            .collect();

        panelists
            .iter()
            .copied()
            .filter(|p| overlapping.iter().any(|i| i.has_panelist(*p)))
            .collect()
    }

    fn blocking<'a>(
        existing: &'a [Interview],
        exclude_id: Option<Uuid>,
    ) -> impl Iterator<Item = &'a Interview> + 'a {
        existing
            .iter()
            .filter(move |i| i.status == InterviewStatus::Scheduled && Some(i.id) != exclude_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::PanelMember;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
    }

    fn booked(panelist: Uuid, start: u32, end: u32) -> Interview {
        Interview::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            at(start),
            at(end),
            vec![PanelMember::interviewer(panelist)],
        )
    }

    #[test]
    fn test_overlap_is_half_open() {
        assert!(overlaps(at(10), at(11), at(10), at(11)));
        assert!(overlaps(at(9), at(11), at(10), at(12)));
        assert!(!overlaps(at(9), at(10), at(10), at(11)));
        assert!(!overlaps(at(11), at(12), at(10), at(11)));
    }

    #[test]
    fn test_conflict_requires_panel_membership() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let existing = vec![booked(a, 10, 11)];

        assert!(ConflictDetector::has_conflict(at(10), at(11), a, &existing));
        assert!(!ConflictDetector::has_conflict(at(10), at(11), b, &existing));
        assert!(!ConflictDetector::has_conflict(at(11), at(12), a, &existing));
    }

    #[test]
    fn test_only_scheduled_interviews_block() {
        let a = Uuid::new_v4();
        let mut cancelled = booked(a, 10, 11);
        cancelled.cancel(Uuid::new_v4(), None).unwrap();
        let mut started = booked(a, 10, 11);
        started.start(Uuid::new_v4()).unwrap();

        let existing = vec![cancelled, started];
        assert!(!ConflictDetector::has_conflict(at(10), at(11), a, &existing));
    }

    #[test]
    fn test_excluding_self() {
        let a = Uuid::new_v4();
        let interview = booked(a, 10, 11);
        let id = interview.id;
        let existing = vec![interview];

        assert!(ConflictDetector::has_conflict(at(10), at(11), a, &existing));
        assert!(!ConflictDetector::has_conflict_excluding(
            at(10),
            at(11),
            a,
            &existing,
            id
        ));
    }

    #[test]
    fn test_conflicting_panelists_keeps_request_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let existing = vec![booked(c, 10, 11), booked(a, 10, 12)];

        let conflicts =
            ConflictDetector::conflicting_panelists(at(10), at(10) + Duration::minutes(30), &[a, b, c], &existing, None);
        assert_eq!(conflicts, vec![a, c]);
    }
}
