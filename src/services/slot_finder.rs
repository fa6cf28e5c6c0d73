//! Candidate slot search for an interview panel.
//!
//! Candidates start on the hour inside business hours and must end by the
//! close of the business day. Each conflicting panelist costs
//! [`CONFLICT_PENALTY`] points from [`PERFECT_SLOT_SCORE`]; slots that reach
//! zero are dropped.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc, Weekday};
use tracing::debug;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    BusinessHours, Interview, SlotCandidate, SlotRequest, CONFLICT_PENALTY, PERFECT_SLOT_SCORE,
};
use crate::services::conflict_detector::ConflictDetector;

/// Searches for interview windows that fit a panel.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotFinder {
    business_hours: BusinessHours,
}

impl SlotFinder {
    pub fn new(business_hours: BusinessHours) -> Self {
        Self { business_hours }
    }

    pub fn business_hours(&self) -> &BusinessHours {
        &self.business_hours
    }

    /// Find the best slots for `request` given the tenant's existing interviews.
    pub fn find(&self, request: &SlotRequest, existing: &[Interview]) -> DomainResult<Vec<SlotCandidate>> {
        find_slots(request, existing, &self.business_hours)
    }
}

/// Rank candidate windows for `request`, best first.
///
/// Rejects malformed requests and business hours before scanning.
pub fn find_slots(
    request: &SlotRequest,
    existing: &[Interview],
    business_hours: &BusinessHours,
) -> DomainResult<Vec<SlotCandidate>> {
    request.validate()?;
    business_hours.validate()?;

    if request.duration_minutes > business_hours.window_minutes() {
        debug!(
            duration_minutes = request.duration_minutes,
            window_minutes = business_hours.window_minutes(),
            "Duration exceeds the business day, no slots"
        );
        return Ok(Vec::new());
    }

    let panelists = dedup_panelists(&request.panelist_ids);
    let duration = Duration::minutes(request.duration_minutes);
    let offset = business_hours.offset();

    let mut candidates = Vec::new();
    let mut day = request.range_start.with_timezone(&offset).date_naive();
    let last_day = request.range_end.with_timezone(&offset).date_naive();

    while day <= last_day {
        let weekend = matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
        if !(business_hours.skip_weekends && weekend) {
            let Some(close) = local_instant(business_hours, day, business_hours.end_hour) else {
                break;
            };
            for hour in business_hours.start_hour..business_hours.end_hour {
                let Some(start) = local_instant(business_hours, day, hour) else {
                    continue;
                };
                let end = start + duration;
                if end > close {
                    break;
                }
                if start < request.range_start || end > request.range_end {
                    continue;
                }

                let conflicts =
                    ConflictDetector::conflicting_panelists(start, end, &panelists, existing, None);
                let score = score_for(conflicts.len());
                if score > 0 {
                    candidates.push(SlotCandidate {
                        start,
                        end,
                        conflicts,
                        score,
                    });
                }
            }
        }

        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    let considered = candidates.len();
    // Stable: equal scores keep chronological order.
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(request.max_suggestions);

    debug!(
        panelists = panelists.len(),
        duration_minutes = request.duration_minutes,
        considered,
        returned = candidates.len(),
        "Slot search finished"
    );

    Ok(candidates)
}

/// Score for a window with `conflicts` booked panelists.
pub fn score_for(conflicts: usize) -> i32 {
    let penalty = i32::try_from(conflicts)
        .unwrap_or(i32::MAX)
        .saturating_mul(CONFLICT_PENALTY);
    PERFECT_SLOT_SCORE.saturating_sub(penalty)
}

fn dedup_panelists(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// `hour:00` on local `day` as a UTC instant. Hour 24 is midnight of the next day.
fn local_instant(hours: &BusinessHours, day: chrono::NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
    let (day, hour) = if hour == 24 { (day.succ_opt()?, 0) } else { (day, hour) };
    let naive = day.and_time(NaiveTime::from_hms_opt(hour, 0, 0)?);
    hours
        .offset()
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::PanelMember;

    fn day(d: u32, hour: u32) -> DateTime<Utc> {
        // 2025-03-10 is a Monday.
        Utc.with_ymd_and_hms(2025, 3, d, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_open_calendar_three_days() {
        let request = SlotRequest::new(vec![Uuid::new_v4()], 60, day(10, 0), day(13, 0)).with_max_suggestions(100);
        let slots = find_slots(&request, &[], &BusinessHours::default()).unwrap();

        assert_eq!(slots.len(), 24);
        assert!(slots.iter().all(|s| s.score == 100 && s.conflicts.is_empty()));
        assert_eq!(slots[0].start, day(10, 9));
        assert_eq!(slots.last().unwrap().start, day(12, 16));
    }

    #[test]
    fn test_max_suggestions_caps_result() {
        let request = SlotRequest::new(vec![Uuid::new_v4()], 60, day(10, 0), day(13, 0));
        let slots = find_slots(&request, &[], &BusinessHours::default()).unwrap();
        assert_eq!(slots.len(), 10);
    }

    #[test]
    fn test_longer_duration_ends_by_close() {
        let request = SlotRequest::new(vec![Uuid::new_v4()], 90, day(10, 0), day(11, 0)).with_max_suggestions(50);
        let slots = find_slots(&request, &[], &BusinessHours::default()).unwrap();

        assert_eq!(slots.len(), 7);
        assert_eq!(slots.last().unwrap().start, day(10, 15));
        assert!(slots.iter().all(|s| s.end <= day(10, 17)));
    }

    #[test]
    fn test_duration_longer_than_business_day() {
        let request = SlotRequest::new(vec![Uuid::new_v4()], 9 * 60, day(10, 0), day(12, 0));
        let slots = find_slots(&request, &[], &BusinessHours::default()).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_huge_duration_yields_nothing() {
        let request = SlotRequest::new(vec![Uuid::new_v4()], i64::MAX, day(10, 0), day(12, 0));
        let slots = find_slots(&request, &[], &BusinessHours::default()).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_zero_length_range_yields_nothing() {
        let request = SlotRequest::new(vec![Uuid::new_v4()], 60, day(10, 9), day(10, 9));
        let slots = find_slots(&request, &[], &BusinessHours::default()).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_partial_conflict_scores() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let existing = vec![Interview::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            day(10, 10),
            day(10, 11),
            vec![PanelMember::interviewer(a)],
        )];

        let request = SlotRequest::new(vec![a, b], 60, day(10, 0), day(11, 0)).with_max_suggestions(20);
        let slots = find_slots(&request, &existing, &BusinessHours::default()).unwrap();

        let ten = slots.iter().find(|s| s.start == day(10, 10)).unwrap();
        assert_eq!(ten.conflicts, vec![a]);
        assert_eq!(ten.score, 80);

        let eleven = slots.iter().find(|s| s.start == day(10, 11)).unwrap();
        assert!(eleven.conflicts.is_empty());
        assert_eq!(eleven.score, 100);

        // Conflicting slot sorts after all perfect ones.
        assert_eq!(slots.last().unwrap().start, day(10, 10));
    }

    #[test]
    fn test_fully_booked_panel_of_five_is_dropped() {
        let panel: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let existing = vec![Interview::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            day(10, 9),
            day(10, 10),
            panel.iter().copied().map(PanelMember::interviewer).collect(),
        )];

        let request = SlotRequest::new(panel, 60, day(10, 0), day(11, 0)).with_max_suggestions(20);
        let slots = find_slots(&request, &existing, &BusinessHours::default()).unwrap();
        assert_eq!(slots.len(), 7);
        assert!(slots.iter().all(|s| s.start != day(10, 9)));
    }

    #[test]
    fn test_duplicate_panelists_counted_once() {
        let a = Uuid::new_v4();
        let existing = vec![Interview::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            day(10, 9),
            day(10, 10),
            vec![PanelMember::interviewer(a)],
        )];
        let request = SlotRequest::new(vec![a, a], 60, day(10, 9), day(10, 10));
        let slots = find_slots(&request, &existing, &BusinessHours::default()).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].conflicts, vec![a]);
        assert_eq!(slots[0].score, 80);
    }

    #[test]
    fn test_offset_and_weekend_skip() {
        // UTC+2: local 09:00 is 07:00 UTC. 2025-03-15 is a Saturday.
        let hours = BusinessHours::default().with_offset_minutes(120).with_skip_weekends(true);
        let request = SlotRequest::new(vec![Uuid::new_v4()], 60, day(14, 0), day(17, 0)).with_max_suggestions(100);
        let slots = find_slots(&request, &[], &hours).unwrap();

        assert_eq!(slots.len(), 8);
        assert_eq!(slots[0].start, day(14, 7));
    }

    #[test]
    fn test_invalid_request_rejected() {
        let request = SlotRequest::new(vec![], 60, day(10, 0), day(11, 0));
        let err = find_slots(&request, &[], &BusinessHours::default()).unwrap_err();
        assert!(err.is_validation());
    }
}
