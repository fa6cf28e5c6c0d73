//! Per-panelist daily load accounting.
//!
//! Scheduling an interview adds one scheduled and one pending-feedback unit
//! to each panelist's row for the interview's local date. A panelist's first
//! feedback submission releases their pending unit.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Interview, InterviewerLoad, LoadDelta, RequestContext};
use crate::domain::ports::LoadRepository;

/// Load accounting over a [`LoadRepository`].
pub struct LoadTracker<L: LoadRepository + ?Sized> {
    repo: Arc<L>,
}

impl<L: LoadRepository + ?Sized> LoadTracker<L> {
    pub fn new(repo: Arc<L>) -> Self {
        Self { repo }
    }

    /// Persist every non-empty delta, in order.
    pub async fn record(&self, deltas: &[LoadDelta]) -> DomainResult<()> {
        for delta in deltas.iter().filter(|d| !d.is_noop()) {
            self.repo.apply_delta(delta).await?;
        }
        Ok(())
    }

    /// Counters for one panelist and day. Missing rows read as zero.
    pub async fn load_for(
        &self,
        ctx: &RequestContext,
        panelist_id: Uuid,
        date: NaiveDate,
    ) -> DomainResult<InterviewerLoad> {
        Ok(self
            .repo
            .get(ctx.tenant_id, panelist_id, date)
            .await?
            .unwrap_or_else(|| InterviewerLoad::empty(ctx.tenant_id, panelist_id, date)))
    }

    /// A panelist's stored rows over `from..=to`.
    #[instrument(skip(self, ctx), fields(tenant_id = %ctx.tenant_id))]
    pub async fn history(
        &self,
        ctx: &RequestContext,
        panelist_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DomainResult<Vec<InterviewerLoad>> {
        self.repo.list_for_panelist(ctx.tenant_id, panelist_id, from, to).await
    }
}

/// Builders for the load changes each lifecycle step causes.
pub struct LoadDeltas;

impl LoadDeltas {
    /// +1 scheduled and +1 pending for each panelist on the interview's local date.
    pub fn on_scheduled(interview: &Interview, offset: FixedOffset) -> Vec<LoadDelta> {
        let date = interview.scheduled_date(offset);
        interview
            .panelist_ids()
            .into_iter()
            .map(|panelist_id| LoadDelta {
                tenant_id: interview.tenant_id,
                panelist_id,
                date,
                scheduled: 1,
                pending_feedback: 1,
            })
            .collect()
    }

    /// -1 pending for the reviewer on the interview's local date.
    ///
    /// Callers apply this only for the reviewer's first submission.
    pub fn on_feedback_recorded(interview: &Interview, reviewer_id: Uuid, offset: FixedOffset) -> Option<LoadDelta> {
        if !interview.has_panelist(reviewer_id) {
            return None;
        }
        Some(LoadDelta {
            tenant_id: interview.tenant_id,
            panelist_id: reviewer_id,
            date: interview.scheduled_date(offset),
            scheduled: 0,
            pending_feedback: -1,
        })
    }

    /// Move counters from the old local date to the new one.
    ///
    /// Panelists in `submitted` already released their pending unit, so only
    /// their scheduled unit moves. Empty when the date did not change.
    pub fn on_rescheduled(
        before: &Interview,
        after: &Interview,
        submitted: &HashSet<Uuid>,
        offset: FixedOffset,
    ) -> Vec<LoadDelta> {
        let old_date = before.scheduled_date(offset);
        let new_date = after.scheduled_date(offset);
        if old_date == new_date {
            return Vec::new();
        }

        let mut deltas = Vec::new();
        for panelist_id in after.panelist_ids() {
            let pending = i32::from(!submitted.contains(&panelist_id));
            deltas.push(LoadDelta {
                tenant_id: after.tenant_id,
                panelist_id,
                date: old_date,
                scheduled: -1,
                pending_feedback: -pending,
            });
            deltas.push(LoadDelta {
                tenant_id: after.tenant_id,
                panelist_id,
                date: new_date,
                scheduled: 1,
                pending_feedback: pending,
            });
        }
        deltas
    }

    /// Apply `delta` in place. A counter never goes below zero; an attempt
    /// to do so leaves it at zero and logs a warning.
    pub fn apply(load: &mut InterviewerLoad, delta: &LoadDelta) {
        load.scheduled_count = saturating_apply(load.scheduled_count, delta.scheduled, "scheduled", delta);
        load.pending_feedback_count =
            saturating_apply(load.pending_feedback_count, delta.pending_feedback, "pending_feedback", delta);
    }
}

fn saturating_apply(current: u32, change: i32, counter: &str, delta: &LoadDelta) -> u32 {
    let next = i64::from(current) + i64::from(change);
    if next < 0 {
        warn!(
            tenant_id = %delta.tenant_id,
            panelist_id = %delta.panelist_id,
            date = %delta.date,
            counter,
            current,
            change,
            "Load counter would go negative, leaving at zero"
        );
        return 0;
    }
    u32::try_from(next).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::PanelMember;
    use chrono::{TimeZone, Utc};

    fn interview(day: u32, hour: u32, panel: &[Uuid]) -> Interview {
        let start = Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap();
        Interview::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            start,
            start + chrono::Duration::hours(1),
            panel.iter().copied().map(PanelMember::interviewer).collect(),
        )
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_on_scheduled_one_delta_per_panelist() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let i = interview(10, 10, &[a, b]);
        let deltas = LoadDeltas::on_scheduled(&i, utc());

        assert_eq!(deltas.len(), 2);
        assert!(deltas.iter().all(|d| d.scheduled == 1 && d.pending_feedback == 1));
        assert_eq!(deltas[0].panelist_id, a);
        assert_eq!(deltas[0].date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }

    #[test]
    fn test_local_date_uses_offset() {
        let a = Uuid::new_v4();
        // 23:00 UTC on the 10th is the 11th at UTC+2.
        let i = interview(10, 23, &[a]);
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let deltas = LoadDeltas::on_scheduled(&i, plus_two);
        assert_eq!(deltas[0].date, NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
    }

    #[test]
    fn test_feedback_only_for_panelists() {
        let a = Uuid::new_v4();
        let i = interview(10, 10, &[a]);
        assert_eq!(
            LoadDeltas::on_feedback_recorded(&i, a, utc()).map(|d| d.pending_feedback),
            Some(-1)
        );
        assert!(LoadDeltas::on_feedback_recorded(&i, Uuid::new_v4(), utc()).is_none());
    }

    #[test]
    fn test_reschedule_moves_counters_between_dates() {
        let a = Uuid::new_v4();
        let before = interview(10, 10, &[a]);
        let mut after = before.clone();
        after.scheduled_start += chrono::Duration::days(1);
        after.scheduled_end += chrono::Duration::days(1);

        let deltas = LoadDeltas::on_rescheduled(&before, &after, &HashSet::new(), utc());
        assert_eq!(deltas.len(), 2);
        assert_eq!((deltas[0].scheduled, deltas[0].pending_feedback), (-1, -1));
        assert_eq!((deltas[1].scheduled, deltas[1].pending_feedback), (1, 1));
        assert_ne!(deltas[0].date, deltas[1].date);

        let mut same_day = before.clone();
        same_day.scheduled_start += chrono::Duration::hours(2);
        same_day.scheduled_end += chrono::Duration::hours(2);
        assert!(LoadDeltas::on_rescheduled(&before, &same_day, &HashSet::new(), utc()).is_empty());
    }

    #[test]
    fn test_reschedule_leaves_released_pending_in_place() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let before = interview(10, 10, &[a, b]);
        let mut after = before.clone();
        after.scheduled_start += chrono::Duration::days(1);
        after.scheduled_end += chrono::Duration::days(1);

        let submitted = HashSet::from([a]);
        let deltas = LoadDeltas::on_rescheduled(&before, &after, &submitted, utc());
        assert_eq!(deltas.len(), 4);

        let for_a: Vec<_> = deltas.iter().filter(|d| d.panelist_id == a).collect();
        assert!(for_a.iter().all(|d| d.pending_feedback == 0));
        assert_eq!(for_a.iter().map(|d| d.scheduled).sum::<i32>(), 0);

        let for_b: Vec<_> = deltas.iter().filter(|d| d.panelist_id == b).collect();
        assert_eq!(for_b[0].pending_feedback, -1);
        assert_eq!(for_b[1].pending_feedback, 1);
    }

    #[test]
    fn test_apply_saturates_at_zero() {
        let tenant = Uuid::new_v4();
        let panelist = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut load = InterviewerLoad::empty(tenant, panelist, date);

        let up = LoadDelta {
            tenant_id: tenant,
            panelist_id: panelist,
            date,
            scheduled: 1,
            pending_feedback: 1,
        };
        LoadDeltas::apply(&mut load, &up);
        assert_eq!((load.scheduled_count, load.pending_feedback_count), (1, 1));

        let down = LoadDelta {
            scheduled: 0,
            pending_feedback: -2,
            ..up
        };
        LoadDeltas::apply(&mut load, &down);
        assert_eq!((load.scheduled_count, load.pending_feedback_count), (1, 0));
    }
}
