//! Interview lifecycle orchestration.
//!
//! Coordinates InterviewRepository (interviews + event log), the load
//! counters, and the audit and calendar collaborators. Submitted feedback is
//! read only to keep load rows right when an interview moves. Status changes go
//! through the [`Interview`] transition methods; this service persists the
//! result and fans it out.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AuditEntry, Interview, InterviewEvent, InterviewStatus, RequestContext, SchedulingConfig, SlotCandidate,
    SlotRequest,
};
use crate::domain::ports::{
    AuditSink, CalendarProvider, FeedbackRepository, InterviewFilter, InterviewRepository, LoadRepository,
};
use crate::services::conflict_detector::ConflictDetector;
use crate::services::load_tracker::{LoadDeltas, LoadTracker};
use crate::services::slot_finder::find_slots;

pub struct InterviewLifecycle<R: InterviewRepository + ?Sized, L: LoadRepository + ?Sized> {
    interviews: Arc<R>,
    loads: LoadTracker<L>,
    feedback: Arc<dyn FeedbackRepository>,
    audit: Arc<dyn AuditSink>,
    calendar: Arc<dyn CalendarProvider>,
    config: SchedulingConfig,
}

impl<R: InterviewRepository + ?Sized, L: LoadRepository + ?Sized> InterviewLifecycle<R, L> {
    pub fn new(
        interviews: Arc<R>,
        loads: Arc<L>,
        feedback: Arc<dyn FeedbackRepository>,
        audit: Arc<dyn AuditSink>,
        calendar: Arc<dyn CalendarProvider>,
        config: SchedulingConfig,
    ) -> Self {
        Self {
            interviews,
            loads: LoadTracker::new(loads),
            feedback,
            audit,
            calendar,
            config,
        }
    }

    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    /// Rank candidate slots for a panel against the tenant's current bookings.
    #[instrument(skip(self, ctx, request), fields(tenant_id = %ctx.tenant_id))]
    pub async fn suggest_slots(&self, ctx: &RequestContext, request: &SlotRequest) -> DomainResult<Vec<SlotCandidate>> {
        request.validate()?;
        let existing = self
            .interviews
            .list(
                ctx.tenant_id,
                InterviewFilter::new()
                    .status(InterviewStatus::Scheduled)
                    .overlapping(request.range_start, request.range_end),
            )
            .await?;
        find_slots(request, &existing, &self.config.business_hours())
    }

    /// Create a new interview.
    ///
    /// The interview must belong to the request's tenant and carry a valid
    /// window and panel.
    #[instrument(skip(self, ctx, interview), fields(tenant_id = %ctx.tenant_id, interview_id = %interview.id))]
    pub async fn schedule(&self, ctx: &RequestContext, interview: Interview) -> DomainResult<Interview> {
        ctx.ensure_tenant(interview.tenant_id)?;
        interview.validate()?;
        if interview.status != InterviewStatus::Scheduled {
            return Err(DomainError::validation("New interviews must start in the scheduled state"));
        }

        self.check_conflicts(ctx, &interview, None).await?;

        let event = interview.scheduled_event(ctx.actor_id);
        self.interviews.create(&interview).await?;
        self.interviews.append_event(&event).await?;

        let deltas = LoadDeltas::on_scheduled(&interview, self.config.business_hours().offset());
        self.loads.record(&deltas).await?;

        info!(
            application_id = %interview.application_id,
            start = %interview.scheduled_start,
            panel_size = interview.panel.len(),
            "Interview scheduled"
        );

        if let Err(e) = self.calendar.event_scheduled(&interview).await {
            warn!(error = %e, "Calendar provider failed on schedule");
        }
        self.notify(AuditEntry::from_event(&event)).await;

        Ok(interview)
    }

    /// Move a scheduled interview to a new window.
    #[instrument(skip(self, ctx, reason), fields(tenant_id = %ctx.tenant_id))]
    pub async fn reschedule(
        &self,
        ctx: &RequestContext,
        interview_id: Uuid,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
        reason: Option<String>,
    ) -> DomainResult<Interview> {
        let before = self.get(ctx, interview_id).await?;
        let mut interview = before.clone();
        let event = interview.reschedule(ctx.actor_id, new_start, new_end, reason)?;

        self.check_conflicts(ctx, &interview, Some(interview.id)).await?;

        self.interviews.update(&interview).await?;
        self.interviews.append_event(&event).await?;

        let submitted: HashSet<Uuid> = self
            .feedback
            .list_for_interview(ctx.tenant_id, interview.id)
            .await?
            .into_iter()
            .map(|s| s.reviewer_id)
            .collect();
        let deltas = LoadDeltas::on_rescheduled(
            &before,
            &interview,
            &submitted,
            self.config.business_hours().offset(),
        );
        self.loads.record(&deltas).await?;

        info!(
            interview_id = %interview.id,
            new_start = %interview.scheduled_start,
            reschedule_count = interview.reschedule_count,
            "Interview rescheduled"
        );

        if let Err(e) = self.calendar.event_rescheduled(&interview).await {
            warn!(error = %e, "Calendar provider failed on reschedule");
        }
        self.notify(AuditEntry::from_event(&event)).await;

        Ok(interview)
    }

    /// Scheduled -> InProgress.
    pub async fn start(&self, ctx: &RequestContext, interview_id: Uuid) -> DomainResult<Interview> {
        self.transition(ctx, interview_id, |i| i.start(ctx.actor_id)).await
    }

    /// Scheduled -> NoShow.
    pub async fn mark_no_show(&self, ctx: &RequestContext, interview_id: Uuid) -> DomainResult<Interview> {
        self.transition(ctx, interview_id, |i| i.mark_no_show(ctx.actor_id)).await
    }

    /// Scheduled | InProgress -> Cancelled.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        interview_id: Uuid,
        reason: Option<String>,
    ) -> DomainResult<Interview> {
        let interview = self
            .transition(ctx, interview_id, |i| i.cancel(ctx.actor_id, reason))
            .await?;
        if let Err(e) = self.calendar.event_cancelled(&interview).await {
            warn!(interview_id = %interview.id, error = %e, "Calendar provider failed on cancel");
        }
        Ok(interview)
    }

    /// Scheduled | InProgress -> Completed.
    pub async fn complete(&self, ctx: &RequestContext, interview_id: Uuid) -> DomainResult<Interview> {
        self.transition(ctx, interview_id, |i| i.complete(ctx.actor_id)).await
    }

    /// Get an interview in the request's tenant.
    pub async fn get(&self, ctx: &RequestContext, interview_id: Uuid) -> DomainResult<Interview> {
        self.interviews
            .get(ctx.tenant_id, interview_id)
            .await?
            .ok_or(DomainError::InterviewNotFound(interview_id))
    }

    /// List the tenant's interviews.
    pub async fn list(&self, ctx: &RequestContext, filter: InterviewFilter) -> DomainResult<Vec<Interview>> {
        self.interviews.list(ctx.tenant_id, filter).await
    }

    /// The interview's event history, oldest first.
    pub async fn events(&self, ctx: &RequestContext, interview_id: Uuid) -> DomainResult<Vec<InterviewEvent>> {
        // Surface NotFound rather than an empty history for unknown ids.
        self.get(ctx, interview_id).await?;
        self.interviews.list_events(ctx.tenant_id, interview_id).await
    }

    async fn transition<F>(&self, ctx: &RequestContext, interview_id: Uuid, apply: F) -> DomainResult<Interview>
    where
        F: FnOnce(&mut Interview) -> DomainResult<InterviewEvent>,
    {
        let mut interview = self.get(ctx, interview_id).await?;
        let event = apply(&mut interview)?;

        self.interviews.update(&interview).await?;
        self.interviews.append_event(&event).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            interview_id = %interview.id,
            event = event.event_type.as_str(),
            status = interview.status.as_str(),
            "Interview transitioned"
        );

        self.notify(AuditEntry::from_event(&event)).await;
        Ok(interview)
    }

    /// Find panelists already booked over the interview's window.
    ///
    /// Rejects the booking only when `reject_conflicting_bookings` is on;
    /// otherwise conflicts are logged and the booking proceeds.
    async fn check_conflicts(
        &self,
        ctx: &RequestContext,
        interview: &Interview,
        exclude_id: Option<Uuid>,
    ) -> DomainResult<()> {
        let existing = self
            .interviews
            .list(
                ctx.tenant_id,
                InterviewFilter::new()
                    .status(InterviewStatus::Scheduled)
                    .overlapping(interview.scheduled_start, interview.scheduled_end),
            )
            .await?;
        let conflicts = ConflictDetector::conflicting_panelists(
            interview.scheduled_start,
            interview.scheduled_end,
            &interview.panelist_ids(),
            &existing,
            exclude_id,
        );

        if conflicts.is_empty() {
            return Ok(());
        }
        if self.config.reject_conflicting_bookings {
            return Err(DomainError::SchedulingConflict(conflicts));
        }
        warn!(
            interview_id = %interview.id,
            conflicts = conflicts.len(),
            "Booking overlaps existing interviews for some panelists"
        );
        Ok(())
    }

    async fn notify(&self, entry: AuditEntry) {
        let action = entry.action.as_str();
        if let Err(e) = self.audit.record(entry).await {
            warn!(action, error = %e, "Audit sink failed");
        }
    }
}
