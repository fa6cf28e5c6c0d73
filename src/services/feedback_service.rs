//! Feedback submission and scorecard configuration.

use std::sync::Arc;

use chrono::{FixedOffset, Utc};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AuditAction, AuditEntry, FeedbackDraft, FeedbackSubmission, InterviewStatus, RatingScale, RequestContext,
    ScorecardDimension,
};
use crate::domain::ports::{AuditSink, FeedbackRepository, InterviewRepository, LoadRepository};
use crate::services::feedback_aggregator::FeedbackAggregator;
use crate::services::load_tracker::{LoadDeltas, LoadTracker};

pub struct FeedbackService<R, F, L>
where
    R: InterviewRepository + ?Sized,
    F: FeedbackRepository + ?Sized,
    L: LoadRepository + ?Sized,
{
    interviews: Arc<R>,
    feedback: Arc<F>,
    loads: LoadTracker<L>,
    audit: Arc<dyn AuditSink>,
    scale: RatingScale,
    offset: FixedOffset,
}

impl<R, F, L> FeedbackService<R, F, L>
where
    R: InterviewRepository + ?Sized,
    F: FeedbackRepository + ?Sized,
    L: LoadRepository + ?Sized,
{
    /// `offset` is the business timezone used to key load rows; it must match
    /// the one the interviews were scheduled under.
    pub fn new(
        interviews: Arc<R>,
        feedback: Arc<F>,
        loads: Arc<L>,
        audit: Arc<dyn AuditSink>,
        scale: RatingScale,
        offset: FixedOffset,
    ) -> Self {
        Self {
            interviews,
            feedback,
            loads: LoadTracker::new(loads),
            audit,
            scale,
            offset,
        }
    }

    /// Record a reviewer's feedback for an interview.
    ///
    /// A second submission by the same reviewer replaces the first (keeping
    /// its id) and does not touch the reviewer's pending-feedback count again.
    #[instrument(skip(self, ctx, draft), fields(
        tenant_id = %ctx.tenant_id,
        interview_id = %draft.interview_id,
        reviewer_id = %draft.reviewer_id
    ))]
    pub async fn submit(&self, ctx: &RequestContext, draft: FeedbackDraft) -> DomainResult<FeedbackSubmission> {
        FeedbackAggregator::validate(&draft.ratings, &self.scale)?;

        let interview = self
            .interviews
            .get(ctx.tenant_id, draft.interview_id)
            .await?
            .ok_or(DomainError::InterviewNotFound(draft.interview_id))?;

        if !interview.has_panelist(draft.reviewer_id) {
            return Err(DomainError::ReviewerNotOnPanel {
                interview_id: interview.id,
                reviewer_id: draft.reviewer_id,
            });
        }
        if matches!(interview.status, InterviewStatus::Cancelled | InterviewStatus::NoShow) {
            return Err(DomainError::InvalidStateTransition {
                from: interview.status.as_str().to_string(),
                to: "feedback_submitted".to_string(),
                reason: "feedback cannot be recorded for an interview that did not take place".to_string(),
            });
        }

        let dimensions = self.feedback.dimensions(ctx.tenant_id).await?;
        let weights = FeedbackAggregator::weight_map(&dimensions);
        let aggregate_score = FeedbackAggregator::score(&draft.ratings, &weights);

        let previous = self
            .feedback
            .get_submission(ctx.tenant_id, draft.interview_id, draft.reviewer_id)
            .await?;

        let candidate = FeedbackSubmission {
            id: Uuid::new_v4(),
            tenant_id: ctx.tenant_id,
            interview_id: draft.interview_id,
            reviewer_id: draft.reviewer_id,
            ratings: draft.ratings,
            recommendation: draft.recommendation,
            aggregate_score,
            submitted_at: Utc::now(),
        };
        // Only the write that inserted the row releases the pending unit.
        let stored_id = self.feedback.upsert_submission(&candidate).await?;
        let first_submission = stored_id == candidate.id;
        let submission = FeedbackSubmission {
            id: stored_id,
            ..candidate
        };

        let action = if first_submission {
            if let Some(delta) = LoadDeltas::on_feedback_recorded(&interview, submission.reviewer_id, self.offset) {
                self.loads.record(&[delta]).await?;
            }
            AuditAction::FeedbackSubmitted
        } else {
            AuditAction::FeedbackResubmitted
        };

        info!(
            aggregate_score,
            recommendation = submission.recommendation.as_str(),
            resubmission = !first_submission,
            "Feedback recorded"
        );

        let mut diff = json!({
            "interview_id": submission.interview_id,
            "reviewer_id": submission.reviewer_id,
            "aggregate_score": aggregate_score,
            "recommendation": submission.recommendation.as_str(),
        });
        if let Some(previous) = &previous {
            diff["previous_score"] = json!(previous.aggregate_score);
        }
        self.notify(AuditEntry::new(ctx, action, Some(submission.id), diff)).await;

        Ok(submission)
    }

    /// Create or reweight a scorecard dimension.
    ///
    /// Existing submissions keep the score they were given; new weights apply
    /// to later submissions.
    #[instrument(skip(self, ctx), fields(tenant_id = %ctx.tenant_id))]
    pub async fn upsert_dimension(&self, ctx: &RequestContext, key: &str, weight: f64) -> DomainResult<ScorecardDimension> {
        let dimension = ScorecardDimension::new(ctx.tenant_id, key, weight)?;
        self.feedback.upsert_dimension(&dimension).await?;

        info!(key = %dimension.key, weight, "Scorecard dimension saved");
        self.notify(AuditEntry::new(
            ctx,
            AuditAction::DimensionUpdated,
            None,
            json!({ "key": dimension.key, "weight": dimension.weight }),
        ))
        .await;

        Ok(dimension)
    }

    /// The tenant's scorecard dimensions.
    pub async fn dimensions(&self, ctx: &RequestContext) -> DomainResult<Vec<ScorecardDimension>> {
        self.feedback.dimensions(ctx.tenant_id).await
    }

    /// All submissions recorded for an interview.
    pub async fn for_interview(&self, ctx: &RequestContext, interview_id: Uuid) -> DomainResult<Vec<FeedbackSubmission>> {
        self.feedback.list_for_interview(ctx.tenant_id, interview_id).await
    }

    async fn notify(&self, entry: AuditEntry) {
        let action = entry.action.as_str();
        if let Err(e) = self.audit.record(entry).await {
            warn!(action, error = %e, "Audit sink failed");
        }
    }
}
