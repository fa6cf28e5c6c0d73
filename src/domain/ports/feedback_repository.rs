//! Repository port for scorecards, feedback submissions and period aggregates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{FeedbackAggregate, FeedbackSubmission, Period, ScorecardDimension};

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// The submission for an (interview, reviewer) pair, if any.
    async fn get_submission(
        &self,
        tenant_id: Uuid,
        interview_id: Uuid,
        reviewer_id: Uuid,
    ) -> DomainResult<Option<FeedbackSubmission>>;

    /// Insert, or replace the existing submission for the same (interview, reviewer) pair.
    ///
    /// Returns the stored id: `submission.id` when this call inserted the
    /// row, otherwise the id the pair already had. The check and the write
    /// are one atomic step.
    async fn upsert_submission(&self, submission: &FeedbackSubmission) -> DomainResult<Uuid>;

    /// Submissions whose `submitted_at` lies in `[from, to)`.
    async fn list_submissions(
        &self,
        tenant_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<FeedbackSubmission>>;

    /// All submissions for one interview.
    async fn list_for_interview(
        &self,
        tenant_id: Uuid,
        interview_id: Uuid,
    ) -> DomainResult<Vec<FeedbackSubmission>>;

    /// The tenant's scorecard dimensions.
    async fn dimensions(&self, tenant_id: Uuid) -> DomainResult<Vec<ScorecardDimension>>;

    /// Insert or replace a dimension by (tenant, key).
    async fn upsert_dimension(&self, dimension: &ScorecardDimension) -> DomainResult<()>;

    /// Replace every aggregate stored for (tenant, period).
    async fn replace_aggregates(
        &self,
        tenant_id: Uuid,
        period: Period,
        aggregates: &[FeedbackAggregate],
    ) -> DomainResult<()>;

    /// Stored aggregates for (tenant, period).
    async fn list_aggregates(&self, tenant_id: Uuid, period: Period) -> DomainResult<Vec<FeedbackAggregate>>;
}
