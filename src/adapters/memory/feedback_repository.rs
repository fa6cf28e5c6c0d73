use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{FeedbackAggregate, FeedbackSubmission, Period, ScorecardDimension};
use crate::domain::ports::FeedbackRepository;

#[derive(Default)]
pub struct InMemoryFeedbackRepository {
    /// One per (tenant, interview, reviewer), in first-submission order.
    submissions: RwLock<Vec<FeedbackSubmission>>,
    dimensions: RwLock<HashMap<(Uuid, String), ScorecardDimension>>,
    aggregates: RwLock<HashMap<(Uuid, Period), Vec<FeedbackAggregate>>>,
}

impl InMemoryFeedbackRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn get_submission(
        &self,
        tenant_id: Uuid,
        interview_id: Uuid,
        reviewer_id: Uuid,
    ) -> DomainResult<Option<FeedbackSubmission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions
            .iter()
            .find(|s| s.tenant_id == tenant_id && s.interview_id == interview_id && s.reviewer_id == reviewer_id)
            .cloned())
    }

    async fn upsert_submission(&self, submission: &FeedbackSubmission) -> DomainResult<Uuid> {
        let mut submissions = self.submissions.write().await;
        let existing = submissions.iter_mut().find(|s| {
            s.tenant_id == submission.tenant_id
                && s.interview_id == submission.interview_id
                && s.reviewer_id == submission.reviewer_id
        });
        match existing {
            Some(slot) => {
                let id = slot.id;
                *slot = FeedbackSubmission {
                    id,
                    ..submission.clone()
                };
                Ok(id)
            }
            None => {
                submissions.push(submission.clone());
                Ok(submission.id)
            }
        }
    }

    async fn list_submissions(
        &self,
        tenant_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<FeedbackSubmission>> {
        let submissions = self.submissions.read().await;
        let mut result: Vec<FeedbackSubmission> = submissions
            .iter()
            .filter(|s| s.tenant_id == tenant_id && s.submitted_at >= from && s.submitted_at < to)
            .cloned()
            .collect();
        result.sort_by_key(|s| s.submitted_at);
        Ok(result)
    }

    async fn list_for_interview(
        &self,
        tenant_id: Uuid,
        interview_id: Uuid,
    ) -> DomainResult<Vec<FeedbackSubmission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions
            .iter()
            .filter(|s| s.tenant_id == tenant_id && s.interview_id == interview_id)
            .cloned()
            .collect())
    }

    async fn dimensions(&self, tenant_id: Uuid) -> DomainResult<Vec<ScorecardDimension>> {
        let dimensions = self.dimensions.read().await;
        let mut result: Vec<ScorecardDimension> = dimensions
            .values()
            .filter(|d| d.tenant_id == tenant_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(result)
    }

    async fn upsert_dimension(&self, dimension: &ScorecardDimension) -> DomainResult<()> {
        self.dimensions
            .write()
            .await
            .insert((dimension.tenant_id, dimension.key.clone()), dimension.clone());
        Ok(())
    }

    async fn replace_aggregates(
        &self,
        tenant_id: Uuid,
        period: Period,
        aggregates: &[FeedbackAggregate],
    ) -> DomainResult<()> {
        self.aggregates
            .write()
            .await
            .insert((tenant_id, period), aggregates.to_vec());
        Ok(())
    }

    async fn list_aggregates(&self, tenant_id: Uuid, period: Period) -> DomainResult<Vec<FeedbackAggregate>> {
        let aggregates = self.aggregates.read().await;
        Ok(aggregates.get(&(tenant_id, period)).cloned().unwrap_or_default())
    }
}
