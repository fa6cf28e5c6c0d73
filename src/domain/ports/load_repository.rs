//! Repository port for interviewer load counters.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{InterviewerLoad, LoadDelta};

#[async_trait]
pub trait LoadRepository: Send + Sync {
    /// The counters for one (tenant, panelist, date), if a row exists.
    async fn get(&self, tenant_id: Uuid, panelist_id: Uuid, date: NaiveDate) -> DomainResult<Option<InterviewerLoad>>;

    /// Apply a delta and return the resulting row.
    ///
    /// Implementations must serialize concurrent deltas for the same key and
    /// apply them with [`crate::services::LoadDeltas::apply`] semantics.
    async fn apply_delta(&self, delta: &LoadDelta) -> DomainResult<InterviewerLoad>;

    /// A panelist's rows for `from..=to`, ordered by date.
    async fn list_for_panelist(
        &self,
        tenant_id: Uuid,
        panelist_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DomainResult<Vec<InterviewerLoad>>;
}
