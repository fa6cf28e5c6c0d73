//! Repository port for interview and interview-event persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Interview, InterviewEvent, InterviewStatus};

/// Filter for listing a tenant's interviews.
#[derive(Debug, Clone, Default)]
pub struct InterviewFilter {
    /// Only interviews whose panel contains this participant.
    pub panelist_id: Option<Uuid>,
    pub application_id: Option<Uuid>,
    pub status: Option<InterviewStatus>,
    /// Only interviews whose window overlaps `[from, to)`.
    pub overlapping: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub limit: Option<usize>,
}

impl InterviewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panelist(mut self, panelist_id: Uuid) -> Self {
        self.panelist_id = Some(panelist_id);
        self
    }

    pub fn application(mut self, application_id: Uuid) -> Self {
        self.application_id = Some(application_id);
        self
    }

    pub fn status(mut self, status: InterviewStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn overlapping(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.overlapping = Some((from, to));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `interview` passes every set criterion.
    pub fn matches(&self, interview: &Interview) -> bool {
        if let Some(panelist) = self.panelist_id {
            if !interview.has_panelist(panelist) {
                return false;
            }
        }
        if let Some(application) = self.application_id {
            if interview.application_id != application {
                return false;
            }
        }
        if let Some(status) = self.status {
            if interview.status != status {
                return false;
            }
        }
        if let Some((from, to)) = self.overlapping {
            if !(interview.scheduled_start < to && interview.scheduled_end > from) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
pub trait InterviewRepository: Send + Sync {
    /// Insert a new interview.
    async fn create(&self, interview: &Interview) -> DomainResult<()>;

    /// Get an interview by ID within a tenant.
    async fn get(&self, tenant_id: Uuid, id: Uuid) -> DomainResult<Option<Interview>>;

    /// Overwrite an existing interview.
    async fn update(&self, interview: &Interview) -> DomainResult<()>;

    /// List a tenant's interviews ordered by scheduled start.
    async fn list(&self, tenant_id: Uuid, filter: InterviewFilter) -> DomainResult<Vec<Interview>>;

    /// Append an event to an interview's history.
    async fn append_event(&self, event: &InterviewEvent) -> DomainResult<()>;

    /// An interview's events in the order they were appended.
    async fn list_events(&self, tenant_id: Uuid, interview_id: Uuid) -> DomainResult<Vec<InterviewEvent>>;
}
