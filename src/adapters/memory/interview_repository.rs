use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Interview, InterviewEvent};
use crate::domain::ports::{InterviewFilter, InterviewRepository};

#[derive(Default)]
pub struct InMemoryInterviewRepository {
    interviews: RwLock<HashMap<Uuid, Interview>>,
    events: RwLock<Vec<InterviewEvent>>,
}

impl InMemoryInterviewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InterviewRepository for InMemoryInterviewRepository {
    async fn create(&self, interview: &Interview) -> DomainResult<()> {
        let mut interviews = self.interviews.write().await;
        if interviews.contains_key(&interview.id) {
            return Err(DomainError::DatabaseError(format!(
                "Interview {} already exists",
                interview.id
            )));
        }
        interviews.insert(interview.id, interview.clone());
        Ok(())
    }

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> DomainResult<Option<Interview>> {
        let interviews = self.interviews.read().await;
        Ok(interviews.get(&id).filter(|i| i.tenant_id == tenant_id).cloned())
    }

    async fn update(&self, interview: &Interview) -> DomainResult<()> {
        let mut interviews = self.interviews.write().await;
        match interviews.get_mut(&interview.id) {
            Some(existing) if existing.tenant_id == interview.tenant_id => {
                *existing = interview.clone();
                Ok(())
            }
            _ => Err(DomainError::InterviewNotFound(interview.id)),
        }
    }

    async fn list(&self, tenant_id: Uuid, filter: InterviewFilter) -> DomainResult<Vec<Interview>> {
        let interviews = self.interviews.read().await;
        let mut result: Vec<Interview> = interviews
            .values()
            .filter(|i| i.tenant_id == tenant_id && filter.matches(i))
            .cloned()
            .collect();
        result.sort_by_key(|i| (i.scheduled_start, i.id));
        if let Some(limit) = filter.limit {
            result.truncate(limit);
        }
        Ok(result)
    }

    async fn append_event(&self, event: &InterviewEvent) -> DomainResult<()> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn list_events(&self, tenant_id: Uuid, interview_id: Uuid) -> DomainResult<Vec<InterviewEvent>> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|e| e.tenant_id == tenant_id && e.interview_id == interview_id)
            .cloned()
            .collect())
    }
}
