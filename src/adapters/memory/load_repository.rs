use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{InterviewerLoad, LoadDelta};
use crate::domain::ports::LoadRepository;
use crate::services::load_tracker::LoadDeltas;

type LoadKey = (Uuid, Uuid, NaiveDate);

#[derive(Default)]
pub struct InMemoryLoadRepository {
    rows: RwLock<BTreeMap<LoadKey, InterviewerLoad>>,
}

impl InMemoryLoadRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoadRepository for InMemoryLoadRepository {
    async fn get(&self, tenant_id: Uuid, panelist_id: Uuid, date: NaiveDate) -> DomainResult<Option<InterviewerLoad>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&(tenant_id, panelist_id, date)).cloned())
    }

    async fn apply_delta(&self, delta: &LoadDelta) -> DomainResult<InterviewerLoad> {
        // Holding the write guard across read-modify-write serializes deltas.
        let mut rows = self.rows.write().await;
        let row = rows
            .entry((delta.tenant_id, delta.panelist_id, delta.date))
            .or_insert_with(|| InterviewerLoad::empty(delta.tenant_id, delta.panelist_id, delta.date));
        LoadDeltas::apply(row, delta);
        Ok(row.clone())
    }

    async fn list_for_panelist(
        &self,
        tenant_id: Uuid,
        panelist_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DomainResult<Vec<InterviewerLoad>> {
        if to < from {
            return Ok(Vec::new());
        }
        let rows = self.rows.read().await;
        Ok(rows
            .range((tenant_id, panelist_id, from)..=(tenant_id, panelist_id, to))
            .map(|(_, row)| row.clone())
            .collect())
    }
}
