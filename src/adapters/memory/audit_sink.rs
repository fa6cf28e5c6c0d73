use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::DomainResult;
use crate::domain::models::AuditEntry;
use crate::domain::ports::AuditSink;

/// Audit sink that keeps every entry in memory, in record order.
#[derive(Default)]
pub struct InMemoryAuditSink {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn record(&self, entry: AuditEntry) -> DomainResult<()> {
        self.entries.write().await.push(entry);
        Ok(())
    }
}
