//! Audit collaborator port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::AuditEntry;

/// Receives a structured record after each lifecycle transition or feedback change.
///
/// Callers log and swallow failures; an audit error never undoes the operation.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> DomainResult<()>;
}
