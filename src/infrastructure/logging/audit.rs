//! JSON-lines audit trail.
//!
//! Each [`AuditEntry`] becomes one line in an append-only file and is echoed
//! as a tracing event.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::AuditEntry;
use crate::domain::ports::AuditSink;

/// Audit sink appending entries to a file as JSON lines
#[derive(Clone)]
pub struct JsonlAuditSink {
    log_file: Arc<Mutex<File>>,
}

impl JsonlAuditSink {
    /// Open `log_path` for appending, creating it and its parent directories.
    pub async fn new(log_path: impl AsRef<Path>) -> Result<Self> {
        let log_path = log_path.as_ref();

        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("failed to create audit log directory")?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .with_context(|| format!("failed to open audit log file {}", log_path.display()))?;

        Ok(Self {
            log_file: Arc::new(Mutex::new(file)),
        })
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut file = self
            .log_file
            .lock()
            .map_err(|e| std::io::Error::other(format!("audit log mutex poisoned: {e}")))?;
        writeln!(file, "{line}")?;
        file.flush()
    }
}

#[async_trait]
impl AuditSink for JsonlAuditSink {
    async fn record(&self, entry: AuditEntry) -> DomainResult<()> {
        let json = serde_json::to_string(&entry)?;
        self.write_line(&json)
            .map_err(|e| DomainError::CollaboratorFailed(format!("audit write failed: {e}")))?;

        info!(
            action = entry.action.as_str(),
            tenant_id = %entry.tenant_id,
            actor_id = %entry.actor_id,
            resource_id = ?entry.resource_id,
            "audit event"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{AuditAction, RequestContext};
    use serde_json::json;
    use tempfile::TempDir;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("logs/audit/events.jsonl");

        let _sink = JsonlAuditSink::new(&log_path).await.unwrap();
        assert!(log_path.exists());
    }

    #[tokio::test]
    async fn test_entries_appended_as_json_lines() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("audit.jsonl");
        let ctx = RequestContext::new(Uuid::new_v4(), Uuid::new_v4());

        let sink = JsonlAuditSink::new(&log_path).await.unwrap();
        sink.record(AuditEntry::new(&ctx, AuditAction::DimensionUpdated, None, json!({"key": "coding"})))
            .await
            .unwrap();
        sink.record(AuditEntry::new(&ctx, AuditAction::AggregatesRecomputed, None, json!({})))
            .await
            .unwrap();

        // Reopening appends rather than truncating.
        let reopened = JsonlAuditSink::new(&log_path).await.unwrap();
        reopened
            .record(AuditEntry::new(&ctx, AuditAction::FeedbackSubmitted, Some(Uuid::new_v4()), json!({})))
            .await
            .unwrap();

        let contents = std::fs::read_to_string(&log_path).unwrap();
        let entries: Vec<AuditEntry> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].action, AuditAction::DimensionUpdated);
        assert_eq!(entries[0].diff["key"], "coding");
        assert_eq!(entries[2].tenant_id, ctx.tenant_id);
    }
}
