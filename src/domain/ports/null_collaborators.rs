//! Null audit and calendar collaborators.
//!
//! Used when audit or calendar sync is not configured but the services
//! require an implementation.

use async_trait::async_trait;

use super::{AuditSink, CalendarProvider};
use crate::domain::errors::DomainResult;
use crate::domain::models::AuditEntry;

/// An audit sink that discards every entry.
#[derive(Debug, Clone, Default)]
pub struct NullAuditSink;

impl NullAuditSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for NullAuditSink {
    async fn record(&self, _entry: AuditEntry) -> DomainResult<()> {
        Ok(())
    }
}

/// A calendar provider that syncs nothing.
#[derive(Debug, Clone, Default)]
pub struct NullCalendarProvider;

impl NullCalendarProvider {
    pub fn new() -> Self {
        Self
    }
}

impl CalendarProvider for NullCalendarProvider {}
