//! Calendar provider extension point.
//!
//! No provider integration ships with panelkit. Every method defaults to a
//! no-op so an implementation only overrides what it syncs.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Interview;

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Called after an interview is created.
    async fn event_scheduled(&self, _interview: &Interview) -> DomainResult<()> {
        Ok(())
    }

    /// Called after an interview moves to a new window.
    async fn event_rescheduled(&self, _interview: &Interview) -> DomainResult<()> {
        Ok(())
    }

    /// Called after an interview is cancelled.
    async fn event_cancelled(&self, _interview: &Interview) -> DomainResult<()> {
        Ok(())
    }
}
