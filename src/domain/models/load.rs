//! Per-panelist daily load counters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scheduled and pending-feedback counts for one panelist on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewerLoad {
    pub tenant_id: Uuid,
    pub panelist_id: Uuid,
    pub date: NaiveDate,
    pub scheduled_count: u32,
    pub pending_feedback_count: u32,
}

impl InterviewerLoad {
    pub fn empty(tenant_id: Uuid, panelist_id: Uuid, date: NaiveDate) -> Self {
        Self {
            tenant_id,
            panelist_id,
            date,
            scheduled_count: 0,
            pending_feedback_count: 0,
        }
    }
}

/// A signed change to apply to one load row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadDelta {
    pub tenant_id: Uuid,
    pub panelist_id: Uuid,
    pub date: NaiveDate,
    pub scheduled: i32,
    pub pending_feedback: i32,
}

impl LoadDelta {
    pub fn is_noop(&self) -> bool {
        self.scheduled == 0 && self.pending_feedback == 0
    }
}
