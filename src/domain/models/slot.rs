//! Slot search request and result types.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Score of a slot with no conflicting panelists.
pub const PERFECT_SLOT_SCORE: i32 = 100;

/// Score deducted per conflicting panelist.
pub const CONFLICT_PENALTY: i32 = 20;

/// A proposed interview window and how well it fits the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCandidate {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Requested panelists already booked during this window, in request order.
    pub conflicts: Vec<Uuid>,
    pub score: i32,
}

impl SlotCandidate {
    pub fn is_conflict_free(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Parameters of a slot search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRequest {
    pub panelist_ids: Vec<Uuid>,
    pub duration_minutes: i64,
    pub range_start: DateTime<Utc>,
    pub range_end: DateTime<Utc>,
    pub max_suggestions: usize,
}

impl SlotRequest {
    pub fn new(
        panelist_ids: Vec<Uuid>,
        duration_minutes: i64,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Self {
        Self {
            panelist_ids,
            duration_minutes,
            range_start,
            range_end,
            max_suggestions: 10,
        }
    }

    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    /// Reject malformed requests before any computation.
    pub fn validate(&self) -> DomainResult<()> {
        if self.panelist_ids.is_empty() {
            return Err(DomainError::validation("At least one panelist is required"));
        }
        if self.duration_minutes <= 0 {
            return Err(DomainError::ValidationFailed(format!(
                "Duration must be positive (got {} minutes)",
                self.duration_minutes
            )));
        }
        if self.range_end < self.range_start {
            return Err(DomainError::ValidationFailed(format!(
                "Range end {} is before range start {}",
                self.range_end.to_rfc3339(),
                self.range_start.to_rfc3339()
            )));
        }
        if self.max_suggestions == 0 {
            return Err(DomainError::validation("max_suggestions must be at least 1"));
        }
        Ok(())
    }
}

/// The daily window in which interviews may be proposed.
///
/// Hours are local to `utc_offset_minutes`. A slot must both start and end
/// inside `[start_hour, end_hour]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub start_hour: u32,
    pub end_hour: u32,
    pub utc_offset_minutes: i32,
    pub skip_weekends: bool,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
            utc_offset_minutes: 0,
            skip_weekends: false,
        }
    }
}

impl BusinessHours {
    pub fn new(start_hour: u32, end_hour: u32) -> DomainResult<Self> {
        let hours = Self {
            start_hour,
            end_hour,
            ..Self::default()
        };
        hours.validate()?;
        Ok(hours)
    }

    pub fn with_offset_minutes(mut self, utc_offset_minutes: i32) -> Self {
        self.utc_offset_minutes = utc_offset_minutes;
        self
    }

    pub fn with_skip_weekends(mut self, skip_weekends: bool) -> Self {
        self.skip_weekends = skip_weekends;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(DomainError::ValidationFailed(format!(
                "Business hours {}:00-{}:00 are not a valid window",
                self.start_hour, self.end_hour
            )));
        }
        if FixedOffset::east_opt(self.utc_offset_minutes * 60).is_none() {
            return Err(DomainError::ValidationFailed(format!(
                "UTC offset of {} minutes is out of range",
                self.utc_offset_minutes
            )));
        }
        Ok(())
    }

    /// The business timezone. Out-of-range offsets fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    pub fn window_minutes(&self) -> i64 {
        i64::from(self.end_hour.saturating_sub(self.start_hour)) * 60
    }
}
