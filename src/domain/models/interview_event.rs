//! Append-only interview event log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of lifecycle transition an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewEventType {
    Scheduled,
    Started,
    Rescheduled,
    NoShow,
    Cancelled,
    Completed,
}

impl InterviewEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Started => "started",
            Self::Rescheduled => "rescheduled",
            Self::NoShow => "no_show",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "scheduled" => Some(Self::Scheduled),
            "started" => Some(Self::Started),
            "rescheduled" => Some(Self::Rescheduled),
            "no_show" | "no-show" => Some(Self::NoShow),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// One immutable entry in an interview's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewEvent {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub tenant_id: Uuid,
    pub event_type: InterviewEventType,
    pub actor_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub metadata: serde_json::Value,
}

impl InterviewEvent {
    pub fn new(
        interview_id: Uuid,
        tenant_id: Uuid,
        event_type: InterviewEventType,
        actor_id: Uuid,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            interview_id,
            tenant_id,
            event_type,
            actor_id,
            occurred_at: Utc::now(),
            metadata,
        }
    }
}
