//! Audit trail entries emitted after lifecycle transitions and feedback changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::context::RequestContext;
use super::interview_event::{InterviewEvent, InterviewEventType};

/// Type of audited change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    InterviewScheduled,
    InterviewStarted,
    InterviewRescheduled,
    InterviewNoShow,
    InterviewCancelled,
    InterviewCompleted,
    FeedbackSubmitted,
    FeedbackResubmitted,
    DimensionUpdated,
    AggregatesRecomputed,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InterviewScheduled => "interview_scheduled",
            Self::InterviewStarted => "interview_started",
            Self::InterviewRescheduled => "interview_rescheduled",
            Self::InterviewNoShow => "interview_no_show",
            Self::InterviewCancelled => "interview_cancelled",
            Self::InterviewCompleted => "interview_completed",
            Self::FeedbackSubmitted => "feedback_submitted",
            Self::FeedbackResubmitted => "feedback_resubmitted",
            Self::DimensionUpdated => "dimension_updated",
            Self::AggregatesRecomputed => "aggregates_recomputed",
        }
    }

    pub fn for_event(event_type: InterviewEventType) -> Self {
        match event_type {
            InterviewEventType::Scheduled => Self::InterviewScheduled,
            InterviewEventType::Started => Self::InterviewStarted,
            InterviewEventType::Rescheduled => Self::InterviewRescheduled,
            InterviewEventType::NoShow => Self::InterviewNoShow,
            InterviewEventType::Cancelled => Self::InterviewCancelled,
            InterviewEventType::Completed => Self::InterviewCompleted,
        }
    }
}

/// One structured audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub tenant_id: Uuid,
    pub actor_id: Uuid,
    pub action: AuditAction,
    pub resource_id: Option<Uuid>,
    /// What changed, as a structured diff.
    pub diff: Value,
}

impl AuditEntry {
    pub fn new(ctx: &RequestContext, action: AuditAction, resource_id: Option<Uuid>, diff: Value) -> Self {
        Self {
            timestamp: Utc::now(),
            tenant_id: ctx.tenant_id,
            actor_id: ctx.actor_id,
            action,
            resource_id,
            diff,
        }
    }

    /// Audit record mirroring an interview lifecycle event.
    pub fn from_event(event: &InterviewEvent) -> Self {
        Self {
            timestamp: event.occurred_at,
            tenant_id: event.tenant_id,
            actor_id: event.actor_id,
            action: AuditAction::for_event(event.event_type),
            resource_id: Some(event.interview_id),
            diff: event.metadata.clone(),
        }
    }
}
