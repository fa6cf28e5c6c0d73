//! Interview domain model.
//!
//! An interview is a scheduled conversation between a candidate application
//! and a panel. Its status and schedule change only through the transition
//! methods below, each of which yields exactly one [`InterviewEvent`].

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::interview_event::{InterviewEvent, InterviewEventType};
use crate::domain::errors::{DomainError, DomainResult};

/// Status of an interview.
///
/// `Scheduled` is the only initial state. `NoShow`, `Cancelled` and
/// `Completed` are terminal. Rescheduling keeps the interview `Scheduled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    InProgress,
    NoShow,
    Cancelled,
    Completed,
}

impl Default for InterviewStatus {
    fn default() -> Self {
        Self::Scheduled
    }
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::NoShow => "no_show",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "scheduled" => Some(Self::Scheduled),
            "in_progress" | "in-progress" => Some(Self::InProgress),
            "no_show" | "no-show" => Some(Self::NoShow),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            "completed" | "complete" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::NoShow | Self::Cancelled | Self::Completed)
    }

    /// Statuses reachable from this one by a status-changing transition.
    pub fn valid_transitions(&self) -> Vec<InterviewStatus> {
        match self {
            Self::Scheduled => vec![Self::InProgress, Self::NoShow, Self::Cancelled, Self::Completed],
            Self::InProgress => vec![Self::Cancelled, Self::Completed],
            Self::NoShow | Self::Cancelled | Self::Completed => vec![],
        }
    }

    pub fn can_transition_to(&self, new_status: Self) -> bool {
        self.valid_transitions().contains(&new_status)
    }
}

/// Role a participant plays on a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelRole {
    Interviewer,
    HiringManager,
    Observer,
}

impl PanelRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interviewer => "interviewer",
            Self::HiringManager => "hiring_manager",
            Self::Observer => "observer",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "interviewer" => Some(Self::Interviewer),
            "hiring_manager" | "hiring-manager" => Some(Self::HiringManager),
            "observer" => Some(Self::Observer),
            _ => None,
        }
    }
}

/// One participant on an interview panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelMember {
    pub participant_id: Uuid,
    pub role: PanelRole,
}

impl PanelMember {
    pub fn new(participant_id: Uuid, role: PanelRole) -> Self {
        Self { participant_id, role }
    }

    pub fn interviewer(participant_id: Uuid) -> Self {
        Self::new(participant_id, PanelRole::Interviewer)
    }
}

/// How the interview is conducted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewMode {
    Video,
    Phone,
    Onsite,
    Remote,
}

impl Default for InterviewMode {
    fn default() -> Self {
        Self::Video
    }
}

impl InterviewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Phone => "phone",
            Self::Onsite => "onsite",
            Self::Remote => "remote",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "video" => Some(Self::Video),
            "phone" => Some(Self::Phone),
            "onsite" | "on-site" => Some(Self::Onsite),
            "remote" => Some(Self::Remote),
            _ => None,
        }
    }
}

/// A scheduled interview for one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub application_id: Uuid,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub panel: Vec<PanelMember>,
    pub mode: InterviewMode,
    pub status: InterviewStatus,
    /// Number of times the interview has been moved. Never decreases.
    pub reschedule_count: u32,
    pub recording_ref: Option<String>,
    pub transcript_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped on every transition.
    pub version: u64,
}

impl Interview {
    /// Create a new scheduled interview. Call [`Interview::validate`] before persisting.
    pub fn new(
        tenant_id: Uuid,
        application_id: Uuid,
        scheduled_start: DateTime<Utc>,
        scheduled_end: DateTime<Utc>,
        panel: Vec<PanelMember>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            application_id,
            scheduled_start,
            scheduled_end,
            panel,
            mode: InterviewMode::default(),
            status: InterviewStatus::Scheduled,
            reschedule_count: 0,
            recording_ref: None,
            transcript_ref: None,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    pub fn with_mode(mut self, mode: InterviewMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_recording(mut self, recording_ref: impl Into<String>) -> Self {
        self.recording_ref = Some(recording_ref.into());
        self
    }

    pub fn with_transcript(mut self, transcript_ref: impl Into<String>) -> Self {
        self.transcript_ref = Some(transcript_ref.into());
        self
    }

    /// Whether `participant_id` sits on this interview's panel.
    pub fn has_panelist(&self, participant_id: Uuid) -> bool {
        self.panel.iter().any(|m| m.participant_id == participant_id)
    }

    pub fn panelist_ids(&self) -> Vec<Uuid> {
        self.panel.iter().map(|m| m.participant_id).collect()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Local calendar date of the scheduled start in the given business offset.
    pub fn scheduled_date(&self, offset: FixedOffset) -> NaiveDate {
        self.scheduled_start.with_timezone(&offset).date_naive()
    }

    /// Validate the schedule and panel.
    pub fn validate(&self) -> DomainResult<()> {
        validate_window(self.scheduled_start, self.scheduled_end)?;
        if self.panel.is_empty() {
            return Err(DomainError::validation("Interview panel cannot be empty"));
        }
        let mut seen = HashSet::new();
        for member in &self.panel {
            if !seen.insert(member.participant_id) {
                return Err(DomainError::ValidationFailed(format!(
                    "Participant {} appears more than once on the panel",
                    member.participant_id
                )));
            }
        }
        Ok(())
    }

    /// The event recording creation of this interview.
    pub fn scheduled_event(&self, actor_id: Uuid) -> InterviewEvent {
        InterviewEvent::new(
            self.id,
            self.tenant_id,
            InterviewEventType::Scheduled,
            actor_id,
            json!({
                "application_id": self.application_id,
                "start": self.scheduled_start,
                "end": self.scheduled_end,
                "mode": self.mode.as_str(),
                "panel": self.panelist_ids(),
            }),
        )
    }

    /// Scheduled -> InProgress.
    pub fn start(&mut self, actor_id: Uuid) -> DomainResult<InterviewEvent> {
        self.transition_to(InterviewStatus::InProgress, actor_id, None)
    }

    /// Scheduled -> NoShow.
    pub fn mark_no_show(&mut self, actor_id: Uuid) -> DomainResult<InterviewEvent> {
        self.transition_to(InterviewStatus::NoShow, actor_id, None)
    }

    /// Scheduled | InProgress -> Cancelled.
    pub fn cancel(&mut self, actor_id: Uuid, reason: Option<String>) -> DomainResult<InterviewEvent> {
        self.transition_to(InterviewStatus::Cancelled, actor_id, reason)
    }

    /// Scheduled | InProgress -> Completed.
    pub fn complete(&mut self, actor_id: Uuid) -> DomainResult<InterviewEvent> {
        self.transition_to(InterviewStatus::Completed, actor_id, None)
    }

    /// Move a scheduled interview to a new window.
    ///
    /// Status stays `Scheduled`; the reschedule count goes up by one.
    pub fn reschedule(
        &mut self,
        actor_id: Uuid,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
        reason: Option<String>,
    ) -> DomainResult<InterviewEvent> {
        match self.status {
            InterviewStatus::Scheduled => {}
            other => {
                return Err(DomainError::InvalidStateTransition {
                    from: other.as_str().to_string(),
                    to: "rescheduled".to_string(),
                    reason: "only scheduled interviews can be rescheduled".to_string(),
                })
            }
        }
        validate_window(new_start, new_end)?;

        let old_start = self.scheduled_start;
        let old_end = self.scheduled_end;
        self.scheduled_start = new_start;
        self.scheduled_end = new_end;
        self.reschedule_count += 1;
        self.touch();

        Ok(InterviewEvent::new(
            self.id,
            self.tenant_id,
            InterviewEventType::Rescheduled,
            actor_id,
            json!({
                "old_start": old_start,
                "old_end": old_end,
                "new_start": new_start,
                "new_end": new_end,
                "reason": reason,
                "reschedule_count": self.reschedule_count,
            }),
        ))
    }

    fn transition_to(
        &mut self,
        new_status: InterviewStatus,
        actor_id: Uuid,
        reason: Option<String>,
    ) -> DomainResult<InterviewEvent> {
        if !self.status.can_transition_to(new_status) {
            let why = if self.status.is_terminal() {
                format!("interview is already {}", self.status.as_str())
            } else {
                format!("{} interviews cannot become {}", self.status.as_str(), new_status.as_str())
            };
            return Err(DomainError::InvalidStateTransition {
                from: self.status.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: why,
            });
        }

        let from = self.status;
        self.status = new_status;
        self.touch();

        let event_type = match new_status {
            InterviewStatus::InProgress => InterviewEventType::Started,
            InterviewStatus::NoShow => InterviewEventType::NoShow,
            InterviewStatus::Cancelled => InterviewEventType::Cancelled,
            InterviewStatus::Completed => InterviewEventType::Completed,
            InterviewStatus::Scheduled => InterviewEventType::Scheduled,
        };

        let mut metadata = json!({
            "from": from.as_str(),
            "to": new_status.as_str(),
        });
        if let Some(reason) = reason {
            metadata["reason"] = json!(reason);
        }

        Ok(InterviewEvent::new(self.id, self.tenant_id, event_type, actor_id, metadata))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.version += 1;
    }
}

fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<()> {
    if end <= start {
        return Err(DomainError::ValidationFailed(format!(
            "Interview end {} must be after start {}",
            end.to_rfc3339(),
            start.to_rfc3339()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
    }

    fn interview() -> Interview {
        Interview::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            at(10),
            at(11),
            vec![PanelMember::interviewer(Uuid::new_v4())],
        )
    }

    #[test]
    fn test_new_interview_is_scheduled() {
        let iv = interview();
        assert_eq!(iv.status, InterviewStatus::Scheduled);
        assert_eq!(iv.reschedule_count, 0);
        assert!(iv.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let mut iv = interview();
        iv.scheduled_end = iv.scheduled_start;
        assert!(matches!(iv.validate(), Err(DomainError::ValidationFailed(_))));
    }

    #[test]
    fn test_validate_rejects_empty_and_duplicate_panel() {
        let mut iv = interview();
        iv.panel.clear();
        assert!(iv.validate().is_err());

        let p = Uuid::new_v4();
        iv.panel = vec![PanelMember::interviewer(p), PanelMember::new(p, PanelRole::Observer)];
        assert!(iv.validate().is_err());
    }

    #[test]
    fn test_start_then_complete() {
        let mut iv = interview();
        let actor = Uuid::new_v4();

        let ev = iv.start(actor).unwrap();
        assert_eq!(ev.event_type, InterviewEventType::Started);
        assert_eq!(iv.status, InterviewStatus::InProgress);

        let ev = iv.complete(actor).unwrap();
        assert_eq!(ev.event_type, InterviewEventType::Completed);
        assert!(iv.is_terminal());
        assert_eq!(iv.version, 3);
    }

    #[test]
    fn test_no_show_only_from_scheduled() {
        let mut iv = interview();
        iv.start(Uuid::new_v4()).unwrap();
        let err = iv.mark_no_show(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition { .. }));
        assert_eq!(iv.status, InterviewStatus::InProgress);
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for terminal in [InterviewStatus::NoShow, InterviewStatus::Cancelled, InterviewStatus::Completed] {
            let mut iv = interview();
            iv.status = terminal;
            let actor = Uuid::new_v4();
            assert!(iv.start(actor).is_err());
            assert!(iv.mark_no_show(actor).is_err());
            assert!(iv.cancel(actor, None).is_err());
            assert!(iv.complete(actor).is_err());
            assert!(iv.reschedule(actor, at(12), at(13), None).is_err());
            assert_eq!(iv.status, terminal);
        }
    }

    #[test]
    fn test_reschedule_records_old_and_new() {
        let mut iv = interview();
        let ev = iv
            .reschedule(Uuid::new_v4(), at(14), at(15), Some("panelist sick".to_string()))
            .unwrap();

        assert_eq!(iv.status, InterviewStatus::Scheduled);
        assert_eq!(iv.reschedule_count, 1);
        assert_eq!(iv.scheduled_start, at(14));
        assert_eq!(ev.event_type, InterviewEventType::Rescheduled);
        assert_eq!(ev.metadata["old_start"], json!(at(10)));
        assert_eq!(ev.metadata["new_start"], json!(at(14)));
        assert_eq!(ev.metadata["reason"], json!("panelist sick"));
    }

    #[test]
    fn test_reschedule_rejects_bad_window_without_mutating() {
        let mut iv = interview();
        let result = iv.reschedule(Uuid::new_v4(), at(15), at(15) - Duration::minutes(30), None);
        assert!(result.is_err());
        assert_eq!(iv.reschedule_count, 0);
        assert_eq!(iv.scheduled_start, at(10));
    }

    #[test]
    fn test_cancel_carries_reason() {
        let mut iv = interview();
        let ev = iv.cancel(Uuid::new_v4(), Some("role closed".to_string())).unwrap();
        assert_eq!(ev.metadata["reason"], json!("role closed"));
        assert_eq!(ev.metadata["from"], json!("scheduled"));
    }

    #[test]
    fn test_status_round_trip_names() {
        for s in [
            InterviewStatus::Scheduled,
            InterviewStatus::InProgress,
            InterviewStatus::NoShow,
            InterviewStatus::Cancelled,
            InterviewStatus::Completed,
        ] {
            assert_eq!(InterviewStatus::from_str(s.as_str()), Some(s));
        }
    }

    #[test]
    fn test_scheduled_date_uses_offset() {
        let mut iv = interview();
        iv.scheduled_start = Utc.with_ymd_and_hms(2025, 3, 10, 23, 30, 0).unwrap();
        iv.scheduled_end = iv.scheduled_start + Duration::hours(1);
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(iv.scheduled_date(plus_two), NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(iv.scheduled_date(utc), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }
}
