//! Domain errors for the panelkit scheduling and calibration engine.

use thiserror::Error;
use uuid::Uuid;

/// Format a list of ids as a comma separated string.
fn format_ids(ids: &[Uuid]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Domain-level errors that can occur in panelkit.
///
/// Degenerate aggregations (zero weight sum, zero reviewers) are not errors;
/// they resolve to zero/empty results.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition { from: String, to: String, reason: String },

    #[error("Interview not found: {0}")]
    InterviewNotFound(Uuid),

    #[error("Tenant mismatch: expected {expected}, got {actual}")]
    TenantMismatch { expected: Uuid, actual: Uuid },

    #[error("Reviewer {reviewer_id} is not on the panel of interview {interview_id}")]
    ReviewerNotOnPanel { interview_id: Uuid, reviewer_id: Uuid },

    #[error("Scheduling conflict for panelists: {}", format_ids(.0))]
    SchedulingConflict(Vec<Uuid>),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An audit or calendar collaborator failed. Logged by callers, never propagated.
    #[error("Collaborator failed: {0}")]
    CollaboratorFailed(String),
}

impl DomainError {
    /// Shorthand for a validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationFailed(msg.into())
    }

    /// Whether this error was caused by caller input rather than state or storage.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_lists_panelists() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let msg = DomainError::SchedulingConflict(vec![a, b]).to_string();
        assert!(msg.contains(&a.to_string()));
        assert!(msg.contains(&b.to_string()));
    }

    #[test]
    fn test_is_validation() {
        assert!(DomainError::validation("bad").is_validation());
        assert!(!DomainError::InterviewNotFound(Uuid::nil()).is_validation());
    }
}
