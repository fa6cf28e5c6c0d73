//! Scorecard dimensions and reviewer feedback submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// A rating dimension and how much it contributes to the aggregate score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardDimension {
    pub tenant_id: Uuid,
    pub key: String,
    /// Never negative.
    pub weight: f64,
}

impl ScorecardDimension {
    pub fn new(tenant_id: Uuid, key: impl Into<String>, weight: f64) -> DomainResult<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(DomainError::validation("Dimension key cannot be empty"));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(DomainError::ValidationFailed(format!(
                "Dimension '{key}' weight must be a finite, non-negative number (got {weight})"
            )));
        }
        Ok(Self { tenant_id, key, weight })
    }
}

/// A reviewer's overall hiring recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongYes,
    Yes,
    LeanYes,
    No,
    StrongNo,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongYes => "strong_yes",
            Self::Yes => "yes",
            Self::LeanYes => "lean_yes",
            Self::No => "no",
            Self::StrongNo => "strong_no",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "strong_yes" => Some(Self::StrongYes),
            "yes" => Some(Self::Yes),
            "lean_yes" => Some(Self::LeanYes),
            "no" => Some(Self::No),
            "strong_no" => Some(Self::StrongNo),
            _ => None,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Self::StrongYes | Self::Yes | Self::LeanYes)
    }
}

/// One dimension rating within a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionRating {
    pub dimension_key: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DimensionRating {
    pub fn new(dimension_key: impl Into<String>, score: f64) -> Self {
        Self {
            dimension_key: dimension_key.into(),
            score,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Inclusive bounds every raw rating must fall within.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: f64,
    pub max: f64,
}

impl Default for RatingScale {
    fn default() -> Self {
        Self { min: 1.0, max: 5.0 }
    }
}

impl RatingScale {
    pub fn contains(&self, score: f64) -> bool {
        score.is_finite() && score >= self.min && score <= self.max
    }
}

/// A reviewer's feedback for one interview. Unique per (interview, reviewer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub interview_id: Uuid,
    pub reviewer_id: Uuid,
    pub ratings: Vec<DimensionRating>,
    pub recommendation: Recommendation,
    /// Weighted mean of `ratings`, computed at submission time.
    pub aggregate_score: f64,
    pub submitted_at: DateTime<Utc>,
}

/// Caller input for a feedback submission, before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackDraft {
    pub interview_id: Uuid,
    pub reviewer_id: Uuid,
    pub ratings: Vec<DimensionRating>,
    pub recommendation: Recommendation,
}

impl FeedbackDraft {
    pub fn new(interview_id: Uuid, reviewer_id: Uuid, recommendation: Recommendation) -> Self {
        Self {
            interview_id,
            reviewer_id,
            ratings: Vec::new(),
            recommendation,
        }
    }

    pub fn with_rating(mut self, dimension_key: impl Into<String>, score: f64) -> Self {
        self.ratings.push(DimensionRating::new(dimension_key, score));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_rejects_negative_weight() {
        let tenant = Uuid::new_v4();
        assert!(ScorecardDimension::new(tenant, "coding", 2.0).is_ok());
        assert!(ScorecardDimension::new(tenant, "coding", 0.0).is_ok());
        assert!(ScorecardDimension::new(tenant, "coding", -0.5).is_err());
        assert!(ScorecardDimension::new(tenant, "coding", f64::NAN).is_err());
        assert!(ScorecardDimension::new(tenant, "  ", 1.0).is_err());
    }

    #[test]
    fn test_recommendation_parsing() {
        assert_eq!(Recommendation::from_str("strong-yes"), Some(Recommendation::StrongYes));
        assert_eq!(Recommendation::from_str("LEAN_YES"), Some(Recommendation::LeanYes));
        assert_eq!(Recommendation::from_str("maybe"), None);
        assert!(!Recommendation::No.is_positive());
    }

    #[test]
    fn test_rating_scale_bounds() {
        let scale = RatingScale::default();
        assert!(scale.contains(1.0));
        assert!(scale.contains(5.0));
        assert!(!scale.contains(0.5));
        assert!(!scale.contains(5.5));
        assert!(!scale.contains(f64::INFINITY));
    }
}
