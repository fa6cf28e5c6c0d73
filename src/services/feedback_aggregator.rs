//! Weighted scorecard aggregation.

use std::collections::{HashMap, HashSet};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{DimensionRating, RatingScale, ScorecardDimension};

/// Weight used for a rated dimension the tenant has not configured.
pub const DEFAULT_DIMENSION_WEIGHT: f64 = 1.0;

/// Pure scoring over dimension ratings.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackAggregator;

impl FeedbackAggregator {
    /// Weighted mean of `ratings`.
    ///
    /// Unknown dimensions weigh [`DEFAULT_DIMENSION_WEIGHT`]. A zero weight sum,
    /// including no ratings at all, scores `0.0`.
    pub fn score(ratings: &[DimensionRating], weights: &HashMap<String, f64>) -> f64 {
        let (weighted, total) = ratings.iter().fold((0.0, 0.0), |(weighted, total), r| {
            let weight = weights
                .get(&r.dimension_key)
                .copied()
                .unwrap_or(DEFAULT_DIMENSION_WEIGHT);
            (weighted + r.score * weight, total + weight)
        });

        if total == 0.0 {
            return 0.0;
        }
        weighted / total
    }

    /// Reject ratings that cannot be scored.
    pub fn validate(ratings: &[DimensionRating], scale: &RatingScale) -> DomainResult<()> {
        let mut seen = HashSet::new();
        for rating in ratings {
            if rating.dimension_key.trim().is_empty() {
                return Err(DomainError::validation("Dimension key cannot be empty"));
            }
            if !rating.score.is_finite() {
                return Err(DomainError::ValidationFailed(format!(
                    "Score for '{}' is not a finite number",
                    rating.dimension_key
                )));
            }
            if !scale.contains(rating.score) {
                return Err(DomainError::ValidationFailed(format!(
                    "Score {} for '{}' is outside the rating scale {}-{}",
                    rating.score, rating.dimension_key, scale.min, scale.max
                )));
            }
            if !seen.insert(rating.dimension_key.as_str()) {
                return Err(DomainError::ValidationFailed(format!(
                    "Dimension '{}' is rated more than once",
                    rating.dimension_key
                )));
            }
        }
        Ok(())
    }

    /// Weight lookup table for a tenant's dimensions.
    pub fn weight_map(dimensions: &[ScorecardDimension]) -> HashMap<String, f64> {
        dimensions
            .iter()
            .map(|d| (d.key.clone(), d.weight))
            .collect()
    }
}
