//! Cross-reviewer calibration statistics.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::models::{
    CalibrationReport, FeedbackAggregate, FeedbackSubmission, Period, ReviewerBias, ReviewerCalibration,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct CalibrationAnalyzer;

impl CalibrationAnalyzer {
    /// Summarize how reviewers' average scores spread around the population mean.
    ///
    /// Rows with no submissions are ignored. Variance is the population
    /// variance of the reviewer averages. With no usable rows the report is
    /// empty and every statistic is zero.
    pub fn calibrate(aggregates: &[FeedbackAggregate]) -> CalibrationReport {
        let rows: Vec<&FeedbackAggregate> = aggregates.iter().filter(|a| a.submission_count > 0).collect();
        if rows.is_empty() {
            return CalibrationReport::default();
        }

        let n = rows.len() as f64;
        let mean = rows.iter().map(|a| a.average_score).sum::<f64>() / n;
        let variance = rows
            .iter()
            .map(|a| (a.average_score - mean).powi(2))
            .sum::<f64>()
            / n;
        let sd = variance.sqrt();
        let icc_proxy = if mean == 0.0 { 0.0 } else { 1.0 - sd / mean };

        let per_reviewer = rows
            .iter()
            .map(|a| ReviewerCalibration {
                reviewer_id: a.reviewer_id,
                avg: a.average_score,
                sd,
                n: a.submission_count,
            })
            .collect();
        let bias_table = rows
            .iter()
            .map(|a| ReviewerBias {
                reviewer_id: a.reviewer_id,
                avg_diff_from_mean: a.average_score - mean,
            })
            .collect();

        CalibrationReport {
            reviewer_count: rows.len(),
            mean,
            variance,
            sd,
            icc_proxy,
            per_reviewer,
            bias_table,
        }
    }

    /// Per-reviewer averages of the submissions that fall inside `period`,
    /// in order of each reviewer's first submission.
    pub fn aggregate_period(
        tenant_id: Uuid,
        submissions: &[FeedbackSubmission],
        period: Period,
    ) -> Vec<FeedbackAggregate> {
        let mut order: Vec<Uuid> = Vec::new();
        let mut totals: HashMap<Uuid, (f64, u32)> = HashMap::new();

        for s in submissions
            .iter()
            .filter(|s| s.tenant_id == tenant_id && period.contains(s.submitted_at))
        {
            let entry = totals.entry(s.reviewer_id).or_insert_with(|| {
                order.push(s.reviewer_id);
                (0.0, 0)
            });
            entry.0 += s.aggregate_score;
            entry.1 += 1;
        }

        order
            .into_iter()
            .filter_map(|reviewer_id| {
                let (sum, count) = totals.get(&reviewer_id).copied()?;
                Some(FeedbackAggregate {
                    tenant_id,
                    reviewer_id,
                    period,
                    average_score: sum / f64::from(count),
                    submission_count: count,
                })
            })
            .collect()
    }
}
