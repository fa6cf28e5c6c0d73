//! Period aggregation and calibration reporting.
//!
//! Aggregates are a disposable projection of the submissions in a period:
//! every recompute replaces what was stored.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{AuditAction, AuditEntry, CalibrationReport, FeedbackAggregate, Period, RequestContext};
use crate::domain::ports::{AuditSink, FeedbackRepository};
use crate::services::calibration_analyzer::CalibrationAnalyzer;

pub struct CalibrationService<F: FeedbackRepository + ?Sized> {
    feedback: Arc<F>,
    audit: Arc<dyn AuditSink>,
}

impl<F: FeedbackRepository + ?Sized> CalibrationService<F> {
    pub fn new(feedback: Arc<F>, audit: Arc<dyn AuditSink>) -> Self {
        Self { feedback, audit }
    }

    /// Rebuild and store the per-reviewer aggregates for `period`.
    #[instrument(skip(self, ctx), fields(tenant_id = %ctx.tenant_id, period = %period))]
    pub async fn recompute_period(&self, ctx: &RequestContext, period: Period) -> DomainResult<Vec<FeedbackAggregate>> {
        let submissions = self
            .feedback
            .list_submissions(ctx.tenant_id, period.start(), period.end())
            .await?;
        let aggregates = CalibrationAnalyzer::aggregate_period(ctx.tenant_id, &submissions, period);
        self.feedback
            .replace_aggregates(ctx.tenant_id, period, &aggregates)
            .await?;

        info!(
            submissions = submissions.len(),
            reviewers = aggregates.len(),
            "Feedback aggregates recomputed"
        );

        let entry = AuditEntry::new(
            ctx,
            AuditAction::AggregatesRecomputed,
            None,
            json!({ "period": period.to_string(), "reviewers": aggregates.len() }),
        );
        if let Err(e) = self.audit.record(entry).await {
            warn!(error = %e, "Audit sink failed");
        }

        Ok(aggregates)
    }

    /// Recompute `period` and summarize reviewer calibration over it.
    pub async fn report(&self, ctx: &RequestContext, period: Period) -> DomainResult<CalibrationReport> {
        let aggregates = self.recompute_period(ctx, period).await?;
        Ok(CalibrationAnalyzer::calibrate(&aggregates))
    }

    /// Aggregates as last stored, without recomputing.
    pub async fn stored_aggregates(&self, ctx: &RequestContext, period: Period) -> DomainResult<Vec<FeedbackAggregate>> {
        self.feedback.list_aggregates(ctx.tenant_id, period).await
    }
}
