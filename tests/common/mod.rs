//! Common test utilities for integration tests
//!
//! Builds the full service graph over either the in-memory or the SQLite
//! adapters, so the same flows can run against both.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use panelkit::adapters::memory::{
    InMemoryAuditSink, InMemoryFeedbackRepository, InMemoryInterviewRepository, InMemoryLoadRepository,
};
use panelkit::adapters::sqlite::{
    create_migrated_test_pool, SqliteFeedbackRepository, SqliteInterviewRepository, SqliteLoadRepository,
};
use panelkit::domain::models::{Interview, PanelMember, RatingScale, RequestContext, SchedulingConfig};
use panelkit::domain::ports::{FeedbackRepository, InterviewRepository, LoadRepository, NullCalendarProvider};
use panelkit::services::{CalibrationService, FeedbackService, InterviewLifecycle, LoadTracker};
use uuid::Uuid;

pub type Lifecycle = InterviewLifecycle<dyn InterviewRepository, dyn LoadRepository>;
pub type Feedback = FeedbackService<dyn InterviewRepository, dyn FeedbackRepository, dyn LoadRepository>;
pub type Calibration = CalibrationService<dyn FeedbackRepository>;

pub struct Harness {
    pub lifecycle: Lifecycle,
    pub feedback: Feedback,
    pub calibration: Calibration,
    pub loads: LoadTracker<dyn LoadRepository>,
    pub audit: Arc<InMemoryAuditSink>,
    pub ctx: RequestContext,
}

impl Harness {
    pub fn memory() -> Self {
        Self::memory_with(SchedulingConfig::default())
    }

    pub fn memory_with(config: SchedulingConfig) -> Self {
        Self::build(
            Arc::new(InMemoryInterviewRepository::new()),
            Arc::new(InMemoryFeedbackRepository::new()),
            Arc::new(InMemoryLoadRepository::new()),
            config,
        )
    }

    pub async fn sqlite() -> Self {
        let pool = create_migrated_test_pool()
            .await
            .expect("Failed to create test database");
        Self::build(
            Arc::new(SqliteInterviewRepository::new(pool.clone())),
            Arc::new(SqliteFeedbackRepository::new(pool.clone())),
            Arc::new(SqliteLoadRepository::new(pool)),
            SchedulingConfig::default(),
        )
    }

    fn build(
        interviews: Arc<dyn InterviewRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        loads: Arc<dyn LoadRepository>,
        config: SchedulingConfig,
    ) -> Self {
        let audit = Arc::new(InMemoryAuditSink::new());
        let offset = config.business_hours().offset();
        let lifecycle = InterviewLifecycle::new(
            interviews.clone(),
            loads.clone(),
            feedback.clone(),
            audit.clone(),
            Arc::new(NullCalendarProvider::new()),
            config,
        );
        let feedback_service = FeedbackService::new(
            interviews,
            feedback.clone(),
            loads.clone(),
            audit.clone(),
            RatingScale::default(),
            offset,
        );
        Self {
            lifecycle,
            feedback: feedback_service,
            calibration: CalibrationService::new(feedback, audit.clone()),
            loads: LoadTracker::new(loads),
            audit,
            ctx: RequestContext::new(Uuid::new_v4(), Uuid::new_v4()),
        }
    }

    /// An unsaved interview for this harness's tenant.
    pub fn interview(&self, start: DateTime<Utc>, minutes: i64, panel: &[Uuid]) -> Interview {
        Interview::new(
            self.ctx.tenant_id,
            Uuid::new_v4(),
            start,
            start + Duration::minutes(minutes),
            panel.iter().copied().map(PanelMember::interviewer).collect(),
        )
    }
}

/// Monday 2025-03-10 at `hour`:`minute` UTC.
pub fn monday_at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
}

pub fn panelists(n: usize) -> Vec<Uuid> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

/// Initializes a tracing subscriber for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
