//! Service wiring for CLI commands.

use std::sync::Arc;

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::adapters::sqlite::{
    initialize_from_config, SqliteFeedbackRepository, SqliteInterviewRepository, SqliteLoadRepository,
};
use crate::domain::models::{Config, RequestContext};
use crate::domain::ports::{AuditSink, CalendarProvider, NullAuditSink, NullCalendarProvider};
use crate::infrastructure::logging::JsonlAuditSink;
use crate::services::{CalibrationService, FeedbackService, InterviewLifecycle, LoadTracker};

pub type Lifecycle = InterviewLifecycle<SqliteInterviewRepository, SqliteLoadRepository>;
pub type Feedback = FeedbackService<SqliteInterviewRepository, SqliteFeedbackRepository, SqliteLoadRepository>;
pub type Calibration = CalibrationService<SqliteFeedbackRepository>;

/// Services backed by the project's SQLite database.
pub struct AppServices {
    pub config: Config,
    pub lifecycle: Lifecycle,
    pub feedback: Feedback,
    pub calibration: Calibration,
    pub loads: LoadTracker<SqliteLoadRepository>,
}

impl AppServices {
    /// Open (and migrate) the configured database and wire every service over it.
    pub async fn open(config: Config) -> Result<Self> {
        let pool = initialize_from_config(&config.database)
            .await
            .with_context(|| format!("Failed to open database at {}", config.database.path))?;

        let interviews = Arc::new(SqliteInterviewRepository::new(pool.clone()));
        let feedback = Arc::new(SqliteFeedbackRepository::new(pool.clone()));
        let loads = Arc::new(SqliteLoadRepository::new(pool));

        let audit: Arc<dyn AuditSink> = match &config.audit.path {
            Some(path) => Arc::new(
                JsonlAuditSink::new(path)
                    .await
                    .context("Failed to open audit log")?,
            ),
            None => Arc::new(NullAuditSink::new()),
        };
        let calendar: Arc<dyn CalendarProvider> = Arc::new(NullCalendarProvider::new());

        let lifecycle = InterviewLifecycle::new(
            interviews.clone(),
            loads.clone(),
            feedback.clone(),
            audit.clone(),
            calendar,
            config.scheduling.clone(),
        );
        let feedback_service = FeedbackService::new(
            interviews,
            feedback.clone(),
            loads.clone(),
            audit.clone(),
            config.feedback.rating_scale(),
            config.scheduling.business_hours().offset(),
        );
        let calibration = CalibrationService::new(feedback, audit);

        Ok(Self {
            config,
            lifecycle,
            feedback: feedback_service,
            calibration,
            loads: LoadTracker::new(loads),
        })
    }
}

/// Resolve the tenant and actor every tenant-scoped command needs.
pub fn request_context(tenant: Option<Uuid>, actor: Option<Uuid>) -> Result<RequestContext> {
    let tenant_id = tenant.context("A tenant is required: pass --tenant or set PANELKIT_TENANT")?;
    let actor_id = actor.context("An actor is required: pass --actor or set PANELKIT_ACTOR")?;
    Ok(RequestContext::new(tenant_id, actor_id))
}
