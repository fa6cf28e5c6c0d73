pub mod audit;
pub mod calibration;
pub mod config;
pub mod context;
pub mod feedback;
pub mod interview;
pub mod interview_event;
pub mod load;
pub mod slot;

pub use audit::{AuditAction, AuditEntry};
pub use calibration::{
    CalibrationReport, FeedbackAggregate, Period, ReviewerBias, ReviewerCalibration,
};
pub use config::{
    AuditConfig, Config, DatabaseConfig, FeedbackConfig, LoggingConfig, SchedulingConfig,
};
pub use context::RequestContext;
pub use feedback::{
    DimensionRating, FeedbackDraft, FeedbackSubmission, RatingScale, Recommendation,
    ScorecardDimension,
};
pub use interview::{Interview, InterviewMode, InterviewStatus, PanelMember, PanelRole};
pub use interview_event::{InterviewEvent, InterviewEventType};
pub use load::{InterviewerLoad, LoadDelta};
pub use slot::{BusinessHours, SlotCandidate, SlotRequest, CONFLICT_PENALTY, PERFECT_SLOT_SCORE};
