//! Panelkit - interview scheduling and reviewer calibration
//!
//! Panelkit finds interview slots for a panel, drives each interview through
//! its lifecycle, scores reviewer feedback against weighted scorecards and
//! reports how consistently reviewers score over a month.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and the repository/collaborator ports
//! - **Service Layer** (`services`): Slot search, lifecycle, load, feedback and calibration logic
//! - **Adapters** (`adapters`): In-memory and SQLite implementations of the ports
//! - **Infrastructure Layer** (`infrastructure`): Configuration, logging and the audit file
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use panelkit::adapters::memory::{
//!     InMemoryFeedbackRepository, InMemoryInterviewRepository, InMemoryLoadRepository,
//! };
//! use panelkit::domain::ports::{NullAuditSink, NullCalendarProvider};
//! use panelkit::services::InterviewLifecycle;
//!
//! let lifecycle = InterviewLifecycle::new(
//!     Arc::new(InMemoryInterviewRepository::new()),
//!     Arc::new(InMemoryLoadRepository::new()),
//!     Arc::new(InMemoryFeedbackRepository::new()),
//!     Arc::new(NullAuditSink::new()),
//!     Arc::new(NullCalendarProvider::new()),
//!     Default::default(),
//! );
//! let slots = lifecycle.suggest_slots(&ctx, &request).await?;
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    CalibrationReport, Config, FeedbackDraft, FeedbackSubmission, Interview, InterviewStatus, Period,
    RequestContext, SlotCandidate, SlotRequest,
};
pub use domain::ports::{AuditSink, CalendarProvider, FeedbackRepository, InterviewRepository, LoadRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{CalibrationService, FeedbackService, InterviewLifecycle, LoadTracker};
