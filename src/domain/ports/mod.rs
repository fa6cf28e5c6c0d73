//! Port trait definitions (hexagonal architecture).
//!
//! Persistence ports are implemented by the in-memory and SQLite adapters.
//! The audit and calendar ports are collaborators whose failures never undo
//! the operation that triggered them.

pub mod audit_sink;
pub mod calendar_provider;
pub mod feedback_repository;
pub mod interview_repository;
pub mod load_repository;
pub mod null_collaborators;

pub use audit_sink::AuditSink;
pub use calendar_provider::CalendarProvider;
pub use feedback_repository::FeedbackRepository;
pub use interview_repository::{InterviewFilter, InterviewRepository};
pub use load_repository::LoadRepository;
pub use null_collaborators::{NullAuditSink, NullCalendarProvider};
