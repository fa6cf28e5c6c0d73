//! In-memory adapters.
//!
//! Backed by `tokio::sync::RwLock`; used by tests, fixtures, and anywhere a
//! database is not wanted.

mod audit_sink;
mod feedback_repository;
mod interview_repository;
mod load_repository;

pub use audit_sink::InMemoryAuditSink;
pub use feedback_repository::InMemoryFeedbackRepository;
pub use interview_repository::InMemoryInterviewRepository;
pub use load_repository::InMemoryLoadRepository;
