//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber, with optional
//! rolling JSON log files, plus the JSON-lines audit trail.

pub mod audit;
pub mod config;
pub mod logger;

pub use audit::JsonlAuditSink;
pub use config::{LogConfig, LogFormat, RotationPolicy};
pub use logger::LoggerImpl;
