//! Application services.
//!
//! The analyzers here are pure functions over caller-supplied snapshots. The
//! `*Service` and lifecycle types are async only because their ports are.

pub mod calibration_analyzer;
pub mod calibration_service;
pub mod conflict_detector;
pub mod feedback_aggregator;
pub mod feedback_service;
pub mod interview_lifecycle;
pub mod load_tracker;
pub mod slot_finder;

pub use calibration_analyzer::CalibrationAnalyzer;
pub use calibration_service::CalibrationService;
pub use conflict_detector::{overlaps, ConflictDetector};
pub use feedback_aggregator::{FeedbackAggregator, DEFAULT_DIMENSION_WEIGHT};
pub use feedback_service::FeedbackService;
pub use interview_lifecycle::InterviewLifecycle;
pub use load_tracker::{LoadDeltas, LoadTracker};
pub use slot_finder::{find_slots, SlotFinder};
