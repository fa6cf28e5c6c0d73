//! Infrastructure layer
//!
//! Configuration loading, logging setup and the file-backed audit sink.

pub mod config;
pub mod logging;
