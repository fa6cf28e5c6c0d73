//! Domain layer for panelkit.
//!
//! Core models, the error type, and the port traits that adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
