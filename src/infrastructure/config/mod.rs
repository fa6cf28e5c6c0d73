//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment: defaults, project YAML files,
//! then `PANELKIT_*` environment overrides, validated after merging.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, ENV_PREFIX, PROJECT_DIR};
