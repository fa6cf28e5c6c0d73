use serde::{Deserialize, Serialize};

use super::feedback::RatingScale;
use super::slot::BusinessHours;

/// Main configuration structure for panelkit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Slot search and booking configuration
    #[serde(default)]
    pub scheduling: SchedulingConfig,

    /// Feedback scoring configuration
    #[serde(default)]
    pub feedback: FeedbackConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Audit trail configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Slot search and booking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulingConfig {
    /// First hour (local) at which a slot may start
    #[serde(default = "default_business_start_hour")]
    pub business_start_hour: u32,

    /// Hour (local) by which every slot must have ended
    #[serde(default = "default_business_end_hour")]
    pub business_end_hour: u32,

    /// Offset of local business time from UTC, in minutes
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Skip Saturdays and Sundays when enumerating slots
    #[serde(default)]
    pub skip_weekends: bool,

    /// Suggestions returned when the caller does not ask for a count
    #[serde(default = "default_max_suggestions")]
    pub default_max_suggestions: usize,

    /// Refuse to book or move an interview onto a panelist's existing booking
    #[serde(default)]
    pub reject_conflicting_bookings: bool,
}

const fn default_business_start_hour() -> u32 {
    9
}

const fn default_business_end_hour() -> u32 {
    17
}

const fn default_max_suggestions() -> usize {
    10
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            business_start_hour: default_business_start_hour(),
            business_end_hour: default_business_end_hour(),
            utc_offset_minutes: 0,
            skip_weekends: false,
            default_max_suggestions: default_max_suggestions(),
            reject_conflicting_bookings: false,
        }
    }
}

impl SchedulingConfig {
    pub fn business_hours(&self) -> BusinessHours {
        BusinessHours {
            start_hour: self.business_start_hour,
            end_hour: self.business_end_hour,
            utc_offset_minutes: self.utc_offset_minutes,
            skip_weekends: self.skip_weekends,
        }
    }
}

/// Feedback scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeedbackConfig {
    /// Lowest accepted raw rating
    #[serde(default = "default_scale_min")]
    pub scale_min: f64,

    /// Highest accepted raw rating
    #[serde(default = "default_scale_max")]
    pub scale_max: f64,
}

const fn default_scale_min() -> f64 {
    1.0
}

const fn default_scale_max() -> f64 {
    5.0
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            scale_min: default_scale_min(),
            scale_max: default_scale_max(),
        }
    }
}

impl FeedbackConfig {
    pub fn rating_scale(&self) -> RatingScale {
        RatingScale {
            min: self.scale_min,
            max: self.scale_max,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".panelkit/panelkit.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}

/// Audit trail configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AuditConfig {
    /// JSON-lines file receiving audit entries; audit is disabled when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}
