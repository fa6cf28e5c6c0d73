use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project directory holding config, database and logs.
pub const PROJECT_DIR: &str = ".panelkit";

/// Prefix for environment overrides; `__` separates nested keys.
pub const ENV_PREFIX: &str = "PANELKIT_";

/// Largest UTC offset accepted for business hours, in minutes.
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid business hours: {0}:00-{1}:00. Start must be before end and end at most 24")]
    InvalidBusinessHours(u32, u32),

    #[error("Invalid UTC offset: {0} minutes. Must be within +/-{MAX_UTC_OFFSET_MINUTES}")]
    InvalidUtcOffset(i32),

    #[error("Invalid default_max_suggestions: {0}. Must be at least 1")]
    InvalidMaxSuggestions(usize),

    #[error("Invalid rating scale: min {0} must be finite and below max {1}")]
    InvalidRatingScale(f64, f64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Audit path cannot be empty when set")]
    EmptyAuditPath,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the project in the current directory.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. .panelkit/config.yaml (created by init)
    /// 3. .panelkit/local.yaml (optional local overrides)
    /// 4. PANELKIT_* environment variables
    pub fn load() -> Result<Config> {
        Self::load_from_dir(".")
    }

    /// Like [`ConfigLoader::load`], rooted at `root` instead of the current directory.
    pub fn load_from_dir(root: impl AsRef<Path>) -> Result<Config> {
        let project = root.as_ref().join(PROJECT_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(project.join("config.yaml")))
            .merge(Yaml::file(project.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file over the defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let scheduling = &config.scheduling;
        if scheduling.business_start_hour >= scheduling.business_end_hour || scheduling.business_end_hour > 24 {
            return Err(ConfigError::InvalidBusinessHours(
                scheduling.business_start_hour,
                scheduling.business_end_hour,
            ));
        }
        if scheduling.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::InvalidUtcOffset(scheduling.utc_offset_minutes));
        }
        if scheduling.default_max_suggestions == 0 {
            return Err(ConfigError::InvalidMaxSuggestions(scheduling.default_max_suggestions));
        }

        let feedback = &config.feedback;
        if !feedback.scale_min.is_finite() || !feedback.scale_max.is_finite() || feedback.scale_min >= feedback.scale_max {
            return Err(ConfigError::InvalidRatingScale(feedback.scale_min, feedback.scale_max));
        }

        if config.database.path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(config.database.max_connections));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if matches!(&config.audit.path, Some(path) if path.trim().is_empty()) {
            return Err(ConfigError::EmptyAuditPath);
        }

        Ok(())
    }

    /// Default config rendered as YAML, as written by `init`.
    pub fn default_yaml() -> Result<String> {
        serde_yaml::to_string(&Config::default()).context("Failed to render default configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::{FeedbackConfig, SchedulingConfig};
    use std::io::Write;

    fn write_project_file(root: &Path, name: &str, contents: &str) {
        let dir = root.join(PROJECT_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scheduling.business_start_hour, 9);
        assert_eq!(config.scheduling.business_end_hour, 17);
        assert_eq!(config.database.path, ".panelkit/panelkit.db");
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
scheduling:
  business_start_hour: 8
  business_end_hour: 18
  utc_offset_minutes: -300
  skip_weekends: true
feedback:
  scale_min: 0
  scale_max: 10
database:
  path: /custom/path.db
logging:
  level: debug
  format: json
";
        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.scheduling.business_start_hour, 8);
        assert_eq!(config.scheduling.utc_offset_minutes, -300);
        assert!(config.scheduling.skip_weekends);
        assert_eq!(config.scheduling.default_max_suggestions, 10);
        assert!((config.feedback.scale_max - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.database.path, "/custom/path.db");
        assert_eq!(config.database.max_connections, 5);
        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_business_hours() {
        let config = Config {
            scheduling: SchedulingConfig {
                business_start_hour: 17,
                business_end_hour: 9,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBusinessHours(17, 9))
        ));

        let config = Config {
            scheduling: SchedulingConfig {
                utc_offset_minutes: 15 * 60,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidUtcOffset(_))
        ));
    }

    #[test]
    fn test_validate_rating_scale() {
        let config = Config {
            feedback: FeedbackConfig {
                scale_min: 5.0,
                scale_max: 5.0,
            },
            ..Default::default()
        };
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRatingScale(_, _))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.database.path = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyDatabasePath)
        ));
    }

    #[test]
    fn test_hierarchical_merging() {
        let dir = tempfile::tempdir().unwrap();
        write_project_file(
            dir.path(),
            "config.yaml",
            "scheduling:\n  business_start_hour: 8\nlogging:\n  level: info\n  format: json\n",
        );
        write_project_file(dir.path(), "local.yaml", "logging:\n  level: debug\n");

        temp_env::with_vars_unset(["PANELKIT_LOGGING__LEVEL", "PANELKIT_SCHEDULING__SKIP_WEEKENDS"], || {
            let config = ConfigLoader::load_from_dir(dir.path()).unwrap();
            assert_eq!(config.logging.level, "debug", "Local override should win");
            assert_eq!(config.logging.format, "json", "Base value should persist");
            assert_eq!(config.scheduling.business_start_hour, 8);
        });
    }

    #[test]
    fn test_env_override() {
        let dir = tempfile::tempdir().unwrap();
        write_project_file(dir.path(), "config.yaml", "logging:\n  level: info\n");

        temp_env::with_vars(
            [
                ("PANELKIT_LOGGING__LEVEL", Some("warn")),
                ("PANELKIT_SCHEDULING__SKIP_WEEKENDS", Some("true")),
            ],
            || {
                let config = ConfigLoader::load_from_dir(dir.path()).unwrap();
                assert_eq!(config.logging.level, "warn");
                assert!(config.scheduling.skip_weekends);
            },
        );
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "scheduling:\n  business_end_hour: 30\n").unwrap();
        assert!(ConfigLoader::load_from_file(&path).is_err());
    }

    #[test]
    fn test_default_yaml_roundtrips() {
        let yaml = ConfigLoader::default_yaml().unwrap();
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        ConfigLoader::validate(&config).unwrap();
    }
}
