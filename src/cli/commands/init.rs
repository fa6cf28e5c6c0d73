//! Implementation of the `panelkit init` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tokio::fs;

use crate::adapters::sqlite::initialize_database;
use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::config::{ConfigLoader, PROJECT_DIR};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config.yaml with the defaults
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub directories_created: Vec<String>,
    pub config_written: bool,
    pub database_path: PathBuf,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if !self.directories_created.is_empty() {
            lines.push("\nCreated directories:".to_string());
            for dir in &self.directories_created {
                lines.push(format!("  - {dir}"));
            }
        }
        if self.config_written {
            lines.push(format!("\nWrote default configuration to {PROJECT_DIR}/config.yaml"));
        }
        lines.push(format!("\nDatabase ready at {}", self.database_path.display()));
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let project_dir = target_path.join(PROJECT_DIR);
    let already_initialized = project_dir.exists();

    let mut directories_created = vec![];
    for dir in [project_dir.clone(), project_dir.join("logs")] {
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            directories_created.push(relative_to(&dir, &target_path));
        }
    }

    let config_path = project_dir.join("config.yaml");
    let config_written = if args.force || !config_path.exists() {
        let yaml = ConfigLoader::default_yaml()?;
        fs::write(&config_path, yaml)
            .await
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        true
    } else {
        false
    };

    let config = ConfigLoader::load_from_dir(&target_path)?;
    let configured = PathBuf::from(&config.database.path);
    let database_path = if configured.is_absolute() {
        configured
    } else {
        target_path.join(configured)
    };
    let db_url = format!("sqlite:{}", database_path.display());
    let pool = initialize_database(&db_url, None)
        .await
        .context("Failed to initialize database")?;
    pool.close().await;

    let message = if already_initialized {
        "Project already initialized; configuration and schema are up to date."
    } else {
        "Project initialized successfully."
    };

    output(
        &InitOutput {
            success: true,
            message: message.to_string(),
            initialized_path: target_path,
            directories_created,
            config_written,
            database_path,
        },
        json_mode,
    );
    Ok(())
}

fn relative_to(path: &Path, base: &Path) -> String {
    path.strip_prefix(base).unwrap_or(path).to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_creates_project_layout() {
        let dir = tempfile::tempdir().unwrap();
        let args = InitArgs {
            force: false,
            path: dir.path().to_path_buf(),
        };

        execute(args, true).await.unwrap();

        let project = dir.path().join(PROJECT_DIR);
        assert!(project.join("config.yaml").exists());
        assert!(project.join("logs").is_dir());
        assert!(project.join("panelkit.db").exists());
    }
}
