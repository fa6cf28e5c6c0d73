//! Panelkit CLI entry point.

use clap::Parser;

use panelkit::cli::{commands, handle_error, request_context, AppServices, Cli, Commands};
use panelkit::infrastructure::config::ConfigLoader;
use panelkit::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    // Held for the life of the process so buffered file logs are flushed.
    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    };

    if let Err(err) = run(cli.command, config, cli.tenant, cli.actor, cli.json).await {
        handle_error(err, cli.json);
    }
}

async fn run(
    command: Commands,
    config: panelkit::Config,
    tenant: Option<uuid::Uuid>,
    actor: Option<uuid::Uuid>,
    json: bool,
) -> anyhow::Result<()> {
    if let Commands::Init(args) = command {
        return commands::init::execute(args, json).await;
    }

    let ctx = request_context(tenant, actor)?;
    let app = AppServices::open(config).await?;

    match command {
        Commands::Init(_) => Ok(()),
        Commands::Slots(args) => commands::slots::execute(args, &app, &ctx, json).await,
        Commands::Interview(args) => commands::interview::execute(args, &app, &ctx, json).await,
        Commands::Feedback(args) => commands::feedback::execute(args, &app, &ctx, json).await,
        Commands::Load(args) => commands::load::execute(args, &app, &ctx, json).await,
        Commands::Calibrate(args) => commands::calibrate::execute(args, &app, &ctx, json).await,
    }
}
