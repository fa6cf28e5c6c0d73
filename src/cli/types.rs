//! CLI type definitions
//!
//! Top-level clap structures. Each command's arguments live next to its
//! implementation under [`crate::cli::commands`].

use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::cli::commands::{
    calibrate::CalibrateArgs, feedback::FeedbackArgs, init::InitArgs, interview::InterviewArgs, load::LoadArgs,
    slots::SlotsArgs,
};
use crate::domain::models::{DimensionRating, Period};

#[derive(Parser, Debug)]
#[command(name = "panelkit")]
#[command(about = "Panelkit - interview scheduling and reviewer calibration", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Tenant the command acts on
    #[arg(long, global = true, env = "PANELKIT_TENANT")]
    pub tenant: Option<Uuid>,

    /// User performing the command
    #[arg(long, global = true, env = "PANELKIT_ACTOR")]
    pub actor: Option<Uuid>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize panelkit configuration and database
    Init(InitArgs),

    /// Find open interview slots for a panel
    Slots(SlotsArgs),

    /// Interview lifecycle commands
    Interview(InterviewArgs),

    /// Feedback and scorecard commands
    Feedback(FeedbackArgs),

    /// Interviewer load commands
    Load(LoadArgs),

    /// Recompute aggregates and report reviewer calibration for a month
    Calibrate(CalibrateArgs),
}

/// Parse `key=score` into a dimension rating.
pub fn parse_rating(s: &str) -> Result<DimensionRating, String> {
    let (key, score) = s
        .split_once('=')
        .ok_or_else(|| format!("rating '{s}' must be formatted KEY=SCORE"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("rating '{s}' has an empty dimension key"));
    }
    let score: f64 = score
        .trim()
        .parse()
        .map_err(|_| format!("rating '{s}' has a non-numeric score"))?;
    Ok(DimensionRating::new(key, score))
}

pub fn parse_period(s: &str) -> Result<Period, String> {
    Period::parse(s).map_err(|e| e.to_string())
}
