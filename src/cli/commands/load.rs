//! Implementation of the `panelkit load` commands.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use comfy_table::Cell;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::context::AppServices;
use crate::cli::output::{list_table, output, render_list, CommandOutput};
use crate::domain::models::{InterviewerLoad, RequestContext};

#[derive(Args, Debug)]
pub struct LoadArgs {
    #[command(subcommand)]
    pub command: LoadCommand,
}

#[derive(Subcommand, Debug)]
pub enum LoadCommand {
    /// Show a panelist's counters for one day
    Show {
        panelist: Uuid,

        /// Local business date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show a panelist's stored counters over a date range
    History {
        panelist: Uuid,

        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,
    },
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct LoadOutput(pub Vec<InterviewerLoad>);

impl CommandOutput for LoadOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["date", "scheduled", "pending feedback"]);
        for load in &self.0 {
            table.add_row(vec![
                Cell::new(load.date),
                Cell::new(load.scheduled_count),
                Cell::new(load.pending_feedback_count),
            ]);
        }
        render_list("load row", &table, self.0.len())
    }
}

pub async fn execute(args: LoadArgs, app: &AppServices, ctx: &RequestContext, json_mode: bool) -> Result<()> {
    let rows = match args.command {
        LoadCommand::Show { panelist, date } => {
            let offset = app.config.scheduling.business_hours().offset();
            let date = date.unwrap_or_else(|| Utc::now().with_timezone(&offset).date_naive());
            let load = app
                .loads
                .load_for(ctx, panelist, date)
                .await
                .context("Failed to read interviewer load")?;
            vec![load]
        }
        LoadCommand::History { panelist, from, to } => app
            .loads
            .history(ctx, panelist, from, to)
            .await
            .context("Failed to read interviewer load history")?,
    };
    output(&LoadOutput(rows), json_mode);
    Ok(())
}
