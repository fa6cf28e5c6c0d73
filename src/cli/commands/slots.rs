//! Implementation of the `panelkit slots` command.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::context::AppServices;
use crate::cli::output::{format_instant, list_table, output, render_list, short_id, CommandOutput};
use crate::domain::models::{RequestContext, SlotCandidate, SlotRequest};

#[derive(Args, Debug)]
pub struct SlotsArgs {
    /// Panelists who must attend (comma-separated or repeated)
    #[arg(long = "panelist", short, required = true, value_delimiter = ',')]
    pub panelists: Vec<Uuid>,

    /// Interview length in minutes
    #[arg(long, short, default_value = "60")]
    pub duration: i64,

    /// Start of the search range (RFC 3339)
    #[arg(long)]
    pub from: DateTime<Utc>,

    /// End of the search range (RFC 3339)
    #[arg(long)]
    pub to: DateTime<Utc>,

    /// Maximum suggestions; defaults to the configured value
    #[arg(long, short)]
    pub max: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SlotsOutput {
    pub slots: Vec<SlotCandidate>,
}

impl CommandOutput for SlotsOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["start", "end", "score", "conflicts"]);
        for slot in &self.slots {
            let conflicts = slot.conflicts.iter().map(short_id).collect::<Vec<_>>().join(", ");
            table.add_row(vec![
                Cell::new(format_instant(&slot.start)),
                Cell::new(format_instant(&slot.end)),
                Cell::new(slot.score),
                Cell::new(if conflicts.is_empty() { "-".to_string() } else { conflicts }),
            ]);
        }
        render_list("slot", &table, self.slots.len())
    }
}

pub async fn execute(args: SlotsArgs, app: &AppServices, ctx: &RequestContext, json_mode: bool) -> Result<()> {
    let max = args
        .max
        .unwrap_or(app.config.scheduling.default_max_suggestions);
    let request = SlotRequest::new(args.panelists, args.duration, args.from, args.to).with_max_suggestions(max);

    let slots = app
        .lifecycle
        .suggest_slots(ctx, &request)
        .await
        .context("Failed to search for slots")?;

    output(&SlotsOutput { slots }, json_mode);
    Ok(())
}
