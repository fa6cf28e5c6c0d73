//! Implementation of the `panelkit calibrate` command.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;

use crate::cli::context::AppServices;
use crate::cli::output::{list_table, output, render_list, CommandOutput};
use crate::cli::types::parse_period;
use crate::domain::models::{CalibrationReport, FeedbackAggregate, Period, RequestContext};

#[derive(Args, Debug)]
pub struct CalibrateArgs {
    /// Month to analyse (YYYY-MM)
    #[arg(long, short, value_parser = parse_period)]
    pub period: Period,

    /// Show the stored aggregates without recomputing them
    #[arg(long)]
    pub stored: bool,
}

#[derive(Debug, Serialize)]
pub struct CalibrationOutput {
    pub period: Period,
    #[serde(flatten)]
    pub report: CalibrationReport,
}

impl CommandOutput for CalibrationOutput {
    fn to_human(&self) -> String {
        let r = &self.report;
        if r.is_empty() {
            return format!("No feedback recorded for {}.", self.period);
        }
        let mut table = list_table(&["reviewer", "avg", "n", "diff from mean"]);
        for (row, bias) in r.per_reviewer.iter().zip(&r.bias_table) {
            table.add_row(vec![
                Cell::new(row.reviewer_id),
                Cell::new(format!("{:.2}", row.avg)),
                Cell::new(row.n),
                Cell::new(format!("{:+.2}", bias.avg_diff_from_mean)),
            ]);
        }
        format!(
            "Calibration for {}: mean {:.2}, sd {:.2}, icc proxy {:.2}\n{}",
            self.period,
            r.mean,
            r.sd,
            r.icc_proxy,
            render_list("reviewer", &table, r.reviewer_count)
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct AggregateListOutput(pub Vec<FeedbackAggregate>);

impl CommandOutput for AggregateListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["reviewer", "average", "submissions"]);
        for a in &self.0 {
            table.add_row(vec![
                Cell::new(a.reviewer_id),
                Cell::new(format!("{:.2}", a.average_score)),
                Cell::new(a.submission_count),
            ]);
        }
        render_list("aggregate", &table, self.0.len())
    }
}

pub async fn execute(args: CalibrateArgs, app: &AppServices, ctx: &RequestContext, json_mode: bool) -> Result<()> {
    if args.stored {
        let aggregates = app
            .calibration
            .stored_aggregates(ctx, args.period)
            .await
            .context("Failed to read stored aggregates")?;
        output(&AggregateListOutput(aggregates), json_mode);
        return Ok(());
    }

    let report = app
        .calibration
        .report(ctx, args.period)
        .await
        .with_context(|| format!("Failed to calibrate {}", args.period))?;
    output(
        &CalibrationOutput {
            period: args.period,
            report,
        },
        json_mode,
    );
    Ok(())
}
