//! Implementation of the `panelkit feedback` commands.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use comfy_table::Cell;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::context::AppServices;
use crate::cli::output::{format_instant, list_table, output, render_list, short_id, CommandOutput};
use crate::cli::types::parse_rating;
use crate::domain::models::{
    DimensionRating, FeedbackDraft, FeedbackSubmission, Recommendation, RequestContext, ScorecardDimension,
};

#[derive(Args, Debug)]
pub struct FeedbackArgs {
    #[command(subcommand)]
    pub command: FeedbackCommand,
}

#[derive(Subcommand, Debug)]
pub enum FeedbackCommand {
    /// Submit (or replace) a reviewer's feedback for an interview
    Submit {
        interview_id: Uuid,

        /// Reviewer on the panel; defaults to the acting user
        #[arg(long)]
        reviewer: Option<Uuid>,

        /// strong_yes, yes, lean_yes, no or strong_no
        #[arg(long, short)]
        recommendation: String,

        /// Dimension rating as KEY=SCORE (repeatable)
        #[arg(long = "rating", short = 'r', required = true, value_parser = parse_rating)]
        ratings: Vec<DimensionRating>,
    },

    /// List submissions for an interview
    List { interview_id: Uuid },

    /// Scorecard dimension commands
    Dimension {
        #[command(subcommand)]
        command: DimensionCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum DimensionCommand {
    /// Create or reweight a dimension
    Set { key: String, weight: f64 },

    /// List the tenant's dimensions
    List,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct SubmissionOutput(pub FeedbackSubmission);

impl CommandOutput for SubmissionOutput {
    fn to_human(&self) -> String {
        let s = &self.0;
        let mut lines = vec![
            "Feedback recorded:".to_string(),
            format!("  ID: {}", s.id),
            format!("  Interview: {}", s.interview_id),
            format!("  Reviewer: {}", s.reviewer_id),
            format!("  Recommendation: {}", s.recommendation.as_str()),
            format!("  Aggregate score: {:.2}", s.aggregate_score),
        ];
        for rating in &s.ratings {
            lines.push(format!("    {} = {}", rating.dimension_key, rating.score));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct SubmissionListOutput(pub Vec<FeedbackSubmission>);

impl CommandOutput for SubmissionListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["reviewer", "recommendation", "score", "submitted"]);
        for s in &self.0 {
            table.add_row(vec![
                Cell::new(short_id(&s.reviewer_id)),
                Cell::new(s.recommendation.as_str()),
                Cell::new(format!("{:.2}", s.aggregate_score)),
                Cell::new(format_instant(&s.submitted_at)),
            ]);
        }
        render_list("submission", &table, self.0.len())
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct DimensionListOutput(pub Vec<ScorecardDimension>);

impl CommandOutput for DimensionListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["key", "weight"]);
        for d in &self.0 {
            table.add_row(vec![Cell::new(&d.key), Cell::new(d.weight)]);
        }
        render_list("dimension", &table, self.0.len())
    }
}

pub async fn execute(args: FeedbackArgs, app: &AppServices, ctx: &RequestContext, json_mode: bool) -> Result<()> {
    match args.command {
        FeedbackCommand::Submit {
            interview_id,
            reviewer,
            recommendation,
            ratings,
        } => {
            let recommendation = Recommendation::from_str(&recommendation)
                .ok_or_else(|| anyhow!("Unknown recommendation '{recommendation}'"))?;
            let mut draft = FeedbackDraft::new(interview_id, reviewer.unwrap_or(ctx.actor_id), recommendation);
            draft.ratings = ratings;

            let submission = app
                .feedback
                .submit(ctx, draft)
                .await
                .context("Failed to submit feedback")?;
            output(&SubmissionOutput(submission), json_mode);
        }
        FeedbackCommand::List { interview_id } => {
            let submissions = app
                .feedback
                .for_interview(ctx, interview_id)
                .await
                .context("Failed to list feedback")?;
            output(&SubmissionListOutput(submissions), json_mode);
        }
        FeedbackCommand::Dimension { command } => match command {
            DimensionCommand::Set { key, weight } => {
                let dimension = app
                    .feedback
                    .upsert_dimension(ctx, &key, weight)
                    .await
                    .context("Failed to save scorecard dimension")?;
                output(&DimensionListOutput(vec![dimension]), json_mode);
            }
            DimensionCommand::List => {
                let dimensions = app
                    .feedback
                    .dimensions(ctx)
                    .await
                    .context("Failed to list scorecard dimensions")?;
                output(&DimensionListOutput(dimensions), json_mode);
            }
        },
    }
    Ok(())
}
