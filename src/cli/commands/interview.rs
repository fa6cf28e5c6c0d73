//! Implementation of the `panelkit interview` commands.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use comfy_table::Cell;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::context::AppServices;
use crate::cli::output::{format_instant, list_table, output, render_list, short_id, CommandOutput};
use crate::domain::models::{
    Interview, InterviewEvent, InterviewMode, InterviewStatus, PanelMember, RequestContext,
};
use crate::domain::ports::InterviewFilter;

#[derive(Args, Debug)]
pub struct InterviewArgs {
    #[command(subcommand)]
    pub command: InterviewCommand,
}

#[derive(Subcommand, Debug)]
pub enum InterviewCommand {
    /// Schedule a new interview
    Schedule {
        /// Application being interviewed
        #[arg(long)]
        application: Uuid,

        /// Start instant (RFC 3339)
        #[arg(long)]
        start: DateTime<Utc>,

        /// End instant (RFC 3339)
        #[arg(long)]
        end: DateTime<Utc>,

        /// Panel members (comma-separated or repeated)
        #[arg(long = "panelist", short, required = true, value_delimiter = ',')]
        panelists: Vec<Uuid>,

        /// video, phone, onsite or remote
        #[arg(long, short, default_value = "video")]
        mode: String,
    },

    /// Move a scheduled interview to a new window
    Reschedule {
        id: Uuid,

        #[arg(long)]
        start: DateTime<Utc>,

        #[arg(long)]
        end: DateTime<Utc>,

        #[arg(long)]
        reason: Option<String>,
    },

    /// Mark an interview as started
    Start { id: Uuid },

    /// Record that the candidate did not attend
    NoShow { id: Uuid },

    /// Cancel an interview
    Cancel {
        id: Uuid,

        #[arg(long)]
        reason: Option<String>,
    },

    /// Mark an interview as completed
    Complete { id: Uuid },

    /// Show one interview
    Show { id: Uuid },

    /// Show an interview's lifecycle events
    Events { id: Uuid },

    /// List interviews
    List {
        /// Only interviews with this panelist
        #[arg(long)]
        panelist: Option<Uuid>,

        /// Only interviews for this application
        #[arg(long)]
        application: Option<Uuid>,

        /// Filter by status
        #[arg(short, long)]
        status: Option<String>,

        /// Maximum number of interviews to display
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct InterviewOutput(pub Interview);

impl CommandOutput for InterviewOutput {
    fn to_human(&self) -> String {
        let i = &self.0;
        let mut lines = vec![
            "Interview Details:".to_string(),
            format!("  ID: {}", i.id),
            format!("  Application: {}", i.application_id),
            format!("  Status: {}", i.status.as_str()),
            format!("  Mode: {}", i.mode.as_str()),
            format!("  Start: {}", format_instant(&i.scheduled_start)),
            format!("  End: {}", format_instant(&i.scheduled_end)),
            format!("  Reschedules: {}", i.reschedule_count),
            "  Panel:".to_string(),
        ];
        for member in &i.panel {
            lines.push(format!("    - {} ({})", member.participant_id, member.role.as_str()));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct InterviewListOutput(pub Vec<Interview>);

impl CommandOutput for InterviewListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "status", "start", "end", "panel"]);
        for i in &self.0 {
            table.add_row(vec![
                Cell::new(short_id(&i.id)),
                Cell::new(i.status.as_str()),
                Cell::new(format_instant(&i.scheduled_start)),
                Cell::new(format_instant(&i.scheduled_end)),
                Cell::new(i.panel.len()),
            ]);
        }
        render_list("interview", &table, self.0.len())
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct EventListOutput(pub Vec<InterviewEvent>);

impl CommandOutput for EventListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["occurred", "event", "actor", "details"]);
        for e in &self.0 {
            table.add_row(vec![
                Cell::new(format_instant(&e.occurred_at)),
                Cell::new(e.event_type.as_str()),
                Cell::new(short_id(&e.actor_id)),
                Cell::new(e.metadata.to_string()),
            ]);
        }
        render_list("event", &table, self.0.len())
    }
}

pub async fn execute(args: InterviewArgs, app: &AppServices, ctx: &RequestContext, json_mode: bool) -> Result<()> {
    let lifecycle = &app.lifecycle;
    match args.command {
        InterviewCommand::Schedule {
            application,
            start,
            end,
            panelists,
            mode,
        } => {
            let mode = InterviewMode::from_str(&mode).ok_or_else(|| anyhow!("Unknown interview mode '{mode}'"))?;
            let panel = panelists.into_iter().map(PanelMember::interviewer).collect();
            let interview = Interview::new(ctx.tenant_id, application, start, end, panel).with_mode(mode);
            let interview = lifecycle
                .schedule(ctx, interview)
                .await
                .context("Failed to schedule interview")?;
            output(&InterviewOutput(interview), json_mode);
        }
        InterviewCommand::Reschedule { id, start, end, reason } => {
            let interview = lifecycle
                .reschedule(ctx, id, start, end, reason)
                .await
                .context("Failed to reschedule interview")?;
            output(&InterviewOutput(interview), json_mode);
        }
        InterviewCommand::Start { id } => {
            let interview = lifecycle.start(ctx, id).await.context("Failed to start interview")?;
            output(&InterviewOutput(interview), json_mode);
        }
        InterviewCommand::NoShow { id } => {
            let interview = lifecycle
                .mark_no_show(ctx, id)
                .await
                .context("Failed to mark interview as no-show")?;
            output(&InterviewOutput(interview), json_mode);
        }
        InterviewCommand::Cancel { id, reason } => {
            let interview = lifecycle
                .cancel(ctx, id, reason)
                .await
                .context("Failed to cancel interview")?;
            output(&InterviewOutput(interview), json_mode);
        }
        InterviewCommand::Complete { id } => {
            let interview = lifecycle
                .complete(ctx, id)
                .await
                .context("Failed to complete interview")?;
            output(&InterviewOutput(interview), json_mode);
        }
        InterviewCommand::Show { id } => {
            let interview = lifecycle.get(ctx, id).await.context("Failed to retrieve interview")?;
            output(&InterviewOutput(interview), json_mode);
        }
        InterviewCommand::Events { id } => {
            let events = lifecycle.events(ctx, id).await.context("Failed to retrieve events")?;
            output(&EventListOutput(events), json_mode);
        }
        InterviewCommand::List {
            panelist,
            application,
            status,
            limit,
        } => {
            let mut filter = InterviewFilter::new().limit(limit);
            if let Some(panelist) = panelist {
                filter = filter.panelist(panelist);
            }
            if let Some(application) = application {
                filter = filter.application(application);
            }
            if let Some(status) = status {
                let status =
                    InterviewStatus::from_str(&status).ok_or_else(|| anyhow!("Unknown interview status '{status}'"))?;
                filter = filter.status(status);
            }
            let interviews = lifecycle.list(ctx, filter).await.context("Failed to list interviews")?;
            output(&InterviewListOutput(interviews), json_mode);
        }
    }
    Ok(())
}
