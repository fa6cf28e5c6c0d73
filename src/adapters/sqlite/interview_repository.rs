//! SQLite adapter for InterviewRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{format_datetime, parse_count, parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Interview, InterviewEvent, InterviewEventType, InterviewMode, InterviewStatus, PanelMember};
use crate::domain::ports::{InterviewFilter, InterviewRepository};

#[derive(Clone)]
pub struct SqliteInterviewRepository {
    pool: SqlitePool,
}

impl SqliteInterviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct InterviewRow {
    id: String,
    tenant_id: String,
    application_id: String,
    scheduled_start: String,
    scheduled_end: String,
    panel: String,
    mode: String,
    status: String,
    reschedule_count: i64,
    recording_ref: Option<String>,
    transcript_ref: Option<String>,
    created_at: String,
    updated_at: String,
    version: i64,
}

impl TryFrom<InterviewRow> for Interview {
    type Error = DomainError;

    fn try_from(row: InterviewRow) -> Result<Self, Self::Error> {
        let panel: Vec<PanelMember> = serde_json::from_str(&row.panel)
            .map_err(|e| DomainError::SerializationError(format!("panel: {}", e)))?;
        let status = InterviewStatus::from_str(&row.status)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid interview status: {}", row.status)))?;

        Ok(Interview {
            id: parse_uuid(&row.id)?,
            tenant_id: parse_uuid(&row.tenant_id)?,
            application_id: parse_uuid(&row.application_id)?,
            scheduled_start: parse_datetime(&row.scheduled_start)?,
            scheduled_end: parse_datetime(&row.scheduled_end)?,
            panel,
            mode: InterviewMode::from_str(&row.mode).unwrap_or_default(),
            status,
            reschedule_count: parse_count(row.reschedule_count, "reschedule_count")?,
            recording_ref: row.recording_ref,
            transcript_ref: row.transcript_ref,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            version: u64::try_from(row.version).unwrap_or(1),
        })
    }
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: String,
    interview_id: String,
    tenant_id: String,
    event_type: String,
    actor_id: String,
    occurred_at: String,
    metadata: String,
}

fn row_to_event(row: EventRow) -> DomainResult<InterviewEvent> {
    let event_type = InterviewEventType::from_str(&row.event_type)
        .ok_or_else(|| DomainError::SerializationError(format!("Invalid event type: {}", row.event_type)))?;
    Ok(InterviewEvent {
        id: parse_uuid(&row.id)?,
        interview_id: parse_uuid(&row.interview_id)?,
        tenant_id: parse_uuid(&row.tenant_id)?,
        event_type,
        actor_id: parse_uuid(&row.actor_id)?,
        occurred_at: parse_datetime(&row.occurred_at)?,
        metadata: serde_json::from_str(&row.metadata)?,
    })
}

const INTERVIEW_COLUMNS: &str = "i.id, i.tenant_id, i.application_id, i.scheduled_start, i.scheduled_end, \
     i.panel, i.mode, i.status, i.reschedule_count, i.recording_ref, i.transcript_ref, \
     i.created_at, i.updated_at, i.version";

#[async_trait]
impl InterviewRepository for SqliteInterviewRepository {
    async fn create(&self, interview: &Interview) -> DomainResult<()> {
        let id = interview.id.to_string();
        let panel = serde_json::to_string(&interview.panel)?;

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO interviews
             (id, tenant_id, application_id, scheduled_start, scheduled_end, panel, mode, status,
              reschedule_count, recording_ref, transcript_ref, created_at, updated_at, version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .bind(&id)
        .bind(interview.tenant_id.to_string())
        .bind(interview.application_id.to_string())
        .bind(format_datetime(&interview.scheduled_start))
        .bind(format_datetime(&interview.scheduled_end))
        .bind(&panel)
        .bind(interview.mode.as_str())
        .bind(interview.status.as_str())
        .bind(i64::from(interview.reschedule_count))
        .bind(&interview.recording_ref)
        .bind(&interview.transcript_ref)
        .bind(format_datetime(&interview.created_at))
        .bind(format_datetime(&interview.updated_at))
        .bind(interview.version as i64)
        .execute(&mut *tx)
        .await?;

        for member in &interview.panel {
            sqlx::query("INSERT INTO interview_panelists (interview_id, participant_id, role) VALUES (?1, ?2, ?3)")
                .bind(&id)
                .bind(member.participant_id.to_string())
                .bind(member.role.as_str())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> DomainResult<Option<Interview>> {
        let row: Option<InterviewRow> = sqlx::query_as(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews i WHERE i.id = ?1 AND i.tenant_id = ?2"
        ))
        .bind(id.to_string())
        .bind(tenant_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Interview::try_from).transpose()
    }

    async fn update(&self, interview: &Interview) -> DomainResult<()> {
        let id = interview.id.to_string();
        let panel = serde_json::to_string(&interview.panel)?;

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE interviews SET
             scheduled_start = ?3, scheduled_end = ?4, panel = ?5, mode = ?6, status = ?7,
             reschedule_count = ?8, recording_ref = ?9, transcript_ref = ?10, updated_at = ?11, version = ?12
             WHERE id = ?1 AND tenant_id = ?2",
        )
        .bind(&id)
        .bind(interview.tenant_id.to_string())
        .bind(format_datetime(&interview.scheduled_start))
        .bind(format_datetime(&interview.scheduled_end))
        .bind(&panel)
        .bind(interview.mode.as_str())
        .bind(interview.status.as_str())
        .bind(i64::from(interview.reschedule_count))
        .bind(&interview.recording_ref)
        .bind(&interview.transcript_ref)
        .bind(format_datetime(&interview.updated_at))
        .bind(interview.version as i64)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::InterviewNotFound(interview.id));
        }

        sqlx::query("DELETE FROM interview_panelists WHERE interview_id = ?1")
            .bind(&id)
            .execute(&mut *tx)
            .await?;
        for member in &interview.panel {
            sqlx::query("INSERT INTO interview_panelists (interview_id, participant_id, role) VALUES (?1, ?2, ?3)")
                .bind(&id)
                .bind(member.participant_id.to_string())
                .bind(member.role.as_str())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn list(&self, tenant_id: Uuid, filter: InterviewFilter) -> DomainResult<Vec<Interview>> {
        let mut query = format!("SELECT {INTERVIEW_COLUMNS} FROM interviews i WHERE i.tenant_id = ?");
        let mut bindings: Vec<String> = vec![tenant_id.to_string()];

        if let Some(panelist) = filter.panelist_id {
            query.push_str(
                " AND EXISTS (SELECT 1 FROM interview_panelists p WHERE p.interview_id = i.id AND p.participant_id = ?)",
            );
            bindings.push(panelist.to_string());
        }
        if let Some(application) = filter.application_id {
            query.push_str(" AND i.application_id = ?");
            bindings.push(application.to_string());
        }
        if let Some(status) = filter.status {
            query.push_str(" AND i.status = ?");
            bindings.push(status.as_str().to_string());
        }
        if let Some((from, to)) = filter.overlapping {
            query.push_str(" AND i.scheduled_start < ? AND i.scheduled_end > ?");
            bindings.push(format_datetime(&to));
            bindings.push(format_datetime(&from));
        }

        query.push_str(" ORDER BY i.scheduled_start, i.id");
        if let Some(limit) = filter.limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }

        let mut q = sqlx::query_as::<_, InterviewRow>(&query);
        for binding in &bindings {
            q = q.bind(binding);
        }

        let rows: Vec<InterviewRow> = q.fetch_all(&self.pool).await?;
        rows.into_iter().map(Interview::try_from).collect()
    }

    async fn append_event(&self, event: &InterviewEvent) -> DomainResult<()> {
        let metadata = serde_json::to_string(&event.metadata)?;
        sqlx::query(
            "INSERT INTO interview_events (id, interview_id, tenant_id, event_type, actor_id, occurred_at, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(event.id.to_string())
        .bind(event.interview_id.to_string())
        .bind(event.tenant_id.to_string())
        .bind(event.event_type.as_str())
        .bind(event.actor_id.to_string())
        .bind(format_datetime(&event.occurred_at))
        .bind(&metadata)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_events(&self, tenant_id: Uuid, interview_id: Uuid) -> DomainResult<Vec<InterviewEvent>> {
        let rows: Vec<EventRow> = sqlx::query_as(
            "SELECT id, interview_id, tenant_id, event_type, actor_id, occurred_at, metadata
             FROM interview_events WHERE tenant_id = ?1 AND interview_id = ?2 ORDER BY seq",
        )
        .bind(tenant_id.to_string())
        .bind(interview_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_event).collect()
    }
}
