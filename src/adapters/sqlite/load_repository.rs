//! SQLite adapter for LoadRepository.
//!
//! Deltas are applied read-modify-write inside an immediate transaction so
//! concurrent writers to the same row serialize on the database lock.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{format_date, parse_count, parse_date, parse_uuid};
use crate::domain::errors::DomainResult;
use crate::domain::models::{InterviewerLoad, LoadDelta};
use crate::domain::ports::LoadRepository;
use crate::services::load_tracker::LoadDeltas;

#[derive(Clone)]
pub struct SqliteLoadRepository {
    pool: SqlitePool,
}

impl SqliteLoadRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LoadRow {
    tenant_id: String,
    panelist_id: String,
    load_date: String,
    scheduled_count: i64,
    pending_feedback_count: i64,
}

fn row_to_load(row: LoadRow) -> DomainResult<InterviewerLoad> {
    Ok(InterviewerLoad {
        tenant_id: parse_uuid(&row.tenant_id)?,
        panelist_id: parse_uuid(&row.panelist_id)?,
        date: parse_date(&row.load_date)?,
        scheduled_count: parse_count(row.scheduled_count, "scheduled_count")?,
        pending_feedback_count: parse_count(row.pending_feedback_count, "pending_feedback_count")?,
    })
}

#[async_trait]
impl LoadRepository for SqliteLoadRepository {
    async fn get(&self, tenant_id: Uuid, panelist_id: Uuid, date: NaiveDate) -> DomainResult<Option<InterviewerLoad>> {
        let row: Option<LoadRow> = sqlx::query_as(
            "SELECT tenant_id, panelist_id, load_date, scheduled_count, pending_feedback_count
             FROM interviewer_load WHERE tenant_id = ?1 AND panelist_id = ?2 AND load_date = ?3",
        )
        .bind(tenant_id.to_string())
        .bind(panelist_id.to_string())
        .bind(format_date(date))
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_load).transpose()
    }

    async fn apply_delta(&self, delta: &LoadDelta) -> DomainResult<InterviewerLoad> {
        let tenant = delta.tenant_id.to_string();
        let panelist = delta.panelist_id.to_string();
        let date = format_date(delta.date);

        let mut conn = self.pool.acquire().await?;
        // Take the write lock up front so the read below sees the final state.
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        let result = async {
            let row: Option<LoadRow> = sqlx::query_as(
                "SELECT tenant_id, panelist_id, load_date, scheduled_count, pending_feedback_count
                 FROM interviewer_load WHERE tenant_id = ?1 AND panelist_id = ?2 AND load_date = ?3",
            )
            .bind(&tenant)
            .bind(&panelist)
            .bind(&date)
            .fetch_optional(&mut *conn)
            .await?;

            let mut load = match row {
                Some(row) => row_to_load(row)?,
                None => InterviewerLoad::empty(delta.tenant_id, delta.panelist_id, delta.date),
            };
            LoadDeltas::apply(&mut load, delta);

            sqlx::query(
                "INSERT INTO interviewer_load
                 (tenant_id, panelist_id, load_date, scheduled_count, pending_feedback_count)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (tenant_id, panelist_id, load_date) DO UPDATE SET
                   scheduled_count = excluded.scheduled_count,
                   pending_feedback_count = excluded.pending_feedback_count",
            )
            .bind(&tenant)
            .bind(&panelist)
            .bind(&date)
            .bind(i64::from(load.scheduled_count))
            .bind(i64::from(load.pending_feedback_count))
            .execute(&mut *conn)
            .await?;

            DomainResult::Ok(load)
        }
        .await;

        match result {
            Ok(load) => {
                sqlx::query("COMMIT").execute(&mut *conn).await?;
                Ok(load)
            }
            Err(e) => {
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                Err(e)
            }
        }
    }

    async fn list_for_panelist(
        &self,
        tenant_id: Uuid,
        panelist_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DomainResult<Vec<InterviewerLoad>> {
        let rows: Vec<LoadRow> = sqlx::query_as(
            "SELECT tenant_id, panelist_id, load_date, scheduled_count, pending_feedback_count
             FROM interviewer_load
             WHERE tenant_id = ?1 AND panelist_id = ?2 AND load_date >= ?3 AND load_date <= ?4
             ORDER BY load_date",
        )
        .bind(tenant_id.to_string())
        .bind(panelist_id.to_string())
        .bind(format_date(from))
        .bind(format_date(to))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_load).collect()
    }
}
