//! SQLite adapter for FeedbackRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{format_datetime, parse_count, parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    DimensionRating, FeedbackAggregate, FeedbackSubmission, Period, Recommendation, ScorecardDimension,
};
use crate::domain::ports::FeedbackRepository;

#[derive(Clone)]
pub struct SqliteFeedbackRepository {
    pool: SqlitePool,
}

impl SqliteFeedbackRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SubmissionRow {
    id: String,
    tenant_id: String,
    interview_id: String,
    reviewer_id: String,
    ratings: String,
    recommendation: String,
    aggregate_score: f64,
    submitted_at: String,
}

fn row_to_submission(row: SubmissionRow) -> DomainResult<FeedbackSubmission> {
    let ratings: Vec<DimensionRating> = serde_json::from_str(&row.ratings)
        .map_err(|e| DomainError::SerializationError(format!("ratings: {}", e)))?;
    let recommendation = Recommendation::from_str(&row.recommendation)
        .ok_or_else(|| DomainError::SerializationError(format!("Invalid recommendation: {}", row.recommendation)))?;

    Ok(FeedbackSubmission {
        id: parse_uuid(&row.id)?,
        tenant_id: parse_uuid(&row.tenant_id)?,
        interview_id: parse_uuid(&row.interview_id)?,
        reviewer_id: parse_uuid(&row.reviewer_id)?,
        ratings,
        recommendation,
        aggregate_score: row.aggregate_score,
        submitted_at: parse_datetime(&row.submitted_at)?,
    })
}

#[derive(sqlx::FromRow)]
struct AggregateRow {
    tenant_id: String,
    reviewer_id: String,
    period: String,
    average_score: f64,
    submission_count: i64,
}

fn row_to_aggregate(row: AggregateRow) -> DomainResult<FeedbackAggregate> {
    Ok(FeedbackAggregate {
        tenant_id: parse_uuid(&row.tenant_id)?,
        reviewer_id: parse_uuid(&row.reviewer_id)?,
        period: Period::parse(&row.period).map_err(|e| DomainError::SerializationError(e.to_string()))?,
        average_score: row.average_score,
        submission_count: parse_count(row.submission_count, "submission_count")?,
    })
}

const SUBMISSION_COLUMNS: &str =
    "id, tenant_id, interview_id, reviewer_id, ratings, recommendation, aggregate_score, submitted_at";

#[async_trait]
impl FeedbackRepository for SqliteFeedbackRepository {
    async fn get_submission(
        &self,
        tenant_id: Uuid,
        interview_id: Uuid,
        reviewer_id: Uuid,
    ) -> DomainResult<Option<FeedbackSubmission>> {
        let row: Option<SubmissionRow> = sqlx::query_as(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM feedback_submissions
             WHERE tenant_id = ?1 AND interview_id = ?2 AND reviewer_id = ?3"
        ))
        .bind(tenant_id.to_string())
        .bind(interview_id.to_string())
        .bind(reviewer_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_submission).transpose()
    }

    async fn upsert_submission(&self, submission: &FeedbackSubmission) -> DomainResult<Uuid> {
        let ratings = serde_json::to_string(&submission.ratings)?;

        // The id of the first submission for a pair is kept on conflict.
        let id: String = sqlx::query_scalar(
            "INSERT INTO feedback_submissions
             (id, tenant_id, interview_id, reviewer_id, ratings, recommendation, aggregate_score, submitted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT (interview_id, reviewer_id) DO UPDATE SET
               ratings = excluded.ratings,
               recommendation = excluded.recommendation,
               aggregate_score = excluded.aggregate_score,
               submitted_at = excluded.submitted_at
             RETURNING id",
        )
        .bind(submission.id.to_string())
        .bind(submission.tenant_id.to_string())
        .bind(submission.interview_id.to_string())
        .bind(submission.reviewer_id.to_string())
        .bind(&ratings)
        .bind(submission.recommendation.as_str())
        .bind(submission.aggregate_score)
        .bind(format_datetime(&submission.submitted_at))
        .fetch_one(&self.pool)
        .await?;

        parse_uuid(&id)
    }

    async fn list_submissions(
        &self,
        tenant_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<FeedbackSubmission>> {
        let rows: Vec<SubmissionRow> = sqlx::query_as(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM feedback_submissions
             WHERE tenant_id = ?1 AND submitted_at >= ?2 AND submitted_at < ?3
             ORDER BY submitted_at, id"
        ))
        .bind(tenant_id.to_string())
        .bind(format_datetime(&from))
        .bind(format_datetime(&to))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_submission).collect()
    }

    async fn list_for_interview(
        &self,
        tenant_id: Uuid,
        interview_id: Uuid,
    ) -> DomainResult<Vec<FeedbackSubmission>> {
        let rows: Vec<SubmissionRow> = sqlx::query_as(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM feedback_submissions
             WHERE tenant_id = ?1 AND interview_id = ?2
             ORDER BY submitted_at, id"
        ))
        .bind(tenant_id.to_string())
        .bind(interview_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_submission).collect()
    }

    async fn dimensions(&self, tenant_id: Uuid) -> DomainResult<Vec<ScorecardDimension>> {
        let rows: Vec<(String, f64)> =
            sqlx::query_as("SELECT key, weight FROM scorecard_dimensions WHERE tenant_id = ?1 ORDER BY key")
                .bind(tenant_id.to_string())
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(key, weight)| ScorecardDimension { tenant_id, key, weight })
            .collect())
    }

    async fn upsert_dimension(&self, dimension: &ScorecardDimension) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO scorecard_dimensions (tenant_id, key, weight) VALUES (?1, ?2, ?3)
             ON CONFLICT (tenant_id, key) DO UPDATE SET weight = excluded.weight",
        )
        .bind(dimension.tenant_id.to_string())
        .bind(&dimension.key)
        .bind(dimension.weight)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn replace_aggregates(
        &self,
        tenant_id: Uuid,
        period: Period,
        aggregates: &[FeedbackAggregate],
    ) -> DomainResult<()> {
        let tenant = tenant_id.to_string();
        let period = period.to_string();

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM feedback_aggregates WHERE tenant_id = ?1 AND period = ?2")
            .bind(&tenant)
            .bind(&period)
            .execute(&mut *tx)
            .await?;

        for (position, aggregate) in aggregates.iter().enumerate() {
            sqlx::query(
                "INSERT INTO feedback_aggregates
                 (tenant_id, reviewer_id, period, average_score, submission_count, position)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(&tenant)
            .bind(aggregate.reviewer_id.to_string())
            .bind(&period)
            .bind(aggregate.average_score)
            .bind(i64::from(aggregate.submission_count))
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn list_aggregates(&self, tenant_id: Uuid, period: Period) -> DomainResult<Vec<FeedbackAggregate>> {
        let rows: Vec<AggregateRow> = sqlx::query_as(
            "SELECT tenant_id, reviewer_id, period, average_score, submission_count
             FROM feedback_aggregates WHERE tenant_id = ?1 AND period = ?2 ORDER BY position",
        )
        .bind(tenant_id.to_string())
        .bind(period.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_aggregate).collect()
    }
}
