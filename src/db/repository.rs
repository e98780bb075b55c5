//! Repository for claim database operations

use chrono::{Duration, Utc};
use sqlx::SqlitePool;

use super::models::ClaimRow;
use super::DbError;
use crate::model::{Claim, ClaimCategory, ClaimStatus, Sentiment, NOT_TRANSLATED};

/// Repository for claim persistence
#[derive(Clone)]
pub struct ClaimRepository {
    pool: SqlitePool,
}

impl ClaimRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new open claim, returning its assigned id
    ///
    /// The timestamp is set here, once, and never updated. A missing
    /// translation is stored as the explicit "Not translated" marker.
    pub async fn insert(
        &self,
        text: &str,
        translation: Option<&str>,
        sentiment: Sentiment,
        category: ClaimCategory,
    ) -> Result<i64, DbError> {
        let timestamp = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO claims (text, translation, status, timestamp, sentiment, category)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(text)
        .bind(translation.unwrap_or(NOT_TRANSLATED))
        .bind(ClaimStatus::Open.as_str())
        .bind(timestamp)
        .bind(sentiment.as_str())
        .bind(category.as_str())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!(id, "Claim saved to database");

        Ok(id)
    }

    /// Fetch open SERVICE/PAYMENT/OTHER claims from the last hour, newest first
    pub async fn open_last_hour(&self) -> Result<Vec<Claim>, DbError> {
        tracing::info!("Fetching claims from the last hour");

        let one_hour_ago = Utc::now() - Duration::hours(1);

        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM claims
            WHERE status = 'open'
              AND category IN ('SERVICE', 'PAYMENT', 'OTHER')
              AND timestamp >= ?
            "#,
        )
        .bind(one_hour_ago)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(count, "Found claims in the last hour");

        let rows: Vec<ClaimRow> = sqlx::query_as(
            r#"
            SELECT id, text, translation, status, timestamp, sentiment, category
            FROM claims
            WHERE status = 'open'
              AND category IN ('SERVICE', 'PAYMENT', 'OTHER')
              AND timestamp >= ?
            ORDER BY timestamp DESC
            "#,
        )
        .bind(one_hour_ago)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ClaimRow::into_domain).collect())
    }

    /// Close an open claim by id
    ///
    /// The status guard permits exactly one open -> closed transition: an
    /// unknown id and an already-closed claim both report `NotFound`.
    pub async fn close(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE claims SET status = 'closed' WHERE id = ? AND status = 'open'")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(id));
        }

        tracing::info!(id, "Claim marked as closed");
        Ok(())
    }
}
