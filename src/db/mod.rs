//! Database module for SQLite persistence

pub mod models;
pub mod repository;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Claim not found: {0}")]
    NotFound(i64),
}

/// Create a new database connection pool for the given SQLite file
pub async fn create_pool(database_file: &str) -> Result<SqlitePool, DbError> {
    let database_url = format!("sqlite://{}", database_file);

    tracing::debug!(database_file = %database_file, "Connecting to SQLite");

    let options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!(database_file = %database_file, "SQLite connection established");

    Ok(pool)
}

/// Initialize database schema
pub async fn init_schema(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS claims (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            text TEXT NOT NULL,
            translation TEXT NOT NULL DEFAULT 'Not translated',
            status TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            sentiment TEXT NOT NULL,
            category TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_claims_status_timestamp ON claims(status, timestamp)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database schema initialized");

    Ok(())
}
