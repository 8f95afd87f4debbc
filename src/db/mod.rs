//! Database module for PostgreSQL persistence

pub mod models;
pub mod repository;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;

// Environment variable names
const ENV_POSTGRES_HOST: &str = "HIREFAST_POSTGRES_HOST";
const ENV_POSTGRES_PORT: &str = "HIREFAST_POSTGRES_PORT";
const ENV_POSTGRES_USER: &str = "HIREFAST_POSTGRES_USER";
const ENV_POSTGRES_PASSWORD: &str = "HIREFAST_POSTGRES_PASSWORD";
const ENV_POSTGRES_DB: &str = "HIREFAST_POSTGRES_DB";

// Default values
const DEFAULT_POSTGRES_HOST: &str = "127.0.0.1";
const DEFAULT_POSTGRES_PORT: &str = "5432";
const DEFAULT_POSTGRES_USER: &str = "hirefast";
const DEFAULT_POSTGRES_PASSWORD: &str = "hirefast";
const DEFAULT_POSTGRES_DB: &str = "hirefast";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Conflicting record: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Create a new database connection pool
pub async fn create_pool() -> Result<PgPool, DbError> {
    let host = env::var(ENV_POSTGRES_HOST).unwrap_or_else(|_| DEFAULT_POSTGRES_HOST.to_string());
    let port = env::var(ENV_POSTGRES_PORT).unwrap_or_else(|_| DEFAULT_POSTGRES_PORT.to_string());
    let user = env::var(ENV_POSTGRES_USER).unwrap_or_else(|_| DEFAULT_POSTGRES_USER.to_string());
    let password =
        env::var(ENV_POSTGRES_PASSWORD).unwrap_or_else(|_| DEFAULT_POSTGRES_PASSWORD.to_string());
    let database = env::var(ENV_POSTGRES_DB).unwrap_or_else(|_| DEFAULT_POSTGRES_DB.to_string());

    let database_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        user, password, host, port, database
    );

    tracing::debug!(host = %host, port = %port, database = %database, "Connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    tracing::info!(host = %host, port = %port, "PostgreSQL connection established");

    Ok(pool)
}

/// Initialize database schema
pub async fn init_schema(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tests (
            id VARCHAR(36) PRIMARY KEY,
            title TEXT NOT NULL,
            access_code VARCHAR(12) NOT NULL UNIQUE,
            status VARCHAR(20) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            id VARCHAR(36) PRIMARY KEY,
            test_id VARCHAR(36) NOT NULL REFERENCES tests(id) ON DELETE CASCADE,
            content TEXT NOT NULL,
            time_limit_seconds INTEGER NOT NULL,
            order_index INTEGER NOT NULL,
            UNIQUE (test_id, order_index)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS interviews (
            id VARCHAR(36) PRIMARY KEY,
            test_id VARCHAR(36) NOT NULL REFERENCES tests(id) ON DELETE CASCADE,
            device_id TEXT NOT NULL,
            candidate_name TEXT NOT NULL DEFAULT '',
            status VARCHAR(20) NOT NULL,
            started_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            completed_at TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await?;

    // One response per (interview, question) pair
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS responses (
            id VARCHAR(36) PRIMARY KEY,
            interview_id VARCHAR(36) NOT NULL REFERENCES interviews(id) ON DELETE CASCADE,
            question_id VARCHAR(36) NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
            transcript TEXT NOT NULL DEFAULT '',
            audio_url TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (interview_id, question_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // interview_id UNIQUE: at most one report per interview, enforced here so
    // concurrent evaluations cannot race to create duplicates
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reports (
            id VARCHAR(36) PRIMARY KEY,
            interview_id VARCHAR(36) NOT NULL UNIQUE REFERENCES interviews(id) ON DELETE CASCADE,
            total_score DOUBLE PRECISION NOT NULL,
            feedback TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scores (
            id VARCHAR(36) PRIMARY KEY,
            report_id VARCHAR(36) NOT NULL REFERENCES reports(id) ON DELETE CASCADE,
            question_id VARCHAR(36) NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
            score DOUBLE PRECISION NOT NULL,
            feedback TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes separately
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_questions_test_id ON questions(test_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_interviews_test_id ON interviews(test_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_responses_interview_id ON responses(interview_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_scores_report_id ON scores(report_id)")
        .execute(pool)
        .await?;

    tracing::info!("Database schema initialized");

    Ok(())
}
