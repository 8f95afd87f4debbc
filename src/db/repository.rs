//! Repositories for test, interview, and report database operations

use sqlx::PgPool;

use super::DbError;
use super::models::{
    InterviewRow, QuestionRow, ReportRow, ResponseRow, ScoreRow, TestRow, interview_status_to_string,
    test_status_to_string,
};
use crate::model::{Interview, InterviewStatus, Question, Report, Response, Test, TestStatus};

/// Returns true when the error is a unique-constraint violation
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Repository for tests and their questions
#[derive(Clone)]
pub struct TestRepository {
    pool: PgPool,
}

impl TestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a test together with its questions
    pub async fn insert(&self, test: &Test) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO tests (id, title, access_code, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&test.id)
        .bind(&test.title)
        .bind(&test.access_code)
        .bind(test_status_to_string(&test.status))
        .bind(test.created_at)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(DbError::Conflict(format!(
                    "access code already in use: {}",
                    test.access_code
                )));
            }
            Err(e) => return Err(e.into()),
        }

        for question in &test.questions {
            sqlx::query(
                r#"
                INSERT INTO questions (id, test_id, content, time_limit_seconds, order_index)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(&question.id)
            .bind(&question.test_id)
            .bind(&question.content)
            .bind(question.time_limit_seconds)
            .bind(question.order_index)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(id = %test.id, questions = test.questions.len(), "Inserted test");
        Ok(())
    }

    /// Get a test by ID, with questions in presentation order
    pub async fn get_by_id(&self, id: &str) -> Result<Test, DbError> {
        let row: TestRow = sqlx::query_as("SELECT * FROM tests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(id.to_string()))?;

        let questions = self.questions_for_test(&row.id).await?;
        row.into_domain(questions).map_err(DbError::Serialization)
    }

    /// Get a test by access code, with questions in presentation order
    pub async fn get_by_access_code(&self, access_code: &str) -> Result<Test, DbError> {
        let row: TestRow = sqlx::query_as("SELECT * FROM tests WHERE access_code = $1")
            .bind(access_code)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(access_code.to_string()))?;

        let questions = self.questions_for_test(&row.id).await?;
        row.into_domain(questions).map_err(DbError::Serialization)
    }

    /// Update a test's status
    pub async fn update_status(&self, id: &str, status: TestStatus) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE tests SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(test_status_to_string(&status))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(id.to_string()));
        }

        tracing::debug!(id = %id, status = test_status_to_string(&status), "Updated test status");
        Ok(())
    }

    async fn questions_for_test(&self, test_id: &str) -> Result<Vec<Question>, DbError> {
        let rows: Vec<QuestionRow> = sqlx::query_as(
            "SELECT * FROM questions WHERE test_id = $1 ORDER BY order_index ASC",
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(QuestionRow::into_domain).collect())
    }
}

/// Repository for interview sessions and their responses
#[derive(Clone)]
pub struct InterviewRepository {
    pool: PgPool,
}

impl InterviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new interview session
    pub async fn insert(&self, interview: &Interview) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO interviews (id, test_id, device_id, candidate_name, status, started_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&interview.id)
        .bind(&interview.test_id)
        .bind(&interview.device_id)
        .bind(&interview.candidate_name)
        .bind(interview_status_to_string(&interview.status))
        .bind(interview.started_at)
        .bind(interview.completed_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %interview.id, test_id = %interview.test_id, "Inserted interview");
        Ok(())
    }

    /// Get an interview by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Interview, DbError> {
        let row: InterviewRow = sqlx::query_as("SELECT * FROM interviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(id.to_string()))?;

        row.into_domain().map_err(DbError::Serialization)
    }

    /// Update an interview's status, optionally stamping completion time and
    /// recording the candidate name
    pub async fn update_status(
        &self,
        id: &str,
        status: InterviewStatus,
        candidate_name: Option<&str>,
        completed_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE interviews
            SET status = $2,
                candidate_name = COALESCE($3, candidate_name),
                completed_at = COALESCE($4, completed_at)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(interview_status_to_string(&status))
        .bind(candidate_name)
        .bind(completed_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(id.to_string()));
        }

        tracing::debug!(id = %id, status = interview_status_to_string(&status), "Updated interview status");
        Ok(())
    }

    /// Insert a response; duplicate (interview, question) pairs are conflicts
    pub async fn insert_response(&self, response: &Response) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO responses (id, interview_id, question_id, transcript, audio_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&response.id)
        .bind(&response.interview_id)
        .bind(&response.question_id)
        .bind(&response.transcript)
        .bind(response.audio_url.as_ref().map(|u| u.to_string()))
        .bind(response.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::debug!(id = %response.id, interview_id = %response.interview_id, "Inserted response");
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => Err(DbError::Conflict(format!(
                "response already recorded for question {}",
                response.question_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Responses for an interview, in question `order_index` order
    pub async fn responses_for_interview(&self, interview_id: &str) -> Result<Vec<Response>, DbError> {
        let rows: Vec<ResponseRow> = sqlx::query_as(
            r#"
            SELECT r.* FROM responses r
            JOIN questions q ON q.id = r.question_id
            WHERE r.interview_id = $1
            ORDER BY q.order_index ASC
            "#,
        )
        .bind(interview_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ResponseRow::into_domain).collect())
    }
}

/// Repository for reports and their per-question scores
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check if a report exists for an interview
    pub async fn exists_for_interview(&self, interview_id: &str) -> Result<bool, DbError> {
        let result: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM reports WHERE interview_id = $1")
                .bind(interview_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(result.is_some())
    }

    /// Insert a report together with its scores, atomically
    ///
    /// A concurrent insert for the same interview loses on the
    /// `reports.interview_id` uniqueness constraint and surfaces as a
    /// conflict; nothing is partially written.
    pub async fn insert(&self, report: &Report) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO reports (id, interview_id, total_score, feedback, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&report.id)
        .bind(&report.interview_id)
        .bind(report.total_score)
        .bind(&report.feedback)
        .bind(report.created_at)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(DbError::Conflict(format!(
                    "report already exists for interview {}",
                    report.interview_id
                )));
            }
            Err(e) => return Err(e.into()),
        }

        for score in &report.scores {
            sqlx::query(
                r#"
                INSERT INTO scores (id, report_id, question_id, score, feedback)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(&score.id)
            .bind(&report.id)
            .bind(&score.question_id)
            .bind(score.score)
            .bind(&score.feedback)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            id = %report.id,
            interview_id = %report.interview_id,
            scores = report.scores.len(),
            "Inserted report"
        );
        Ok(())
    }

    /// Get the report for an interview, if one exists
    pub async fn get_by_interview(&self, interview_id: &str) -> Result<Option<Report>, DbError> {
        let row: Option<ReportRow> =
            sqlx::query_as("SELECT * FROM reports WHERE interview_id = $1")
                .bind(interview_id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => {
                let scores = self.scores_for_report(&row.id).await?;
                Ok(Some(row.into_domain(scores)))
            }
            None => Ok(None),
        }
    }

    /// Reports for every completed interview of a test, most recent first
    pub async fn list_for_test(&self, test_id: &str) -> Result<Vec<Report>, DbError> {
        let rows: Vec<ReportRow> = sqlx::query_as(
            r#"
            SELECT r.* FROM reports r
            JOIN interviews i ON i.id = r.interview_id
            WHERE i.test_id = $1 AND i.status = 'completed'
            ORDER BY i.completed_at DESC
            "#,
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        let mut reports = Vec::with_capacity(rows.len());
        for row in rows {
            let scores = self.scores_for_report(&row.id).await?;
            reports.push(row.into_domain(scores));
        }

        Ok(reports)
    }

    /// Scores for a report, in question `order_index` order
    async fn scores_for_report(&self, report_id: &str) -> Result<Vec<crate::model::QuestionScore>, DbError> {
        let rows: Vec<ScoreRow> = sqlx::query_as(
            r#"
            SELECT s.* FROM scores s
            JOIN questions q ON q.id = s.question_id
            WHERE s.report_id = $1
            ORDER BY q.order_index ASC
            "#,
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ScoreRow::into_domain).collect())
    }
}
