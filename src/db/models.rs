//! Database models for tests, interviews, responses, and reports

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use url::Url;

use crate::model::{
    Interview, InterviewStatus, Question, QuestionScore, Report, Response, Test, TestStatus,
};

/// Database representation of a test
#[derive(Debug, Clone, FromRow)]
pub struct TestRow {
    pub id: String,
    pub title: String,
    pub access_code: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TestRow {
    /// Convert database row to domain model, attaching its ordered questions
    pub fn into_domain(self, questions: Vec<Question>) -> Result<Test, String> {
        let status = parse_test_status(&self.status)
            .ok_or_else(|| format!("Unknown test status: {}", self.status))?;

        Ok(Test {
            id: self.id,
            title: self.title,
            access_code: self.access_code,
            status,
            created_at: self.created_at,
            questions,
        })
    }
}

/// Database representation of a question
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: String,
    pub test_id: String,
    pub content: String,
    pub time_limit_seconds: i32,
    pub order_index: i32,
}

impl QuestionRow {
    pub fn into_domain(self) -> Question {
        Question {
            id: self.id,
            test_id: self.test_id,
            content: self.content,
            time_limit_seconds: self.time_limit_seconds,
            order_index: self.order_index,
        }
    }
}

/// Database representation of an interview session
#[derive(Debug, Clone, FromRow)]
pub struct InterviewRow {
    pub id: String,
    pub test_id: String,
    pub device_id: String,
    pub candidate_name: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl InterviewRow {
    pub fn into_domain(self) -> Result<Interview, String> {
        let status = parse_interview_status(&self.status)
            .ok_or_else(|| format!("Unknown interview status: {}", self.status))?;

        Ok(Interview {
            id: self.id,
            test_id: self.test_id,
            device_id: self.device_id,
            candidate_name: self.candidate_name,
            status,
            started_at: self.started_at,
            completed_at: self.completed_at,
        })
    }
}

/// Database representation of a recorded response
#[derive(Debug, Clone, FromRow)]
pub struct ResponseRow {
    pub id: String,
    pub interview_id: String,
    pub question_id: String,
    pub transcript: String,
    pub audio_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ResponseRow {
    pub fn into_domain(self) -> Response {
        let audio_url = self.audio_url.as_ref().and_then(|u| Url::parse(u).ok());

        Response {
            id: self.id,
            interview_id: self.interview_id,
            question_id: self.question_id,
            transcript: self.transcript,
            audio_url,
            created_at: self.created_at,
        }
    }
}

/// Database representation of a report
#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub id: String,
    pub interview_id: String,
    pub total_score: f64,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

impl ReportRow {
    pub fn into_domain(self, scores: Vec<QuestionScore>) -> Report {
        Report {
            id: self.id,
            interview_id: self.interview_id,
            total_score: self.total_score,
            feedback: self.feedback,
            created_at: self.created_at,
            scores,
        }
    }
}

/// Database representation of a per-question score
#[derive(Debug, Clone, FromRow)]
pub struct ScoreRow {
    pub id: String,
    pub report_id: String,
    pub question_id: String,
    pub score: f64,
    pub feedback: String,
}

impl ScoreRow {
    pub fn into_domain(self) -> QuestionScore {
        QuestionScore {
            id: self.id,
            question_id: self.question_id,
            score: self.score,
            feedback: self.feedback,
        }
    }
}

/// Helper to convert TestStatus to string for database storage
pub fn test_status_to_string(status: &TestStatus) -> &'static str {
    match status {
        TestStatus::Draft => "draft",
        TestStatus::Active => "active",
        TestStatus::Archived => "archived",
    }
}

/// Parse a stored test status string
pub fn parse_test_status(s: &str) -> Option<TestStatus> {
    match s {
        "draft" => Some(TestStatus::Draft),
        "active" => Some(TestStatus::Active),
        "archived" => Some(TestStatus::Archived),
        _ => None,
    }
}

/// Helper to convert InterviewStatus to string for database storage
pub fn interview_status_to_string(status: &InterviewStatus) -> &'static str {
    match status {
        InterviewStatus::InProgress => "in_progress",
        InterviewStatus::Completed => "completed",
        InterviewStatus::Failed => "failed",
        InterviewStatus::Cancelled => "cancelled",
    }
}

/// Parse a stored interview status string
pub fn parse_interview_status(s: &str) -> Option<InterviewStatus> {
    match s {
        "in_progress" => Some(InterviewStatus::InProgress),
        "completed" => Some(InterviewStatus::Completed),
        "failed" => Some(InterviewStatus::Failed),
        "cancelled" => Some(InterviewStatus::Cancelled),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interview_status_round_trips() {
        for status in [
            InterviewStatus::InProgress,
            InterviewStatus::Completed,
            InterviewStatus::Failed,
            InterviewStatus::Cancelled,
        ] {
            let stored = interview_status_to_string(&status);
            assert_eq!(parse_interview_status(stored), Some(status));
        }
        assert_eq!(parse_interview_status("IN_PROGRESS"), None);
    }

    #[test]
    fn test_status_round_trips() {
        for status in [TestStatus::Draft, TestStatus::Active, TestStatus::Archived] {
            let stored = test_status_to_string(&status);
            assert_eq!(parse_test_status(stored), Some(status));
        }
        assert_eq!(parse_test_status("published"), None);
    }
}
