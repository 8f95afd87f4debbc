//! Tests and their timed questions, as authored by interviewers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Publication state of a test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Draft,
    Active,
    Archived,
}

/// A single timed question within a test
///
/// `order_index` defines both presentation order for candidates and grading
/// order for the evaluation pipeline. Questions are immutable once interviews
/// against the test exist.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub id: String,
    pub test_id: String,
    pub content: String,
    /// Answer time limit in seconds, always positive
    pub time_limit_seconds: i32,
    pub order_index: i32,
}

/// A test: an ordered set of questions gated by an access code
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Test {
    pub id: String,
    pub title: String,
    /// Short code candidates enter to start an interview
    pub access_code: String,
    pub status: TestStatus,
    pub created_at: DateTime<Utc>,
    /// Ordered by `order_index` ascending
    pub questions: Vec<Question>,
}
