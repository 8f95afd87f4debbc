//! Persisted evaluation reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-question grade within a report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionScore {
    pub id: String,
    pub question_id: String,
    /// Numeric grade in [0, 10], fractional allowed
    pub score: f64,
    pub feedback: String,
}

/// The terminal, immutable output of evaluating one interview
///
/// At most one report exists per interview (uniqueness enforced at the
/// persistence boundary). `total_score` is the arithmetic mean of the
/// per-question scores.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub id: String,
    pub interview_id: String,
    pub total_score: f64,
    /// Overall evaluation summary, never empty
    pub feedback: String,
    pub created_at: DateTime<Utc>,
    /// One entry per answered question, in grading order
    pub scores: Vec<QuestionScore>,
}
