//! Evaluation pipeline input and output types
//!
//! `EvaluationInput` is assembled from persisted interview data;
//! `EvaluationReport` is the validated result handed back to the caller for
//! persistence. The `Raw*` types mirror the JSON shape the generative model
//! is instructed to emit and exist only for the decode step.

use serde::{Deserialize, Serialize};

/// One (question, transcript) pair submitted for grading
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsePair {
    pub question_id: String,
    /// Question text as shown to the candidate
    pub question: String,
    /// Transcribed answer, may be empty
    pub transcript: String,
}

/// The pipeline's sole input: one completed interview's answers
///
/// Invariants (upheld by the report service, which builds this from rows
/// constrained unique per (interview, question)): `pairs` is non-empty and
/// every `question_id` is unique within the sequence. Pair order is the
/// question `order_index` order and defines the order of the resulting
/// report's scores.
#[derive(Debug, Clone)]
pub struct EvaluationInput {
    /// Candidate display name, may be empty
    pub candidate_name: String,
    pub pairs: Vec<ResponsePair>,
}

impl EvaluationInput {
    /// Question identifiers the model's answer must cover, in input order
    pub fn expected_question_ids(&self) -> Vec<String> {
        self.pairs.iter().map(|p| p.question_id.clone()).collect()
    }
}

/// Validated per-question grade
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub question_id: String,
    pub score: f64,
    pub feedback: String,
}

/// Validated evaluation result, ready for persistence
///
/// `scores` holds exactly one entry per input pair, matched by question
/// identifier and reordered to input order. `total_score` is the arithmetic
/// mean of the per-question scores.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub total_score: f64,
    pub feedback: String,
    pub scores: Vec<ScoreResult>,
}

/// Wire shape of the model's grading answer
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawEvaluation {
    pub(crate) total_score: f64,
    pub(crate) feedback: String,
    pub(crate) scores: Vec<RawScore>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawScore {
    pub(crate) question_id: String,
    pub(crate) score: f64,
    pub(crate) feedback: String,
}
