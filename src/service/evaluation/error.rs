//! Error taxonomy for interview evaluation

use thiserror::Error;

use crate::service::llm::LlmError;

/// Error type for the evaluation pipeline
///
/// Validation variants carry the offending payload text so failures can be
/// diagnosed without re-running the model.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// External call failed outright; the whole evaluation is safe to retry
    #[error("Generative service unavailable: {0}")]
    ServiceUnavailable(String),

    /// External call did not respond in time; safe to retry
    #[error("Generative service timed out after {0}s")]
    ServiceTimeout(u64),

    /// Response could not be reduced to parseable JSON
    #[error("Malformed model response: {detail}")]
    MalformedResponse { detail: String, raw: String },

    /// Parsed JSON does not match the required shape
    #[error("Model response violates the expected schema: {detail}")]
    SchemaViolation { detail: String, raw: String },

    /// A score fell outside the [0, 10] range or is not finite
    #[error("Model score out of range: {detail}")]
    ScoreOutOfRange { detail: String, raw: String },

    /// Returned question identifiers do not match the interview's questions
    #[error("Question coverage mismatch: {detail}")]
    QuestionCoverageMismatch { detail: String, raw: String },
}

impl EvaluationError {
    /// Whether retrying the whole evaluation may help
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EvaluationError::ServiceUnavailable(_) | EvaluationError::ServiceTimeout(_)
        )
    }

    /// The offending model payload, for validation failures
    pub fn raw_payload(&self) -> Option<&str> {
        match self {
            EvaluationError::MalformedResponse { raw, .. }
            | EvaluationError::SchemaViolation { raw, .. }
            | EvaluationError::ScoreOutOfRange { raw, .. }
            | EvaluationError::QuestionCoverageMismatch { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

impl From<LlmError> for EvaluationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Unavailable(msg) => EvaluationError::ServiceUnavailable(msg),
            LlmError::Timeout(secs) => EvaluationError::ServiceTimeout(secs),
        }
    }
}
