//! Interview evaluation pipeline
//!
//! Converts a completed interview's question/response pairs into a validated
//! report: prompt construction, one model call, payload extraction, and a
//! strict validation pass. Downstream consumers never see the unstructured,
//! non-deterministic output of the generative service.

use std::sync::Arc;

use crate::model::{EvaluationInput, EvaluationReport};
use crate::service::llm::LlmClient;

pub mod error;
pub mod extract;
pub mod prompts;
pub mod validation;

pub use error::EvaluationError;

use extract::extract_structured_payload;
use prompts::{EVALUATION_SYSTEM_PROMPT, build_evaluation_prompt};
use validation::parse_and_validate;

/// Service for grading completed interviews
///
/// Holds no mutable state; evaluations of independent interviews may run
/// concurrently. The operation is all-or-nothing: no failure path produces a
/// partial report.
pub struct EvaluationService {
    llm_client: Arc<dyn LlmClient>,
}

impl EvaluationService {
    /// Creates a new evaluation service around an injected model client
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        tracing::info!(
            provider = llm_client.provider_name(),
            model = %llm_client.model(),
            "Evaluation service initialized"
        );

        Self { llm_client }
    }

    /// Evaluate one interview's responses into a validated report
    pub async fn evaluate(
        &self,
        input: &EvaluationInput,
    ) -> Result<EvaluationReport, EvaluationError> {
        let start_time = std::time::Instant::now();

        let prompt = build_evaluation_prompt(&input.candidate_name, &input.pairs);
        let prompt_length = prompt.len();

        tracing::debug!(
            provider = self.llm_client.provider_name(),
            model = %self.llm_client.model(),
            questions = input.pairs.len(),
            prompt_length = prompt_length,
            "Initiating model call for interview evaluation"
        );

        let raw = match self
            .llm_client
            .generate(EVALUATION_SYSTEM_PROMPT, &prompt)
            .await
        {
            Ok(text) => {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    model = %self.llm_client.model(),
                    elapsed_ms = elapsed.as_millis(),
                    prompt_length = prompt_length,
                    "Model call for interview evaluation completed"
                );
                text
            }
            Err(e) => {
                let elapsed = start_time.elapsed();
                tracing::error!(
                    model = %self.llm_client.model(),
                    elapsed_ms = elapsed.as_millis(),
                    prompt_length = prompt_length,
                    error = %e,
                    "Model call for interview evaluation failed"
                );
                return Err(e.into());
            }
        };

        let payload = extract_structured_payload(&raw)?;
        let expected_ids = input.expected_question_ids();
        let report = parse_and_validate(&payload, &expected_ids)?;

        tracing::debug!(
            total_score = report.total_score,
            scores = report.scores.len(),
            "Interview evaluation validated"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResponsePair;
    use crate::service::llm::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockLlmClient {
        responses: Mutex<Vec<Result<String, LlmError>>>,
        last_prompt: Mutex<Option<String>>,
    }

    impl MockLlmClient {
        fn with(responses: Vec<Result<String, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn generate(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            let mut resps = self.responses.lock().unwrap();
            assert!(!resps.is_empty(), "no more mock responses");
            resps.remove(0)
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock"
        }
    }

    fn input() -> EvaluationInput {
        EvaluationInput {
            candidate_name: "Sarah Wilson".to_string(),
            pairs: vec![
                ResponsePair {
                    question_id: "Q1".to_string(),
                    question: "Explain the box model in CSS".to_string(),
                    transcript: "Content, padding, border, margin".to_string(),
                },
                ResponsePair {
                    question_id: "Q2".to_string(),
                    question: "What is the virtual DOM?".to_string(),
                    transcript: "An in-memory representation of the DOM".to_string(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn fenced_model_output_parses_like_bare_json() {
        let body = r#"{
            "totalScore": 7.5,
            "feedback": "Solid fundamentals",
            "scores": [
                {"questionId": "Q1", "score": 7.0, "feedback": "Covered all four layers"},
                {"questionId": "Q2", "score": 8.0, "feedback": "Clear and accurate"}
            ]
        }"#;

        let bare = MockLlmClient::with(vec![Ok(body.to_string())]);
        let fenced = MockLlmClient::with(vec![Ok(format!("```json\n{}\n```", body))]);

        let from_bare = EvaluationService::new(bare).evaluate(&input()).await.unwrap();
        let from_fenced = EvaluationService::new(fenced).evaluate(&input()).await.unwrap();

        assert_eq!(from_bare, from_fenced);
        assert_eq!(from_bare.scores.len(), 2);
        assert_eq!(from_bare.scores[0].question_id, "Q1");
    }

    #[tokio::test]
    async fn prompt_carries_questions_and_transcripts() {
        let client = MockLlmClient::with(vec![Ok(r#"{
            "totalScore": 5.0,
            "feedback": "ok",
            "scores": [
                {"questionId": "Q1", "score": 5.0, "feedback": "ok"},
                {"questionId": "Q2", "score": 5.0, "feedback": "ok"}
            ]
        }"#
        .to_string())]);

        let service = EvaluationService::new(Arc::clone(&client) as Arc<dyn LlmClient>);
        service.evaluate(&input()).await.unwrap();

        let prompt = client.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Explain the box model in CSS"));
        assert!(prompt.contains("An in-memory representation of the DOM"));
        assert!(prompt.contains("Sarah Wilson"));
    }

    #[tokio::test]
    async fn partial_coverage_fails_without_a_report() {
        // Model grades only one of two questions
        let client = MockLlmClient::with(vec![Ok(r#"{
            "totalScore": 7.0,
            "feedback": "ok",
            "scores": [{"questionId": "Q1", "score": 7.0, "feedback": "fine"}]
        }"#
        .to_string())]);

        let err = EvaluationService::new(client)
            .evaluate(&input())
            .await
            .unwrap_err();

        assert!(matches!(err, EvaluationError::QuestionCoverageMismatch { .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn transport_failures_map_to_retryable_errors() {
        let unavailable = MockLlmClient::with(vec![Err(LlmError::Unavailable("503".to_string()))]);
        let err = EvaluationService::new(unavailable)
            .evaluate(&input())
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::ServiceUnavailable(_)));
        assert!(err.is_retryable());

        let timed_out = MockLlmClient::with(vec![Err(LlmError::Timeout(60))]);
        let err = EvaluationService::new(timed_out)
            .evaluate(&input())
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::ServiceTimeout(60)));
        assert!(err.is_retryable());
    }
}
