//! Shared generative-model client and interaction utilities
//!
//! Provides the single text-generation boundary used by the evaluation
//! pipeline, behind an object-safe trait so tests can inject a fake.

use std::time::Duration;

use async_trait::async_trait;
use rig::completion::Prompt;
use rig::prelude::*;
use rig::providers::gemini;

use crate::model::EvaluationConfig;

/// Environment variable overriding the evaluation model
const ENV_EVALUATION_MODEL: &str = "HIREFAST_EVALUATION_MODEL";

/// Default model for interview evaluation
const DEFAULT_MODEL: &str = gemini::completion::GEMINI_2_0_FLASH;

/// Failure modes of a single generation call
///
/// Both are transient from the caller's point of view; retry policy belongs
/// to the caller, never to the client itself.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Generative service unavailable: {0}")]
    Unavailable(String),

    #[error("Generative service timed out after {0}s")]
    Timeout(u64),
}

/// One-shot text generation against an external model
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one prompt and return the raw response text
    ///
    /// At-most-once: no retries, no deduplication, no caching.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError>;

    fn provider_name(&self) -> &'static str;

    fn model(&self) -> &str;
}

/// Gemini-backed client
pub struct GeminiClient {
    client: gemini::Client,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a new client with the provided API key
    ///
    /// The model is resolved from `HIREFAST_EVALUATION_MODEL`, then the
    /// config file, then the default.
    pub fn new(api_key: &str, config: &EvaluationConfig) -> Result<Self, String> {
        let client = gemini::Client::new(api_key);

        let model = std::env::var(ENV_EVALUATION_MODEL)
            .ok()
            .or_else(|| config.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        tracing::info!(model = %model, timeout_seconds = config.timeout_seconds, "Gemini client initialized");

        Ok(Self {
            client,
            model,
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(system)
            .temperature(0.2)
            .build();

        match tokio::time::timeout(self.timeout, agent.prompt(prompt)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(LlmError::Unavailable(e.to_string())),
            Err(_) => Err(LlmError::Timeout(self.timeout.as_secs())),
        }
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
