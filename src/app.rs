//! Application state and service initialization
//!
//! This module centralizes all service initialization and dependency
//! injection, making it easier to manage the application lifecycle and test
//! services.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::repository::{InterviewRepository, ReportRepository, TestRepository};
use crate::model::Config;
use crate::service::{
    EvaluationService, GeminiClient, InterviewService, LlmClient, ReportService, ResponseService,
    TestService,
};

/// Environment variable carrying the generative-service API key
const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Application state containing all services and shared resources
///
/// This struct centralizes service initialization and makes it easy to inject
/// dependencies into Actix-web handlers.
pub struct AppState {
    /// Database connection pool
    pub db_pool: Arc<PgPool>,
    /// Test authoring service
    pub test_service: Arc<TestService>,
    /// Interview lifecycle service
    pub interview_service: Arc<InterviewService>,
    /// Response recording service
    pub response_service: Arc<ResponseService>,
    /// Report generation and listing service
    pub report_service: Arc<ReportService>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Database connection and schema initialization
    /// 2. Generative-model client initialization (requires GEMINI_API_KEY)
    /// 3. Service dependency graph construction
    pub async fn new(config: Config) -> Result<Self, AppError> {
        // Initialize PostgreSQL database
        let db_pool = crate::db::create_pool()
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        // Initialize database schema
        crate::db::init_schema(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        // Create shared model client (required)
        let api_key = std::env::var(ENV_GEMINI_API_KEY)
            .map_err(|_| AppError::MissingConfig(ENV_GEMINI_API_KEY))?;

        let llm_client: Arc<dyn LlmClient> = Arc::new(
            GeminiClient::new(&api_key, &config.evaluation)
                .map_err(|_| AppError::InvalidConfig("Invalid GEMINI_API_KEY"))?,
        );

        // Build service dependency graph
        let test_repository = TestRepository::new(db_pool.clone());
        let interview_repository = InterviewRepository::new(db_pool.clone());
        let report_repository = ReportRepository::new(db_pool.clone());

        let evaluation_service = Arc::new(EvaluationService::new(llm_client));

        let test_service = Arc::new(TestService::new(test_repository.clone()));

        let interview_service = Arc::new(InterviewService::new(
            interview_repository.clone(),
            test_repository.clone(),
            report_repository.clone(),
        ));

        let response_service = Arc::new(ResponseService::new(
            interview_repository.clone(),
            test_repository.clone(),
        ));

        let report_service = Arc::new(ReportService::new(
            interview_repository,
            test_repository,
            report_repository,
            evaluation_service,
        ));

        Ok(Self {
            db_pool: Arc::new(db_pool),
            test_service,
            interview_service,
            response_service,
            report_service,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Database initialization failed
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
