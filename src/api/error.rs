//! Unified API error handling
//!
//! This module provides a consistent error response format across all API
//! endpoints.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use uuid::Uuid;

use crate::service::evaluation::EvaluationError;

/// Standard error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
///
/// All API endpoints should return `Result<T, ApiError>` for consistent
/// error handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Test not found (404)
    #[error("Test not found: {0}")]
    TestNotFound(String),

    /// Interview not found (404)
    #[error("Interview not found: {0}")]
    InterviewNotFound(String),

    /// Unknown or inactive access code (404)
    #[error("Invalid access code: {0}")]
    InvalidAccessCode(String),

    /// Bad request / validation error (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Device does not match the session (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// State conflict, e.g. duplicate response or existing report (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    #[allow(dead_code)] // Reserved for handlers without a more specific mapping
    Internal(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),

    /// Generative service unreachable or timed out (502, retryable)
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Generative service answered, but its output failed validation (502)
    #[error("Invalid model output: {0}")]
    InvalidModelOutput(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_)
            | ApiError::TestNotFound(_)
            | ApiError::InterviewNotFound(_)
            | ApiError::InvalidAccessCode(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ExternalService(_) | ApiError::InvalidModelOutput(_) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::TestNotFound(_) => "test_not_found",
            ApiError::InterviewNotFound(_) => "interview_not_found",
            ApiError::InvalidAccessCode(_) => "invalid_access_code",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Conflict(_) => "conflict",
            ApiError::Internal(_) => "internal_error",
            ApiError::Database(_) => "database_error",
            ApiError::ExternalService(_) => "external_service_error",
            ApiError::InvalidModelOutput(_) => "invalid_model_output",
        };

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

// ============================================================================
// From conversions for service errors
// ============================================================================

impl From<crate::db::DbError> for ApiError {
    fn from(err: crate::db::DbError) -> Self {
        match err {
            crate::db::DbError::NotFound(id) => ApiError::NotFound(id),
            crate::db::DbError::Conflict(msg) => ApiError::Conflict(msg),
            _ => ApiError::Database(err.to_string()),
        }
    }
}

impl From<crate::service::test::TestServiceError> for ApiError {
    fn from(err: crate::service::test::TestServiceError) -> Self {
        match err {
            crate::service::test::TestServiceError::DbError(
                crate::db::DbError::NotFound(id),
            ) => ApiError::TestNotFound(id),
            crate::service::test::TestServiceError::DbError(e) => e.into(),
        }
    }
}

impl From<crate::service::interview::InterviewServiceError> for ApiError {
    fn from(err: crate::service::interview::InterviewServiceError) -> Self {
        use crate::service::interview::InterviewServiceError;
        match err {
            InterviewServiceError::InvalidAccessCode(code) => ApiError::InvalidAccessCode(code),
            InterviewServiceError::NotFound(id) => ApiError::InterviewNotFound(id),
            InterviewServiceError::UnauthorizedDevice => {
                ApiError::Forbidden("device does not match interview session".to_string())
            }
            InterviewServiceError::InvalidTransition { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            InterviewServiceError::DbError(e) => e.into(),
        }
    }
}

impl From<crate::service::response::ResponseServiceError> for ApiError {
    fn from(err: crate::service::response::ResponseServiceError) -> Self {
        use crate::service::response::ResponseServiceError;
        match err {
            ResponseServiceError::InterviewNotFound(id) => ApiError::InterviewNotFound(id),
            ResponseServiceError::UnauthorizedDevice => {
                ApiError::Forbidden("device does not match interview session".to_string())
            }
            ResponseServiceError::NotInProgress => ApiError::Conflict(err.to_string()),
            ResponseServiceError::QuestionMismatch(_) => ApiError::NotFound(err.to_string()),
            ResponseServiceError::Duplicate(_) => ApiError::Conflict(err.to_string()),
            ResponseServiceError::DbError(e) => e.into(),
        }
    }
}

impl From<crate::service::report::ReportServiceError> for ApiError {
    fn from(err: crate::service::report::ReportServiceError) -> Self {
        use crate::service::report::ReportServiceError;
        match err {
            ReportServiceError::InterviewNotFound(id) => ApiError::InterviewNotFound(id),
            ReportServiceError::TestNotFound(id) => ApiError::TestNotFound(id),
            ReportServiceError::UnauthorizedDevice => {
                ApiError::Forbidden("device does not match interview session".to_string())
            }
            ReportServiceError::InterviewNotCompleted => ApiError::Conflict(err.to_string()),
            ReportServiceError::ReportAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            ReportServiceError::NoResponses => ApiError::BadRequest(err.to_string()),
            ReportServiceError::Evaluation(e) => e.into(),
            ReportServiceError::DbError(e) => e.into(),
        }
    }
}

impl From<EvaluationError> for ApiError {
    fn from(err: EvaluationError) -> Self {
        if err.is_retryable() {
            ApiError::ExternalService(err.to_string())
        } else {
            ApiError::InvalidModelOutput(err.to_string())
        }
    }
}
