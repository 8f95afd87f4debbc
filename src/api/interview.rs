//! REST API endpoints for interview sessions

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::model::{Interview, InterviewStatus, Question, Report, Response, Test};
use crate::service::InterviewService;

/// Request body for starting an interview
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartInterviewRequest {
    pub access_code: String,
    pub device_id: String,
}

/// Response body for a started interview
#[derive(Debug, Serialize, ToSchema)]
pub struct StartInterviewResponse {
    pub interview_id: String,
    pub test_title: String,
    pub total_questions: usize,
    /// Ordered by `order_index`
    pub questions: Vec<Question>,
}

/// Request body for an interview status transition
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInterviewRequest {
    pub status: InterviewStatus,
    pub device_id: String,
    #[serde(default)]
    pub candidate_name: Option<String>,
}

/// Response body for the interview detail endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct InterviewDetailResponse {
    pub interview: Interview,
    pub test: Test,
    pub responses: Vec<Response>,
    pub report: Option<Report>,
}

/// Start an interview session against a test's access code
#[utoipa::path(
    post,
    path = "/v1/interviews",
    request_body = StartInterviewRequest,
    responses(
        (status = 201, description = "Interview started", body = StartInterviewResponse),
        (status = 404, description = "Invalid access code"),
        (status = 500, description = "Internal server error")
    ),
    tag = "interviews"
)]
#[post("/v1/interviews")]
pub async fn start_interview(
    service: web::Data<InterviewService>,
    body: web::Json<StartInterviewRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    if body.access_code.trim().is_empty() || body.device_id.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "access_code and device_id are required".to_string(),
        ));
    }

    let started = service.start(&body.access_code, &body.device_id).await?;

    Ok(HttpResponse::Created().json(StartInterviewResponse {
        interview_id: started.interview.id,
        test_title: started.test.title,
        total_questions: started.test.questions.len(),
        questions: started.test.questions,
    }))
}

/// Get an interview with its test, responses, and report
#[utoipa::path(
    get,
    path = "/v1/interviews/{id}",
    params(("id" = String, Path, description = "Interview ID")),
    responses(
        (status = 200, description = "Interview retrieved", body = InterviewDetailResponse),
        (status = 404, description = "Interview not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "interviews"
)]
#[get("/v1/interviews/{id}")]
pub async fn get_interview(
    service: web::Data<InterviewService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let detail = service.get_detail(&id).await?;

    Ok(HttpResponse::Ok().json(InterviewDetailResponse {
        interview: detail.interview,
        test: detail.test,
        responses: detail.responses,
        report: detail.report,
    }))
}

/// Apply a status transition to an interview
///
/// Completing an interview makes it eligible for evaluation but does not
/// itself generate a report.
#[utoipa::path(
    patch,
    path = "/v1/interviews/{id}",
    params(("id" = String, Path, description = "Interview ID")),
    request_body = UpdateInterviewRequest,
    responses(
        (status = 200, description = "Interview updated", body = Interview),
        (status = 400, description = "Illegal status transition"),
        (status = 403, description = "Device mismatch"),
        (status = 404, description = "Interview not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "interviews"
)]
#[patch("/v1/interviews/{id}")]
pub async fn update_interview(
    service: web::Data<InterviewService>,
    path: web::Path<String>,
    body: web::Json<UpdateInterviewRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let body = body.into_inner();

    if body.device_id.trim().is_empty() {
        return Err(ApiError::BadRequest("device_id is required".to_string()));
    }

    let interview = service
        .update_status(
            &id,
            &body.device_id,
            body.status,
            body.candidate_name.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(interview))
}

/// Configure interview routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(start_interview)
        .service(get_interview)
        .service(update_interview);
}
