//! REST API endpoint for evaluation report generation

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::service::ReportService;

/// Request body for generating a report
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateReportRequest {
    pub interview_id: String,
    pub device_id: String,
}

/// Evaluate a completed interview and persist its report
///
/// The interview must be completed, device-matched, and not yet evaluated.
/// A 502 with `external_service_error` is retryable; one with
/// `invalid_model_output` is not without investigation.
#[utoipa::path(
    post,
    path = "/v1/reports",
    request_body = GenerateReportRequest,
    responses(
        (status = 201, description = "Report created", body = crate::model::Report),
        (status = 403, description = "Device mismatch"),
        (status = 404, description = "Interview not found"),
        (status = 409, description = "Interview not completed or report already exists"),
        (status = 502, description = "Generative service failed or returned invalid output"),
        (status = 500, description = "Internal server error")
    ),
    tag = "reports"
)]
#[post("/v1/reports")]
pub async fn generate_report(
    service: web::Data<ReportService>,
    body: web::Json<GenerateReportRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    if body.interview_id.trim().is_empty() || body.device_id.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "interview_id and device_id are required".to_string(),
        ));
    }

    let report = service.generate(&body.interview_id, &body.device_id).await?;

    Ok(HttpResponse::Created().json(report))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(generate_report);
}
