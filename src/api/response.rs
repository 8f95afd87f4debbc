//! REST API endpoint for recording candidate responses

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use url::Url;
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::service::ResponseService;
use crate::service::response::NewResponse;

/// Request body for submitting a response
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitResponseRequest {
    pub interview_id: String,
    pub question_id: String,
    /// Transcribed answer; may be empty when the candidate said nothing
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub audio_url: Option<Url>,
    pub device_id: String,
}

/// Record one response for an in-progress interview
#[utoipa::path(
    post,
    path = "/v1/responses",
    request_body = SubmitResponseRequest,
    responses(
        (status = 201, description = "Response recorded", body = crate::model::Response),
        (status = 403, description = "Device mismatch"),
        (status = 404, description = "Interview or question not found"),
        (status = 409, description = "Response already recorded or interview not in progress"),
        (status = 500, description = "Internal server error")
    ),
    tag = "responses"
)]
#[post("/v1/responses")]
pub async fn submit_response(
    service: web::Data<ResponseService>,
    body: web::Json<SubmitResponseRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    if body.interview_id.trim().is_empty()
        || body.question_id.trim().is_empty()
        || body.device_id.trim().is_empty()
    {
        return Err(ApiError::BadRequest(
            "interview_id, question_id, and device_id are required".to_string(),
        ));
    }

    let response = service
        .submit(NewResponse {
            interview_id: body.interview_id,
            question_id: body.question_id,
            transcript: body.transcript,
            audio_url: body.audio_url,
            device_id: body.device_id,
        })
        .await?;

    Ok(HttpResponse::Created().json(response))
}

/// Configure response routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_response);
}
