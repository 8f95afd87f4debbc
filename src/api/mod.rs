//! HTTP surface: route handlers, error mapping, and OpenAPI documentation

pub mod error;
pub mod health;
pub mod interview;
pub mod openapi;
pub mod report;
pub mod response;

pub use error::ApiError;

use utoipa::OpenApi;

use crate::model;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        health::readiness,
        test::create_test,
        test::update_test,
        test::list_test_reports,
        interview::start_interview,
        interview::get_interview,
        interview::update_interview,
        response::submit_response,
        report::generate_report,
    ),
    components(schemas(
        model::Test,
        model::TestStatus,
        model::Question,
        model::Interview,
        model::InterviewStatus,
        model::Response,
        model::Report,
        model::QuestionScore,
        test::CreateTestRequest,
        test::CreateQuestionRequest,
        test::UpdateTestRequest,
        test::TestReportsResponse,
        test::TestReportView,
        test::InterviewSummary,
        interview::StartInterviewRequest,
        interview::StartInterviewResponse,
        interview::UpdateInterviewRequest,
        interview::InterviewDetailResponse,
        response::SubmitResponseRequest,
        report::GenerateReportRequest,
        health::HealthStatus,
        health::ReadinessStatus,
        health::DependencyHealth,
    )),
    tags(
        (name = "tests", description = "Test authoring and report listing"),
        (name = "interviews", description = "Interview session lifecycle"),
        (name = "responses", description = "Candidate response recording"),
        (name = "reports", description = "AI evaluation report generation"),
        (name = "health", description = "Service health probes"),
    )
)]
pub struct ApiDoc;
