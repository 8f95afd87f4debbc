//! Report generation and retrieval
//!
//! Sits between the HTTP layer and the evaluation pipeline: checks
//! eligibility, assembles the pipeline input from persisted rows, and
//! persists the validated result atomically.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::db::DbError;
use crate::db::repository::{InterviewRepository, ReportRepository, TestRepository};
use crate::model::{
    EvaluationInput, Interview, InterviewStatus, Question, QuestionScore, Report, Response,
    ResponsePair,
};
use crate::service::evaluation::{EvaluationError, EvaluationService};

#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error("Database error: {0}")]
    DbError(#[from] DbError),

    #[error("Interview not found: {0}")]
    InterviewNotFound(String),

    #[error("Test not found: {0}")]
    TestNotFound(String),

    #[error("Device does not match interview session")]
    UnauthorizedDevice,

    #[error("Interview is not completed")]
    InterviewNotCompleted,

    #[error("Report already exists for interview {0}")]
    ReportAlreadyExists(String),

    #[error("Interview has no recorded responses")]
    NoResponses,

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// One report with the interview it grades
#[derive(Debug)]
pub struct TestReportEntry {
    pub report: Report,
    pub interview: Interview,
    pub responses: Vec<Response>,
}

/// All reports for a test, with the test's question list
#[derive(Debug)]
pub struct TestReports {
    pub questions: Vec<Question>,
    pub entries: Vec<TestReportEntry>,
}

/// Service for generating and listing evaluation reports
pub struct ReportService {
    interview_repository: InterviewRepository,
    test_repository: TestRepository,
    report_repository: ReportRepository,
    evaluation_service: Arc<EvaluationService>,
}

impl ReportService {
    pub fn new(
        interview_repository: InterviewRepository,
        test_repository: TestRepository,
        report_repository: ReportRepository,
        evaluation_service: Arc<EvaluationService>,
    ) -> Self {
        Self {
            interview_repository,
            test_repository,
            report_repository,
            evaluation_service,
        }
    }

    /// Evaluate a completed interview and persist the report
    ///
    /// Eligibility: the interview exists, belongs to the requesting device,
    /// is `completed`, has no report yet, and has at least one recorded
    /// response. The report and its scores are written in one transaction;
    /// a concurrent generation attempt for the same interview loses on the
    /// persistence uniqueness constraint and surfaces as a conflict.
    pub async fn generate(
        &self,
        interview_id: &str,
        device_id: &str,
    ) -> Result<Report, ReportServiceError> {
        let interview = match self.interview_repository.get_by_id(interview_id).await {
            Ok(interview) => interview,
            Err(DbError::NotFound(id)) => return Err(ReportServiceError::InterviewNotFound(id)),
            Err(e) => return Err(e.into()),
        };

        if interview.device_id != device_id {
            return Err(ReportServiceError::UnauthorizedDevice);
        }

        if interview.status != InterviewStatus::Completed {
            return Err(ReportServiceError::InterviewNotCompleted);
        }

        if self
            .report_repository
            .exists_for_interview(interview_id)
            .await?
        {
            return Err(ReportServiceError::ReportAlreadyExists(
                interview_id.to_string(),
            ));
        }

        let input = self.build_evaluation_input(&interview).await?;

        tracing::info!(
            interview_id = %interview.id,
            questions = input.pairs.len(),
            "Generating evaluation report"
        );

        let evaluation = match self.evaluation_service.evaluate(&input).await {
            Ok(evaluation) => evaluation,
            Err(e) => {
                // Keep the offending model output in the logs for diagnosis
                if let Some(raw) = e.raw_payload() {
                    tracing::error!(
                        interview_id = %interview.id,
                        raw_output = %raw,
                        error = %e,
                        "Evaluation failed on model output"
                    );
                }
                return Err(e.into());
            }
        };

        let report = Report {
            id: Uuid::new_v4().to_string(),
            interview_id: interview.id.clone(),
            total_score: evaluation.total_score,
            feedback: evaluation.feedback,
            created_at: Utc::now(),
            scores: evaluation
                .scores
                .into_iter()
                .map(|s| QuestionScore {
                    id: Uuid::new_v4().to_string(),
                    question_id: s.question_id,
                    score: s.score,
                    feedback: s.feedback,
                })
                .collect(),
        };

        match self.report_repository.insert(&report).await {
            Ok(()) => {
                tracing::info!(
                    id = %report.id,
                    interview_id = %report.interview_id,
                    total_score = report.total_score,
                    "Report persisted"
                );
                Ok(report)
            }
            // Lost a race against a concurrent generation for this interview
            Err(DbError::Conflict(_)) => Err(ReportServiceError::ReportAlreadyExists(
                interview_id.to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Reports for a test's completed interviews, most recent first
    pub async fn list_for_test(&self, test_id: &str) -> Result<TestReports, ReportServiceError> {
        let test = match self.test_repository.get_by_id(test_id).await {
            Ok(test) => test,
            Err(DbError::NotFound(id)) => return Err(ReportServiceError::TestNotFound(id)),
            Err(e) => return Err(e.into()),
        };

        let reports = self.report_repository.list_for_test(test_id).await?;

        let mut entries = Vec::with_capacity(reports.len());
        for report in reports {
            let interview = self
                .interview_repository
                .get_by_id(&report.interview_id)
                .await?;
            let responses = self
                .interview_repository
                .responses_for_interview(&report.interview_id)
                .await?;
            entries.push(TestReportEntry {
                report,
                interview,
                responses,
            });
        }

        Ok(TestReports {
            questions: test.questions,
            entries,
        })
    }

    /// Assemble the pipeline input: responses joined to their question text,
    /// in question `order_index` order
    async fn build_evaluation_input(
        &self,
        interview: &Interview,
    ) -> Result<EvaluationInput, ReportServiceError> {
        let test = self.test_repository.get_by_id(&interview.test_id).await?;
        let responses = self
            .interview_repository
            .responses_for_interview(&interview.id)
            .await?;

        if responses.is_empty() {
            return Err(ReportServiceError::NoResponses);
        }

        let questions: HashMap<&str, &Question> = test
            .questions
            .iter()
            .map(|q| (q.id.as_str(), q))
            .collect();

        let mut pairs = Vec::with_capacity(responses.len());
        for response in &responses {
            let question = questions.get(response.question_id.as_str()).ok_or_else(|| {
                DbError::Serialization(format!(
                    "response {} references unknown question {}",
                    response.id, response.question_id
                ))
            })?;

            pairs.push(ResponsePair {
                question_id: question.id.clone(),
                question: question.content.clone(),
                transcript: response.transcript.clone(),
            });
        }

        Ok(EvaluationInput {
            candidate_name: interview.candidate_name.clone(),
            pairs,
        })
    }
}
