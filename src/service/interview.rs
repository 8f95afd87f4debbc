//! Interview session lifecycle service

use chrono::Utc;
use uuid::Uuid;

use crate::db::DbError;
use crate::db::repository::{InterviewRepository, ReportRepository, TestRepository};
use crate::model::{Interview, InterviewStatus, Report, Response, Test, TestStatus};

#[derive(Debug, thiserror::Error)]
pub enum InterviewServiceError {
    #[error("Database error: {0}")]
    DbError(#[from] DbError),

    #[error("Invalid access code: {0}")]
    InvalidAccessCode(String),

    #[error("Interview not found: {0}")]
    NotFound(String),

    #[error("Device does not match interview session")]
    UnauthorizedDevice,

    #[error("Illegal status transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: InterviewStatus,
        to: InterviewStatus,
    },
}

/// A freshly started interview together with the test it runs against
#[derive(Debug)]
pub struct StartedInterview {
    pub interview: Interview,
    pub test: Test,
}

/// An interview with everything attached to it
#[derive(Debug)]
pub struct InterviewDetail {
    pub interview: Interview,
    pub test: Test,
    pub responses: Vec<Response>,
    pub report: Option<Report>,
}

/// Service for starting and driving interview sessions
pub struct InterviewService {
    interview_repository: InterviewRepository,
    test_repository: TestRepository,
    report_repository: ReportRepository,
}

impl InterviewService {
    pub fn new(
        interview_repository: InterviewRepository,
        test_repository: TestRepository,
        report_repository: ReportRepository,
    ) -> Self {
        Self {
            interview_repository,
            test_repository,
            report_repository,
        }
    }

    /// Start an interview against an active test's access code
    ///
    /// Inactive tests are indistinguishable from unknown codes so access
    /// codes of drafts and archived tests leak nothing.
    pub async fn start(
        &self,
        access_code: &str,
        device_id: &str,
    ) -> Result<StartedInterview, InterviewServiceError> {
        let test = match self.test_repository.get_by_access_code(access_code).await {
            Ok(test) => test,
            Err(DbError::NotFound(_)) => {
                return Err(InterviewServiceError::InvalidAccessCode(
                    access_code.to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        if test.status != TestStatus::Active {
            return Err(InterviewServiceError::InvalidAccessCode(
                access_code.to_string(),
            ));
        }

        let interview = Interview {
            id: Uuid::new_v4().to_string(),
            test_id: test.id.clone(),
            device_id: device_id.to_string(),
            candidate_name: String::new(),
            status: InterviewStatus::InProgress,
            started_at: Utc::now(),
            completed_at: None,
        };

        self.interview_repository.insert(&interview).await?;

        tracing::info!(id = %interview.id, test_id = %test.id, "Interview started");
        Ok(StartedInterview { interview, test })
    }

    /// Get an interview by ID
    pub async fn get(&self, id: &str) -> Result<Interview, InterviewServiceError> {
        match self.interview_repository.get_by_id(id).await {
            Ok(interview) => Ok(interview),
            Err(DbError::NotFound(id)) => Err(InterviewServiceError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Get an interview with its test, responses, and report (if any)
    pub async fn get_detail(&self, id: &str) -> Result<InterviewDetail, InterviewServiceError> {
        let interview = self.get(id).await?;
        let test = self.test_repository.get_by_id(&interview.test_id).await?;
        let responses = self
            .interview_repository
            .responses_for_interview(id)
            .await?;
        let report = self.report_repository.get_by_interview(id).await?;

        Ok(InterviewDetail {
            interview,
            test,
            responses,
            report,
        })
    }

    /// Apply a status transition requested by the candidate's device
    ///
    /// Only `in_progress -> terminal` transitions are legal; the terminal
    /// transition stamps `completed_at`. Completing an interview does not
    /// trigger evaluation; that happens through the report service.
    pub async fn update_status(
        &self,
        id: &str,
        device_id: &str,
        next: InterviewStatus,
        candidate_name: Option<&str>,
    ) -> Result<Interview, InterviewServiceError> {
        let interview = self.get(id).await?;

        if interview.device_id != device_id {
            return Err(InterviewServiceError::UnauthorizedDevice);
        }

        if !interview.status.can_transition_to(next) {
            return Err(InterviewServiceError::InvalidTransition {
                from: interview.status,
                to: next,
            });
        }

        let completed_at = next.is_terminal().then(Utc::now);

        self.interview_repository
            .update_status(id, next, candidate_name, completed_at)
            .await?;

        tracing::info!(id = %id, status = ?next, "Interview status updated");
        self.get(id).await
    }
}
