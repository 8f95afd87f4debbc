//! Response recording service

use chrono::Utc;
use url::Url;
use uuid::Uuid;

use crate::db::DbError;
use crate::db::repository::{InterviewRepository, TestRepository};
use crate::model::{InterviewStatus, Response};

#[derive(Debug, thiserror::Error)]
pub enum ResponseServiceError {
    #[error("Database error: {0}")]
    DbError(#[from] DbError),

    #[error("Interview not found: {0}")]
    InterviewNotFound(String),

    #[error("Device does not match interview session")]
    UnauthorizedDevice,

    #[error("Interview is not in progress")]
    NotInProgress,

    #[error("Question {0} does not belong to this interview's test")]
    QuestionMismatch(String),

    #[error("Response already recorded for question {0}")]
    Duplicate(String),
}

/// A response as submitted by the candidate's device
#[derive(Debug, Clone)]
pub struct NewResponse {
    pub interview_id: String,
    pub question_id: String,
    pub transcript: String,
    pub audio_url: Option<Url>,
    pub device_id: String,
}

/// Service for recording candidate responses
pub struct ResponseService {
    interview_repository: InterviewRepository,
    test_repository: TestRepository,
}

impl ResponseService {
    pub fn new(interview_repository: InterviewRepository, test_repository: TestRepository) -> Self {
        Self {
            interview_repository,
            test_repository,
        }
    }

    /// Record one response against an in-progress interview
    ///
    /// The (interview, question) pair must be unanswered; the question must
    /// belong to the interview's test.
    pub async fn submit(&self, new: NewResponse) -> Result<Response, ResponseServiceError> {
        let interview = match self.interview_repository.get_by_id(&new.interview_id).await {
            Ok(interview) => interview,
            Err(DbError::NotFound(id)) => return Err(ResponseServiceError::InterviewNotFound(id)),
            Err(e) => return Err(e.into()),
        };

        if interview.device_id != new.device_id {
            return Err(ResponseServiceError::UnauthorizedDevice);
        }

        if interview.status != InterviewStatus::InProgress {
            return Err(ResponseServiceError::NotInProgress);
        }

        let test = self.test_repository.get_by_id(&interview.test_id).await?;
        if !test.questions.iter().any(|q| q.id == new.question_id) {
            return Err(ResponseServiceError::QuestionMismatch(new.question_id));
        }

        let response = Response {
            id: Uuid::new_v4().to_string(),
            interview_id: new.interview_id,
            question_id: new.question_id,
            transcript: new.transcript,
            audio_url: new.audio_url,
            created_at: Utc::now(),
        };

        match self.interview_repository.insert_response(&response).await {
            Ok(()) => {
                tracing::info!(
                    id = %response.id,
                    interview_id = %response.interview_id,
                    question_id = %response.question_id,
                    "Response recorded"
                );
                Ok(response)
            }
            Err(DbError::Conflict(_)) => {
                Err(ResponseServiceError::Duplicate(response.question_id))
            }
            Err(e) => Err(e.into()),
        }
    }
}
