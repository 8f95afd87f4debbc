//! Interview sessions and recorded responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

/// Lifecycle status of an interview session
///
/// `InProgress` is the only non-terminal state. Transitions are one-way:
/// an in-progress interview may move to any terminal state, and terminal
/// states are frozen. Only `Completed` interviews are eligible for
/// evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl InterviewStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, InterviewStatus::InProgress)
    }

    /// Whether `self -> next` is a legal lifecycle transition
    pub fn can_transition_to(self, next: InterviewStatus) -> bool {
        matches!(self, InterviewStatus::InProgress) && next.is_terminal()
    }
}

/// One candidate's attempt at a test, bound to a device
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Interview {
    pub id: String,
    pub test_id: String,
    /// Opaque identifier of the device the session is bound to
    pub device_id: String,
    /// Filled in by the candidate during the session, may be empty
    pub candidate_name: String,
    pub status: InterviewStatus,
    pub started_at: DateTime<Utc>,
    /// Set when the interview reaches a terminal status
    pub completed_at: Option<DateTime<Utc>>,
}

/// A recorded answer to one question of an interview
///
/// At most one response exists per (interview, question) pair; the
/// persistence layer enforces this with a uniqueness constraint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Response {
    pub id: String,
    pub interview_id: String,
    pub question_id: String,
    /// Transcribed answer text, may be empty
    pub transcript: String,
    /// Location of the recorded audio, if any
    pub audio_url: Option<Url>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_progress_is_the_only_non_terminal_status() {
        assert!(!InterviewStatus::InProgress.is_terminal());
        assert!(InterviewStatus::Completed.is_terminal());
        assert!(InterviewStatus::Failed.is_terminal());
        assert!(InterviewStatus::Cancelled.is_terminal());
    }

    #[test]
    fn transitions_only_leave_in_progress() {
        let terminal = [
            InterviewStatus::Completed,
            InterviewStatus::Failed,
            InterviewStatus::Cancelled,
        ];

        for next in terminal {
            assert!(InterviewStatus::InProgress.can_transition_to(next));
        }

        // Terminal states are frozen
        for from in terminal {
            for next in [InterviewStatus::InProgress, InterviewStatus::Completed] {
                assert!(!from.can_transition_to(next));
            }
        }

        // No self-transition while running
        assert!(!InterviewStatus::InProgress.can_transition_to(InterviewStatus::InProgress));
    }
}
