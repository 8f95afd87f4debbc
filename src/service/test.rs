//! Test authoring service

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::db::DbError;
use crate::db::repository::TestRepository;
use crate::model::{Question, Test, TestStatus};

const ACCESS_CODE_LENGTH: usize = 6;
const ACCESS_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, thiserror::Error)]
pub enum TestServiceError {
    #[error("Database error: {0}")]
    DbError(#[from] DbError),
}

/// A question as submitted by the test author
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub content: String,
    pub time_limit_seconds: i32,
}

/// Service for creating and managing tests
pub struct TestService {
    repository: TestRepository,
}

impl TestService {
    pub fn new(repository: TestRepository) -> Self {
        Self { repository }
    }

    /// Create a test with its questions
    ///
    /// Assigns ids, order indexes by submission position, and a fresh access
    /// code.
    pub async fn create(
        &self,
        title: String,
        status: TestStatus,
        questions: Vec<NewQuestion>,
    ) -> Result<Test, TestServiceError> {
        let test_id = Uuid::new_v4().to_string();

        let questions: Vec<Question> = questions
            .into_iter()
            .enumerate()
            .map(|(i, q)| Question {
                id: Uuid::new_v4().to_string(),
                test_id: test_id.clone(),
                content: q.content,
                time_limit_seconds: q.time_limit_seconds,
                order_index: i as i32,
            })
            .collect();

        let test = Test {
            id: test_id,
            title,
            access_code: generate_access_code(),
            status,
            created_at: Utc::now(),
            questions,
        };

        self.repository.insert(&test).await?;

        tracing::info!(id = %test.id, access_code = %test.access_code, "Test created");
        Ok(test)
    }

    /// Get a test by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Test, TestServiceError> {
        self.repository
            .get_by_id(id)
            .await
            .map_err(TestServiceError::from)
    }

    /// Update a test's status
    pub async fn update_status(&self, id: &str, status: TestStatus) -> Result<Test, TestServiceError> {
        self.repository.update_status(id, status).await?;
        self.get_by_id(id).await
    }
}

/// Generate a short uppercase alphanumeric access code
fn generate_access_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ACCESS_CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..ACCESS_CODE_CHARSET.len());
            ACCESS_CODE_CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_codes_use_the_expected_alphabet() {
        for _ in 0..100 {
            let code = generate_access_code();
            assert_eq!(code.len(), ACCESS_CODE_LENGTH);
            assert!(
                code.bytes().all(|b| ACCESS_CODE_CHARSET.contains(&b)),
                "unexpected character in access code {}",
                code
            );
        }
    }
}
