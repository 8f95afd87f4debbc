pub mod config;
pub mod evaluation;
pub mod interview;
pub mod report;
pub mod test;

pub use config::{Config, EvaluationConfig};
pub use evaluation::{EvaluationInput, EvaluationReport, ResponsePair, ScoreResult};
pub use interview::{Interview, InterviewStatus, Response};
pub use report::{QuestionScore, Report};
pub use test::{Question, Test, TestStatus};
