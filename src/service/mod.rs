pub mod evaluation;
pub mod interview;
pub mod llm;
pub mod report;
pub mod response;
pub mod test;

pub use evaluation::EvaluationService;
pub use interview::InterviewService;
pub use llm::{GeminiClient, LlmClient};
pub use report::ReportService;
pub use response::ResponseService;
pub use test::TestService;
