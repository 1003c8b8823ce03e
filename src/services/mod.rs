pub mod chunk_planner;
pub mod compressor;
pub mod llm_service;
pub mod prompt;
pub mod report_writer;
pub mod retry;
pub mod sanitizer;

pub use chunk_planner::plan_chunks;
pub use compressor::{DigestLimits, RecordCompressor};
pub use llm_service::{GenerationRequest, LlmService, TextGenerator};
pub use report_writer::ReportWriter;
pub use retry::{RetryExecutor, RetryPolicy};
pub use sanitizer::sanitize;
