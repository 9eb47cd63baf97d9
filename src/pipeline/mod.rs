pub mod job_runner;
pub mod orchestrator;
pub mod page_processor;

pub use orchestrator::{PipelineConfig, process_document, process_document_pages};
