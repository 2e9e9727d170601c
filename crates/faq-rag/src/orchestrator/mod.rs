//! Request-time orchestration

mod pipeline;
mod service;

pub use pipeline::{verify_collection, AnswerOutcome, RagOrchestrator, RequestStage, FALLBACK_ANSWER};
pub use service::RagService;
