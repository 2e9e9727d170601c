//! Knowledge base ingestion

mod builder;
mod source;

pub use builder::{BuildReport, KnowledgeBaseBuilder};
pub use source::{KnowledgeSource, SourceLocation};
