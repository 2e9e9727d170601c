//! Core types for the RAG pipeline

pub mod knowledge;
pub mod response;

pub use knowledge::{DocumentMetadata, EmbeddableDocument, IndexedVector, KnowledgeEntry};
pub use response::{ChatRequest, ChatResponse, GenerationResult, RetrievedContext, RetrievedDocument};
