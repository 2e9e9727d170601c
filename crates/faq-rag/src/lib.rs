//! faq-rag: Retrieval-augmented FAQ answering
//!
//! Indexes a curated question/answer knowledge base into a persistent vector
//! index, retrieves the closest entries for a user query and asks an LLM for
//! an answer grounded only in that context. Served over HTTP with a single
//! chat endpoint.

pub mod config;
pub mod embeddings;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod orchestrator;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use embeddings::EmbeddingProvider;
pub use error::{Error, Result};
pub use generation::{GenerationClient, PromptBuilder};
pub use index::{CollectionManifest, VectorIndex};
pub use ingestion::{BuildReport, KnowledgeBaseBuilder, SourceLocation};
pub use orchestrator::{RagOrchestrator, RagService, FALLBACK_ANSWER};
pub use retrieval::RetrievalEngine;
pub use types::{ChatRequest, ChatResponse, KnowledgeEntry, RetrievedContext, RetrievedDocument};
