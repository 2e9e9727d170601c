#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use faq_rag::{
    embeddings::HashingEmbedder,
    error::{Error, Result},
    generation::GenerationClient,
    index::RedbVectorIndex,
    ingestion::{KnowledgeBaseBuilder, SourceLocation},
    orchestrator::RagOrchestrator,
    retrieval::RetrievalEngine,
    types::{GenerationResult, KnowledgeEntry},
};
use tempfile::TempDir;

pub const COLLECTION: &str = "faq_collection";

/// Returns the prompt it was given, so tests can see the grounding context
pub struct EchoGenerator;

#[async_trait]
impl GenerationClient for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        Ok(GenerationResult {
            text: prompt.to_string(),
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "echo"
    }

    fn model(&self) -> &str {
        "echo"
    }
}

/// Always fails as if the backend were down
pub struct DownGenerator;

#[async_trait]
impl GenerationClient for DownGenerator {
    async fn generate(&self, _prompt: &str) -> Result<GenerationResult> {
        Err(Error::BackendUnreachable("connection refused".to_string()))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "down"
    }

    fn model(&self) -> &str {
        "down"
    }
}

pub fn payment_entry() -> KnowledgeEntry {
    KnowledgeEntry::new(
        "faq001",
        "What are my payment options?",
        "You can pay online, by direct debit, or by phone.",
    )
}

/// Build `entries` into a fresh index and wire an orchestrator around it
pub async fn orchestrator_with(
    entries: Vec<KnowledgeEntry>,
    generator: Arc<dyn GenerationClient>,
) -> (TempDir, RagOrchestrator) {
    let dir = TempDir::new().unwrap();
    let index = Arc::new(RedbVectorIndex::open(dir.path().join("kb.redb")).unwrap());
    let embedder = Arc::new(HashingEmbedder::new(256).unwrap());

    KnowledgeBaseBuilder::new(embedder.clone(), index.clone(), COLLECTION)
        .build(&SourceLocation::Entries(entries))
        .await
        .unwrap();

    let retrieval = RetrievalEngine::new(embedder, index, COLLECTION);
    (dir, RagOrchestrator::new(retrieval, generator))
}
