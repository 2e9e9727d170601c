//! The retrieve → prompt → generate pipeline behind every answer

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::config::RagConfig;
use crate::embeddings::{self, EmbeddingProvider};
use crate::error::{Error, Result};
use crate::generation::{ChatCompletionsClient, GenerationClient, PromptBuilder};
use crate::index::{RedbVectorIndex, VectorIndex};
use crate::retrieval::RetrievalEngine;
use crate::types::RetrievedContext;

/// Answer returned when the generation backend fails
pub const FALLBACK_ANSWER: &str =
    "I'm sorry, but I encountered an issue while trying to generate a response. Please try again later.";

/// Per-request pipeline stages, entered strictly in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStage {
    Embedding,
    Retrieving,
    Prompting,
    Generating,
    Done,
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestStage::Embedding => "embedding",
            RequestStage::Retrieving => "retrieving",
            RequestStage::Prompting => "prompting",
            RequestStage::Generating => "generating",
            RequestStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Everything produced while answering one query
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub answer: String,
    pub context: RetrievedContext,
    pub prompt: String,
    /// The answer is the fallback text because generation failed
    pub degraded: bool,
}

/// Composes retrieval, prompt rendering and generation
///
/// Built once at startup and shared behind an `Arc`; holds no per-request
/// state, so concurrent `answer` calls are independent.
pub struct RagOrchestrator {
    retrieval: RetrievalEngine,
    generator: Arc<dyn GenerationClient>,
    fallback: String,
}

impl RagOrchestrator {
    /// Assemble from already-constructed components
    pub fn new(retrieval: RetrievalEngine, generator: Arc<dyn GenerationClient>) -> Self {
        Self {
            retrieval,
            generator,
            fallback: FALLBACK_ANSWER.to_string(),
        }
    }

    /// Construct every component from configuration
    ///
    /// Fails if the embedder cannot be reached, the index cannot be opened,
    /// or the index was built with a different embedding configuration.
    pub async fn initialize(config: &RagConfig) -> Result<Self> {
        tracing::info!("Initializing RAG orchestrator...");

        let embedder = embeddings::from_config(&config.embeddings).await?;
        if !embedder.health_check().await? {
            return Err(Error::embedding(format!(
                "{} embedder is not reachable",
                embedder.name()
            )));
        }

        let index: Arc<dyn VectorIndex> =
            Arc::new(RedbVectorIndex::open(&config.vector_db.storage_path)?);
        verify_collection(index.as_ref(), embedder.as_ref(), &config.vector_db.collection).await?;

        let generator = Arc::new(ChatCompletionsClient::new(&config.llm)?);
        if !generator.health_check().await.unwrap_or(false) {
            tracing::warn!(
                "Generation backend at {} is not responding; answers will fall back until it is",
                config.llm.base_url
            );
        }
        tracing::info!(
            "Generation client ready (model: {}, temperature: {})",
            generator.model(),
            config.llm.temperature
        );

        let retrieval = RetrievalEngine::new(embedder, index, config.vector_db.collection.clone())
            .with_top_k(config.retrieval.top_k);

        tracing::info!("RAG orchestrator initialized successfully");
        Ok(Self::new(retrieval, generator))
    }

    /// Answer a query
    ///
    /// Generation failures produce the fallback text rather than an error;
    /// embedding and index failures surface as `ServiceUnavailable`.
    pub async fn answer(&self, query: &str) -> Result<String> {
        Ok(self.answer_detailed(query).await?.answer)
    }

    /// Answer a query, keeping the retrieved context and rendered prompt
    pub async fn answer_detailed(&self, query: &str) -> Result<AnswerOutcome> {
        if query.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }

        let start = Instant::now();
        tracing::info!("Processing RAG request for query: '{}'", query);

        enter(RequestStage::Embedding);
        let query_embedding = self
            .retrieval
            .embedder()
            .embed(query)
            .await
            .map_err(|e| unavailable("embedding", e))?;

        enter(RequestStage::Retrieving);
        let context = self
            .retrieval
            .search(&query_embedding, self.retrieval.top_k())
            .await
            .map_err(|e| unavailable("retrieval", e))?;
        if context.is_empty() {
            tracing::warn!("No relevant context documents found for the query");
        }

        enter(RequestStage::Prompting);
        let prompt = PromptBuilder::build(query, &context);

        enter(RequestStage::Generating);
        let (answer, degraded) = match self.generator.generate(&prompt).await {
            Ok(result) if !result.text.is_empty() => (result.text, false),
            Ok(_) => {
                tracing::warn!("Generation backend returned an empty answer");
                (self.fallback.clone(), true)
            }
            Err(e) => {
                tracing::warn!("Error communicating with generation backend: {}", e);
                (self.fallback.clone(), true)
            }
        };

        enter(RequestStage::Done);
        tracing::info!(
            "Answered in {}ms ({} context documents{})",
            start.elapsed().as_millis(),
            context.len(),
            if degraded { ", degraded" } else { "" }
        );

        Ok(AnswerOutcome {
            answer,
            context,
            prompt,
            degraded,
        })
    }
}

fn enter(stage: RequestStage) {
    tracing::debug!(%stage, "entering stage");
}

fn unavailable(stage: &str, e: Error) -> Error {
    tracing::error!("RAG request failed during {}: {}", stage, e);
    Error::ServiceUnavailable(format!("{} failed: {}", stage, e))
}

/// Check that `collection` was built with the same embedding configuration
/// as `embedder`; a missing collection is allowed and only logged
pub async fn verify_collection(
    index: &dyn VectorIndex,
    embedder: &dyn EmbeddingProvider,
    collection: &str,
) -> Result<()> {
    match index.manifest(collection).await? {
        Some(manifest) => {
            manifest.ensure_compatible(embedder.model_id(), embedder.dimensions())?;
            tracing::info!(
                "Connected to collection '{}' with {} items (built {})",
                collection,
                index.count(collection).await?,
                manifest.built_at
            );
        }
        None => {
            tracing::warn!(
                "Collection '{}' does not exist yet; every answer will lack knowledge base context until it is built",
                collection
            );
        }
    }
    Ok(())
}
