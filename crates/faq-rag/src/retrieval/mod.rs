//! Query-time semantic retrieval

use std::sync::Arc;

use crate::embeddings::EmbeddingProvider;
use crate::error::Result;
use crate::index::VectorIndex;
use crate::types::RetrievedContext;

/// Default number of documents retrieved per query
pub const DEFAULT_TOP_K: usize = 3;

/// Embeds queries and looks up their nearest knowledge base documents
///
/// No distance threshold is applied: whatever the index returns is passed
/// on, best match first. An empty result means the knowledge base has
/// nothing to offer and is not an error.
pub struct RetrievalEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    collection: String,
    top_k: usize,
}

impl RetrievalEngine {
    /// Create an engine over `collection`
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            index,
            collection: collection.into(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Override the default `k`
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Configured `k`
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Embedding provider used for queries
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Retrieve with the configured `k`
    pub async fn retrieve(&self, query: &str) -> Result<RetrievedContext> {
        self.retrieve_k(query, self.top_k).await
    }

    /// Retrieve at most `k` documents for `query`
    pub async fn retrieve_k(&self, query: &str, k: usize) -> Result<RetrievedContext> {
        let query_embedding = self.embedder.embed(query).await?;
        self.search(&query_embedding, k).await
    }

    /// Look up documents for an already-embedded query
    pub async fn search(&self, query_embedding: &[f32], k: usize) -> Result<RetrievedContext> {
        let results = self.index.query(&self.collection, query_embedding, k).await?;

        tracing::debug!(
            "Retrieved {} documents from '{}' (best distance: {:?})",
            results.len(),
            self.collection,
            results.first().map(|r| r.distance)
        );

        Ok(results)
    }
}
