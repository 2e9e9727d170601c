//! Offline knowledge base build: load → normalize → embed → rebuild index

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::embeddings::{ensure_dimensions, EmbeddingProvider};
use crate::error::{Error, Result};
use crate::index::{CollectionManifest, DistanceMetric, VectorIndex};
use crate::types::{EmbeddableDocument, IndexedVector, KnowledgeEntry};

use super::source::SourceLocation;

/// Summary of a completed build
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub collection: String,
    pub entries: usize,
    pub embedding_model: String,
    pub dimensions: usize,
    pub source_digest: String,
    pub elapsed: Duration,
}

/// Rebuilds a collection from a knowledge base source
///
/// All-or-nothing: the index is only touched after every document has been
/// embedded, so a failed build leaves the previous collection in place.
pub struct KnowledgeBaseBuilder {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    collection: String,
}

impl KnowledgeBaseBuilder {
    /// Create a builder writing into `collection`
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            index,
            collection: collection.into(),
        }
    }

    /// Normalize entries into embeddable documents, preserving order
    pub fn prepare_documents(entries: &[KnowledgeEntry]) -> Vec<EmbeddableDocument> {
        entries.iter().map(EmbeddableDocument::from).collect()
    }

    /// Run the full build
    pub async fn build(&self, source: &SourceLocation) -> Result<BuildReport> {
        let start = Instant::now();

        let source = source.load()?;
        let documents = Self::prepare_documents(&source.entries);
        tracing::info!("Preprocessed {} documents for embedding", documents.len());

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        tracing::info!(
            "Generating embeddings with {} ({})",
            self.embedder.name(),
            self.embedder.model_id()
        );
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != documents.len() {
            return Err(Error::embedding(format!(
                "Embedder returned {} vectors for {} documents",
                embeddings.len(),
                documents.len()
            )));
        }

        let dimensions = self.embedder.dimensions();
        let vectors = documents
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (document, embedding))| {
                let embedding = ensure_dimensions(embedding, dimensions)?;
                Ok(IndexedVector::new(format!("doc_{}", i), document, embedding))
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::info!("Generated {} embeddings", vectors.len());

        let manifest = CollectionManifest {
            collection: self.collection.clone(),
            embedding_model: self.embedder.model_id().to_string(),
            dimensions,
            distance_metric: DistanceMetric::Cosine,
            entry_count: vectors.len(),
            source_digest: source.digest.clone(),
            built_at: Utc::now(),
        };

        let entries = vectors.len();
        self.index
            .rebuild(&self.collection, vectors, manifest)
            .await?;

        let report = BuildReport {
            collection: self.collection.clone(),
            entries,
            embedding_model: self.embedder.model_id().to_string(),
            dimensions,
            source_digest: source.digest,
            elapsed: start.elapsed(),
        };

        tracing::info!(
            "Knowledge base build completed: {} entries in '{}' ({:?})",
            report.entries,
            report.collection,
            report.elapsed
        );
        Ok(report)
    }
}
