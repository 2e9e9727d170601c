//! Persistent vector index for the knowledge base
//!
//! Collections are only ever replaced wholesale: a rebuild drops the
//! previous collection and writes the new one in a single transaction.

mod redb_index;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{IndexedVector, RetrievedDocument};

pub use redb_index::RedbVectorIndex;

/// Distance metric used for nearest-neighbor ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// `1 - cosine similarity`, in `0.0..=2.0`
    Cosine,
}

impl DistanceMetric {
    /// Distance between two vectors of equal length
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::Cosine => 1.0 - cosine_similarity(a, b),
        }
    }
}

/// Compute cosine similarity; zero vectors have similarity 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Build-time facts persisted with each collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionManifest {
    pub collection: String,
    /// Model identifier of the provider that produced the vectors
    pub embedding_model: String,
    pub dimensions: usize,
    pub distance_metric: DistanceMetric,
    pub entry_count: usize,
    /// SHA-256 of the knowledge base source, hex encoded
    pub source_digest: String,
    pub built_at: DateTime<Utc>,
}

impl CollectionManifest {
    /// Fail if query-time embeddings would live in a different space
    pub fn ensure_compatible(&self, model_id: &str, dimensions: usize) -> Result<()> {
        if self.embedding_model != model_id || self.dimensions != dimensions {
            return Err(Error::ConfigMismatch(format!(
                "collection '{}' was built with {} ({} dims) but the query embedder is {} ({} dims); rebuild the knowledge base",
                self.collection, self.embedding_model, self.dimensions, model_id, dimensions
            )));
        }
        Ok(())
    }
}

/// Trait for vector storage and nearest-neighbor search
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Replace `collection` with `vectors`
    async fn rebuild(
        &self,
        collection: &str,
        vectors: Vec<IndexedVector>,
        manifest: CollectionManifest,
    ) -> Result<()>;

    /// At most `k` nearest neighbors, ascending distance; a missing
    /// collection yields an empty result
    async fn query(
        &self,
        collection: &str,
        query_vector: &[f32],
        k: usize,
    ) -> Result<Vec<RetrievedDocument>>;

    /// Manifest written by the last rebuild, if any
    async fn manifest(&self, collection: &str) -> Result<Option<CollectionManifest>>;

    /// Number of vectors in `collection` (0 when missing)
    async fn count(&self, collection: &str) -> Result<usize>;

    /// Get index name for logging
    fn name(&self) -> &str;
}
