//! Embedding providers
//!
//! The same provider configuration must be used to build the index and to
//! embed queries; the index manifest records which one was used.

mod hashing;
mod ollama;
#[cfg(feature = "onnx")]
mod onnx;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{EmbeddingBackend, EmbeddingConfig};
use crate::error::{Error, Result};

pub use hashing::HashingEmbedder;
pub use ollama::OllamaEmbedder;
#[cfg(feature = "onnx")]
pub use onnx::OnnxEmbedder;

/// Trait for generating text embeddings
///
/// Implementations:
/// - `OllamaEmbedder`: Ollama server (nomic-embed-text)
/// - `HashingEmbedder`: local feature hashing, no model download
/// - `OnnxEmbedder`: local all-MiniLM-L6-v2 (feature `onnx`)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order
    ///
    /// Default implementation calls `embed` sequentially.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Output dimensionality, fixed for the life of the provider
    fn dimensions(&self) -> usize;

    /// Model identifier recorded in the index manifest
    fn model_id(&self) -> &str;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Build the provider selected by configuration
pub async fn from_config(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.provider {
        EmbeddingBackend::Ollama => Arc::new(OllamaEmbedder::new(config)?),
        EmbeddingBackend::Hashing => Arc::new(HashingEmbedder::new(config.dimensions)?),
        #[cfg(feature = "onnx")]
        EmbeddingBackend::Onnx => Arc::new(OnnxEmbedder::new(config).await?),
        #[cfg(not(feature = "onnx"))]
        EmbeddingBackend::Onnx => {
            return Err(Error::Config(
                "embeddings.provider = \"onnx\" requires the `onnx` feature".to_string(),
            ))
        }
    };

    tracing::info!(
        "Embedding provider '{}' ready (model: {}, dimensions: {})",
        provider.name(),
        provider.model_id(),
        provider.dimensions()
    );

    Ok(provider)
}

/// Reject vectors whose length differs from the provider's dimensionality
pub(crate) fn ensure_dimensions(embedding: Vec<f32>, expected: usize) -> Result<Vec<f32>> {
    if embedding.len() != expected {
        return Err(Error::embedding(format!(
            "Expected {} dimensions, model returned {}",
            expected,
            embedding.len()
        )));
    }
    Ok(embedding)
}

/// L2-normalize in place; zero vectors are left untouched
pub(crate) fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for val in vector.iter_mut() {
            *val /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dimensions() {
        assert!(ensure_dimensions(vec![0.0; 4], 4).is_ok());
        assert!(matches!(
            ensure_dimensions(vec![0.0; 3], 4),
            Err(Error::EmbeddingUnavailable(_))
        ));
    }

    #[test]
    fn test_normalize() {
        let mut v = vec![3.0, 4.0];
        normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zero = vec![0.0; 3];
        normalize(&mut zero);
        assert_eq!(zero, vec![0.0; 3]);
    }

    #[tokio::test]
    async fn test_onnx_without_feature_is_config_error() {
        if cfg!(feature = "onnx") {
            return;
        }
        let config = EmbeddingConfig {
            provider: EmbeddingBackend::Onnx,
            ..Default::default()
        };
        assert!(matches!(from_config(&config).await, Err(Error::Config(_))));
    }
}
