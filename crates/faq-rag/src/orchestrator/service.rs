//! Initialize-once service handle shared by request handlers

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};

use super::pipeline::RagOrchestrator;

enum ServiceState {
    Ready(RagOrchestrator),
    Unavailable(String),
}

/// Cheaply clonable handle to the orchestrator
///
/// If initialization failed the handle stays `Unavailable` for the life of
/// the process and every request fails fast; nothing is retried per request.
#[derive(Clone)]
pub struct RagService {
    state: Arc<ServiceState>,
}

impl RagService {
    /// Wrap an initialized orchestrator
    pub fn ready(orchestrator: RagOrchestrator) -> Self {
        Self {
            state: Arc::new(ServiceState::Ready(orchestrator)),
        }
    }

    /// A service that refuses every request
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: Arc::new(ServiceState::Unavailable(reason.into())),
        }
    }

    /// Initialize the orchestrator, capturing failure instead of returning it
    pub async fn initialize(config: &RagConfig) -> Self {
        match RagOrchestrator::initialize(config).await {
            Ok(orchestrator) => Self::ready(orchestrator),
            Err(e) => {
                tracing::error!("Fatal error during RAG service initialization: {}", e);
                Self::unavailable(e.to_string())
            }
        }
    }

    /// Whether requests can be served
    pub fn is_ready(&self) -> bool {
        matches!(*self.state, ServiceState::Ready(_))
    }

    /// Initialization failure, if any
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &*self.state {
            ServiceState::Ready(_) => None,
            ServiceState::Unavailable(reason) => Some(reason),
        }
    }

    /// The orchestrator, when ready
    pub fn orchestrator(&self) -> Option<&RagOrchestrator> {
        match &*self.state {
            ServiceState::Ready(orchestrator) => Some(orchestrator),
            ServiceState::Unavailable(_) => None,
        }
    }

    /// Answer a query
    pub async fn answer(&self, query: &str) -> Result<String> {
        match &*self.state {
            ServiceState::Ready(orchestrator) => orchestrator.answer(query).await,
            ServiceState::Unavailable(reason) => Err(Error::ServiceUnavailable(format!(
                "initialization failed: {}",
                reason
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmbeddingBackend;

    #[tokio::test]
    async fn test_unavailable_fails_fast() {
        let service = RagService::unavailable("embedding model missing");

        assert!(!service.is_ready());
        assert!(service.orchestrator().is_none());
        assert_eq!(service.unavailable_reason(), Some("embedding model missing"));
        for _ in 0..3 {
            assert!(matches!(
                service.answer("How do I pay?").await,
                Err(Error::ServiceUnavailable(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_initialize_failure_is_captured() {
        let mut config = RagConfig::default();
        config.embeddings.provider = EmbeddingBackend::Ollama;
        config.embeddings.base_url = "http://127.0.0.1:1".to_string();
        config.embeddings.max_retries = 0;

        let service = RagService::initialize(&config).await;
        assert!(!service.is_ready());
        assert!(service.unavailable_reason().is_some());
    }
}
