//! Application state for the HTTP server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::orchestrator::RagService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Answering service, possibly unavailable
    service: RagService,
}

impl AppState {
    /// Create application state around an already-initialized service
    pub fn new(config: RagConfig, service: RagService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, service }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the answering service
    pub fn service(&self) -> &RagService {
        &self.inner.service
    }

    /// Check if the service can answer requests
    pub fn is_ready(&self) -> bool {
        self.inner.service.is_ready()
    }
}
