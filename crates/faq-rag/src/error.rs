//! Error types for the RAG pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Knowledge base source file is missing
    #[error("Knowledge base source not found: {0}")]
    SourceNotFound(String),

    /// Knowledge base source could not be parsed or failed validation
    #[error("Knowledge base source is malformed: {0}")]
    SourceMalformed(String),

    /// Embedding model could not be loaded or reached
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// Vector index could not be opened, read or written
    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(String),

    /// Generation backend could not be reached
    #[error("Generation backend unreachable: {0}")]
    BackendUnreachable(String),

    /// Generation backend answered with a failure
    #[error("Generation backend error: {0}")]
    BackendError(String),

    /// Generation backend did not answer in time
    #[error("Generation backend timed out after {0}s")]
    BackendTimeout(u64),

    /// Query was empty or whitespace
    #[error("Query cannot be empty")]
    EmptyQuery,

    /// Service is not able to answer requests
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Index was built with a different embedding configuration
    #[error("Embedding configuration mismatch: {0}")]
    ConfigMismatch(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::EmbeddingUnavailable(message.into())
    }

    /// Create an index error
    pub fn index(message: impl Into<String>) -> Self {
        Self::IndexUnavailable(message.into())
    }

    /// Create a backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::BackendError(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error came from the generation backend
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            Error::BackendUnreachable(_) | Error::BackendError(_) | Error::BackendTimeout(_)
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            Error::EmptyQuery => (StatusCode::BAD_REQUEST, "empty_query"),
            Error::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable"),
            Error::EmbeddingUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "embedding_unavailable")
            }
            Error::IndexUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "index_unavailable"),
            Error::BackendUnreachable(_) | Error::BackendError(_) | Error::BackendTimeout(_) => {
                (StatusCode::BAD_GATEWAY, "backend_error")
            }
            Error::SourceNotFound(_) | Error::SourceMalformed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "source_error")
            }
            Error::ConfigMismatch(_) | Error::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error")
            }
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Json(_) => (StatusCode::INTERNAL_SERVER_ERROR, "json_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
