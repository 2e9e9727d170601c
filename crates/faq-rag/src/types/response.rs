//! Request-scoped retrieval and generation types

use serde::{Deserialize, Serialize};

use super::knowledge::DocumentMetadata;

/// A knowledge base document returned by a nearest-neighbor query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub text: String,
    pub metadata: DocumentMetadata,
    /// Cosine distance to the query; lower is more relevant
    pub distance: f32,
}

/// Retrieved documents, best match first
pub type RetrievedContext = Vec<RetrievedDocument>;

/// Text produced by the generation backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
}

/// Body of `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's question
    pub query: String,
}

/// Response of `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}
