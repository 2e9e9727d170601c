//! Chat endpoint

use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse};

/// POST /chat - answer a question from the knowledge base
///
/// Blank queries are rejected here, before the service is consulted.
/// Generation failures come back as a normal answer carrying the fallback
/// text; only an unusable pipeline maps to 503.
pub async fn handle_chat_query(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    tracing::info!("Received query: {}", request.query);

    if request.query.trim().is_empty() {
        tracing::warn!("Received empty query");
        return Err(Error::EmptyQuery);
    }

    let answer = state.service().answer(&request.query).await?;

    tracing::info!("Sending response: {}", answer);
    Ok(Json(ChatResponse { answer }))
}
