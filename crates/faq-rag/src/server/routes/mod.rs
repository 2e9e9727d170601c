//! API routes for the RAG server

pub mod chat;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::handle_chat_query))
        .route("/chat/", post(chat::handle_chat_query))
        .route("/", get(root))
}

/// Welcome message
async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config();
    Json(serde_json::json!({
        "name": "faq-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "model": config.llm.model,
        "collection": config.vector_db.collection,
        "ready": state.is_ready(),
        "message": "Welcome to the RAG chatbot API. POST {\"query\": \"...\"} to /chat.",
    }))
}
