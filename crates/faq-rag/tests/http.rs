//! HTTP boundary: status codes and bodies of the chat API

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use common::{orchestrator_with, payment_entry, DownGenerator, EchoGenerator};
use faq_rag::{
    config::RagConfig,
    orchestrator::{RagService, FALLBACK_ANSWER},
    server::{build_router, state::AppState},
    types::ChatResponse,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn router(service: RagService) -> Router {
    build_router(AppState::new(RagConfig::default(), service), true)
}

async fn ready_router(generator: Arc<dyn faq_rag::GenerationClient>) -> (TempDir, Router) {
    let (dir, orchestrator) = orchestrator_with(vec![payment_entry()], generator).await;
    (dir, router(RagService::ready(orchestrator)))
}

fn chat_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_chat_returns_answer() {
    let (_dir, app) = ready_router(Arc::new(EchoGenerator)).await;

    let response = app
        .oneshot(chat_request("/chat", json!({ "query": "How do I pay?" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: ChatResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert!(body.answer.contains("direct debit"));
}

#[tokio::test]
async fn test_trailing_slash_route() {
    let (_dir, app) = ready_router(Arc::new(EchoGenerator)).await;

    let response = app
        .oneshot(chat_request("/chat/", json!({ "query": "How do I pay?" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_blank_query_is_bad_request() {
    let (_dir, app) = ready_router(Arc::new(EchoGenerator)).await;

    let response = app
        .oneshot(chat_request("/chat", json!({ "query": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "empty_query");
}

#[tokio::test]
async fn test_blank_query_checked_before_availability() {
    let app = router(RagService::unavailable("embedder unreachable"));

    let response = app
        .oneshot(chat_request("/chat", json!({ "query": "" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_uninitialized_service_is_unavailable() {
    let app = router(RagService::unavailable("embedder unreachable"));

    let response = app
        .oneshot(chat_request("/chat", json!({ "query": "How do I pay?" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "service_unavailable");
}

#[tokio::test]
async fn test_generation_failure_is_ok_with_fallback() {
    let (_dir, app) = ready_router(Arc::new(DownGenerator)).await;

    let response = app
        .oneshot(chat_request("/chat", json!({ "query": "How do I pay?" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["answer"], FALLBACK_ANSWER);
}

#[tokio::test]
async fn test_readiness_reflects_initialization() {
    let app = router(RagService::unavailable("index missing"));
    let response = app
        .clone()
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_dir, app) = ready_router(Arc::new(EchoGenerator)).await;
    let response = app
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_root_welcome() {
    let app = router(RagService::unavailable("not needed"));

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let defaults = RagConfig::default();
    assert!(body["message"].as_str().unwrap().contains("/chat"));
    assert_eq!(body["model"], defaults.llm.model.as_str());
    assert_eq!(body["collection"], defaults.vector_db.collection.as_str());
    assert_eq!(body["ready"], false);
}
