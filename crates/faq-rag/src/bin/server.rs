//! FAQ RAG server binary
//!
//! Run with: cargo run -p faq-rag --bin faq-rag-server -- --config faq-rag.toml

use std::path::PathBuf;

use clap::Parser;
use faq_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "faq-rag-server")]
#[command(about = "Serve grounded answers from the FAQ knowledge base")]
#[command(version)]
struct Args {
    /// TOML configuration file (falls back to FAQ_RAG_CONFIG, then defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faq_rag=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config_path = args
        .config
        .or_else(|| std::env::var_os("FAQ_RAG_CONFIG").map(PathBuf::from));

    let config = RagConfig::load(config_path.as_deref())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding provider: {:?}", config.embeddings.provider);
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - Index: {}", config.vector_db.storage_path.display());
    tracing::info!("  - Collection: {}", config.vector_db.collection);
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!("  - Top k: {}", config.retrieval.top_k);

    let server = RagServer::new(config).await;
    if !server.is_ready() {
        tracing::warn!("Serving without a working pipeline; /chat will answer 503");
    }

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /chat  - Ask a question ({{\"query\": \"...\"}})");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
