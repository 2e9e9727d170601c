//! Knowledge base build binary
//!
//! Embeds every FAQ entry in the source file and replaces the collection in
//! the index. On failure the previous collection is left as it was.
//!
//! ```bash
//! faq-rag-build --source knowledge_base/faqs.json --collection faq_collection
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use faq_rag::{
    config::RagConfig,
    embeddings,
    index::{RedbVectorIndex, VectorIndex},
    ingestion::{KnowledgeBaseBuilder, SourceLocation},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "faq-rag-build")]
#[command(about = "Build the vector index from an FAQ knowledge base file")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Knowledge base JSON file (overrides knowledge_base.source_path)
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Collection name (overrides vector_db.collection)
    #[arg(long)]
    collection: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faq_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = RagConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(collection) = args.collection {
        config.vector_db.collection = collection;
    }
    let source = args.source.unwrap_or_else(|| config.knowledge_base.source_path.clone());
    config.validate()?;

    let embedder = embeddings::from_config(&config.embeddings)
        .await
        .context("creating embedding provider")?;
    if !embedder.health_check().await? {
        anyhow::bail!(
            "{} embedder is not reachable at {}",
            embedder.name(),
            config.embeddings.base_url
        );
    }

    let index: Arc<dyn VectorIndex> = Arc::new(
        RedbVectorIndex::open(&config.vector_db.storage_path)
            .with_context(|| format!("opening {}", config.vector_db.storage_path.display()))?,
    );

    let builder = KnowledgeBaseBuilder::new(embedder, index, config.vector_db.collection.clone());
    let report = builder
        .build(&SourceLocation::File(source.clone()))
        .await
        .with_context(|| format!("building knowledge base from {}", source.display()))?;

    println!("Knowledge base built");
    println!("  Collection: {}", report.collection);
    println!("  Entries: {}", report.entries);
    println!("  Embedding model: {} ({} dims)", report.embedding_model, report.dimensions);
    println!("  Source digest: {}", report.source_digest);
    println!("  Elapsed: {:.2?}", report.elapsed);

    Ok(())
}
