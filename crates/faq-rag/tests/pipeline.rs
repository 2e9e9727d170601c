//! End-to-end answering over a real on-disk index

mod common;

use std::sync::Arc;

use chrono::Utc;
use common::{orchestrator_with, payment_entry, DownGenerator, EchoGenerator, COLLECTION};
use faq_rag::{
    embeddings::HashingEmbedder,
    generation::NO_CONTEXT_SENTINEL,
    index::{CollectionManifest, DistanceMetric, RedbVectorIndex, VectorIndex},
    ingestion::{KnowledgeBaseBuilder, SourceLocation},
    orchestrator::{verify_collection, FALLBACK_ANSWER},
    types::{EmbeddableDocument, IndexedVector, KnowledgeEntry},
    Error,
};
use proptest::prelude::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_payment_question_is_grounded_in_knowledge_base() {
    let (_dir, orchestrator) = orchestrator_with(vec![payment_entry()], Arc::new(EchoGenerator)).await;

    let outcome = orchestrator.answer_detailed("How do I pay?").await.unwrap();

    assert!(!outcome.degraded);
    assert_eq!(outcome.context.len(), 1);
    assert!(outcome.context[0].text.contains("pay online, by direct debit, or by phone"));
    assert_eq!(outcome.context[0].metadata.entry_id, "faq001");
    assert_eq!(
        outcome.context[0].metadata.original_question,
        "What are my payment options?"
    );
    assert!(outcome.prompt.contains("User's Question: How do I pay?"));
    assert!(outcome.prompt.contains("You can pay online, by direct debit, or by phone."));
    assert!(outcome.answer.contains("direct debit"));
}

#[tokio::test]
async fn test_unrelated_query_still_gets_nearest_entry() {
    let (_dir, orchestrator) = orchestrator_with(vec![payment_entry()], Arc::new(EchoGenerator)).await;

    let related = orchestrator.answer_detailed("How do I pay?").await.unwrap();
    let unrelated = orchestrator
        .answer_detailed("What is the boiling point of water?")
        .await
        .unwrap();

    assert_eq!(unrelated.context.len(), 1);
    assert_eq!(unrelated.context[0].metadata.entry_id, "faq001");
    assert!(unrelated.context[0].distance > related.context[0].distance);
    assert!(unrelated.prompt.contains("pay online, by direct debit, or by phone"));
    assert!(!unrelated.prompt.contains(NO_CONTEXT_SENTINEL));
}

#[tokio::test]
async fn test_missing_collection_answers_without_context() {
    let dir = TempDir::new().unwrap();
    let index = Arc::new(RedbVectorIndex::open(dir.path().join("kb.redb")).unwrap());
    let embedder = Arc::new(HashingEmbedder::new(64).unwrap());

    verify_collection(index.as_ref(), embedder.as_ref(), COLLECTION)
        .await
        .unwrap();

    let retrieval = faq_rag::RetrievalEngine::new(embedder, index, COLLECTION);
    let orchestrator = faq_rag::RagOrchestrator::new(retrieval, Arc::new(EchoGenerator));
    let outcome = orchestrator.answer_detailed("How do I pay?").await.unwrap();

    assert!(outcome.context.is_empty());
    assert!(outcome.answer.contains(NO_CONTEXT_SENTINEL));
}

#[tokio::test]
async fn test_backend_down_returns_fallback() {
    let (_dir, orchestrator) = orchestrator_with(vec![payment_entry()], Arc::new(DownGenerator)).await;

    let outcome = orchestrator.answer_detailed("How do I pay?").await.unwrap();

    assert!(outcome.degraded);
    assert_eq!(outcome.answer, FALLBACK_ANSWER);
    assert_eq!(orchestrator.answer("How do I pay?").await.unwrap(), FALLBACK_ANSWER);
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let (_dir, orchestrator) = orchestrator_with(vec![payment_entry()], Arc::new(EchoGenerator)).await;
    let orchestrator = Arc::new(orchestrator);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                let query = format!("How do I pay invoice number {}?", i);
                let answer = orchestrator.answer(&query).await.unwrap();
                (query, answer)
            })
        })
        .collect();

    for handle in handles {
        let (query, answer) = handle.await.unwrap();
        assert!(answer.contains(&format!("User's Question: {}", query)));
    }
}

#[tokio::test]
async fn test_rebuild_replaces_previous_entries() {
    let dir = TempDir::new().unwrap();
    let index = Arc::new(RedbVectorIndex::open(dir.path().join("kb.redb")).unwrap());
    let embedder = Arc::new(HashingEmbedder::new(128).unwrap());
    let builder = KnowledgeBaseBuilder::new(embedder.clone(), index.clone(), COLLECTION);

    builder
        .build(&SourceLocation::Entries(vec![
            payment_entry(),
            KnowledgeEntry::new("faq002", "Is this letter genuine?", "Call the number on your statement."),
        ]))
        .await
        .unwrap();
    assert_eq!(index.count(COLLECTION).await.unwrap(), 2);

    builder
        .build(&SourceLocation::Entries(vec![KnowledgeEntry::new(
            "faq010",
            "Where can I get debt advice?",
            "Free advice is available from independent charities.",
        )]))
        .await
        .unwrap();

    assert_eq!(index.count(COLLECTION).await.unwrap(), 1);
    let results = index
        .query(COLLECTION, &embedder.embed_sync("How do I pay?"), 5)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].metadata.entry_id, "faq010");
}

#[tokio::test]
async fn test_embedder_change_is_config_mismatch() {
    let dir = TempDir::new().unwrap();
    let index = Arc::new(RedbVectorIndex::open(dir.path().join("kb.redb")).unwrap());

    KnowledgeBaseBuilder::new(Arc::new(HashingEmbedder::new(256).unwrap()), index.clone(), COLLECTION)
        .build(&SourceLocation::Entries(vec![payment_entry()]))
        .await
        .unwrap();

    let result = verify_collection(index.as_ref(), &HashingEmbedder::new(128).unwrap(), COLLECTION).await;
    assert!(matches!(result, Err(Error::ConfigMismatch(_))));
}

fn entries_from_words(words: &[String]) -> Vec<KnowledgeEntry> {
    words
        .chunks(2)
        .filter(|pair| pair.len() == 2)
        .enumerate()
        .map(|(i, pair)| {
            KnowledgeEntry::new(
                format!("faq{:03}", i),
                format!("What about {}?", pair[0]),
                format!("It depends on {}.", pair[1]),
            )
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_entry_text_retrieves_itself_first(
        words in prop::collection::hash_set("[a-z]{5,10}", 2..16)
    ) {
        let words: Vec<String> = words.into_iter().collect();
        let entries = entries_from_words(&words);
        prop_assume!(!entries.is_empty());

        let dir = TempDir::new().unwrap();
        let index = RedbVectorIndex::open(dir.path().join("kb.redb")).unwrap();
        let embedder = HashingEmbedder::new(256).unwrap();

        let vectors: Vec<IndexedVector> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let document = EmbeddableDocument::from(entry);
                let embedding = embedder.embed_sync(&document.text);
                IndexedVector::new(format!("doc_{}", i), document, embedding)
            })
            .collect();
        let manifest = CollectionManifest {
            collection: COLLECTION.to_string(),
            embedding_model: "feature-hash-v1".to_string(),
            dimensions: 256,
            distance_metric: DistanceMetric::Cosine,
            entry_count: vectors.len(),
            source_digest: String::new(),
            built_at: Utc::now(),
        };
        index.rebuild_blocking(COLLECTION, &vectors, &manifest).unwrap();

        for entry in &entries {
            let query = embedder.embed_sync(&entry.canonical_text());
            let results = index.query_blocking(COLLECTION, &query, 1).unwrap();
            prop_assert_eq!(results.len(), 1);
            prop_assert_eq!(&results[0].metadata.entry_id, &entry.id);
            prop_assert!(results[0].distance.abs() < 1e-4);
        }
    }
}
