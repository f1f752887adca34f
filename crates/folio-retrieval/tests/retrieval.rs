// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector store and retrieval service over a real SQLite database.

use std::sync::Arc;

use folio_config::model::RetrievalConfig;
use folio_core::{EmbeddingAdapter, IndexPhase};
use folio_retrieval::{ChunkInput, RetrievalService, VectorStore, build_citations};
use folio_storage::Database;
use folio_test_utils::{MockEmbedder, RecordingSink, temp_database};

fn input(text: &str, pages: &[u32]) -> ChunkInput {
    ChunkInput {
        text: text.into(),
        pages: pages.to_vec(),
    }
}

fn embedder() -> MockEmbedder {
    MockEmbedder::new(3)
        .with_vector("cells divide by mitosis", vec![1.0, 0.0, 0.0])
        .with_vector("mitochondria make ATP", vec![0.8, 0.6, 0.0])
        .with_vector("the French revolution began in 1789", vec![0.0, 0.0, 1.0])
        .with_vector("biology question", vec![1.0, 0.1, 0.0])
}

async fn service_with(embedder: Arc<MockEmbedder>) -> (RetrievalService, Database) {
    let db = Database::open_in_memory().await.unwrap();
    let store = VectorStore::new(db.clone(), embedder);
    (RetrievalService::new(store, RetrievalConfig::default()), db)
}

#[tokio::test]
async fn search_returns_every_chunk_when_k_exceeds_scope() {
    let (service, _db) = service_with(Arc::new(embedder())).await;
    let stored = service
        .store()
        .index(
            "s1",
            "u1",
            "doc-1",
            vec![
                input("the French revolution began in 1789", &[3]),
                input("cells divide by mitosis", &[1]),
                input("mitochondria make ATP", &[2]),
            ],
        )
        .await
        .unwrap();
    assert_eq!(stored, 3);

    let results = service.search_in_scope("biology question", "s1", "u1", Some(5)).await;
    assert_eq!(results.len(), 3);
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    assert_eq!(results[0].text, "cells divide by mitosis");
    assert_eq!(results[0].chunk_index, 1);
    assert_eq!(results[2].text, "the French revolution began in 1789");

    let citations = build_citations(&results);
    assert_eq!(citations[0].index, 1);
    assert_eq!(citations[0].pages, vec![1]);
}

#[tokio::test]
async fn search_is_scoped_to_session_and_user() {
    let (service, _db) = service_with(Arc::new(embedder())).await;
    let store = service.store();
    store
        .index("s1", "u1", "d1", vec![input("cells divide by mitosis", &[1])])
        .await
        .unwrap();
    store
        .index("s2", "u1", "d2", vec![input("mitochondria make ATP", &[1])])
        .await
        .unwrap();
    store
        .index("s1", "u2", "d3", vec![input("mitochondria make ATP", &[1])])
        .await
        .unwrap();

    let session = service.search_in_scope("biology question", "s1", "u1", None).await;
    assert_eq!(session.len(), 1);
    assert_eq!(session[0].document_id, "d1");

    let across = service.search_across_scopes("biology question", "u1", None).await;
    let docs: Vec<_> = across.iter().map(|r| r.document_id.as_str()).collect();
    assert_eq!(docs, ["d1", "d2"]);
}

#[tokio::test]
async fn blank_question_or_empty_scope_yields_nothing() {
    let embedder = Arc::new(embedder());
    let (service, _db) = service_with(embedder.clone()).await;
    assert!(service.search_in_scope("   ", "s1", "u1", None).await.is_empty());
    assert!(service.search_in_scope("q", "", "u1", None).await.is_empty());
    assert!(service.search_in_scope("q", "empty", "u1", None).await.is_empty());
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn unreachable_embedder_degrades_to_empty() {
    let embedder = Arc::new(embedder());
    let (service, _db) = service_with(embedder.clone()).await;
    service
        .store()
        .index("s1", "u1", "d1", vec![input("cells divide by mitosis", &[1])])
        .await
        .unwrap();

    embedder.set_failing(true);
    assert!(service.search_in_scope("biology question", "s1", "u1", None).await.is_empty());
    assert!(service.search_across_scopes("biology question", "u1", None).await.is_empty());
}

#[tokio::test]
async fn related_scopes_rank_by_mean_similarity() {
    let embedder = MockEmbedder::new(2)
        .with_vector("a0", vec![1.0, 0.0])
        .with_vector("a1", vec![1.0, 0.1])
        .with_vector("a2", vec![1.0, -0.1])
        .with_vector("a3", vec![0.9, 0.0])
        .with_vector("a4", vec![1.0, 0.05])
        .with_vector("near-1", vec![1.0, 0.2])
        .with_vector("near-2", vec![0.9, 0.3])
        .with_vector("far-1", vec![0.0, 1.0])
        .with_vector("far-2", vec![0.2, 1.0]);
    let (service, _db) = service_with(Arc::new(embedder)).await;
    let store = service.store();

    let anchors = ["a0", "a1", "a2", "a3", "a4"].map(|t| input(t, &[1])).to_vec();
    store.index("origin", "u1", "d0", anchors).await.unwrap();
    store
        .index("far", "u1", "d1", vec![input("far-1", &[1]), input("far-2", &[2])])
        .await
        .unwrap();
    store
        .index("near", "u1", "d2", vec![input("near-1", &[1]), input("near-2", &[2])])
        .await
        .unwrap();

    let related = service.find_related_scopes("origin", "u1", Some(5)).await;
    let order: Vec<_> = related.iter().map(|r| r.session_id.as_str()).collect();
    assert_eq!(order, ["near", "far"]);
    assert!(related[0].score > related[1].score);

    let capped = service.find_related_scopes("origin", "u1", Some(1)).await;
    assert_eq!(capped.len(), 1);
    assert_eq!(capped[0].session_id, "near");

    assert!(service.find_related_scopes("unknown", "u1", None).await.is_empty());
}

#[tokio::test]
async fn index_document_reports_progress_and_deletes_are_counted() {
    let (_dir, db) = temp_database().await.unwrap();
    let embedder: Arc<dyn EmbeddingAdapter> = Arc::new(embedder());
    let service = RetrievalService::new(VectorStore::new(db, embedder), RetrievalConfig::default());
    let sink = RecordingSink::new();

    let stored = service
        .index_document(
            "s1",
            "u1",
            "d1",
            vec![input("cells divide by mitosis", &[1]), input("mitochondria make ATP", &[2])],
            &sink,
        )
        .await
        .unwrap();
    assert_eq!(stored, 2);
    service
        .index_document("s1", "u1", "d2", vec![input("x", &[])], &sink)
        .await
        .unwrap();

    let phases: Vec<_> = sink.index_reports().iter().map(|p| (p.phase, p.percent)).collect();
    assert_eq!(
        phases,
        [
            (IndexPhase::Indexing, 80),
            (IndexPhase::Completed, 100),
            (IndexPhase::Indexing, 80),
            (IndexPhase::Completed, 100),
        ]
    );

    assert_eq!(service.delete_document("d2").await.unwrap(), 1);
    assert_eq!(service.delete_session("s1").await.unwrap(), 2);
    assert_eq!(service.delete_session("s1").await.unwrap(), 0);
}

#[tokio::test]
async fn failed_indexing_reports_failure() {
    let embedder = Arc::new(embedder());
    embedder.set_failing(true);
    let (service, _db) = service_with(embedder).await;
    let sink = RecordingSink::new();

    let result = service
        .index_document("s1", "u1", "d1", vec![input("anything", &[1])], &sink)
        .await;
    assert!(result.is_err());
    let last = sink.index_reports().pop().unwrap();
    assert_eq!(last.phase, IndexPhase::Failure);
    assert_eq!(last.percent, 0);
    assert!(last.detail.is_some());
}
