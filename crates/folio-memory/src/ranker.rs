// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stores exchange summaries per user and ranks them against new questions.

use std::sync::Arc;

use folio_core::vector::dot;
use folio_core::{EmbeddingAdapter, FolioError};
use folio_storage::Database;
use folio_storage::models::{Feedback, MemoryEntry, NewMemory};
use folio_storage::queries::memories;
use tracing::{debug, info};

use crate::summary::{digest, summarize};

/// Feedback entries fetched per polarity for the digest.
const FEEDBACK_FETCH: usize = 20;

/// Ranks `entries` (newest first) against `query` and returns `n` summaries.
///
/// Entries whose vector length differs from the query are dropped. When none
/// remain, the `n` newest summaries are returned unranked.
pub fn rank_memories(entries: &[MemoryEntry], query: &[f32], n: usize) -> Vec<String> {
    let mut usable: Vec<(f32, &MemoryEntry)> = entries
        .iter()
        .filter(|e| e.embedding.len() == query.len())
        .map(|e| (dot(query, &e.embedding), e))
        .collect();

    if usable.is_empty() {
        return entries.iter().take(n).map(|e| e.summary.clone()).collect();
    }

    usable.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    usable
        .into_iter()
        .take(n)
        .map(|(_, e)| e.summary.clone())
        .collect()
}

#[derive(Clone)]
pub struct MemoryRanker {
    db: Database,
    embedder: Arc<dyn EmbeddingAdapter>,
}

impl MemoryRanker {
    pub fn new(db: Database, embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        Self { db, embedder }
    }

    /// Summarizes, embeds and persists one exchange. Returns the entry id.
    pub async fn store_interaction(
        &self,
        user_id: &str,
        session_id: Option<&str>,
        question: &str,
        answer: &str,
        feedback: Option<Feedback>,
    ) -> Result<i64, FolioError> {
        let summary = summarize(question, answer, feedback);
        let embedding = self.embedder.embed_text(&summary).await?;
        let id = memories::insert_memory(
            &self.db,
            NewMemory {
                user_id: user_id.to_string(),
                session_id: session_id.map(str::to_string),
                summary,
                embedding,
                feedback,
            },
        )
        .await?;
        info!(user_id, id, "interaction remembered");
        Ok(id)
    }

    /// The `n` remembered summaries most similar to `query`.
    pub async fn retrieve_relevant(
        &self,
        user_id: &str,
        query: &str,
        n: usize,
    ) -> Result<Vec<String>, FolioError> {
        let entries = memories::user_memories(&self.db, user_id).await?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        let query = self.embedder.embed_text(query).await?;
        let ranked = rank_memories(&entries, &query, n);
        debug!(user_id, stored = entries.len(), returned = ranked.len(), "memories ranked");
        Ok(ranked)
    }

    /// Natural-language summary of what the user liked and disliked.
    pub async fn preference_digest(&self, user_id: &str) -> Result<String, FolioError> {
        let liked =
            memories::memories_with_feedback(&self.db, user_id, Feedback::Up, FEEDBACK_FETCH)
                .await?;
        let disliked =
            memories::memories_with_feedback(&self.db, user_id, Feedback::Down, FEEDBACK_FETCH)
                .await?;
        Ok(digest(&liked, &disliked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_test_utils::MockEmbedder;
    use tracing_test::traced_test;

    fn entry(id: i64, summary: &str, embedding: Vec<f32>) -> MemoryEntry {
        MemoryEntry {
            id,
            user_id: "u".into(),
            session_id: None,
            summary: summary.into(),
            embedding,
            feedback: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn ranks_by_similarity_and_skips_mismatched() {
        let entries = vec![
            entry(3, "unrelated", vec![0.0, 1.0]),
            entry(2, "stale", vec![1.0, 0.0, 0.0]),
            entry(1, "relevant", vec![1.0, 0.0]),
        ];
        assert_eq!(rank_memories(&entries, &[1.0, 0.0], 3), ["relevant", "unrelated"]);
    }

    #[test]
    fn falls_back_to_newest_when_nothing_is_comparable() {
        let entries = vec![
            entry(3, "newest", vec![1.0; 768]),
            entry(2, "middle", vec![1.0; 768]),
            entry(1, "oldest", vec![1.0; 768]),
        ];
        assert_eq!(rank_memories(&entries, &[1.0, 0.0], 2), ["newest", "middle"]);
    }

    #[tokio::test]
    #[traced_test]
    async fn store_interaction_logs_and_persists() {
        let db = Database::open_in_memory().await.unwrap();
        let ranker = MemoryRanker::new(db.clone(), Arc::new(MockEmbedder::new(4)));
        let id = ranker
            .store_interaction("u1", Some("s1"), "What is ATP?", "Energy.", Some(Feedback::Up))
            .await
            .unwrap();
        assert!(id > 0);
        assert!(logs_contain("interaction remembered"));

        let stored = memories::user_memories(&db, "u1").await.unwrap();
        assert_eq!(stored[0].session_id.as_deref(), Some("s1"));
        assert_eq!(stored[0].embedding.len(), 4);
    }
}
