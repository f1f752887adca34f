// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exact linear-scan vector store over the `document_chunks` table.
//!
//! Stored vectors are unit length, so similarity is a dot product. Rows whose
//! length differs from the query score 0.0 instead of failing. Ranking uses a
//! stable sort over rows read in insertion order, so equal scores keep
//! storage order.

use std::sync::Arc;

use folio_core::vector::{centroid, dot};
use folio_core::{EmbeddingAdapter, FolioError};
use folio_storage::Database;
use folio_storage::models::{Chunk, NewChunk};
use folio_storage::queries::chunks;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Text of one chunk to index, with the pages it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkInput {
    pub text: String,
    #[serde(default)]
    pub pages: Vec<u32>,
}

/// A chunk matched by a similarity query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk_id: i64,
    pub session_id: String,
    pub document_id: String,
    pub text: String,
    pub pages: Vec<u32>,
    pub chunk_index: i64,
    pub score: f32,
}

impl SearchResult {
    fn scored(chunk: Chunk, score: f32) -> Self {
        Self {
            chunk_id: chunk.id,
            session_id: chunk.session_id,
            document_id: chunk.document_id,
            text: chunk.text,
            pages: chunk.pages,
            chunk_index: chunk.chunk_index,
            score,
        }
    }
}

/// A foreign session and its mean similarity to the origin session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedScope {
    pub session_id: String,
    pub score: f32,
}

/// Ranks `candidates` against `query`, best first, keeping at most `k`.
pub fn rank(candidates: Vec<Chunk>, query: &[f32], k: usize) -> Vec<SearchResult> {
    let mut scored: Vec<(f32, Chunk)> = candidates
        .into_iter()
        .map(|chunk| (dot(query, &chunk.embedding), chunk))
        .collect();
    // `sort_by` is stable: ties keep insertion order.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored
        .into_iter()
        .map(|(score, chunk)| SearchResult::scored(chunk, score))
        .collect()
}

/// Mean score per session of `candidates` against `anchor`, best first.
///
/// Sessions are first listed in the order their first chunk appears, which
/// is the tie-break for equal means.
pub fn rank_scopes(candidates: &[Chunk], anchor: &[f32], n: usize) -> Vec<RelatedScope> {
    let mut totals: Vec<(String, f32, usize)> = Vec::new();
    for chunk in candidates {
        let score = dot(anchor, &chunk.embedding);
        match totals.iter_mut().find(|(s, _, _)| *s == chunk.session_id) {
            Some(entry) => {
                entry.1 += score;
                entry.2 += 1;
            }
            None => totals.push((chunk.session_id.clone(), score, 1)),
        }
    }

    let mut scopes: Vec<RelatedScope> = totals
        .into_iter()
        .map(|(session_id, sum, count)| RelatedScope {
            session_id,
            score: sum / count as f32,
        })
        .collect();
    scopes.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scopes.truncate(n);
    scopes
}

/// Persisted chunks plus the embedding adapter chosen for this process.
#[derive(Clone)]
pub struct VectorStore {
    db: Database,
    embedder: Arc<dyn EmbeddingAdapter>,
}

impl VectorStore {
    pub fn new(db: Database, embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        Self { db, embedder }
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingAdapter> {
        &self.embedder
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Embeds `inputs` in batches and appends them as one atomic write.
    ///
    /// `chunk_index` follows the order of `inputs`, starting at 0.
    pub async fn index(
        &self,
        session_id: &str,
        user_id: &str,
        document_id: &str,
        inputs: Vec<ChunkInput>,
    ) -> Result<usize, FolioError> {
        if inputs.is_empty() {
            return Ok(0);
        }
        let texts: Vec<String> = inputs.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != inputs.len() {
            return Err(FolioError::Internal(format!(
                "embedder returned {} vectors for {} chunks",
                embeddings.len(),
                inputs.len()
            )));
        }

        let rows: Vec<NewChunk> = inputs
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (input, embedding))| NewChunk {
                session_id: session_id.to_string(),
                user_id: user_id.to_string(),
                document_id: document_id.to_string(),
                text: input.text,
                embedding,
                pages: input.pages,
                chunk_index: i as i64,
            })
            .collect();
        let stored = chunks::insert_chunks(&self.db, rows).await?;
        info!(session_id, document_id, stored, "document indexed");
        Ok(stored)
    }

    /// Top `k` chunks of one session for `query`.
    pub async fn search(
        &self,
        session_id: &str,
        user_id: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchResult>, FolioError> {
        let candidates = chunks::session_chunks(&self.db, session_id, user_id).await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let query = self.embedder.embed_text(query).await?;
        let results = rank(candidates, &query, k);
        debug!(session_id, hits = results.len(), "session search");
        Ok(results)
    }

    /// Top `k` chunks across every session owned by `user_id`.
    pub async fn search_user(
        &self,
        user_id: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchResult>, FolioError> {
        let candidates = chunks::user_chunks(&self.db, user_id).await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let query = self.embedder.embed_text(query).await?;
        Ok(rank(candidates, &query, k))
    }

    /// Other sessions of `user_id` ranked by similarity to this one.
    ///
    /// The anchor is the re-normalized mean of the first `anchor_sample`
    /// chunks of `session_id`. No embedding call is made.
    pub async fn related(
        &self,
        session_id: &str,
        user_id: &str,
        n: usize,
        anchor_sample: usize,
    ) -> Result<Vec<RelatedScope>, FolioError> {
        let anchors = chunks::anchor_chunks(&self.db, session_id, user_id, anchor_sample).await?;
        let Some(anchor) = centroid(anchors.iter().map(|c| c.embedding.as_slice())) else {
            return Ok(Vec::new());
        };
        let others = chunks::chunks_outside_session(&self.db, session_id, user_id).await?;
        Ok(rank_scopes(&others, &anchor, n))
    }

    /// Removes every chunk of `session_id` in one transaction. Returns the
    /// number of rows removed.
    pub async fn delete_session(&self, session_id: &str) -> Result<usize, FolioError> {
        chunks::delete_session_chunks(&self.db, session_id).await
    }

    /// Removes every chunk of `document_id` across sessions. Returns the
    /// number of rows removed.
    pub async fn delete_document(&self, document_id: &str) -> Result<usize, FolioError> {
        chunks::delete_document_chunks(&self.db, document_id).await
    }
}
