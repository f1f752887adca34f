// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scope-aware retrieval façade over [`VectorStore`].
//!
//! Search operations never fail: an empty scope, a blank question or an
//! unreachable backend all produce an empty result, logged at `warn`.

use folio_config::model::RetrievalConfig;
use folio_core::{FolioError, IndexPhase, IndexProgress, IndexProgressSink};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::store::{ChunkInput, RelatedScope, SearchResult, VectorStore};

/// Maximum excerpt length in characters.
pub const EXCERPT_CHARS: usize = 200;

/// A numbered source shown next to an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// 1-based position in the result list.
    pub index: usize,
    pub excerpt: String,
    pub pages: Vec<u32>,
}

/// Builds citations for `results` in order.
///
/// Text longer than [`EXCERPT_CHARS`] is cut and marked with `...`; the
/// excerpt is trimmed afterwards.
pub fn build_citations(results: &[SearchResult]) -> Vec<Citation> {
    results
        .iter()
        .enumerate()
        .map(|(i, result)| Citation {
            index: i + 1,
            excerpt: excerpt(&result.text),
            pages: result.pages.clone(),
        })
        .collect()
}

fn excerpt(text: &str) -> String {
    if text.chars().count() > EXCERPT_CHARS {
        let cut: String = text.chars().take(EXCERPT_CHARS).collect();
        format!("{cut}...").trim().to_string()
    } else {
        text.trim().to_string()
    }
}

/// Scope-aware façade over a [`VectorStore`].
///
/// Read paths never fail: an unreachable store or embedder is logged and
/// yields an empty result. Indexing and deletes propagate errors.
#[derive(Clone)]
pub struct RetrievalService {
    store: VectorStore,
    config: RetrievalConfig,
}

impl RetrievalService {
    pub fn new(store: VectorStore, config: RetrievalConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Indexes one document, reporting progress to `sink`.
    ///
    /// Reports `indexing 80` before embedding, then `completed 100` or
    /// `failure 0`. Errors are returned after the failure report.
    pub async fn index_document(
        &self,
        session_id: &str,
        user_id: &str,
        document_id: &str,
        chunks: Vec<ChunkInput>,
        sink: &dyn IndexProgressSink,
    ) -> Result<usize, FolioError> {
        sink.report(IndexProgress::new(IndexPhase::Indexing, 80));
        match self
            .store
            .index(session_id, user_id, document_id, chunks)
            .await
        {
            Ok(stored) => {
                sink.report(IndexProgress::new(IndexPhase::Completed, 100));
                Ok(stored)
            }
            Err(e) => {
                warn!(session_id, document_id, error = %e, "indexing failed");
                sink.report(IndexProgress {
                    detail: Some(e.to_string()),
                    ..IndexProgress::new(IndexPhase::Failure, 0)
                });
                Err(e)
            }
        }
    }

    /// Session-scoped search. `k` of `None` uses the configured default.
    pub async fn search_in_scope(
        &self,
        question: &str,
        session_id: &str,
        user_id: &str,
        k: Option<usize>,
    ) -> Vec<SearchResult> {
        if question.trim().is_empty() || session_id.is_empty() {
            return Vec::new();
        }
        let k = k.unwrap_or(self.config.default_k);
        match self.store.search(session_id, user_id, question, k).await {
            Ok(results) => {
                info!(session_id, user_id, hits = results.len(), "session retrieval");
                results
            }
            Err(e) => {
                warn!(session_id, user_id, error = %e, "session retrieval failed");
                Vec::new()
            }
        }
    }

    /// Search across every session the user owns.
    pub async fn search_across_scopes(
        &self,
        question: &str,
        user_id: &str,
        k: Option<usize>,
    ) -> Vec<SearchResult> {
        if question.trim().is_empty() {
            return Vec::new();
        }
        let k = k.unwrap_or(self.config.default_k);
        self.store
            .search_user(user_id, question, k)
            .await
            .unwrap_or_else(|e| {
                warn!(user_id, error = %e, "cross-session retrieval failed");
                Vec::new()
            })
    }

    /// Sessions whose documents resemble this session's, best first.
    pub async fn find_related_scopes(
        &self,
        session_id: &str,
        user_id: &str,
        n: Option<usize>,
    ) -> Vec<RelatedScope> {
        let n = n.unwrap_or(self.config.related_limit);
        self.store
            .related(session_id, user_id, n, self.config.anchor_sample)
            .await
            .unwrap_or_else(|e| {
                warn!(session_id, error = %e, "related scope discovery failed");
                Vec::new()
            })
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<usize, FolioError> {
        self.store.delete_session(session_id).await
    }

    pub async fn delete_document(&self, document_id: &str) -> Result<usize, FolioError> {
        self.store.delete_document(document_id).await
    }
}
