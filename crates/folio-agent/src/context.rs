// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-turn context gathered before the loop starts.
//!
//! Every lookup here is optional: a failure is logged and the turn proceeds
//! without that piece of context.

use folio_memory::MemoryRanker;
use folio_storage::Database;
use folio_storage::queries::chunks;
use tracing::warn;

use crate::engine::TurnRequest;

/// Separator between remembered summaries in the memory context.
pub const MEMORY_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnContext {
    pub memory_context: String,
    pub preference_context: String,
    pub has_documents: bool,
}

impl TurnContext {
    /// Looks up memories, the preference digest and whether the session has
    /// indexed documents.
    pub async fn gather(
        memory: &MemoryRanker,
        db: &Database,
        user_id: &str,
        session_id: &str,
        question: &str,
        memory_results: usize,
    ) -> Self {
        let memory_context = match memory
            .retrieve_relevant(user_id, question, memory_results)
            .await
        {
            Ok(summaries) => summaries
                .into_iter()
                .take(memory_results)
                .collect::<Vec<_>>()
                .join(MEMORY_SEPARATOR),
            Err(e) => {
                warn!(user_id, error = %e, "memory lookup failed");
                String::new()
            }
        };

        let preference_context = memory
            .preference_digest(user_id)
            .await
            .unwrap_or_else(|e| {
                warn!(user_id, error = %e, "preference digest failed");
                String::new()
            });

        let has_documents = match chunks::count_session_chunks(db, session_id).await {
            Ok(count) => count > 0,
            Err(e) => {
                warn!(session_id, error = %e, "document count failed");
                false
            }
        };

        Self {
            memory_context,
            preference_context,
            has_documents,
        }
    }
}

impl TurnRequest {
    pub fn with_context(self, context: TurnContext) -> Self {
        Self {
            memory_context: context.memory_context,
            preference_context: context.preference_context,
            has_documents: context.has_documents,
            ..self
        }
    }
}
