// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A tool executor backed by the retrieval service.
//!
//! Only `search_documents` is served here. Content-generation tools live in
//! a separate service; this executor answers them with an `error` key so the
//! model can explain the gap instead of the turn failing.

use std::str::FromStr;

use folio_core::{FolioError, ToolExecutor, ToolOutput};
use folio_retrieval::{RetrievalService, build_citations};
use serde_json::{Map, Value, json};
use tokio::runtime::Handle;
use tracing::debug;

use crate::tools::StudyTool;

pub struct RetrievalToolExecutor {
    retrieval: RetrievalService,
    handle: Handle,
}

impl RetrievalToolExecutor {
    /// `handle` is the runtime used to drive async retrieval from the
    /// blocking pool.
    pub fn new(retrieval: RetrievalService, handle: Handle) -> Self {
        Self { retrieval, handle }
    }

    /// Binds to the runtime the caller is running on.
    pub fn from_current(retrieval: RetrievalService) -> Result<Self, FolioError> {
        let handle = Handle::try_current()
            .map_err(|e| FolioError::Internal(format!("no tokio runtime: {e}")))?;
        Ok(Self::new(retrieval, handle))
    }

    fn search_documents(
        &self,
        args: &Map<String, Value>,
        session_id: &str,
        user_id: &str,
    ) -> ToolOutput {
        let Some(query) = args.get("query").and_then(Value::as_str) else {
            return error_output("search_documents requires a `query` string");
        };
        let k = args
            .get("n_results")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok());

        let results = self
            .handle
            .block_on(self.retrieval.search_in_scope(query, session_id, user_id, k));
        debug!(session_id, hits = results.len(), "search_documents");

        let sources = build_citations(&results);
        let results: Vec<Value> = results
            .iter()
            .map(|r| {
                json!({
                    "text": r.text,
                    "pages": r.pages,
                    "document_id": r.document_id,
                    "score": r.score,
                })
            })
            .collect();
        into_output(json!({ "results": results, "sources": sources }))
    }
}

fn into_output(value: Value) -> ToolOutput {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn error_output(message: impl Into<String>) -> ToolOutput {
    into_output(json!({ "error": message.into() }))
}

impl ToolExecutor for RetrievalToolExecutor {
    fn execute(
        &self,
        tool: &str,
        args: &Map<String, Value>,
        session_id: &str,
        user_id: &str,
    ) -> Result<ToolOutput, FolioError> {
        Ok(match StudyTool::from_str(tool) {
            Ok(StudyTool::SearchDocuments) => self.search_documents(args, session_id, user_id),
            Ok(_) => error_output(format!("tool `{tool}` is not available in this build")),
            Err(_) => error_output(format!("unknown tool `{tool}`")),
        })
    }
}
