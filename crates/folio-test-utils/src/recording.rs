// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording tool executor and progress sinks.

use std::collections::HashMap;
use std::sync::Mutex;

use folio_core::{
    FolioError, IndexProgress, IndexProgressSink, ProgressEvent, ProgressSink, ToolExecutor,
    ToolOutput,
};
use serde_json::{Map, Value};

/// One recorded tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub tool: String,
    pub args: Map<String, Value>,
    pub session_id: String,
    pub user_id: String,
}

/// A [`ToolExecutor`] that records calls and returns canned results.
///
/// Tools without a canned result return `{"ok": true}`. Tools registered
/// with [`failing`](Self::failing) return `Err`.
#[derive(Default)]
pub struct RecordingExecutor {
    results: HashMap<String, ToolOutput>,
    failing: Vec<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned result for `tool`. Non-object values are wrapped as `{"value": ...}`.
    pub fn with_result(mut self, tool: &str, result: Value) -> Self {
        let output = match result {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        self.results.insert(tool.to_string(), output);
        self
    }

    pub fn failing(mut self, tool: &str) -> Self {
        self.failing.push(tool.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ToolExecutor for RecordingExecutor {
    fn execute(
        &self,
        tool: &str,
        args: &Map<String, Value>,
        session_id: &str,
        user_id: &str,
    ) -> Result<ToolOutput, FolioError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedCall {
                tool: tool.to_string(),
                args: args.clone(),
                session_id: session_id.to_string(),
                user_id: user_id.to_string(),
            });
        if self.failing.iter().any(|t| t == tool) {
            return Err(FolioError::Tool {
                tool: tool.to_string(),
                message: "scripted failure".to_string(),
            });
        }
        Ok(self.results.get(tool).cloned().unwrap_or_else(|| {
            let mut map = Map::new();
            map.insert("ok".to_string(), Value::Bool(true));
            map
        }))
    }
}

/// Collects conversation and indexing progress events.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
    index: Mutex<Vec<IndexProgress>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn index_reports(&self) -> Vec<IndexProgress> {
        self.index
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Status texts only, in emission order.
    pub fn statuses(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Status { text } => Some(text),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

impl IndexProgressSink for RecordingSink {
    fn report(&self, progress: IndexProgress) {
        self.index
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(progress);
    }
}
