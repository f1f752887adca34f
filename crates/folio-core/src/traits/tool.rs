// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool executor seam consumed by the orchestration loop.

use crate::error::FolioError;
use crate::types::ToolOutput;

/// Executes named tools on behalf of the model.
///
/// Execution is synchronous and may block; the orchestration loop always
/// calls it from the blocking worker pool. A tool that fails "softly"
/// returns a map with an `error` key, which the loop forwards to the model.
/// Returning `Err` aborts the whole conversation turn.
pub trait ToolExecutor: Send + Sync + 'static {
    fn execute(
        &self,
        tool: &str,
        args: &serde_json::Map<String, serde_json::Value>,
        session_id: &str,
        user_id: &str,
    ) -> Result<ToolOutput, FolioError>;
}
