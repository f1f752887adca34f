// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The single entry point for synchronous work inside a conversation turn.

use folio_core::FolioError;

/// Runs `work` on the runtime's bounded blocking pool and waits for it.
///
/// A panic inside `work` surfaces as [`FolioError::Internal`].
pub async fn run_blocking<F, T>(work: F) -> Result<T, FolioError>
where
    F: FnOnce() -> Result<T, FolioError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| FolioError::Internal(format!("blocking task failed: {e}")))?
}
