// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Folio study engine.

use thiserror::Error;

/// The primary error type used across all Folio adapters and core operations.
#[derive(Debug, Error)]
pub enum FolioError {
    /// Configuration errors (missing credentials, invalid header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat provider errors (API failure, malformed response, model not found).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The embedding backend could not be reached after every retry.
    #[error("retrieval unavailable after {attempts} attempt(s): {message}")]
    RetrievalUnavailable { message: String, attempts: u32 },

    /// A tool executor failed outright (as opposed to returning an `error` key).
    #[error("tool `{tool}` failed: {message}")]
    Tool { tool: String, message: String },

    /// Model output could not be parsed into the expected structure.
    #[error("malformed model output: {0}")]
    MalformedOutput(String),

    /// Requested adapter was not configured.
    #[error("adapter not found: {adapter_type}/{name}")]
    AdapterNotFound { adapter_type: String, name: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FolioError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        FolioError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps any storage-layer error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FolioError::Storage {
            source: Box::new(err),
        }
    }
}
