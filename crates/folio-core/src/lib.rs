// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Folio study engine.
//!
//! This crate provides the foundational trait definitions, error types,
//! shared chat/embedding types, vector math and model-output parsing used
//! throughout the Folio workspace. Every backend implements traits defined here.

pub mod error;
pub mod extract;
pub mod retry;
pub mod traits;
pub mod types;
pub mod vector;

// Re-export key items at crate root for ergonomic imports.
pub use error::FolioError;
pub use retry::{RetryPolicy, Transient};
pub use types::{
    AdapterType, ChatMessage, ChatRequest, ChatResponse, EmbeddingProvider, HealthStatus,
    EmbeddingInput, EmbeddingOutput, IndexPhase, IndexProgress, ProgressEvent, ProviderKind,
    Role, StreamChunk, ToolCall, ToolChoice, ToolDefinition, ToolOutput,
};

pub use traits::{
    ChatStream, EmbeddingAdapter, IndexProgressSink, NoopSink, PluginAdapter, ProgressSink,
    ProviderAdapter, ToolExecutor,
};
