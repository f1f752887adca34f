// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for chat backends (OpenRouter, OpenAI, Gemini).

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::FolioError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatRequest, ChatResponse, ProviderKind, StreamChunk};

/// Boxed stream of incremental text from a chat backend.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, FolioError>> + Send>>;

/// Adapter for a single chat completion backend.
///
/// Backends issue exactly one request per call: retries, tool-less
/// fallbacks and provider fallback live in the gateway.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Which backend this adapter talks to.
    fn kind(&self) -> ProviderKind;

    /// Model used when the caller does not pin one.
    fn default_model(&self) -> &str;

    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, FolioError>;

    /// Sends a completion request and returns a stream of text chunks.
    async fn stream(&self, request: ChatRequest) -> Result<ChatStream, FolioError>;
}
