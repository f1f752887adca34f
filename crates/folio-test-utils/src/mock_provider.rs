// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted chat backend for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` by popping pre-configured
//! replies from a FIFO queue and recording every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use tokio::sync::Mutex;

use folio_core::{
    AdapterType, ChatRequest, ChatResponse, ChatStream, FolioError, HealthStatus, PluginAdapter,
    ProviderAdapter, ProviderKind, StreamChunk, ToolCall,
};

/// One scripted backend reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A plain-text answer.
    Text(String),
    /// A response requesting the given tool calls.
    ToolCalls(Vec<ToolCall>),
    /// A provider failure with the given message.
    Error(String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        MockReply::Text(text.into())
    }

    /// A single tool call with a fresh call id.
    pub fn tool(name: &str, arguments: serde_json::Value) -> Self {
        MockReply::ToolCalls(vec![ToolCall {
            id: format!("call_{}", uuid::Uuid::new_v4().simple()),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }])
    }

    pub fn error(message: impl Into<String>) -> Self {
        MockReply::Error(message.into())
    }
}

/// A mock chat backend that returns scripted replies.
///
/// When the queue is empty the fallback reply is returned; by default that
/// is the text "mock response".
pub struct MockProvider {
    kind: ProviderKind,
    default_model: String,
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    fallback: Arc<Mutex<MockReply>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockProvider {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            default_model: format!("{kind}-default"),
            replies: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Arc::new(Mutex::new(MockReply::text("mock response"))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A mock pre-loaded with `replies`.
    pub fn with_replies(kind: ProviderKind, replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            ..Self::new(kind)
        }
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Reply returned once the queue is exhausted.
    pub async fn set_fallback(&self, reply: MockReply) {
        *self.fallback.lock().await = reply;
    }

    pub async fn push(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    async fn next_reply(&self, request: &ChatRequest) -> MockReply {
        self.requests.lock().await.push(request.clone());
        match self.replies.lock().await.pop_front() {
            Some(reply) => reply,
            None => self.fallback.lock().await.clone(),
        }
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, FolioError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, FolioError> {
        match self.next_reply(&request).await {
            MockReply::Text(text) => Ok(ChatResponse::text(request.model, text)),
            MockReply::ToolCalls(tool_calls) => Ok(ChatResponse {
                content: None,
                tool_calls,
                finish_reason: Some("tool_calls".to_string()),
                model: request.model,
            }),
            MockReply::Error(message) => Err(FolioError::provider(message)),
        }
    }

    async fn stream(&self, request: ChatRequest) -> Result<ChatStream, FolioError> {
        match self.next_reply(&request).await {
            MockReply::Text(text) => {
                // One chunk per whitespace-separated word, spacing preserved.
                let chunks: Vec<Result<StreamChunk, FolioError>> = text
                    .split_inclusive(' ')
                    .map(|piece| {
                        Ok(StreamChunk {
                            text: piece.to_string(),
                        })
                    })
                    .collect();
                Ok(Box::pin(stream::iter(chunks)))
            }
            MockReply::ToolCalls(_) => Ok(Box::pin(stream::empty())),
            MockReply::Error(message) => Err(FolioError::provider(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ChatMessage;
    use futures::StreamExt;

    fn request() -> ChatRequest {
        ChatRequest::plain("m", vec![ChatMessage::user("hi")])
    }

    #[tokio::test]
    async fn fallback_when_queue_empty() {
        let provider = MockProvider::new(ProviderKind::OpenAi);
        let resp = provider.complete(request()).await.unwrap();
        assert_eq!(resp.content.as_deref(), Some("mock response"));
        assert_eq!(provider.call_count().await, 1);
    }

    #[tokio::test]
    async fn scripted_replies_in_order() {
        let provider = MockProvider::with_replies(
            ProviderKind::OpenRouter,
            vec![
                MockReply::tool("generate_quiz", serde_json::json!({})),
                MockReply::error("quota"),
                MockReply::text("done"),
            ],
        );
        assert!(provider.complete(request()).await.unwrap().requests_tools());
        assert!(provider.complete(request()).await.is_err());
        assert_eq!(
            provider.complete(request()).await.unwrap().content.as_deref(),
            Some("done")
        );
    }

    #[tokio::test]
    async fn stream_splits_words() {
        let provider = MockProvider::with_replies(ProviderKind::Gemini, vec![MockReply::text("a b c")]);
        let chunks: Vec<String> = provider
            .stream(request())
            .await
            .unwrap()
            .map(|c| c.unwrap().text)
            .collect()
            .await;
        assert_eq!(chunks, ["a ", "b ", "c"]);
    }
}
