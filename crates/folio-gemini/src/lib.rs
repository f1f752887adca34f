// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini chat and embedding adapters for Folio.
//!
//! [`GeminiProvider`] implements [`ProviderAdapter`] over the Gemini
//! `generateContent` REST API, translating Folio chat messages, tool
//! declarations and forced tool choices into Gemini's content/parts model.
//! [`GeminiEmbedder`] implements batched embeddings.

pub mod client;
pub mod embedding;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use folio_config::model::ProviderConfig;
use folio_core::{
    AdapterType, ChatRequest, ChatResponse, ChatStream, FolioError, HealthStatus, PluginAdapter,
    ProviderAdapter, ProviderKind,
};
use tracing::{debug, info};

pub use client::{ApiError, GeminiClient};
pub use embedding::GeminiEmbedder;

use crate::types::GenerateContentRequest;

pub struct GeminiProvider {
    client: GeminiClient,
    default_model: String,
}

impl GeminiProvider {
    /// Builds the Gemini backend from configuration.
    ///
    /// The API key comes from `provider.gemini_api_key`, `GOOGLE_API_KEY` or
    /// `GEMINI_API_KEY`, in that order.
    pub fn new(config: &ProviderConfig) -> Result<Self, FolioError> {
        let api_key = config.api_key(ProviderKind::Gemini).ok_or_else(|| {
            FolioError::Config("Gemini backend needs GOOGLE_API_KEY or GEMINI_API_KEY".into())
        })?;
        let client = GeminiClient::new(
            &api_key,
            config.base_url(ProviderKind::Gemini),
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(model = config.gemini_model, "Gemini provider initialized");
        Ok(Self::with_client(client, config.gemini_model.clone()))
    }

    pub fn with_client(client: GeminiClient, default_model: String) -> Self {
        Self {
            client,
            default_model,
        }
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
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
impl ProviderAdapter for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, FolioError> {
        let wire = GenerateContentRequest::from(&request);
        debug!(model = %request.model, tools = request.tools.len(), "sending generateContent");
        let response = self.client.generate(&request.model, &wire).await?;
        if response.candidates.is_empty() {
            return Err(FolioError::provider("gemini returned no candidates"));
        }
        Ok(response.into_chat_response(&request.model))
    }

    async fn stream(&self, request: ChatRequest) -> Result<ChatStream, FolioError> {
        let wire = GenerateContentRequest::from(&request);
        Ok(self.client.stream(&request.model, &wire).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ChatMessage, ToolChoice, ToolDefinition};
    use futures::StreamExt;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base_url: &str) -> GeminiProvider {
        let client = GeminiClient::new("g-key", base_url, Duration::from_secs(5)).unwrap();
        GeminiProvider::with_client(client, "gemini-2.0-flash".into())
    }

    #[tokio::test]
    async fn forced_tool_call_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(body_partial_json(json!({
                "toolConfig": {"functionCallingConfig": {"mode": "ANY"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [
                        {"functionCall": {"name": "generate_flashcards", "args": {"count": 5}}}
                    ]},
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = ChatRequest {
            tools: vec![ToolDefinition {
                name: "generate_flashcards".into(),
                description: "Flashcards".into(),
                parameters: json!({"type": "object"}),
            }],
            tool_choice: Some(ToolChoice::Function("generate_flashcards".into())),
            ..ChatRequest::plain("gemini-2.0-flash", vec![ChatMessage::user("make flashcards")])
        };
        let resp = provider(&server.uri()).complete(request).await.unwrap();
        assert!(resp.requests_tools());
        assert_eq!(resp.tool_calls[0].name, "generate_flashcards");
    }

    #[tokio::test]
    async fn no_candidates_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let err = provider(&server.uri())
            .complete(ChatRequest::plain("gemini-2.0-flash", vec![ChatMessage::user("hi")]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no candidates"));
    }

    #[tokio::test]
    async fn stream_reads_sse_chunks() {
        let server = MockServer::start().await;
        let body = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Photo\"}]}}]}\n\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"synthesis\"}]}}]}\n\n",
        );
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:streamGenerateContent"))
            .and(query_param("alt", "sse"))
            .and(body_partial_json(json!({"generationConfig": {"maxOutputTokens": 2048}})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .mount(&server)
            .await;

        let request = ChatRequest {
            max_tokens: Some(2048),
            ..ChatRequest::plain("gemini-2.0-flash", vec![ChatMessage::user("explain")])
        };
        let stream = provider(&server.uri()).stream(request).await.unwrap();
        let text: String = stream.map(|c| c.unwrap().text).collect::<Vec<_>>().await.concat();
        assert_eq!(text, "Photosynthesis");
    }
}
