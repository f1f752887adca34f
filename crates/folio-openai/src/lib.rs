// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI chat and embedding adapters for Folio.
//!
//! [`OpenAiProvider`] implements [`ProviderAdapter`] for any backend that
//! speaks the OpenAI chat completions protocol. OpenRouter reuses it with a
//! different base URL and attribution headers. [`OpenAiEmbedder`] implements
//! [`EmbeddingAdapter`](folio_core::EmbeddingAdapter).

pub mod client;
pub mod embedding;
pub mod sse;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use folio_config::model::ProviderConfig;
use folio_core::{
    AdapterType, ChatRequest, ChatResponse, ChatStream, FolioError, HealthStatus, PluginAdapter,
    ProviderAdapter, ProviderKind,
};
use tracing::{debug, info};

pub use client::{ApiError, OpenAiClient};
pub use embedding::OpenAiEmbedder;

use crate::types::ChatCompletionRequest;

/// Chat backend speaking the OpenAI chat completions protocol.
pub struct OpenAiProvider {
    client: OpenAiClient,
    kind: ProviderKind,
    name: &'static str,
    default_model: String,
}

impl OpenAiProvider {
    /// Builds the OpenAI backend from configuration.
    ///
    /// The API key comes from `provider.openai_api_key` or `OPENAI_API_KEY`.
    pub fn new(config: &ProviderConfig) -> Result<Self, FolioError> {
        let api_key = config
            .api_key(ProviderKind::OpenAi)
            .ok_or_else(|| FolioError::Config("OpenAI backend needs OPENAI_API_KEY".into()))?;
        let client = OpenAiClient::new(
            &api_key,
            config.base_url(ProviderKind::OpenAi),
            Duration::from_secs(config.timeout_secs),
            &[],
        )?;
        info!(model = config.openai_model, "OpenAI provider initialized");
        Ok(Self::with_client(
            client,
            ProviderKind::OpenAi,
            "openai",
            config.openai_model.clone(),
        ))
    }

    /// Wraps an existing client, for OpenAI-compatible backends.
    pub fn with_client(
        client: OpenAiClient,
        kind: ProviderKind,
        name: &'static str,
        default_model: String,
    ) -> Self {
        Self {
            client,
            kind,
            name,
            default_model,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        self.name
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
impl ProviderAdapter for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, FolioError> {
        let wire = ChatCompletionRequest::from(&request);
        debug!(
            backend = self.name,
            model = %wire.model,
            tools = wire.tools.len(),
            "sending completion"
        );
        let response = self.client.complete(&wire).await?;
        response
            .into_chat_response(&request.model)
            .ok_or_else(|| FolioError::provider(format!("{} returned no choices", self.name)))
    }

    async fn stream(&self, request: ChatRequest) -> Result<ChatStream, FolioError> {
        let wire = ChatCompletionRequest::from(&request);
        Ok(self.client.stream(&wire).await?)
    }
}
