// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI embedding adapter (`text-embedding-3-small`).

use std::time::Duration;

use async_trait::async_trait;
use folio_config::model::{EmbeddingConfig, ProviderConfig};
use folio_core::vector::l2_normalize;
use folio_core::{
    AdapterType, EmbeddingAdapter, EmbeddingInput, EmbeddingOutput, FolioError, HealthStatus,
    PluginAdapter, ProviderKind, RetryPolicy,
};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::EmbeddingRequest;

pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const EMBEDDING_DIMENSIONS: usize = 1536;
pub const MAX_BATCH_SIZE: usize = 200;

/// Embeds text through the OpenAI embeddings endpoint, with bounded
/// exponential backoff on transient failures.
pub struct OpenAiEmbedder {
    client: OpenAiClient,
    policy: RetryPolicy,
}

impl OpenAiEmbedder {
    pub fn new(providers: &ProviderConfig, embedding: &EmbeddingConfig) -> Result<Self, FolioError> {
        let api_key = providers
            .api_key(ProviderKind::OpenAi)
            .ok_or_else(|| FolioError::Config("OpenAI embeddings need OPENAI_API_KEY".into()))?;
        let client = OpenAiClient::new(
            &api_key,
            providers.base_url(ProviderKind::OpenAi),
            Duration::from_secs(providers.timeout_secs),
            &[],
        )?;
        let policy = RetryPolicy::new(
            embedding.max_attempts,
            Duration::from_millis(embedding.backoff_base_ms),
        );
        info!(model = EMBEDDING_MODEL, "OpenAI embedder initialized");
        Ok(Self::with_client(client, policy))
    }

    pub fn with_client(client: OpenAiClient, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    async fn embed_one_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, FolioError> {
        let client = &self.client;
        let request = EmbeddingRequest {
            model: EMBEDDING_MODEL,
            input: texts,
        };
        let request = &request;
        let mut response = self
            .policy
            .run("openai embeddings", move || async move {
                client.embeddings(request).await
            })
            .await?;

        if response.data.len() != texts.len() {
            return Err(FolioError::provider(format!(
                "embeddings returned {} vectors for {} texts",
                response.data.len(),
                texts.len()
            )));
        }
        if let Some(bad) = response
            .data
            .iter()
            .find(|d| d.embedding.len() != EMBEDDING_DIMENSIONS)
        {
            return Err(FolioError::provider(format!(
                "embedding has {} dimensions, expected {EMBEDDING_DIMENSIONS}",
                bad.embedding.len()
            )));
        }
        response.data.sort_by_key(|d| d.index);
        Ok(response
            .data
            .into_iter()
            .map(|d| l2_normalize(&d.embedding))
            .collect())
    }
}

#[async_trait]
impl PluginAdapter for OpenAiEmbedder {
    fn name(&self) -> &str {
        "openai-embeddings"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, FolioError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl EmbeddingAdapter for OpenAiEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, FolioError> {
        let mut embeddings = Vec::with_capacity(input.texts.len());
        for batch in input.texts.chunks(MAX_BATCH_SIZE) {
            debug!(batch = batch.len(), "embedding batch");
            embeddings.extend(self.embed_one_batch(batch).await?);
        }
        Ok(EmbeddingOutput {
            embeddings,
            dimensions: EMBEDDING_DIMENSIONS,
        })
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIMENSIONS
    }

    fn max_batch_size(&self) -> usize {
        MAX_BATCH_SIZE
    }
}
