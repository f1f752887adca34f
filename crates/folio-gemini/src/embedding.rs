// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini embedding adapter (`gemini-embedding-001` at 768 dimensions).

use std::time::Duration;

use async_trait::async_trait;
use folio_config::model::{EmbeddingConfig, ProviderConfig};
use folio_core::vector::l2_normalize;
use folio_core::{
    AdapterType, EmbeddingAdapter, EmbeddingInput, EmbeddingOutput, FolioError, HealthStatus,
    PluginAdapter, ProviderKind, RetryPolicy,
};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::{BatchEmbedRequest, EmbedContentRequest};

pub const EMBEDDING_MODEL: &str = "gemini-embedding-001";
pub const EMBEDDING_DIMENSIONS: usize = 768;
pub const MAX_BATCH_SIZE: usize = 100;

pub struct GeminiEmbedder {
    client: GeminiClient,
    policy: RetryPolicy,
}

impl GeminiEmbedder {
    pub fn new(providers: &ProviderConfig, embedding: &EmbeddingConfig) -> Result<Self, FolioError> {
        let api_key = providers.api_key(ProviderKind::Gemini).ok_or_else(|| {
            FolioError::Config("Gemini embeddings need GOOGLE_API_KEY or GEMINI_API_KEY".into())
        })?;
        let client = GeminiClient::new(
            &api_key,
            providers.base_url(ProviderKind::Gemini),
            Duration::from_secs(providers.timeout_secs),
        )?;
        let policy = RetryPolicy::new(
            embedding.max_attempts,
            Duration::from_millis(embedding.backoff_base_ms),
        );
        info!(model = EMBEDDING_MODEL, "Gemini embedder initialized");
        Ok(Self::with_client(client, policy))
    }

    pub fn with_client(client: GeminiClient, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    async fn embed_one_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, FolioError> {
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|t| EmbedContentRequest::new(EMBEDDING_MODEL, t, EMBEDDING_DIMENSIONS))
                .collect(),
        };
        let client = &self.client;
        let request = &request;
        let response = self
            .policy
            .run("gemini embeddings", move || async move {
                client.batch_embed(EMBEDDING_MODEL, request).await
            })
            .await?;

        if response.embeddings.len() != texts.len() {
            return Err(FolioError::provider(format!(
                "embeddings returned {} vectors for {} texts",
                response.embeddings.len(),
                texts.len()
            )));
        }
        if let Some(bad) = response
            .embeddings
            .iter()
            .find(|e| e.values.len() != EMBEDDING_DIMENSIONS)
        {
            return Err(FolioError::provider(format!(
                "embedding has {} dimensions, expected {EMBEDDING_DIMENSIONS}",
                bad.values.len()
            )));
        }
        Ok(response
            .embeddings
            .into_iter()
            .map(|e| l2_normalize(&e.values))
            .collect())
    }
}

#[async_trait]
impl PluginAdapter for GeminiEmbedder {
    fn name(&self) -> &str {
        "gemini-embeddings"
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
impl EmbeddingAdapter for GeminiEmbedder {
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

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::vector::l2_norm;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const EMBED_PATH: &str = "/models/gemini-embedding-001:batchEmbedContents";

    fn embedder(base_url: &str, attempts: u32) -> GeminiEmbedder {
        let client = GeminiClient::new("g-key", base_url, Duration::from_secs(5)).unwrap();
        GeminiEmbedder::with_client(client, RetryPolicy::new(attempts, Duration::from_millis(5)))
    }

    /// `head` followed by zeros up to the model's width.
    fn padded(head: &[f32]) -> Vec<f32> {
        let mut vector = head.to_vec();
        vector.resize(EMBEDDING_DIMENSIONS, 0.0);
        vector
    }

    fn echo_vectors(request: &Request) -> ResponseTemplate {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        let count = body["requests"].as_array().map(Vec::len).unwrap_or(0);
        let embeddings: Vec<_> = (0..count)
            .map(|_| json!({"values": padded(&[2.0])}))
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({"embeddings": embeddings}))
    }

    #[tokio::test]
    async fn requests_reduced_dimensionality_and_normalizes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EMBED_PATH))
            .and(query_param("key", "g-key"))
            .and(body_partial_json(json!({
                "requests": [{"model": "models/gemini-embedding-001", "outputDimensionality": 768}]
            })))
            .respond_with(echo_vectors)
            .expect(1)
            .mount(&server)
            .await;

        let vector = embedder(&server.uri(), 1).embed_text("hello").await.unwrap();
        assert_eq!(vector, padded(&[1.0]));
        assert!((l2_norm(&vector) - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn batches_at_one_hundred() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EMBED_PATH))
            .respond_with(echo_vectors)
            .expect(3)
            .mount(&server)
            .await;

        let texts: Vec<String> = (0..250).map(|i| format!("t{i}")).collect();
        let out = embedder(&server.uri(), 1)
            .embed(EmbeddingInput { texts })
            .await
            .unwrap();
        assert_eq!(out.embeddings.len(), 250);
        assert_eq!(out.dimensions, EMBEDDING_DIMENSIONS);
    }

    #[tokio::test]
    async fn server_errors_are_retried_until_budget() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EMBED_PATH))
            .respond_with(ResponseTemplate::new(500))
            .expect(4)
            .mount(&server)
            .await;

        let err = embedder(&server.uri(), 4).embed_text("x").await.unwrap_err();
        assert!(matches!(err, FolioError::RetrievalUnavailable { attempts: 4, .. }));
    }

    #[tokio::test]
    async fn short_response_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EMBED_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"embeddings": []})))
            .mount(&server)
            .await;

        let err = embedder(&server.uri(), 1)
            .embed_batch(&["a".to_string(), "b".to_string()])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("0 vectors for 2 texts"));
    }

    #[tokio::test]
    async fn wrong_width_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EMBED_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"embeddings": [{"values": [2.0, 0.0]}]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = embedder(&server.uri(), 3).embed_text("x").await.unwrap_err();
        assert!(matches!(err, FolioError::Provider { .. }));
        assert!(err.to_string().contains("2 dimensions, expected 768"));
    }
}
