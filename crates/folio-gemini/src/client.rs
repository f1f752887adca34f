// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini REST API.
//!
//! Gemini authenticates with a `key` query parameter rather than a bearer
//! header. One HTTP request per call; callers decide whether to retry.

use std::time::Duration;

use eventsource_stream::Eventsource;
use folio_core::{ChatStream, FolioError, StreamChunk, Transient};
use futures::StreamExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{
    ApiErrorResponse, BatchEmbedRequest, BatchEmbedResponse, GenerateContentRequest,
    GenerateContentResponse,
};

/// Failure of a single Gemini API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gemini API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to parse Gemini response: {0}")]
    Decode(String),

    #[error("invalid Gemini URL: {0}")]
    InvalidUrl(String),
}

impl Transient for ApiError {
    fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            ApiError::Decode(_) | ApiError::InvalidUrl(_) => false,
        }
    }
}

impl From<ApiError> for FolioError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        FolioError::Provider {
            message,
            source: Some(Box::new(err)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, FolioError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FolioError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `POST /models/{model}:generateContent`.
    pub async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ApiError> {
        self.post_json(&format!("models/{model}:generateContent"), &[], request)
            .await
    }

    /// `POST /models/{model}:streamGenerateContent?alt=sse`, yielding text.
    pub async fn stream(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<ChatStream, ApiError> {
        let response = self
            .send(
                &format!("models/{model}:streamGenerateContent"),
                &[("alt", "sse")],
                request,
            )
            .await?;
        let chunks = response
            .bytes_stream()
            .eventsource()
            .filter_map(|result| async move {
                match result {
                    Ok(event) => {
                        match serde_json::from_str::<GenerateContentResponse>(&event.data) {
                            Ok(payload) => {
                                let text = payload.text();
                                (!text.is_empty()).then_some(Ok(StreamChunk { text }))
                            }
                            Err(e) => Some(Err(FolioError::Provider {
                                message: format!("failed to parse stream chunk: {e}"),
                                source: Some(Box::new(e)),
                            })),
                        }
                    }
                    Err(e) => Some(Err(FolioError::provider(format!("SSE stream error: {e}")))),
                }
            });
        Ok(Box::pin(chunks))
    }

    /// `POST /models/{model}:batchEmbedContents`.
    pub async fn batch_embed(
        &self,
        model: &str,
        request: &BatchEmbedRequest,
    ) -> Result<BatchEmbedResponse, ApiError> {
        self.post_json(&format!("models/{model}:batchEmbedContents"), &[], request)
            .await
    }

    async fn post_json<B, T>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(endpoint, query, body).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send<B>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut url = reqwest::Url::parse(&format!("{}/{endpoint}", self.base_url))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .extend_pairs(query);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await?;
        let status = response.status();
        debug!(status = %status, endpoint, "response received");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => match api_err.error.status {
                Some(code) => format!("{code}: {}", api_err.error.message),
                None => api_err.error.message,
            },
            Err(_) => body,
        };
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn key_travels_as_query_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(query_param("key", "g-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}, "finishReason": "STOP"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new("g-key", &server.uri(), Duration::from_secs(5)).unwrap();
        let resp = client
            .generate("gemini-2.0-flash", &GenerateContentRequest::default())
            .await
            .unwrap();
        assert_eq!(resp.text(), "ok");
    }

    #[tokio::test]
    async fn error_body_is_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "status": "INVALID_ARGUMENT", "message": "bad schema"}
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new("g-key", &server.uri(), Duration::from_secs(5)).unwrap();
        let err = client
            .generate("gemini-2.0-flash", &GenerateContentRequest::default())
            .await
            .unwrap_err();
        assert!(!err.is_transient());
        assert!(err.to_string().contains("INVALID_ARGUMENT: bad schema"));
    }
}
