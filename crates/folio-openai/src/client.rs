// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible APIs.
//!
//! [`OpenAiClient`] handles authentication, request construction and error
//! decoding for the chat completions and embeddings endpoints. It issues
//! exactly one HTTP request per call; callers decide whether to retry.

use std::time::Duration;

use folio_core::{ChatStream, FolioError, Transient};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::sse;
use crate::types::{
    ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, EmbeddingRequest,
    EmbeddingResponse,
};

/// Failure of a single API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// A success response whose body could not be decoded.
    #[error("failed to parse API response: {0}")]
    Decode(String),
}

impl Transient for ApiError {
    fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            ApiError::Decode(_) => false,
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

/// HTTP client for one OpenAI-compatible base URL.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a client authenticating with a bearer `api_key`.
    ///
    /// `extra_headers` are sent on every request (OpenRouter attribution
    /// headers, for instance).
    pub fn new(
        api_key: &str,
        base_url: &str,
        timeout: Duration,
        extra_headers: &[(&'static str, &str)],
    ) -> Result<Self, FolioError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| FolioError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in extra_headers {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_str(value).map_err(|e| {
                    FolioError::Config(format!("invalid value for header {name}: {e}"))
                })?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FolioError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /chat/completions` without streaming.
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiError> {
        let mut req = request.clone();
        req.stream = false;
        self.post_json("chat/completions", &req).await
    }

    /// `POST /chat/completions` with `stream: true`, yielding text deltas.
    pub async fn stream(&self, request: &ChatCompletionRequest) -> Result<ChatStream, ApiError> {
        let mut req = request.clone();
        req.stream = true;
        let response = self.send("chat/completions", &req).await?;
        Ok(sse::parse_chat_stream(response))
    }

    /// `POST /embeddings`.
    pub async fn embeddings(
        &self,
        request: &EmbeddingRequest<'_>,
    ) -> Result<EmbeddingResponse, ApiError> {
        self.post_json("embeddings", request).await
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(endpoint, body).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send<B>(&self, endpoint: &str, body: &B) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}/{endpoint}", self.base_url);
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        debug!(status = %status, endpoint, "response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => match api_err.error.type_ {
                Some(kind) => format!("{kind}: {}", api_err.error.message),
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
    use folio_core::{ChatMessage, ChatRequest};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new("test-key", base_url, Duration::from_secs(5), &[]).unwrap()
    }

    fn test_request() -> ChatCompletionRequest {
        ChatCompletionRequest::from(&ChatRequest::plain(
            "gpt-4o",
            vec![ChatMessage::user("Hello")],
        ))
    }

    #[tokio::test]
    async fn complete_sends_bearer_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({"model": "gpt-4o"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "gpt-4o",
                "choices": [{"message": {"role": "assistant", "content": "Hi"}, "finish_reason": "stop"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = test_client(&server.uri()).complete(&test_request()).await.unwrap();
        assert_eq!(resp.choices[0].message.content.as_deref(), Some("Hi"));
    }

    #[tokio::test]
    async fn error_status_carries_api_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"type": "invalid_request_error", "message": "Bad model"}
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete(&test_request())
            .await
            .unwrap_err();
        assert!(!err.is_transient());
        let text = err.to_string();
        assert!(text.contains("400"), "got: {text}");
        assert!(text.contains("invalid_request_error: Bad model"), "got: {text}");
    }

    #[tokio::test]
    async fn rate_limit_and_server_errors_are_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let texts = vec!["a".to_string()];
        let err = test_client(&server.uri())
            .embeddings(&EmbeddingRequest {
                model: "text-embedding-3-small",
                input: &texts,
            })
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert!(err.to_string().contains("slow down"));

        let server_error = ApiError::Status {
            status: 503,
            message: "overloaded".into(),
        };
        assert!(server_error.is_transient());
    }

    #[tokio::test]
    async fn undecodable_body_is_permanent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete(&test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = test_client("https://api.openai.com/v1/");
        assert_eq!(client.base_url(), "https://api.openai.com/v1");
    }

    #[test]
    fn invalid_extra_header_is_a_config_error() {
        let err = OpenAiClient::new(
            "k",
            "http://localhost",
            Duration::from_secs(1),
            &[("x-title", "bad\nvalue")],
        )
        .unwrap_err();
        assert!(matches!(err, FolioError::Config(_)));
    }
}
