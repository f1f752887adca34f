// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Uniform chat interface over the configured backends.

use std::sync::Arc;

use folio_config::model::ProviderConfig;
use folio_core::{
    ChatMessage, ChatRequest, ChatResponse, ChatStream, FolioError, ProviderAdapter, ToolChoice,
    ToolDefinition,
};
use tracing::{debug, info, warn};

use crate::models::{resolve_model, supports_tools};
use crate::registry::build_backends;

/// Output cap for exploration streaming.
pub const STREAM_MAX_TOKENS: u32 = 2048;

/// One chat turn as seen by the gateway.
#[derive(Debug, Clone, Default)]
pub struct ChatCall {
    pub messages: Vec<ChatMessage>,
    /// Caller-pinned model; unset values mean the backend default.
    pub model: Option<String>,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: Option<ToolChoice>,
}

impl ChatCall {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }
}

/// Ordered backends, primary first.
///
/// A pinned model applies to the primary backend only; fallbacks use their
/// own default model since shorthand ids rarely exist on every backend.
pub struct ModelGateway {
    backends: Vec<Arc<dyn ProviderAdapter>>,
}

impl ModelGateway {
    pub fn new(backends: Vec<Arc<dyn ProviderAdapter>>) -> Result<Self, FolioError> {
        if backends.is_empty() {
            return Err(FolioError::Config("model gateway needs at least one backend".into()));
        }
        Ok(Self { backends })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, FolioError> {
        Self::new(build_backends(config)?)
    }

    pub fn primary(&self) -> &Arc<dyn ProviderAdapter> {
        &self.backends[0]
    }

    pub fn backends(&self) -> &[Arc<dyn ProviderAdapter>] {
        &self.backends
    }

    /// The model id the primary backend would use for `requested`.
    pub fn resolve_model(&self, requested: Option<&str>) -> String {
        let primary = self.primary();
        resolve_model(primary.kind(), requested, primary.default_model())
    }

    /// Sends `call` down the fallback chain.
    ///
    /// Each backend gets the request as given and, when tools were attached
    /// and that failed, once more without tools. The last error is returned
    /// when every backend fails.
    pub async fn chat(&self, call: ChatCall) -> Result<ChatResponse, FolioError> {
        let mut last_error = None;
        for (position, backend) in self.backends.iter().enumerate() {
            let requested = if position == 0 { call.model.as_deref() } else { None };
            let model = resolve_model(backend.kind(), requested, backend.default_model());
            let request = ChatRequest {
                model,
                messages: call.messages.clone(),
                tools: call.tools.clone(),
                tool_choice: call.tool_choice.clone(),
                max_tokens: None,
            };
            match complete_with_plain_retry(backend.as_ref(), request).await {
                Ok(response) => {
                    if position > 0 {
                        info!(provider = %backend.kind(), "answered by fallback backend");
                    }
                    return Ok(response);
                }
                Err(e) => {
                    warn!(provider = %backend.kind(), error = %e, "chat backend failed");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| FolioError::provider("no chat backend available")))
    }

    /// Single-turn completion returning only the text.
    pub async fn simple_response(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, FolioError> {
        let response = self
            .chat(ChatCall {
                model: model.map(str::to_string),
                ..ChatCall::new(vec![ChatMessage::user(prompt)])
            })
            .await?;
        Ok(response.content.unwrap_or_default())
    }

    /// Streams a plain answer from the primary backend. No fallback.
    pub async fn stream(
        &self,
        messages: Vec<ChatMessage>,
        model: Option<&str>,
    ) -> Result<ChatStream, FolioError> {
        let request = ChatRequest {
            max_tokens: Some(STREAM_MAX_TOKENS),
            ..ChatRequest::plain(self.resolve_model(model), messages)
        };
        debug!(model = %request.model, "streaming");
        self.primary().stream(request).await
    }
}

async fn complete_with_plain_retry(
    backend: &dyn ProviderAdapter,
    mut request: ChatRequest,
) -> Result<ChatResponse, FolioError> {
    if !request.tools.is_empty() && !supports_tools(&request.model) {
        debug!(model = %request.model, "model cannot call tools, dropping them");
        request = request.without_tools();
    }
    if request.tools.is_empty() {
        return backend.complete(request).await;
    }

    let plain = request.without_tools();
    match backend.complete(request).await {
        Ok(response) => Ok(response),
        Err(e) => {
            warn!(model = %plain.model, error = %e, "tool-calling failed, retrying without tools");
            backend.complete(plain).await
        }
    }
}
