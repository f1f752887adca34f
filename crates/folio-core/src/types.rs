// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across adapter traits and the Folio engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Embedding,
}

/// Chat completion backends.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenRouter,
    OpenAi,
    Gemini,
}

impl ProviderKind {
    /// Every backend, in the order fallback candidates are considered.
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::OpenRouter,
        ProviderKind::OpenAi,
        ProviderKind::Gemini,
    ];
}

/// Embedding backends. Fixed for the lifetime of a process.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    OpenAi,
    Gemini,
}

// --- Chat types ---

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Backend-assigned call id, echoed back on the tool-role reply.
    pub id: String,
    /// Tool name from the catalogue.
    pub name: String,
    /// Raw JSON argument string exactly as the model produced it.
    pub arguments: String,
}

/// One message in a conversation.
///
/// Assistant turns that request tools carry only the minimal fields
/// (role, optional content, tool calls) so that nothing backend-specific
/// leaks into the next request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    /// An assistant turn requesting tool calls.
    pub fn assistant_tool_calls(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls,
            tool_call_id: None,
        }
    }

    /// A tool-role reply carrying a serialized tool result.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A tool the model may call, described by a JSON-Schema parameter object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Constraint on which tool the model may pick for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolChoice {
    /// The model decides whether and which tool to call.
    Auto,
    /// The model must call the named tool.
    Function(String),
}

impl std::fmt::Display for ToolChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolChoice::Auto => write!(f, "auto"),
            ToolChoice::Function(name) => write!(f, "function:{name}"),
        }
    }
}

/// A request to a chat backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Concrete backend model id (already alias-resolved).
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Empty means a plain, tool-less completion.
    pub tools: Vec<ToolDefinition>,
    /// Ignored when `tools` is empty.
    pub tool_choice: Option<ToolChoice>,
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// A tool-less request.
    pub fn plain(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: Vec::new(),
            tool_choice: None,
            max_tokens: None,
        }
    }

    /// The same request with tools removed.
    pub fn without_tools(&self) -> Self {
        Self {
            tools: Vec::new(),
            tool_choice: None,
            ..self.clone()
        }
    }
}

/// A complete (non-streamed) chat response.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: Option<String>,
    pub model: String,
}

impl ChatResponse {
    /// A plain text response, mostly useful for tests and adapters.
    pub fn text(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
            finish_reason: Some("stop".to_string()),
            model: model.into(),
        }
    }

    /// True when the model asked for one or more tool calls.
    pub fn requests_tools(&self) -> bool {
        self.finish_reason.as_deref() == Some("tool_calls") || !self.tool_calls.is_empty()
    }
}

/// An incremental piece of streamed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChunk {
    pub text: String,
}

// --- Embedding types ---

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    pub texts: Vec<String>,
}

/// Output from an embedding adapter. Every vector is L2-normalized.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    pub embeddings: Vec<Vec<f32>>,
    pub dimensions: usize,
}

// --- Tool and progress types ---

/// Result map returned by a tool executor.
///
/// An `artifact_type` key marks a user-facing artifact; an `error` key
/// marks a failed tool that still produced a reply for the model.
pub type ToolOutput = serde_json::Map<String, serde_json::Value>;

/// Phase transition emitted while a conversation turn is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Status { text: String },
    ToolStart { tool: String },
    ToolDone { tool: String },
}

impl ProgressEvent {
    pub fn status(text: impl Into<String>) -> Self {
        ProgressEvent::Status { text: text.into() }
    }
}

/// Phases of long-running document ingestion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IndexPhase {
    Downloading,
    Extracting,
    Indexing,
    Completed,
    Failure,
}

/// A progress report for document ingestion, `percent` in 0..=100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexProgress {
    pub phase: IndexPhase,
    pub percent: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl IndexProgress {
    pub fn new(phase: IndexPhase, percent: u8) -> Self {
        Self {
            phase,
            percent: percent.min(100),
            detail: None,
        }
    }
}
