// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini REST wire types and conversion from Folio chat types.

use std::collections::HashMap;

use folio_core::{ChatMessage, ChatRequest, ChatResponse, Role, ToolCall, ToolChoice};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// --- generateContent ---

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_config: Option<ToolConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn new(role: Option<&str>, parts: Vec<Part>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts,
        }
    }
}

/// One part of a content turn. Exactly one field is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    pub function_calling_config: FunctionCallingConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCallingConfig {
    /// `AUTO` or `ANY`.
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_function_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Collapse the first candidate into a [`ChatResponse`].
    ///
    /// Gemini does not assign call ids, so each function call gets a fresh one.
    pub fn into_chat_response(self, requested_model: &str) -> ChatResponse {
        let text = self.text();
        let model = self
            .model_version
            .unwrap_or_else(|| requested_model.to_string());
        let candidate = self.candidates.into_iter().next();
        let finish = candidate
            .as_ref()
            .and_then(|c| c.finish_reason.as_deref())
            .map(str::to_ascii_lowercase);
        let tool_calls: Vec<ToolCall> = candidate
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.function_call)
                    .map(|call| ToolCall {
                        id: format!("call_{}", Uuid::new_v4().simple()),
                        name: call.name,
                        arguments: call.args.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let finish_reason = if tool_calls.is_empty() {
            finish
        } else {
            Some("tool_calls".to_string())
        };
        ChatResponse {
            content: (!text.is_empty()).then_some(text),
            tool_calls,
            finish_reason,
            model,
        }
    }
}

impl From<&ChatRequest> for GenerateContentRequest {
    fn from(request: &ChatRequest) -> Self {
        // Tool replies carry only the call id; Gemini wants the function name.
        let call_names: HashMap<&str, &str> = request
            .messages
            .iter()
            .flat_map(|m| m.tool_calls.iter())
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();

        let mut system = Vec::new();
        let mut contents = Vec::new();
        for msg in &request.messages {
            match msg.role {
                Role::System => {
                    if let Some(text) = msg.content.as_deref().filter(|t| !t.is_empty()) {
                        system.push(text.to_string());
                    }
                }
                Role::User => contents.push(Content::new(
                    Some("user"),
                    vec![Part::text(msg.content.clone().unwrap_or_default())],
                )),
                Role::Assistant => contents.push(model_turn(msg)),
                Role::Tool => contents.push(tool_turn(msg, &call_names)),
            }
        }

        let (tools, tool_config) = if request.tools.is_empty() {
            (Vec::new(), None)
        } else {
            let declarations = request
                .tools
                .iter()
                .map(|t| FunctionDeclaration {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                })
                .collect();
            let config = match request.tool_choice.as_ref().unwrap_or(&ToolChoice::Auto) {
                ToolChoice::Auto => FunctionCallingConfig {
                    mode: "AUTO",
                    allowed_function_names: Vec::new(),
                },
                ToolChoice::Function(name) => FunctionCallingConfig {
                    mode: "ANY",
                    allowed_function_names: vec![name.clone()],
                },
            };
            (
                vec![Tool {
                    function_declarations: declarations,
                }],
                Some(ToolConfig {
                    function_calling_config: config,
                }),
            )
        };

        Self {
            contents,
            system_instruction: (!system.is_empty())
                .then(|| Content::new(None, vec![Part::text(system.join("\n\n"))])),
            tools,
            tool_config,
            generation_config: request.max_tokens.map(|max| GenerationConfig {
                max_output_tokens: max,
            }),
        }
    }
}

fn model_turn(msg: &ChatMessage) -> Content {
    let mut parts = Vec::new();
    if let Some(text) = msg.content.as_deref().filter(|t| !t.is_empty()) {
        parts.push(Part::text(text));
    }
    for call in &msg.tool_calls {
        let args = serde_json::from_str(&call.arguments)
            .unwrap_or_else(|_| Value::Object(Default::default()));
        parts.push(Part {
            function_call: Some(FunctionCall {
                name: call.name.clone(),
                args,
            }),
            ..Part::default()
        });
    }
    if parts.is_empty() {
        parts.push(Part::text(""));
    }
    Content::new(Some("model"), parts)
}

fn tool_turn(msg: &ChatMessage, call_names: &HashMap<&str, &str>) -> Content {
    let name = msg
        .tool_call_id
        .as_deref()
        .and_then(|id| call_names.get(id))
        .copied()
        .unwrap_or("unknown");
    // functionResponse.response must be an object.
    let raw = msg.content.as_deref().unwrap_or("");
    let response = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(obj)) => Value::Object(obj),
        Ok(other) => serde_json::json!({ "result": other }),
        Err(_) => serde_json::json!({ "result": raw }),
    };
    Content::new(
        Some("user"),
        vec![Part {
            function_response: Some(FunctionResponse {
                name: name.to_string(),
                response,
            }),
            ..Part::default()
        }],
    )
}

// --- batchEmbedContents ---

#[derive(Debug, Clone, Serialize)]
pub struct BatchEmbedRequest {
    pub requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedContentRequest {
    pub model: String,
    pub content: Content,
    pub output_dimensionality: usize,
}

impl EmbedContentRequest {
    pub fn new(model: &str, text: &str, dimensions: usize) -> Self {
        Self {
            model: format!("models/{model}"),
            content: Content::new(None, vec![Part::text(text)]),
            output_dimensionality: dimensions,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchEmbedResponse {
    #[serde(default)]
    pub embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentEmbedding {
    pub values: Vec<f32>,
}

// --- errors ---

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub status: Option<String>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ToolDefinition;
    use serde_json::json;

    fn quiz_tool() -> ToolDefinition {
        ToolDefinition {
            name: "generate_quiz".into(),
            description: "Quiz".into(),
            parameters: json!({"type": "object"}),
        }
    }

    #[test]
    fn system_messages_become_instruction_and_roles_map() {
        let request = ChatRequest::plain(
            "gemini-2.0-flash",
            vec![
                ChatMessage::system("Be brief."),
                ChatMessage::user("hi"),
                ChatMessage::assistant("hello"),
                ChatMessage::user("again"),
            ],
        );
        let wire = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();
        assert_eq!(wire["systemInstruction"]["parts"][0]["text"], "Be brief.");
        let roles: Vec<_> = wire["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["role"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(roles, ["user", "model", "user"]);
        assert!(wire.get("tools").is_none());
        assert!(wire.get("toolConfig").is_none());
    }

    #[test]
    fn forced_tool_uses_any_mode() {
        let request = ChatRequest {
            tools: vec![quiz_tool()],
            tool_choice: Some(ToolChoice::Function("generate_quiz".into())),
            ..ChatRequest::plain("gemini-2.0-flash", vec![ChatMessage::user("quiz me")])
        };
        let wire = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();
        assert_eq!(
            wire["toolConfig"],
            json!({"functionCallingConfig": {"mode": "ANY", "allowedFunctionNames": ["generate_quiz"]}})
        );
        assert_eq!(wire["tools"][0]["functionDeclarations"][0]["name"], "generate_quiz");
    }

    #[test]
    fn tool_reply_is_named_after_its_call() {
        let call = ToolCall {
            id: "call_7".into(),
            name: "search_documents".into(),
            arguments: "{\"query\":\"x\"}".into(),
        };
        let request = ChatRequest::plain(
            "gemini-2.0-flash",
            vec![
                ChatMessage::user("q"),
                ChatMessage::assistant_tool_calls(None, vec![call]),
                ChatMessage::tool_result("call_7", "[1,2]"),
            ],
        );
        let wire = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();
        assert_eq!(
            wire["contents"][1]["parts"][0]["functionCall"],
            json!({"name": "search_documents", "args": {"query": "x"}})
        );
        assert_eq!(
            wire["contents"][2]["parts"][0]["functionResponse"],
            json!({"name": "search_documents", "response": {"result": [1, 2]}})
        );
    }

    #[test]
    fn function_call_response_maps_to_tool_calls() {
        let body = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"functionCall": {"name": "generate_quiz", "args": {"topic": "cells"}}}
                ]},
                "finishReason": "STOP"
            }]
        });
        let parsed: GenerateContentResponse = serde_json::from_value(body).unwrap();
        let resp = parsed.into_chat_response("gemini-2.0-flash");
        assert_eq!(resp.finish_reason.as_deref(), Some("tool_calls"));
        assert_eq!(resp.tool_calls.len(), 1);
        assert!(resp.tool_calls[0].id.starts_with("call_"));
        let args: Value = serde_json::from_str(&resp.tool_calls[0].arguments).unwrap();
        assert_eq!(args, json!({"topic": "cells"}));
        assert!(resp.content.is_none());
    }

    #[test]
    fn text_response_lowercases_finish_reason() {
        let body = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hel"}, {"text": "lo"}]},
                "finishReason": "STOP"
            }],
            "modelVersion": "gemini-2.0-flash-001"
        });
        let parsed: GenerateContentResponse = serde_json::from_value(body).unwrap();
        let resp = parsed.into_chat_response("gemini-2.0-flash");
        assert_eq!(resp.content.as_deref(), Some("Hello"));
        assert_eq!(resp.finish_reason.as_deref(), Some("stop"));
        assert_eq!(resp.model, "gemini-2.0-flash-001");
    }

    #[test]
    fn embed_request_shape() {
        let req = EmbedContentRequest::new("gemini-embedding-001", "hello", 768);
        assert_eq!(
            serde_json::to_value(req).unwrap(),
            json!({
                "model": "models/gemini-embedding-001",
                "content": {"parts": [{"text": "hello"}]},
                "outputDimensionality": 768
            })
        );
    }
}
