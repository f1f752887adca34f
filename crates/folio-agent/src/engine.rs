// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The bounded tool-orchestration loop behind one conversation turn.

use std::sync::Arc;

use folio_core::extract::{extract_json_array, fenced_block};
use folio_core::{
    ChatMessage, FolioError, ProgressEvent, ProgressSink, ToolCall, ToolChoice, ToolExecutor,
    ToolOutput,
};
use folio_gateway::{ChatCall, ModelGateway, is_unset};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::blocking::run_blocking;
use crate::intent::{IntentClassifier, KeywordClassifier};
use crate::prompts::{PromptOptions, build_messages, system_prompt};
use crate::title::{TITLE_FALLBACK, clean_title, title_model, title_prompt};
use crate::tools::{StudyTool, catalogue};

pub const DEFAULT_MAX_ROUNDS: usize = 3;

pub const ERROR_ANSWER: &str = "I encountered an error processing your request.";
pub const EXHAUSTED_ANSWER: &str = "I reached the maximum processing steps.";

pub const STATUS_THINKING: &str = "Thinking…";
pub const STATUS_GENERATING: &str = "Generating response…";
pub const STATUS_FINALISING: &str = "Finalising…";

/// Everything the loop needs to answer one question.
#[derive(Debug, Clone, Default)]
pub struct TurnRequest {
    /// The user's message for this turn.
    pub question: String,
    /// Session scope passed to every tool call.
    pub session_id: String,
    /// User scope passed to every tool call.
    pub user_id: String,
    /// Earlier turns. Only non-empty user and assistant entries are forwarded.
    pub history: Vec<ChatMessage>,
    /// Caller-pinned model. Also forwarded to every tool as `model`.
    pub model: Option<String>,
    /// Appends the step-by-step instruction to the system prompt.
    pub deep_think: bool,
    /// Whether the session has indexed documents. Without a keyword match
    /// this forces `search_documents` on the first round.
    pub has_documents: bool,
    /// Relevant past interactions; empty means none.
    pub memory_context: String,
    /// Preference digest from feedback history; empty means none.
    pub preference_context: String,
    /// Uploaded file type (`pdf`, `docx`, `txt`, `image`). Unknown types add
    /// no prompt modifier.
    pub file_type: String,
}

/// One executed tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCallRecord {
    pub tool: String,
    /// Arguments as executed, including the injected `model`.
    pub args: Map<String, Value>,
    /// Top-level keys of the tool's result, in result order.
    pub result_keys: Vec<String>,
}

/// The result of a conversation turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TurnOutcome {
    /// Final answer text, or a fixed apology when the turn failed.
    pub answer: String,
    /// Citations gathered from document searches.
    pub sources: Vec<Value>,
    /// Tool results carrying a non-empty `artifact_type`.
    pub artifacts: Vec<ToolOutput>,
    /// Follow-up questions from the answer's ```` ```suggestions ```` block.
    pub suggestions: Vec<String>,
    pub tool_call_log: Vec<ToolCallRecord>,
}

impl TurnOutcome {
    fn apology() -> Self {
        Self {
            answer: ERROR_ANSWER.to_string(),
            ..Self::default()
        }
    }
}

/// Accumulated across rounds.
#[derive(Default)]
struct TurnState {
    sources: Vec<Value>,
    artifacts: Vec<ToolOutput>,
    log: Vec<ToolCallRecord>,
}

impl TurnState {
    fn finish(self, answer: String) -> TurnOutcome {
        let suggestions = parse_suggestions(&answer);
        TurnOutcome {
            answer,
            sources: self.sources,
            artifacts: self.artifacts,
            suggestions,
            tool_call_log: self.log,
        }
    }
}

/// Follow-up suggestions from a trailing ```` ```suggestions ```` block.
///
/// Anything other than a JSON list of strings yields an empty list.
pub fn parse_suggestions(answer: &str) -> Vec<String> {
    let Some(body) = fenced_block(answer, "suggestions") else {
        return Vec::new();
    };
    let items = match extract_json_array(body) {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "ignoring malformed suggestions block");
            return Vec::new();
        }
    };
    let suggestions: Option<Vec<String>> = items
        .into_iter()
        .map(|item| match item {
            Value::String(text) => Some(text),
            _ => None,
        })
        .collect();
    suggestions.unwrap_or_else(|| {
        warn!("ignoring suggestions block with non-string entries");
        Vec::new()
    })
}

/// Arguments of a tool call. Malformed or non-object JSON becomes `{}`.
fn parse_arguments(call: &ToolCall) -> Map<String, Value> {
    match serde_json::from_str::<Value>(&call.arguments) {
        Ok(Value::Object(args)) => args,
        Ok(_) | Err(_) => {
            warn!(tool = %call.name, "tool arguments are not a JSON object, using {{}}");
            Map::new()
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Round-bounded conversation loop over a [`ModelGateway`] and a
/// [`ToolExecutor`].
///
/// Round 0 may force a tool chosen by the [`IntentClassifier`]; later rounds
/// let the model choose. Tools run on the blocking pool.
pub struct ChatEngine {
    gateway: Arc<ModelGateway>,
    executor: Arc<dyn ToolExecutor>,
    classifier: Box<dyn IntentClassifier>,
    max_rounds: usize,
}

impl ChatEngine {
    /// An engine with the keyword classifier and a budget of
    /// [`DEFAULT_MAX_ROUNDS`].
    pub fn new(gateway: Arc<ModelGateway>, executor: Arc<dyn ToolExecutor>) -> Self {
        Self {
            gateway,
            executor,
            classifier: Box::new(KeywordClassifier::new()),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Replaces the classifier that picks the forced first-round tool.
    pub fn with_classifier(mut self, classifier: Box<dyn IntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Number of tool rounds before the final tool-less call.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn gateway(&self) -> &Arc<ModelGateway> {
        &self.gateway
    }

    /// Runs the tool loop for one question.
    ///
    /// Gateway failures never escape: they end the turn with a fixed apology.
    /// A failing tool aborts the turn with its error.
    pub async fn generate_response(
        &self,
        turn: TurnRequest,
        sink: &dyn ProgressSink,
    ) -> Result<TurnOutcome, FolioError> {
        let system = system_prompt(&PromptOptions {
            file_type: &turn.file_type,
            memory_context: &turn.memory_context,
            preference_context: &turn.preference_context,
            has_documents: turn.has_documents,
            deep_think: turn.deep_think,
        });
        let mut messages = build_messages(system, &turn.history, &turn.question);
        let forced = self
            .classifier
            .forced_tool(&turn.question, turn.has_documents);
        let pinned = turn
            .model
            .as_deref()
            .filter(|m| !is_unset(Some(m)))
            .map(str::to_string);
        let tools = catalogue();
        let mut state = TurnState::default();

        debug!(session_id = %turn.session_id, forced = ?forced, "starting turn");

        for round in 0..self.max_rounds {
            let tool_choice = match forced {
                Some(tool) if round == 0 => ToolChoice::Function(tool.to_string()),
                _ => ToolChoice::Auto,
            };
            sink.emit(ProgressEvent::status(STATUS_THINKING));

            let call = ChatCall {
                messages: messages.clone(),
                model: pinned.clone(),
                tools: tools.clone(),
                tool_choice: Some(tool_choice),
            };
            let response = match self.gateway.chat(call).await {
                Ok(response) => response,
                Err(e) => {
                    error!(round, model = ?pinned, error = %e, "chat round failed");
                    return Ok(TurnOutcome::apology());
                }
            };

            if !response.requests_tools() {
                sink.emit(ProgressEvent::status(STATUS_GENERATING));
                return Ok(state.finish(response.content.unwrap_or_default()));
            }

            messages.push(ChatMessage::assistant_tool_calls(
                response.content.clone(),
                response.tool_calls.clone(),
            ));
            for call in &response.tool_calls {
                let reply = self
                    .run_tool(call, &turn, pinned.as_deref(), sink, &mut state)
                    .await?;
                messages.push(reply);
            }
        }

        warn!(rounds = self.max_rounds, "round budget exhausted, forcing a final answer");
        sink.emit(ProgressEvent::status(STATUS_FINALISING));
        let answer = match self
            .gateway
            .chat(ChatCall {
                model: pinned,
                ..ChatCall::new(messages)
            })
            .await
        {
            Ok(response) => response.content.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "final answer call failed");
                EXHAUSTED_ANSWER.to_string()
            }
        };
        Ok(state.finish(answer))
    }

    /// Executes one requested tool and returns the tool-role reply.
    async fn run_tool(
        &self,
        call: &ToolCall,
        turn: &TurnRequest,
        pinned: Option<&str>,
        sink: &dyn ProgressSink,
        state: &mut TurnState,
    ) -> Result<ChatMessage, FolioError> {
        let mut args = parse_arguments(call);
        if let Some(model) = pinned {
            args.insert("model".to_string(), Value::String(model.to_string()));
        }

        sink.emit(ProgressEvent::ToolStart {
            tool: call.name.clone(),
        });
        let executor = Arc::clone(&self.executor);
        let (tool, tool_args) = (call.name.clone(), args.clone());
        let (session_id, user_id) = (turn.session_id.clone(), turn.user_id.clone());
        let result = run_blocking(move || {
            executor.execute(&tool, &tool_args, &session_id, &user_id)
        })
        .await?;
        sink.emit(ProgressEvent::ToolDone {
            tool: call.name.clone(),
        });

        let result_keys: Vec<String> = result.keys().cloned().collect();
        info!(tool = %call.name, result_keys = ?result_keys, "tool executed");
        state.log.push(ToolCallRecord {
            tool: call.name.clone(),
            args,
            result_keys,
        });

        if result.get("artifact_type").is_some_and(is_truthy) {
            state.artifacts.push(result.clone());
        }
        if call.name == StudyTool::SearchDocuments.as_ref() {
            if let Some(Value::Array(sources)) = result.get("sources") {
                state.sources.extend(sources.iter().cloned());
            }
        }

        let content = serde_json::to_string(&result)
            .map_err(|e| FolioError::Internal(format!("serializing tool result: {e}")))?;
        Ok(ChatMessage::tool_result(call.id.clone(), content))
    }

    /// A two-to-three word title for a new conversation.
    ///
    /// Never fails; any problem yields `"New Chat"`.
    pub async fn generate_chat_title(&self, first_message: &str) -> String {
        let model = title_model(self.gateway.primary().kind());
        match self
            .gateway
            .simple_response(&title_prompt(first_message), model)
            .await
        {
            Ok(reply) => clean_title(&reply),
            Err(e) => {
                warn!(error = %e, "title generation failed");
                TITLE_FALLBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ProviderAdapter, ProviderKind};
    use folio_test_utils::{MockProvider, MockReply, RecordingExecutor, RecordingSink};
    use serde_json::json;
    use tracing_test::traced_test;

    fn engine(provider: MockProvider) -> ChatEngine {
        let provider: Arc<dyn ProviderAdapter> = Arc::new(provider);
        let gateway = ModelGateway::new(vec![provider]).unwrap();
        ChatEngine::new(Arc::new(gateway), Arc::new(RecordingExecutor::new()))
    }

    #[test]
    fn suggestions_parse_or_degrade() {
        let answer = "Done.\n```suggestions\n[\"What next?\", \"Why?\"]\n```";
        assert_eq!(parse_suggestions(answer), ["What next?", "Why?"]);
        assert!(parse_suggestions("```suggestions\nnot json\n```").is_empty());
        assert!(parse_suggestions("no block").is_empty());
    }

    #[test]
    fn suggestions_tolerate_prose_inside_the_block() {
        let answer = "Done.\n```suggestions\nTry these: [\"a\", \"b\"]\n```";
        assert_eq!(parse_suggestions(answer), ["a", "b"]);
    }

    #[test]
    fn suggestions_must_all_be_strings() {
        assert!(parse_suggestions("```suggestions\n[\"a\", 2]\n```").is_empty());
    }

    #[test]
    fn malformed_arguments_become_empty() {
        let call = ToolCall {
            id: "c".into(),
            name: "generate_quiz".into(),
            arguments: "{topic: oops".into(),
        };
        assert!(parse_arguments(&call).is_empty());
        let call = ToolCall {
            arguments: "[1, 2]".into(),
            ..call
        };
        assert!(parse_arguments(&call).is_empty());
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!("quiz")));
        assert!(is_truthy(&json!({"a": 1})));
    }

    #[tokio::test]
    #[traced_test]
    async fn exhausted_budget_is_logged() {
        let replies = vec![
            MockReply::tool("generate_quiz", json!({})),
            MockReply::tool("generate_quiz", json!({})),
            MockReply::tool("generate_quiz", json!({})),
            MockReply::text("best effort"),
        ];
        let engine = engine(MockProvider::with_replies(ProviderKind::OpenRouter, replies));
        let outcome = engine
            .generate_response(
                TurnRequest {
                    question: "hi".into(),
                    ..TurnRequest::default()
                },
                &RecordingSink::new(),
            )
            .await
            .unwrap();
        assert_eq!(outcome.answer, "best effort");
        assert!(logs_contain("round budget exhausted"));
    }

    #[tokio::test]
    #[traced_test]
    async fn gateway_failure_is_logged_and_softened() {
        let provider = MockProvider::new(ProviderKind::OpenRouter);
        provider.set_fallback(MockReply::error("quota")).await;
        let engine = engine(provider);
        let outcome = engine
            .generate_response(TurnRequest::default(), &RecordingSink::new())
            .await
            .unwrap();
        assert_eq!(outcome.answer, ERROR_ANSWER);
        assert!(logs_contain("chat round failed"));
    }
}
