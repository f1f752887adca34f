// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fallback chain, model resolution and streaming against scripted backends.

use std::sync::Arc;

use folio_core::{ChatMessage, FolioError, ProviderAdapter, ProviderKind, ToolDefinition};
use folio_gateway::{ChatCall, ModelGateway, STREAM_MAX_TOKENS};
use folio_test_utils::{MockProvider, MockReply};
use futures::StreamExt;

fn gateway(backends: &[Arc<MockProvider>]) -> ModelGateway {
    ModelGateway::new(
        backends
            .iter()
            .map(|b| b.clone() as Arc<dyn ProviderAdapter>)
            .collect(),
    )
    .unwrap()
}

fn with_tool(messages: Vec<ChatMessage>) -> ChatCall {
    ChatCall {
        tools: vec![ToolDefinition {
            name: "search_documents".into(),
            description: "Search".into(),
            parameters: serde_json::json!({"type": "object"}),
        }],
        ..ChatCall::new(messages)
    }
}

#[tokio::test]
async fn secondary_answers_when_primary_is_down() {
    let primary = Arc::new(MockProvider::with_replies(
        ProviderKind::OpenRouter,
        vec![MockReply::error("quota exceeded"), MockReply::error("quota exceeded")],
    ));
    let secondary = Arc::new(MockProvider::with_replies(
        ProviderKind::OpenAi,
        vec![MockReply::text("from openai")],
    ));
    let gateway = gateway(&[primary.clone(), secondary.clone()]);

    let response = gateway
        .chat(with_tool(vec![ChatMessage::user("hello")]))
        .await
        .unwrap();
    assert_eq!(response.content.as_deref(), Some("from openai"));
    // Tool attempt plus plain retry on the primary.
    assert_eq!(primary.call_count().await, 2);
    assert_eq!(secondary.call_count().await, 1);
    assert_eq!(secondary.requests().await[0].tools.len(), 1);
}

#[tokio::test]
async fn plain_request_failure_moves_on_without_retry() {
    let primary = Arc::new(MockProvider::with_replies(
        ProviderKind::Gemini,
        vec![MockReply::error("503")],
    ));
    let secondary = Arc::new(MockProvider::new(ProviderKind::OpenAi));
    let gateway = gateway(&[primary.clone(), secondary.clone()]);

    let text = gateway.simple_response("hi", None).await.unwrap();
    assert_eq!(text, "mock response");
    assert_eq!(primary.call_count().await, 1);
}

#[tokio::test]
async fn every_backend_failing_surfaces_last_error() {
    let primary = Arc::new(MockProvider::with_replies(
        ProviderKind::OpenAi,
        vec![MockReply::error("first down")],
    ));
    let secondary = Arc::new(MockProvider::with_replies(
        ProviderKind::Gemini,
        vec![MockReply::error("second down")],
    ));
    let gateway = gateway(&[primary, secondary]);

    let err = gateway.simple_response("hi", None).await.unwrap_err();
    assert!(matches!(err, FolioError::Provider { .. }));
    assert!(err.to_string().contains("second down"));
}

#[tokio::test]
async fn pinned_shorthand_expands_on_openrouter_only_for_primary() {
    let primary = Arc::new(MockProvider::with_replies(
        ProviderKind::OpenRouter,
        vec![MockReply::error("down")],
    ));
    let secondary = Arc::new(
        MockProvider::new(ProviderKind::OpenAi).with_default_model("gpt-4o"),
    );
    let gateway = gateway(&[primary.clone(), secondary.clone()]);

    gateway.simple_response("hi", Some("gpt-4o-mini")).await.unwrap();
    assert_eq!(primary.requests().await[0].model, "openai/gpt-4o-mini");
    assert_eq!(secondary.requests().await[0].model, "gpt-4o");
    assert_eq!(gateway.resolve_model(Some("null")), "openrouter-default");
}

#[tokio::test]
async fn reasoning_models_never_see_tools() {
    let primary = Arc::new(MockProvider::new(ProviderKind::OpenAi));
    let gateway = gateway(&[primary.clone()]);

    gateway
        .chat(ChatCall {
            model: Some("o1-mini".into()),
            ..with_tool(vec![ChatMessage::user("think")])
        })
        .await
        .unwrap();
    let requests = primary.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "o1-mini");
    assert!(requests[0].tools.is_empty());
}

#[tokio::test]
async fn streaming_uses_primary_with_token_cap() {
    let primary = Arc::new(MockProvider::with_replies(
        ProviderKind::OpenAi,
        vec![MockReply::text("Cells divide twice")],
    ));
    let secondary = Arc::new(MockProvider::new(ProviderKind::Gemini));
    let gateway = gateway(&[primary.clone(), secondary.clone()]);

    let stream = gateway
        .stream(vec![ChatMessage::user("explain meiosis")], None)
        .await
        .unwrap();
    let text: String = stream.map(|c| c.unwrap().text).collect::<Vec<_>>().await.concat();
    assert_eq!(text, "Cells divide twice");

    let request = &primary.requests().await[0];
    assert_eq!(request.max_tokens, Some(STREAM_MAX_TOKENS));
    assert!(request.tools.is_empty());
    assert_eq!(secondary.call_count().await, 0);
}

#[test]
fn empty_chain_is_rejected() {
    assert!(matches!(ModelGateway::new(Vec::new()), Err(FolioError::Config(_))));
}
