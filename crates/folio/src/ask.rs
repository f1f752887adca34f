// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `folio ask`, `folio stream` and `folio title`.
//!
//! Progress events are printed to stderr while the turn runs; the answer goes
//! to stdout so it can be piped.

use std::io::Write;
use std::sync::Arc;

use colored::Colorize;
use folio_agent::{ChatEngine, RetrievalToolExecutor, TurnContext, TurnOutcome, TurnRequest};
use folio_config::FolioConfig;
use folio_core::{ChatMessage, FolioError, ProgressEvent, ToolExecutor, ToolOutput};
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::warn;

use crate::app::{Services, gateway};

pub struct AskOptions {
    pub model: Option<String>,
    pub deep_think: bool,
    pub file_type: Option<String>,
    pub json: bool,
}

fn render_event(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::Status { text } => text.dimmed().to_string(),
        ProgressEvent::ToolStart { tool } => format!("{} {tool}", "running".cyan()),
        ProgressEvent::ToolDone { tool } => format!("{} {tool}", "finished".green()),
    }
}

fn print_outcome(outcome: &TurnOutcome) {
    println!("{}", outcome.answer);
    if !outcome.sources.is_empty() {
        println!("\n{}", "Sources".bold());
        for source in &outcome.sources {
            println!(
                "  [{}] {} p.{}",
                source["index"],
                source["excerpt"].as_str().unwrap_or_default(),
                source["pages"]
            );
        }
    }
    for artifact in &outcome.artifacts {
        let kind = artifact
            .get("artifact_type")
            .and_then(|v| v.as_str())
            .unwrap_or("artifact");
        println!("{} {kind}", "artifact:".bold());
    }
    if !outcome.suggestions.is_empty() {
        println!("\n{}", "Try next".bold());
        for suggestion in &outcome.suggestions {
            println!("  - {suggestion}");
        }
    }
}

pub async fn run_ask(
    config: &FolioConfig,
    question: &str,
    session: &str,
    user: &str,
    options: AskOptions,
) -> Result<(), FolioError> {
    let services = Services::open(config).await?;
    let executor = Arc::new(RetrievalToolExecutor::from_current(services.retrieval.clone())?);
    let engine =
        ChatEngine::new(gateway(config)?, executor).with_max_rounds(config.agent.max_rounds);

    let context = TurnContext::gather(
        &services.memory,
        &services.db,
        user,
        session,
        question,
        config.agent.memory_results,
    )
    .await;
    let turn = TurnRequest {
        question: question.to_string(),
        session_id: session.to_string(),
        user_id: user.to_string(),
        model: options.model,
        deep_think: options.deep_think,
        file_type: options
            .file_type
            .unwrap_or_else(|| config.agent.file_type.clone()),
        ..TurnRequest::default()
    }
    .with_context(context);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            eprintln!("{}", render_event(&event));
        }
    });
    let outcome = engine.generate_response(turn, &tx).await;
    drop(tx);
    let _ = printer.await;
    let outcome = outcome?;

    if let Err(e) = services
        .memory
        .store_interaction(user, Some(session), question, &outcome.answer, None)
        .await
    {
        warn!(error = %e, "could not remember interaction");
    }

    if options.json {
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| FolioError::Internal(format!("serializing outcome: {e}")))?;
        println!("{json}");
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

pub async fn run_stream(
    config: &FolioConfig,
    prompt: &str,
    model: Option<&str>,
) -> Result<(), FolioError> {
    let gateway = gateway(config)?;
    let mut stream = gateway
        .stream(vec![ChatMessage::user(prompt)], model)
        .await?;
    let mut stdout = std::io::stdout();
    while let Some(chunk) = stream.next().await {
        print!("{}", chunk?.text);
        let _ = stdout.flush();
    }
    println!();
    Ok(())
}

pub async fn run_title(config: &FolioConfig, message: &str) -> Result<(), FolioError> {
    // Titles never touch tools, so no executor backs this engine.
    let engine = ChatEngine::new(gateway(config)?, Arc::new(NoTools));
    println!("{}", engine.generate_chat_title(message).await);
    Ok(())
}

struct NoTools;

impl ToolExecutor for NoTools {
    fn execute(
        &self,
        tool: &str,
        _args: &serde_json::Map<String, serde_json::Value>,
        _session_id: &str,
        _user_id: &str,
    ) -> Result<ToolOutput, FolioError> {
        Err(FolioError::Tool {
            tool: tool.to_string(),
            message: "no tools are available here".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_render_with_tool_names() {
        colored::control::set_override(false);
        assert_eq!(
            render_event(&ProgressEvent::ToolStart {
                tool: "search_documents".into()
            }),
            "running search_documents"
        );
        assert_eq!(render_event(&ProgressEvent::status("Thinking…")), "Thinking…");
    }
}
