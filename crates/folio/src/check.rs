// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `folio config check`.
//!
//! Reports which chat backends would be tried and in what order, which
//! embedding backend is selected, and whether the database opens.

use std::io::IsTerminal;

use colored::Colorize;
use folio_config::FolioConfig;
use folio_core::{FolioError, ProviderKind};
use folio_gateway::registry::chain_order;

use crate::app::open_database;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name,
            status,
            message: message.into(),
        }
    }
}

pub fn check_chat_backends(config: &FolioConfig) -> CheckResult {
    let primary = config.provider.resolve_primary();
    let has_key = |kind: ProviderKind| config.provider.api_key(kind).is_some();
    let chain = chain_order(primary, has_key);
    let listed: Vec<String> = chain
        .iter()
        .map(|kind| format!("{kind} ({})", config.provider.default_model(*kind)))
        .collect();
    if !has_key(primary) {
        CheckResult::new(
            "chat backends",
            CheckStatus::Fail,
            format!("primary {primary} has no API key; chain: {}", listed.join(" -> ")),
        )
    } else if chain.len() == 1 {
        CheckResult::new(
            "chat backends",
            CheckStatus::Warn,
            format!("{} only, no fallback configured", listed.join("")),
        )
    } else {
        CheckResult::new("chat backends", CheckStatus::Pass, listed.join(" -> "))
    }
}

pub fn check_embeddings(config: &FolioConfig) -> CheckResult {
    match config.embedding.resolve_provider(&config.provider) {
        Some(provider) => CheckResult::new(
            "embeddings",
            CheckStatus::Pass,
            format!("{provider}, {} attempt(s) per batch", config.embedding.max_attempts),
        ),
        None => CheckResult::new(
            "embeddings",
            CheckStatus::Fail,
            "no OpenAI or Gemini credentials; search and memory are unavailable",
        ),
    }
}

async fn check_database(config: &FolioConfig) -> CheckResult {
    match open_database(config).await {
        Ok(db) => {
            let _ = db.close().await;
            CheckResult::new("database", CheckStatus::Pass, config.storage.database_path.clone())
        }
        Err(e) => CheckResult::new("database", CheckStatus::Fail, e.to_string()),
    }
}

pub async fn run_check(config: &FolioConfig) -> Result<(), FolioError> {
    let use_color = std::io::stdout().is_terminal();
    colored::control::set_override(use_color);

    let results = [
        check_chat_backends(config),
        check_embeddings(config),
        check_database(config).await,
    ];
    for result in &results {
        let label = match result.status {
            CheckStatus::Pass => "PASS".green(),
            CheckStatus::Warn => "WARN".yellow(),
            CheckStatus::Fail => "FAIL".red(),
        };
        println!("[{label}] {:<14} {}", result.name, result.message);
    }

    let failed = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    if failed > 0 {
        return Err(FolioError::Config(format!("{failed} check(s) failed")));
    }
    Ok(())
}
