// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `folio review`, `folio due` and `folio remember`.

use chrono::Utc;
use colored::Colorize;
use folio_config::FolioConfig;
use folio_core::FolioError;
use folio_memory::MemoryRanker;
use folio_scheduler::{confidence, due_cards, record_review, session_mastery};
use folio_storage::{CardKey, CardStatus, Feedback};

use crate::app::{build_embedder, open_database};

pub async fn run_review(
    config: &FolioConfig,
    session: &str,
    message: &str,
    card: i64,
    front: &str,
    outcome: CardStatus,
) -> Result<(), FolioError> {
    let db = open_database(config).await?;
    let key = CardKey {
        session_id: session.to_string(),
        message_id: message.to_string(),
        card_index: card,
    };
    let progress = record_review(&db, &key, front, outcome, Utc::now()).await?;
    let next = progress
        .next_review_at
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "not scheduled".to_string());
    println!(
        "{} ease {:.2}, interval {}d, confidence {}%, next review {next}",
        progress.status.to_string().bold(),
        progress.ease_factor,
        progress.interval_days,
        confidence(&progress)
    );
    let mastery = session_mastery(&db, session).await?;
    println!(
        "session {session}: {} known, {} reviewing, {} remaining",
        mastery.known, mastery.reviewing, mastery.remaining
    );
    Ok(())
}

pub async fn run_due(config: &FolioConfig, sessions: &[String]) -> Result<(), FolioError> {
    let db = open_database(config).await?;
    let due = due_cards(&db, sessions, Utc::now()).await?;
    if due.is_empty() {
        println!("{}", "nothing due".dimmed());
    }
    for card in due {
        println!(
            "{}/{}#{}  {}  ({}% confident)",
            card.key.session_id,
            card.key.message_id,
            card.key.card_index,
            card.card_front,
            confidence(&card)
        );
    }
    Ok(())
}

pub async fn run_remember(
    config: &FolioConfig,
    user: &str,
    session: Option<&str>,
    question: &str,
    answer: &str,
    feedback: Option<Feedback>,
) -> Result<(), FolioError> {
    let db = open_database(config).await?;
    let ranker = MemoryRanker::new(db, build_embedder(config)?);
    let id = ranker
        .store_interaction(user, session, question, answer, feedback)
        .await?;
    println!("remembered as #{id}");
    Ok(())
}
