// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted reviews and the due queue.

use chrono::{DateTime, Utc};
use folio_core::FolioError;
use folio_storage::queries::flashcards;
use folio_storage::{CardKey, CardStatus, Database, FlashcardProgress, MasteryCounts};
use tracing::{debug, info};

use crate::sm2::{new_card, review};

/// Records one review of the card at `key`.
///
/// The first review creates the row from `front`; later reviews keep the
/// stored front text.
pub async fn record_review(
    db: &Database,
    key: &CardKey,
    front: &str,
    outcome: CardStatus,
    now: DateTime<Utc>,
) -> Result<FlashcardProgress, FolioError> {
    let current = match flashcards::get_progress(db, key).await? {
        Some(progress) => progress,
        None => {
            debug!(session_id = %key.session_id, card_index = key.card_index, "first review");
            new_card(key.clone(), front, now)
        }
    };
    let next = review(&current, outcome, now);
    flashcards::upsert_progress(db, &next).await?;
    info!(
        session_id = %key.session_id,
        card_index = key.card_index,
        outcome = %outcome,
        interval_days = next.interval_days,
        "card reviewed"
    );
    Ok(next)
}

/// Cards across `session_ids` whose next review is at or before `now`,
/// earliest first.
pub async fn due_cards(
    db: &Database,
    session_ids: &[String],
    now: DateTime<Utc>,
) -> Result<Vec<FlashcardProgress>, FolioError> {
    flashcards::due_cards(db, session_ids, now).await
}

pub async fn session_mastery(db: &Database, session_id: &str) -> Result<MasteryCounts, FolioError> {
    flashcards::session_mastery(db, session_id).await
}
