// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flashcard progress rows.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use folio_core::FolioError;
use rusqlite::{OptionalExtension, Row, params};

use crate::database::{Database, map_tr_err};
use crate::models::{
    CardKey, CardStatus, FlashcardProgress, MasteryCounts, format_timestamp, parse_timestamp,
};

const PROGRESS_COLUMNS: &str = "session_id, message_id, card_index, card_front, status, \
     ease_factor, interval_days, next_review_at, review_count, created_at, updated_at";

fn row_to_progress(row: &Row<'_>) -> rusqlite::Result<FlashcardProgress> {
    let status: String = row.get(4)?;
    let next: Option<String> = row.get(7)?;
    let created: String = row.get(9)?;
    let updated: String = row.get(10)?;
    Ok(FlashcardProgress {
        key: CardKey {
            session_id: row.get(0)?,
            message_id: row.get(1)?,
            card_index: row.get(2)?,
        },
        card_front: row.get(3)?,
        status: CardStatus::from_str(&status).unwrap_or(CardStatus::Remaining),
        ease_factor: row.get(5)?,
        interval_days: row.get(6)?,
        next_review_at: next.as_deref().and_then(parse_timestamp),
        review_count: row.get(8)?,
        created_at: parse_timestamp(&created).unwrap_or_default(),
        updated_at: parse_timestamp(&updated).unwrap_or_default(),
    })
}

/// Progress for one card, if it has ever been reviewed.
pub async fn get_progress(
    db: &Database,
    key: &CardKey,
) -> Result<Option<FlashcardProgress>, FolioError> {
    let key = key.clone();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!(
                    "SELECT {PROGRESS_COLUMNS} FROM flashcard_progress
                     WHERE session_id = ?1 AND message_id = ?2 AND card_index = ?3"
                ),
                params![key.session_id, key.message_id, key.card_index],
                row_to_progress,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Insert or replace the row identified by `progress.key`.
pub async fn upsert_progress(db: &Database, progress: &FlashcardProgress) -> Result<(), FolioError> {
    let p = progress.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO flashcard_progress
                 (session_id, message_id, card_index, card_front, status, ease_factor,
                  interval_days, next_review_at, review_count, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 ON CONFLICT (session_id, message_id, card_index) DO UPDATE SET
                    card_front = excluded.card_front,
                    status = excluded.status,
                    ease_factor = excluded.ease_factor,
                    interval_days = excluded.interval_days,
                    next_review_at = excluded.next_review_at,
                    review_count = excluded.review_count,
                    updated_at = excluded.updated_at",
                params![
                    p.key.session_id,
                    p.key.message_id,
                    p.key.card_index,
                    p.card_front,
                    p.status.to_string(),
                    p.ease_factor,
                    p.interval_days,
                    p.next_review_at.map(format_timestamp),
                    p.review_count,
                    format_timestamp(p.created_at),
                    format_timestamp(p.updated_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Cards in `session_ids` whose next review is at or before `now`, soonest first.
pub async fn due_cards(
    db: &Database,
    session_ids: &[String],
    now: DateTime<Utc>,
) -> Result<Vec<FlashcardProgress>, FolioError> {
    if session_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut args: Vec<String> = vec![format_timestamp(now)];
    args.extend(session_ids.iter().cloned());
    db.connection()
        .call(move |conn| {
            let placeholders: Vec<String> = (2..=args.len()).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "SELECT {PROGRESS_COLUMNS} FROM flashcard_progress
                 WHERE next_review_at IS NOT NULL AND next_review_at <= ?1
                   AND session_id IN ({})
                 ORDER BY next_review_at, id",
                placeholders.join(", ")
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(args.iter()), row_to_progress)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}

/// Known / reviewing / remaining card counts for a session.
pub async fn session_mastery(db: &Database, session_id: &str) -> Result<MasteryCounts, FolioError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT status, COUNT(*) FROM flashcard_progress
                 WHERE session_id = ?1 GROUP BY status",
            )?;
            let mut counts = MasteryCounts::default();
            let rows = stmt.query_map(params![session_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (status, n) = row?;
                let n = u32::try_from(n).unwrap_or(u32::MAX);
                match CardStatus::from_str(&status) {
                    Ok(CardStatus::Known) => counts.known += n,
                    Ok(CardStatus::Reviewing) => counts.reviewing += n,
                    Ok(CardStatus::Remaining) | Err(_) => counts.remaining += n,
                }
            }
            Ok(counts)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn key(index: i64) -> CardKey {
        CardKey {
            session_id: "s1".into(),
            message_id: "m1".into(),
            card_index: index,
        }
    }

    fn progress(index: i64, status: CardStatus, next: Option<DateTime<Utc>>) -> FlashcardProgress {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        FlashcardProgress {
            key: key(index),
            card_front: format!("front {index}"),
            status,
            ease_factor: 2.5,
            interval_days: 1,
            next_review_at: next,
            review_count: 1,
            created_at: t0,
            updated_at: t0,
        }
    }

    #[tokio::test]
    async fn upsert_inserts_then_updates() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(get_progress(&db, &key(0)).await.unwrap().is_none());

        let mut p = progress(0, CardStatus::Reviewing, None);
        upsert_progress(&db, &p).await.unwrap();

        p.status = CardStatus::Known;
        p.ease_factor = 2.4;
        p.review_count = 2;
        upsert_progress(&db, &p).await.unwrap();

        let stored = get_progress(&db, &key(0)).await.unwrap().unwrap();
        assert_eq!(stored, p);
    }

    #[tokio::test]
    async fn due_cards_respect_time_and_scope() {
        let db = Database::open_in_memory().await.unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();

        upsert_progress(&db, &progress(0, CardStatus::Known, Some(now - Duration::days(1))))
            .await
            .unwrap();
        upsert_progress(&db, &progress(1, CardStatus::Known, Some(now + Duration::days(1))))
            .await
            .unwrap();
        upsert_progress(&db, &progress(2, CardStatus::Remaining, None)).await.unwrap();
        upsert_progress(&db, &progress(3, CardStatus::Reviewing, Some(now - Duration::days(3))))
            .await
            .unwrap();

        let due = due_cards(&db, &["s1".to_string()], now).await.unwrap();
        let indices: Vec<i64> = due.iter().map(|p| p.key.card_index).collect();
        assert_eq!(indices, [3, 0]);

        assert!(due_cards(&db, &["other".to_string()], now).await.unwrap().is_empty());
        assert!(due_cards(&db, &[], now).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mastery_counts_by_status() {
        let db = Database::open_in_memory().await.unwrap();
        upsert_progress(&db, &progress(0, CardStatus::Known, None)).await.unwrap();
        upsert_progress(&db, &progress(1, CardStatus::Known, None)).await.unwrap();
        upsert_progress(&db, &progress(2, CardStatus::Remaining, None)).await.unwrap();

        let counts = session_mastery(&db, "s1").await.unwrap();
        assert_eq!(
            counts,
            MasteryCounts {
                known: 2,
                reviewing: 0,
                remaining: 1
            }
        );
        assert_eq!(counts.total(), 3);
    }
}
