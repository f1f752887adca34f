// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-term memory entries. Reads return the most recent entry first.

use std::str::FromStr;

use folio_core::FolioError;
use folio_core::vector::{blob_to_vec, vec_to_blob};
use rusqlite::{Row, params};

use crate::database::{Database, map_tr_err};
use crate::models::{Feedback, MemoryEntry, NewMemory};

fn row_to_memory(row: &Row<'_>) -> rusqlite::Result<MemoryEntry> {
    let blob: Vec<u8> = row.get(4)?;
    let feedback: Option<String> = row.get(5)?;
    Ok(MemoryEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        session_id: row.get(2)?,
        summary: row.get(3)?,
        embedding: blob_to_vec(&blob),
        feedback: feedback.and_then(|f| Feedback::from_str(&f).ok()),
        created_at: row.get(6)?,
    })
}

/// Persist one memory entry and return its id.
pub async fn insert_memory(db: &Database, memory: NewMemory) -> Result<i64, FolioError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO memory_entries (user_id, session_id, summary, embedding, feedback)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    memory.user_id,
                    memory.session_id,
                    memory.summary,
                    vec_to_blob(&memory.embedding),
                    memory.feedback.map(|f| f.to_string()),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// All of a user's memories, newest first.
pub async fn user_memories(db: &Database, user_id: &str) -> Result<Vec<MemoryEntry>, FolioError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, session_id, summary, embedding, feedback, created_at
                 FROM memory_entries WHERE user_id = ?1 ORDER BY id DESC",
            )?;
            let rows = stmt
                .query_map(params![user_id], row_to_memory)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}

/// Up to `limit` of a user's memories carrying `feedback`, newest first.
pub async fn memories_with_feedback(
    db: &Database,
    user_id: &str,
    feedback: Feedback,
    limit: usize,
) -> Result<Vec<MemoryEntry>, FolioError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, session_id, summary, embedding, feedback, created_at
                 FROM memory_entries WHERE user_id = ?1 AND feedback = ?2
                 ORDER BY id DESC LIMIT ?3",
            )?;
            let rows = stmt
                .query_map(
                    params![user_id, feedback.to_string(), limit as i64],
                    row_to_memory,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}
