// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document chunk storage. Rows always come back in insertion order.

use folio_core::FolioError;
use folio_core::vector::{blob_to_vec, vec_to_blob};
use rusqlite::{Row, params};
use tracing::info;

use crate::database::{Database, map_tr_err};
use crate::models::{Chunk, NewChunk};

const CHUNK_COLUMNS: &str =
    "id, session_id, user_id, document_id, chunk_text, embedding, pages, chunk_index";

fn row_to_chunk(row: &Row<'_>) -> rusqlite::Result<Chunk> {
    let blob: Vec<u8> = row.get(5)?;
    let pages: String = row.get(6)?;
    Ok(Chunk {
        id: row.get(0)?,
        session_id: row.get(1)?,
        user_id: row.get(2)?,
        document_id: row.get(3)?,
        text: row.get(4)?,
        embedding: blob_to_vec(&blob),
        pages: serde_json::from_str(&pages).unwrap_or_default(),
        chunk_index: row.get(7)?,
    })
}

/// Insert all `chunks` in one transaction. Returns the number stored.
pub async fn insert_chunks(db: &Database, chunks: Vec<NewChunk>) -> Result<usize, FolioError> {
    if chunks.is_empty() {
        return Ok(0);
    }
    let stored = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO document_chunks
                     (session_id, user_id, document_id, chunk_text, embedding, pages, chunk_index)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )?;
                for chunk in &chunks {
                    let pages = serde_json::to_string(&chunk.pages)
                        .unwrap_or_else(|_| "[]".to_string());
                    stmt.execute(params![
                        chunk.session_id,
                        chunk.user_id,
                        chunk.document_id,
                        chunk.text,
                        vec_to_blob(&chunk.embedding),
                        pages,
                        chunk.chunk_index,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(chunks.len())
        })
        .await
        .map_err(map_tr_err)?;
    info!(stored, "chunks indexed");
    Ok(stored)
}

async fn select_chunks(
    db: &Database,
    filter: &'static str,
    args: Vec<String>,
    limit: Option<usize>,
) -> Result<Vec<Chunk>, FolioError> {
    db.connection()
        .call(move |conn| {
            let mut sql = format!("SELECT {CHUNK_COLUMNS} FROM document_chunks WHERE {filter} ORDER BY id");
            if let Some(limit) = limit {
                sql.push_str(&format!(" LIMIT {limit}"));
            }
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(args.iter()), row_to_chunk)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}

/// Every chunk of one session owned by `user_id`.
pub async fn session_chunks(
    db: &Database,
    session_id: &str,
    user_id: &str,
) -> Result<Vec<Chunk>, FolioError> {
    select_chunks(
        db,
        "session_id = ?1 AND user_id = ?2",
        vec![session_id.to_string(), user_id.to_string()],
        None,
    )
    .await
}

/// The first `limit` chunks of a session, used as relatedness anchors.
pub async fn anchor_chunks(
    db: &Database,
    session_id: &str,
    user_id: &str,
    limit: usize,
) -> Result<Vec<Chunk>, FolioError> {
    select_chunks(
        db,
        "session_id = ?1 AND user_id = ?2",
        vec![session_id.to_string(), user_id.to_string()],
        Some(limit),
    )
    .await
}

/// Every chunk owned by `user_id`, across all of their sessions.
pub async fn user_chunks(db: &Database, user_id: &str) -> Result<Vec<Chunk>, FolioError> {
    select_chunks(db, "user_id = ?1", vec![user_id.to_string()], None).await
}

/// Chunks owned by `user_id` outside `session_id`.
pub async fn chunks_outside_session(
    db: &Database,
    session_id: &str,
    user_id: &str,
) -> Result<Vec<Chunk>, FolioError> {
    select_chunks(
        db,
        "user_id = ?1 AND session_id != ?2",
        vec![user_id.to_string(), session_id.to_string()],
        None,
    )
    .await
}

/// Number of chunks stored for a session.
pub async fn count_session_chunks(db: &Database, session_id: &str) -> Result<u64, FolioError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM document_chunks WHERE session_id = ?1",
                params![session_id],
                |row| row.get::<_, i64>(0),
            )
        })
        .await
        .map(|n| n.max(0) as u64)
        .map_err(map_tr_err)
}

async fn delete_where(
    db: &Database,
    column: &'static str,
    value: &str,
) -> Result<usize, FolioError> {
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let removed = tx.execute(
                &format!("DELETE FROM document_chunks WHERE {column} = ?1"),
                params![value],
            )?;
            tx.commit()?;
            Ok(removed)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete every chunk of a session. Returns the number removed.
pub async fn delete_session_chunks(db: &Database, session_id: &str) -> Result<usize, FolioError> {
    let removed = delete_where(db, "session_id", session_id).await?;
    info!(session_id, removed, "deleted session chunks");
    Ok(removed)
}

/// Delete every chunk of a document. Returns the number removed.
pub async fn delete_document_chunks(
    db: &Database,
    document_id: &str,
) -> Result<usize, FolioError> {
    let removed = delete_where(db, "document_id", document_id).await?;
    info!(document_id, removed, "deleted document chunks");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(session: &str, user: &str, doc: &str, index: i64) -> NewChunk {
        NewChunk {
            session_id: session.into(),
            user_id: user.into(),
            document_id: doc.into(),
            text: format!("{doc} chunk {index}"),
            embedding: vec![index as f32, 1.0],
            pages: vec![index as u32 + 1],
            chunk_index: index,
        }
    }

    #[tokio::test]
    async fn insert_and_read_back_in_order() {
        let db = Database::open_in_memory().await.unwrap();
        let stored = insert_chunks(
            &db,
            vec![chunk("s1", "u1", "d1", 0), chunk("s1", "u1", "d1", 1), chunk("s2", "u1", "d2", 0)],
        )
        .await
        .unwrap();
        assert_eq!(stored, 3);

        let rows = session_chunks(&db, "s1", "u1").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].id < rows[1].id);
        assert_eq!(rows[1].embedding, vec![1.0, 1.0]);
        assert_eq!(rows[1].pages, vec![2]);

        assert!(session_chunks(&db, "s1", "someone-else").await.unwrap().is_empty());
        assert_eq!(user_chunks(&db, "u1").await.unwrap().len(), 3);
        assert_eq!(chunks_outside_session(&db, "s1", "u1").await.unwrap().len(), 1);
        assert_eq!(count_session_chunks(&db, "s1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn anchors_are_limited() {
        let db = Database::open_in_memory().await.unwrap();
        let rows = (0..8).map(|i| chunk("s1", "u1", "d1", i)).collect();
        insert_chunks(&db, rows).await.unwrap();

        let anchors = anchor_chunks(&db, "s1", "u1", 5).await.unwrap();
        assert_eq!(anchors.len(), 5);
        assert_eq!(anchors[0].chunk_index, 0);
    }

    #[tokio::test]
    async fn scoped_deletes_report_counts() {
        let db = Database::open_in_memory().await.unwrap();
        insert_chunks(
            &db,
            vec![chunk("s1", "u1", "d1", 0), chunk("s1", "u1", "d2", 0), chunk("s2", "u1", "d3", 0)],
        )
        .await
        .unwrap();

        assert_eq!(delete_document_chunks(&db, "d2").await.unwrap(), 1);
        assert_eq!(delete_session_chunks(&db, "s1").await.unwrap(), 1);
        assert_eq!(delete_session_chunks(&db, "s1").await.unwrap(), 0);
        assert_eq!(user_chunks(&db, "u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_insert_is_a_no_op() {
        let db = Database::open_in_memory().await.unwrap();
        assert_eq!(insert_chunks(&db, Vec::new()).await.unwrap(), 0);
    }
}
