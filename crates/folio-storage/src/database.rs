// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database handle: PRAGMA setup, migrations and lifecycle.
//!
//! Every query runs on tokio-rusqlite's single background thread, which also
//! serializes writes. Do not open a second connection for writes.

use std::path::Path;

use folio_core::FolioError;
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use crate::migrations::run_migrations;

/// Convert a tokio-rusqlite error into [`FolioError::Storage`].
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> FolioError {
    FolioError::storage(e)
}

/// Shared handle to the Folio SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` in WAL mode and
    /// bring the schema up to date.
    pub async fn open(path: &str) -> Result<Self, FolioError> {
        Self::open_with(path, true).await
    }

    /// Like [`open`](Self::open) with an explicit journal mode choice.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, FolioError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(FolioError::storage)?;
        }

        let conn = Connection::open(path).await.map_err(FolioError::storage)?;
        let db = Self { conn };
        db.prepare(wal_mode).await?;
        info!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// A private in-memory database, migrated and ready. Used by tests and
    /// one-shot CLI runs.
    pub async fn open_in_memory() -> Result<Self, FolioError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(FolioError::storage)?;
        let db = Self { conn };
        db.prepare(false).await?;
        Ok(db)
    }

    async fn prepare(&self, wal_mode: bool) -> Result<(), FolioError> {
        self.conn
            .call(move |conn| {
                if wal_mode {
                    conn.pragma_update(None, "journal_mode", "WAL")?;
                }
                conn.pragma_update(None, "foreign_keys", "ON")?;
                conn.pragma_update(None, "busy_timeout", 5000)?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        self.conn
            .call(|conn| Ok(run_migrations(conn)))
            .await
            .map_err(map_tr_err)??;
        debug!("migrations applied");
        Ok(())
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Flush and close the background connection thread.
    pub async fn close(self) -> Result<(), FolioError> {
        self.conn.close().await.map_err(FolioError::storage)
    }
}
