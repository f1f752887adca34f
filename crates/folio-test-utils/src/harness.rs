// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-disk databases for integration tests.

use folio_core::FolioError;
use folio_storage::Database;
use tempfile::TempDir;

/// A migrated database in a fresh temp directory.
///
/// Keep the returned `TempDir` alive for as long as the database is used;
/// dropping it removes the file.
pub async fn temp_database() -> Result<(TempDir, Database), FolioError> {
    let dir = TempDir::new().map_err(FolioError::storage)?;
    let path = dir.path().join("folio-test.db");
    let db = Database::open(&path.to_string_lossy()).await?;
    Ok((dir, db))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn database_lives_inside_temp_dir() {
        let (dir, db) = temp_database().await.unwrap();
        assert!(dir.path().join("folio-test.db").exists());
        db.close().await.unwrap();
    }
}
