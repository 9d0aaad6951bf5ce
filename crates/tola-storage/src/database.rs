// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access is serialized through tokio-rusqlite's single background
//! thread. Query modules accept `&Database` and go through
//! `connection().call()`; do NOT create additional Connection instances for
//! writes.

use std::time::Duration;

use tokio_rusqlite::Connection;
use tracing::debug;

use tola_config::model::StorageConfig;
use tola_core::TolaError;

use crate::migrations;

/// Handle to the single background SQLite connection.
///
/// Cloning is cheap and every clone talks to the same background thread,
/// which is what enforces the single-writer model and eliminates
/// SQLITE_BUSY under concurrent submissions.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if necessary) the database at the configured path,
    /// apply PRAGMAs, and run pending migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, TolaError> {
        if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| TolaError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = Connection::open(&config.database_path)
            .await
            .map_err(|e| map_tr_err(tokio_rusqlite::Error::Error(e)))?;

        let wal = config.wal_mode;
        conn.call(move |conn| {
            if wal {
                conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
            }
            // Referential integrity is load-bearing: ON DELETE SET NULL and
            // the FK rejection of bad references both depend on this pragma.
            conn.execute_batch("PRAGMA foreign_keys=ON;")?;
            conn.busy_timeout(Duration::from_secs(5))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(|e| TolaError::Storage {
                source: Box::new(e),
            })?;

        debug!(path = %config.database_path, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying tokio-rusqlite connection handle.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL before shutdown so readers of the bare file see
    /// everything.
    pub async fn close(&self) -> Result<(), TolaError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error onto the service taxonomy.
///
/// Constraint failures (foreign key, CHECK, NOT NULL) become
/// [`TolaError::Constraint`] so callers can recover item-locally; everything
/// else is a storage-level failure.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> TolaError {
    match e {
        tokio_rusqlite::Error::Error(rusqlite::Error::SqliteFailure(failure, message))
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            TolaError::Constraint {
                message: message.unwrap_or_else(|| "constraint violation".to_string()),
            }
        }
        other => TolaError::Storage {
            source: Box::new(other),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &std::path::Path) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string_lossy().into_owned(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn open_creates_database_file() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("open.db");
        let _db = Database::open(&make_config(&db_path)).await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn open_twice_is_idempotent() {
        // Refinery records applied migrations, so a second open on the same
        // file must not fail or re-run the schema.
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");
        let db = Database::open(&make_config(&db_path)).await.unwrap();
        db.close().await.unwrap();
        let db2 = Database::open(&make_config(&db_path)).await.unwrap();
        db2.close().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("fk.db");
        let db = Database::open(&make_config(&db_path)).await.unwrap();

        let result = db
            .connection()
            .call(|conn| {
                conn.execute(
                    "INSERT INTO enquiries (product_id, user_id, size_id, quantity)
                     VALUES (999, 999, 999, 1)",
                    [],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err);

        match result {
            Err(TolaError::Constraint { .. }) => {}
            other => panic!("expected Constraint error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn quantity_check_is_enforced() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("check.db");
        let db = Database::open(&make_config(&db_path)).await.unwrap();

        let result = db
            .connection()
            .call(|conn| {
                conn.execute("INSERT INTO enquiries (quantity) VALUES (0)", [])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err);

        assert!(matches!(result, Err(TolaError::Constraint { .. })));
    }
}
