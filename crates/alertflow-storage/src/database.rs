// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database handle wrapping a single `tokio-rusqlite` connection.
//!
//! Every read and write goes through this one connection's background
//! thread, so writes are serialized without SQLITE_BUSY contention. Query
//! modules take `&Database` and call through [`Database::connection`].
//! Do not open a second connection for writes.

use std::path::Path;

use alertflow_core::AlertflowError;
use tracing::debug;

use crate::migrations;

/// Busy timeout applied to every connection, in milliseconds.
const BUSY_TIMEOUT_MS: u32 = 5000;

/// An open, migrated SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` in WAL mode and run migrations.
    pub async fn open(path: &str) -> Result<Self, AlertflowError> {
        Self::open_with(path, true).await
    }

    /// Open the database at `path`, optionally enabling WAL, and run migrations.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, AlertflowError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| AlertflowError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| AlertflowError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| -> Result<Result<(), AlertflowError>, rusqlite::Error> {
            conn.execute_batch(&format!(
                "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"
            ))?;
            if wal_mode {
                let mode: String = conn.pragma_update_and_check(
                    None,
                    "journal_mode",
                    "WAL",
                    |row| row.get(0),
                )?;
                debug!(journal_mode = %mode, "journal mode set");
            }
            Ok(migrations::run_migrations(conn))
        })
        .await
        .map_err(map_tr_err)??;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The single connection all queries run through.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL so the main file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), AlertflowError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoint and drop the handle.
    pub async fn close(self) -> Result<(), AlertflowError> {
        self.checkpoint().await
    }
}

/// Convert a tokio-rusqlite error into `AlertflowError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> AlertflowError {
    AlertflowError::Storage {
        source: Box::new(e),
    }
}
