// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Throwaway SQLite store for tests that want the real persistence layer.

use std::sync::Arc;

use alertflow_config::model::StorageConfig;
use alertflow_core::{AlertflowError, StorageAdapter};
use alertflow_storage::SqliteStorage;

/// An initialized [`SqliteStorage`] whose database lives in a temp directory.
///
/// The directory is removed when this value drops, so keep it alive for
/// the duration of the test.
pub struct TempSqlite {
    pub storage: Arc<SqliteStorage>,
    _dir: tempfile::TempDir,
}

impl TempSqlite {
    /// Create and migrate a fresh database.
    pub async fn new() -> Result<Self, AlertflowError> {
        let dir = tempfile::TempDir::new().map_err(|e| AlertflowError::Storage { source: e.into() })?;
        let config = StorageConfig {
            database_path: dir.path().join("test.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };
        let storage = SqliteStorage::new(config);
        storage.initialize().await?;
        Ok(Self {
            storage: Arc::new(storage),
            _dir: dir,
        })
    }

    /// The store as a trait object.
    pub fn adapter(&self) -> Arc<dyn StorageAdapter> {
        self.storage.clone()
    }
}
