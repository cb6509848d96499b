// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use alertflow_config::model::StorageConfig;
use alertflow_core::{
    AdapterType, Alert, AlertflowError, HealthStatus, PluginAdapter, QueueFilter, QueueItem,
    QueueStats, QueueUpdate, RemediationCacheEntry, Severity, StorageAdapter,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// The database is opened on the first call to [`StorageAdapter::initialize`];
/// every other operation fails until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage. No connection is opened yet.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, AlertflowError> {
        self.db.get().ok_or_else(|| AlertflowError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, AlertflowError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AlertflowError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), AlertflowError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| AlertflowError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), AlertflowError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn insert_queue_item(&self, item: &QueueItem) -> Result<(), AlertflowError> {
        queries::queue::insert_item(self.db()?, item).await
    }

    async fn get_queue_item(&self, id: &str) -> Result<Option<QueueItem>, AlertflowError> {
        queries::queue::get_item(self.db()?, id).await
    }

    async fn list_queue_items(
        &self,
        filter: &QueueFilter,
    ) -> Result<Vec<QueueItem>, AlertflowError> {
        queries::queue::list_items(self.db()?, filter).await
    }

    async fn update_queue_item(
        &self,
        id: &str,
        update: &QueueUpdate,
    ) -> Result<bool, AlertflowError> {
        queries::queue::update_item(self.db()?, id, update).await
    }

    async fn delete_queue_items(&self, ids: &[String]) -> Result<usize, AlertflowError> {
        queries::queue::delete_items(self.db()?, ids).await
    }

    async fn queue_stats(&self, date: Option<&str>) -> Result<QueueStats, AlertflowError> {
        queries::queue::stats(self.db()?, date).await
    }

    async fn insert_alert(&self, alert: &Alert) -> Result<(), AlertflowError> {
        queries::alerts::insert_alert(self.db()?, alert).await
    }

    async fn get_alert(&self, id: &str) -> Result<Option<Alert>, AlertflowError> {
        queries::alerts::get_alert(self.db()?, id).await
    }

    async fn list_alerts(&self, limit: usize) -> Result<Vec<Alert>, AlertflowError> {
        queries::alerts::list_alerts(self.db()?, limit).await
    }

    async fn get_remediation(
        &self,
        service: &str,
        alert_type: &str,
        severity: Severity,
    ) -> Result<Option<RemediationCacheEntry>, AlertflowError> {
        queries::remediation::get_entry(self.db()?, service, alert_type, severity).await
    }

    async fn put_remediation(&self, entry: &RemediationCacheEntry) -> Result<(), AlertflowError> {
        queries::remediation::upsert_entry(self.db()?, entry).await
    }
}
