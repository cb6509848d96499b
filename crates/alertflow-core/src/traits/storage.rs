// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends (SQLite, in-memory, etc.).

use async_trait::async_trait;

use crate::error::AlertflowError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Alert, QueueFilter, QueueItem, QueueStats, QueueUpdate, RemediationCacheEntry, Severity,
};

/// Adapter for storage and persistence backends.
///
/// The pipeline needs only per-id get/put/update, equality-filtered scans,
/// batch delete, and an upsert for the remediation cache. No transactions
/// are assumed.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), AlertflowError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), AlertflowError>;

    // --- Queue items ---

    /// Stores a new queue item.
    async fn insert_queue_item(&self, item: &QueueItem) -> Result<(), AlertflowError>;

    /// Fetches a queue item by id.
    async fn get_queue_item(&self, id: &str) -> Result<Option<QueueItem>, AlertflowError>;

    /// Scans queue items matching the filter, newest first.
    async fn list_queue_items(
        &self,
        filter: &QueueFilter,
    ) -> Result<Vec<QueueItem>, AlertflowError>;

    /// Overwrites the lifecycle fields of one item. Returns false if the id is unknown.
    async fn update_queue_item(
        &self,
        id: &str,
        update: &QueueUpdate,
    ) -> Result<bool, AlertflowError>;

    /// Deletes the given ids, returning how many existed.
    async fn delete_queue_items(&self, ids: &[String]) -> Result<usize, AlertflowError>;

    /// Counts items by status, optionally within one `received_date` bucket.
    async fn queue_stats(&self, date: Option<&str>) -> Result<QueueStats, AlertflowError>;

    // --- Alerts ---

    /// Persists a newly materialized alert.
    async fn insert_alert(&self, alert: &Alert) -> Result<(), AlertflowError>;

    /// Fetches an alert by id.
    async fn get_alert(&self, id: &str) -> Result<Option<Alert>, AlertflowError>;

    /// Lists alerts, newest first.
    async fn list_alerts(&self, limit: usize) -> Result<Vec<Alert>, AlertflowError>;

    // --- Remediation cache ---

    /// Exact-match lookup by `(service, alert_type, severity)`.
    async fn get_remediation(
        &self,
        service: &str,
        alert_type: &str,
        severity: Severity,
    ) -> Result<Option<RemediationCacheEntry>, AlertflowError>;

    /// Inserts or replaces the entry for its key.
    async fn put_remediation(&self, entry: &RemediationCacheEntry) -> Result<(), AlertflowError>;
}
