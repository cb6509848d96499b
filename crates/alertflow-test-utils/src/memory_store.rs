// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `StorageAdapter` with failure injection.
//!
//! Behaves like the SQLite store for ordering and filtering. Individual
//! operations can be switched to fail so tests can drive the pipeline's
//! error paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use alertflow_core::{
    AdapterType, Alert, AlertflowError, HealthStatus, PluginAdapter, QueueFilter, QueueItem,
    QueueStats, QueueUpdate, RemediationCacheEntry, Severity, StorageAdapter,
};

type CacheKey = (String, String, Severity);

#[derive(Default)]
struct State {
    queue: Vec<QueueItem>,
    alerts: Vec<Alert>,
    cache: HashMap<CacheKey, RemediationCacheEntry>,
}

/// Which operations are currently rigged to fail.
#[derive(Default)]
struct Faults {
    alert_inserts: AtomicBool,
    queue_updates: AtomicBool,
    queue_scans: AtomicBool,
    cache: AtomicBool,
}

/// An in-memory store.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<State>,
    faults: Faults,
}

fn injected(op: &str) -> AlertflowError {
    AlertflowError::Storage {
        source: format!("injected failure: {op}").into(),
    }
}

impl MemoryStorage {
    /// Create an empty store with no faults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `insert_alert` fail.
    pub fn fail_alert_inserts(&self, fail: bool) {
        self.faults.alert_inserts.store(fail, Ordering::SeqCst);
    }

    /// Make `update_queue_item` fail.
    pub fn fail_queue_updates(&self, fail: bool) {
        self.faults.queue_updates.store(fail, Ordering::SeqCst);
    }

    /// Make `list_queue_items` fail.
    pub fn fail_queue_scans(&self, fail: bool) {
        self.faults.queue_scans.store(fail, Ordering::SeqCst);
    }

    /// Make both remediation cache reads and writes fail.
    pub fn fail_cache(&self, fail: bool) {
        self.faults.cache.store(fail, Ordering::SeqCst);
    }

    /// Number of stored alerts.
    pub async fn alert_count(&self) -> usize {
        self.state.lock().await.alerts.len()
    }

    /// Number of remediation cache entries.
    pub async fn cache_len(&self) -> usize {
        self.state.lock().await.cache.len()
    }

    fn check(&self, flag: &AtomicBool, op: &str) -> Result<(), AlertflowError> {
        if flag.load(Ordering::SeqCst) {
            Err(injected(op))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PluginAdapter for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, AlertflowError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AlertflowError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn initialize(&self) -> Result<(), AlertflowError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), AlertflowError> {
        Ok(())
    }

    async fn insert_queue_item(&self, item: &QueueItem) -> Result<(), AlertflowError> {
        let mut state = self.state.lock().await;
        if state.queue.iter().any(|existing| existing.id == item.id) {
            return Err(AlertflowError::Storage {
                source: format!("duplicate queue item id {}", item.id).into(),
            });
        }
        state.queue.push(item.clone());
        Ok(())
    }

    async fn get_queue_item(&self, id: &str) -> Result<Option<QueueItem>, AlertflowError> {
        let state = self.state.lock().await;
        Ok(state.queue.iter().find(|item| item.id == id).cloned())
    }

    async fn list_queue_items(
        &self,
        filter: &QueueFilter,
    ) -> Result<Vec<QueueItem>, AlertflowError> {
        self.check(&self.faults.queue_scans, "list_queue_items")?;
        let state = self.state.lock().await;
        let mut matched: Vec<(usize, &QueueItem)> = state
            .queue
            .iter()
            .enumerate()
            .filter(|(_, item)| filter.status.is_none_or(|s| item.status == s))
            .filter(|(_, item)| {
                filter
                    .date
                    .as_deref()
                    .is_none_or(|d| item.received_date == d)
            })
            .collect();
        matched.sort_by(|a, b| {
            b.1.received_at
                .cmp(&a.1.received_at)
                .then_with(|| b.0.cmp(&a.0))
        });
        if filter.oldest_first {
            matched.reverse();
        }
        Ok(matched
            .into_iter()
            .take(filter.limit)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn update_queue_item(
        &self,
        id: &str,
        update: &QueueUpdate,
    ) -> Result<bool, AlertflowError> {
        self.check(&self.faults.queue_updates, "update_queue_item")?;
        let mut state = self.state.lock().await;
        match state.queue.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.status = update.status;
                item.processed_at = update.processed_at.clone();
                item.error_message = update.error_message.clone();
                item.resulting_alert_id = update.resulting_alert_id.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_queue_items(&self, ids: &[String]) -> Result<usize, AlertflowError> {
        let mut state = self.state.lock().await;
        let before = state.queue.len();
        state.queue.retain(|item| !ids.contains(&item.id));
        Ok(before - state.queue.len())
    }

    async fn queue_stats(&self, date: Option<&str>) -> Result<QueueStats, AlertflowError> {
        let state = self.state.lock().await;
        let mut stats = QueueStats {
            date: date.map(str::to_string),
            ..QueueStats::default()
        };
        for item in state
            .queue
            .iter()
            .filter(|item| date.is_none_or(|d| item.received_date == d))
        {
            stats.record(item.status, 1);
        }
        Ok(stats)
    }

    async fn insert_alert(&self, alert: &Alert) -> Result<(), AlertflowError> {
        self.check(&self.faults.alert_inserts, "insert_alert")?;
        self.state.lock().await.alerts.push(alert.clone());
        Ok(())
    }

    async fn get_alert(&self, id: &str) -> Result<Option<Alert>, AlertflowError> {
        let state = self.state.lock().await;
        Ok(state.alerts.iter().find(|alert| alert.id == id).cloned())
    }

    async fn list_alerts(&self, limit: usize) -> Result<Vec<Alert>, AlertflowError> {
        let state = self.state.lock().await;
        let mut alerts: Vec<(usize, &Alert)> = state.alerts.iter().enumerate().collect();
        alerts.sort_by(|a, b| {
            b.1.timestamp
                .cmp(&a.1.timestamp)
                .then_with(|| b.0.cmp(&a.0))
        });
        Ok(alerts
            .into_iter()
            .take(limit)
            .map(|(_, alert)| alert.clone())
            .collect())
    }

    async fn get_remediation(
        &self,
        service: &str,
        alert_type: &str,
        severity: Severity,
    ) -> Result<Option<RemediationCacheEntry>, AlertflowError> {
        self.check(&self.faults.cache, "get_remediation")?;
        let key = (service.to_string(), alert_type.to_string(), severity);
        Ok(self.state.lock().await.cache.get(&key).cloned())
    }

    async fn put_remediation(&self, entry: &RemediationCacheEntry) -> Result<(), AlertflowError> {
        self.check(&self.faults.cache, "put_remediation")?;
        let key = (
            entry.service.clone(),
            entry.alert_type.clone(),
            entry.severity,
        );
        self.state.lock().await.cache.insert(key, entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertflow_core::QueueStatus;

    fn item(id: &str, at: &str) -> QueueItem {
        QueueItem {
            id: id.into(),
            received_at: at.into(),
            received_date: at[..10].into(),
            status: QueueStatus::Pending,
            source: "api".into(),
            raw_payload: serde_json::json!({}),
            processed_at: None,
            error_message: None,
            resulting_alert_id: None,
        }
    }

    #[tokio::test]
    async fn list_is_newest_first_and_limited() {
        let store = MemoryStorage::new();
        store
            .insert_queue_item(&item("old", "2026-01-01T00:00:00.000Z"))
            .await
            .unwrap();
        store
            .insert_queue_item(&item("new", "2026-01-02T00:00:00.000Z"))
            .await
            .unwrap();

        let listed = store.list_queue_items(&QueueFilter::default()).await.unwrap();
        assert_eq!(listed[0].id, "new");

        let one = store.list_queue_items(&QueueFilter::pending(1)).await.unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id, "old");
    }

    #[tokio::test]
    async fn injected_faults_surface_as_storage_errors() {
        let store = MemoryStorage::new();
        store.fail_cache(true);
        let err = store
            .get_remediation("EC2", "CPU", Severity::High)
            .await
            .unwrap_err();
        assert!(matches!(err, AlertflowError::Storage { .. }));

        store.fail_cache(false);
        assert!(
            store
                .get_remediation("EC2", "CPU", Severity::High)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn duplicate_queue_ids_are_rejected() {
        let store = MemoryStorage::new();
        let it = item("dup", "2026-01-01T00:00:00.000Z");
        store.insert_queue_item(&it).await.unwrap();
        assert!(store.insert_queue_item(&it).await.is_err());
    }
}
