// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingestion and queue administration.

use std::sync::Arc;

use alertflow_core::types::{DATE_FORMAT, TIMESTAMP_FORMAT};
use alertflow_core::{
    Alert, AlertflowError, QueueFilter, QueueItem, QueueStats, QueueStatus, StorageAdapter,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::lifecycle::{self, Transition};

/// Source tag used when the caller does not name one.
pub const DEFAULT_SOURCE: &str = "api";

/// Synchronous queue operations: ingest, lookup, reprocess, stats, clear.
///
/// Classification never happens here; see [`QueueProcessor`](crate::QueueProcessor).
#[derive(Clone)]
pub struct QueueService {
    store: Arc<dyn StorageAdapter>,
}

impl QueueService {
    pub fn new(store: Arc<dyn StorageAdapter>) -> Self {
        Self { store }
    }

    /// Stores `payload` as a new `pending` item and returns it.
    pub async fn ingest(
        &self,
        payload: Value,
        source: Option<&str>,
    ) -> Result<QueueItem, AlertflowError> {
        let now = chrono::Utc::now();
        let source = source
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SOURCE);

        let item = QueueItem {
            id: uuid::Uuid::new_v4().to_string(),
            received_at: now.format(TIMESTAMP_FORMAT).to_string(),
            received_date: now.format(DATE_FORMAT).to_string(),
            status: QueueStatus::Pending,
            source: source.to_string(),
            raw_payload: payload,
            processed_at: None,
            error_message: None,
            resulting_alert_id: None,
        };
        self.store.insert_queue_item(&item).await?;

        info!(item_id = %item.id, source = %item.source, "webhook queued");
        Ok(item)
    }

    /// Fetches one item, or `NotFound`.
    pub async fn get_item(&self, id: &str) -> Result<QueueItem, AlertflowError> {
        self.store
            .get_queue_item(id)
            .await?
            .ok_or_else(|| AlertflowError::queue_item_not_found(id))
    }

    /// Items matching `filter`, newest first.
    pub async fn list_items(&self, filter: &QueueFilter) -> Result<Vec<QueueItem>, AlertflowError> {
        self.store.list_queue_items(filter).await
    }

    /// Resets an item to `pending` and clears its outcome fields.
    ///
    /// Repeated calls leave the item in the same state.
    pub async fn reprocess(&self, id: &str) -> Result<QueueItem, AlertflowError> {
        let mut item = self.get_item(id).await?;
        let previous = item.status;
        let update = lifecycle::apply(previous, Transition::Reprocess)?;

        if !self.store.update_queue_item(id, &update).await? {
            return Err(AlertflowError::queue_item_not_found(id));
        }

        item.status = update.status;
        item.processed_at = update.processed_at;
        item.error_message = update.error_message;
        item.resulting_alert_id = update.resulting_alert_id;

        info!(item_id = %id, from = %previous, "queue item reset to pending");
        Ok(item)
    }

    /// Counts by status, optionally for one `YYYY-MM-DD` bucket.
    pub async fn stats(&self, date: Option<&str>) -> Result<QueueStats, AlertflowError> {
        self.store.queue_stats(date).await
    }

    /// Deletes the given items and returns how many existed.
    pub async fn clear_queue(&self, ids: &[String]) -> Result<usize, AlertflowError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let removed = self.store.delete_queue_items(ids).await?;
        debug!(requested = ids.len(), removed, "queue items cleared");
        Ok(removed)
    }

    pub async fn get_alert(&self, id: &str) -> Result<Alert, AlertflowError> {
        self.store
            .get_alert(id)
            .await?
            .ok_or_else(|| AlertflowError::alert_not_found(id))
    }

    pub async fn list_alerts(&self, limit: usize) -> Result<Vec<Alert>, AlertflowError> {
        self.store.list_alerts(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertflow_core::QueueUpdate;
    use alertflow_test_utils::MemoryStorage;
    use serde_json::json;

    fn service() -> (Arc<MemoryStorage>, QueueService) {
        let store = Arc::new(MemoryStorage::new());
        (store.clone(), QueueService::new(store))
    }

    #[tokio::test]
    async fn ingest_creates_pending_item() {
        let (_, svc) = service();
        let item = svc
            .ingest(json!({"Subject": "hello"}), None)
            .await
            .unwrap();

        assert_eq!(item.status, QueueStatus::Pending);
        assert_eq!(item.source, "api");
        assert!(item.received_at.starts_with(&item.received_date));
        assert!(item.received_at.ends_with('Z'));
        assert!(item.processed_at.is_none());

        let stored = svc.get_item(&item.id).await.unwrap();
        assert_eq!(stored, item);
    }

    #[tokio::test]
    async fn ingest_keeps_source_tag_and_payload() {
        let (_, svc) = service();
        let payload = json!({"Type": "Notification", "nested": {"x": [1, 2]}});
        let item = svc.ingest(payload.clone(), Some("sns")).await.unwrap();
        assert_eq!(item.source, "sns");
        assert_eq!(item.raw_payload, payload);

        let blank = svc.ingest(json!({}), Some("  ")).await.unwrap();
        assert_eq!(blank.source, DEFAULT_SOURCE);
    }

    #[tokio::test]
    async fn ingest_assigns_unique_ids() {
        let (_, svc) = service();
        let a = svc.ingest(json!({}), None).await.unwrap();
        let b = svc.ingest(json!({}), None).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn missing_items_are_not_found() {
        let (_, svc) = service();
        assert!(svc.get_item("nope").await.unwrap_err().is_not_found());
        assert!(svc.reprocess("nope").await.unwrap_err().is_not_found());
        assert!(svc.get_alert("nope").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn reprocess_is_idempotent() {
        let (store, svc) = service();
        let item = svc.ingest(json!({}), None).await.unwrap();
        store
            .update_queue_item(
                &item.id,
                &QueueUpdate {
                    status: QueueStatus::Error,
                    processed_at: Some("2026-01-01T00:00:00.000Z".into()),
                    error_message: Some("boom".into()),
                    resulting_alert_id: None,
                },
            )
            .await
            .unwrap();

        let first = svc.reprocess(&item.id).await.unwrap();
        let second = svc.reprocess(&item.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.status, QueueStatus::Pending);
        assert!(first.processed_at.is_none());
        assert!(first.error_message.is_none());
        assert!(first.resulting_alert_id.is_none());
        assert_eq!(svc.get_item(&item.id).await.unwrap(), second);
    }

    #[tokio::test]
    async fn stats_and_clear() {
        let (_, svc) = service();
        let a = svc.ingest(json!({}), None).await.unwrap();
        let b = svc.ingest(json!({}), None).await.unwrap();

        let stats = svc.stats(None).await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.pending, 2);

        let today = svc.stats(Some(&a.received_date)).await.unwrap();
        assert_eq!(today.total, 2);
        assert_eq!(svc.stats(Some("1999-01-01")).await.unwrap().total, 0);

        let removed = svc
            .clear_queue(&[a.id.clone(), "missing".into()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(svc.clear_queue(&[]).await.unwrap(), 0);

        let left = svc.list_items(&QueueFilter::default()).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, b.id);
    }
}
