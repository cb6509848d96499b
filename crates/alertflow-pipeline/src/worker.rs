// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic batch worker.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::processor::QueueProcessor;

/// Runs [`QueueProcessor::run_batch`] on a fixed interval until cancelled.
///
/// A batch in progress is allowed to finish; cancellation is checked
/// between batches only.
pub struct BatchWorker {
    processor: Arc<QueueProcessor>,
    interval: Duration,
    batch_size: usize,
}

impl BatchWorker {
    pub fn new(processor: Arc<QueueProcessor>, interval: Duration, batch_size: usize) -> Self {
        Self {
            processor,
            interval,
            batch_size,
        }
    }

    /// Loops until `cancel` fires. A zero interval disables the worker.
    pub async fn run(self, cancel: CancellationToken) {
        if self.interval.is_zero() {
            info!("periodic batch worker disabled");
            return;
        }

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Skip the first immediate tick.
        interval.tick().await;

        info!(
            interval_secs = self.interval.as_secs(),
            batch_size = self.batch_size,
            "periodic batch worker started"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let summary = self.processor.run_batch(self.batch_size).await;
                    debug!(total = summary.total_seen, "scheduled batch finished");
                }
                _ = cancel.cancelled() => {
                    info!("periodic batch worker shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertflow_classifier::ExtractDefaults;
    use alertflow_core::QueueStatus;
    use alertflow_remediation::Resolver;
    use alertflow_test_utils::MemoryStorage;
    use serde_json::json;
    use tracing_test::traced_test;

    use crate::queue::QueueService;

    fn processor(store: Arc<MemoryStorage>) -> Arc<QueueProcessor> {
        Arc::new(QueueProcessor::new(
            store.clone(),
            Resolver::without_backend(store),
            ExtractDefaults::default(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn worker_processes_on_each_tick_and_stops_on_cancel() {
        let store = Arc::new(MemoryStorage::new());
        let queue = QueueService::new(store.clone());
        let item = queue
            .ingest(json!({"Subject": "AWS RDS high CPU"}), None)
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        let worker = BatchWorker::new(processor(store.clone()), Duration::from_secs(60), 10);
        let handle = tokio::spawn(worker.run(cancel.clone()));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(
            queue.get_item(&item.id).await.unwrap().status,
            QueueStatus::Pending
        );

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(
            queue.get_item(&item.id).await.unwrap().status,
            QueueStatus::Processed
        );

        cancel.cancel();
        handle.await.unwrap();
    }

    #[traced_test]
    #[tokio::test]
    async fn zero_interval_returns_immediately() {
        let store = Arc::new(MemoryStorage::new());
        let worker = BatchWorker::new(processor(store), Duration::ZERO, 10);
        worker.run(CancellationToken::new()).await;
        assert!(logs_contain("periodic batch worker disabled"));
    }
}
