// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch processing of pending queue items.
//!
//! Each item runs through classification, remediation, and alert
//! creation on its own. A failure is recorded on that item as `error`
//! and the batch moves on; [`QueueProcessor::run_batch`] always returns a
//! summary.

use std::sync::Arc;

use alertflow_classifier::{ExtractDefaults, classify_with};
use alertflow_config::model::{AlertflowConfig, ProcessorConfig};
use alertflow_core::{
    Alert, AlertflowError, BatchSummary, CompletionAdapter, QueueFilter, QueueItem, QueueStatus,
    StorageAdapter,
};
use alertflow_remediation::{Resolver, ResolverSettings};
use serde::Serialize;
use strum::Display;
use tracing::{debug, error, info, warn};

use crate::lifecycle::{self, Transition};

/// Why an item was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// No recognition marker matched.
    NotRecognized,
    /// Recognised, but no known service could be extracted.
    UnknownService,
}

/// Final state of one processed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProcessOutcome {
    Processed { alert_id: String },
    Discarded { reason: DiscardReason },
    Error { message: String },
}

/// Fallback region and account from the `[processor]` section.
pub fn extract_defaults(config: &ProcessorConfig) -> ExtractDefaults {
    ExtractDefaults {
        region: config.default_region.clone(),
        account_id: config.default_account_id.clone(),
    }
}

/// Turns pending queue items into alerts.
pub struct QueueProcessor {
    store: Arc<dyn StorageAdapter>,
    resolver: Resolver,
    defaults: ExtractDefaults,
}

impl QueueProcessor {
    pub fn new(store: Arc<dyn StorageAdapter>, resolver: Resolver, defaults: ExtractDefaults) -> Self {
        Self {
            store,
            resolver,
            defaults,
        }
    }

    /// Wires a resolver and extraction defaults from configuration.
    pub fn from_config(
        store: Arc<dyn StorageAdapter>,
        backend: Option<Arc<dyn CompletionAdapter>>,
        config: &AlertflowConfig,
    ) -> Self {
        let resolver = Resolver::new(
            store.clone(),
            backend,
            ResolverSettings::from(&config.remediation),
        );
        Self::new(store, resolver, extract_defaults(&config.processor))
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Processes up to `max_items` pending items, one at a time.
    ///
    /// Never fails: a failed scan yields an empty summary and per-item
    /// failures are counted in `error_count`.
    pub async fn run_batch(&self, max_items: usize) -> BatchSummary {
        let mut summary = BatchSummary::default();
        if max_items == 0 {
            return summary;
        }

        let items = match self.store.list_queue_items(&QueueFilter::pending(max_items)).await {
            Ok(items) => items,
            Err(e) => {
                error!(error = %e, "failed to scan for pending queue items");
                return summary;
            }
        };

        summary.total_seen = items.len();
        if items.is_empty() {
            debug!("no pending queue items");
            return summary;
        }

        for item in &items {
            match self.process_item(item).await {
                ProcessOutcome::Processed { .. } => summary.processed_count += 1,
                ProcessOutcome::Discarded { .. } => summary.discarded_count += 1,
                ProcessOutcome::Error { .. } => summary.error_count += 1,
            }
        }

        info!(
            total = summary.total_seen,
            processed = summary.processed_count,
            discarded = summary.discarded_count,
            errors = summary.error_count,
            "batch complete"
        );
        summary
    }

    /// Processes one item and records its terminal state.
    pub async fn process_item(&self, item: &QueueItem) -> ProcessOutcome {
        match self.try_process(item).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let message = e.to_string();
                error!(item_id = %item.id, error = %message, "queue item failed");
                self.record_failure(item, &message).await;
                ProcessOutcome::Error { message }
            }
        }
    }

    async fn try_process(&self, item: &QueueItem) -> Result<ProcessOutcome, AlertflowError> {
        let Some(info) = classify_with(&item.raw_payload, &self.defaults) else {
            return self.discard(item, DiscardReason::NotRecognized).await;
        };
        if !info.has_known_service() {
            return self.discard(item, DiscardReason::UnknownService).await;
        }

        let remediation = self
            .resolver
            .resolve(&info.service, &info.alert_type, info.severity)
            .await;

        let alert = Alert::from_info(
            uuid::Uuid::new_v4().to_string(),
            info,
            item.id.clone(),
            remediation,
        );
        self.store.insert_alert(&alert).await?;

        let processed = Transition::Processed {
            alert_id: alert.id.clone(),
        };
        if let Err(e) = self.transition(item, processed).await {
            // The alert stays stored; reprocessing this item makes another.
            warn!(
                item_id = %item.id,
                alert_id = %alert.id,
                "alert stored but queue item not marked processed"
            );
            return Err(e);
        }

        info!(
            item_id = %item.id,
            alert_id = %alert.id,
            service = %alert.service,
            alert_type = %alert.alert_type,
            severity = %alert.severity,
            "queue item processed"
        );
        Ok(ProcessOutcome::Processed { alert_id: alert.id })
    }

    async fn discard(
        &self,
        item: &QueueItem,
        reason: DiscardReason,
    ) -> Result<ProcessOutcome, AlertflowError> {
        self.transition(item, Transition::Discarded).await?;
        info!(item_id = %item.id, %reason, "queue item discarded");
        Ok(ProcessOutcome::Discarded { reason })
    }

    async fn transition(&self, item: &QueueItem, transition: Transition) -> Result<(), AlertflowError> {
        let update = lifecycle::apply(item.status, transition)?;
        if self.store.update_queue_item(&item.id, &update).await? {
            Ok(())
        } else {
            Err(AlertflowError::queue_item_not_found(&item.id))
        }
    }

    async fn record_failure(&self, item: &QueueItem, message: &str) {
        // A non-pending snapshot has nothing to fail out of.
        if item.status != QueueStatus::Pending {
            return;
        }
        let failed = Transition::Failed {
            message: message.to_string(),
        };
        if let Err(e) = self.transition(item, failed).await {
            warn!(item_id = %item.id, error = %e, "could not record queue item failure");
        }
    }
}
