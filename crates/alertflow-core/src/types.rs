// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the queue, classifier, resolver, and storage layers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Timestamp layout used for every persisted time value (UTC, millisecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Calendar-day layout used for date-bucketed queue queries.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Service name used when extraction finds nothing better.
pub const UNKNOWN: &str = "Unknown";

/// Returns the current UTC time formatted with [`TIMESTAMP_FORMAT`].
pub fn now_timestamp() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Completion,
}

/// Processing state of a queued webhook.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    Pending,
    Processed,
    Discarded,
    Error,
}

impl QueueStatus {
    /// Every state except `pending` is terminal.
    pub fn is_terminal(self) -> bool {
        !matches!(self, QueueStatus::Pending)
    }
}

/// Ordinal urgency tag attached to an alert.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Medium,
    High,
    Critical,
}

/// One ingested webhook and its processing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: String,
    pub received_at: String,
    /// `YYYY-MM-DD` bucket derived from `received_at`.
    pub received_date: String,
    pub status: QueueStatus,
    /// Where the webhook came from (`postmark`, `sns`, `api`, ...).
    pub source: String,
    /// The inbound body exactly as received.
    pub raw_payload: serde_json::Value,
    pub processed_at: Option<String>,
    pub error_message: Option<String>,
    pub resulting_alert_id: Option<String>,
}

/// Full overwrite of the lifecycle columns of a queue item.
///
/// Produced by the lifecycle state machine; the store applies it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueUpdate {
    pub status: QueueStatus,
    pub processed_at: Option<String>,
    pub error_message: Option<String>,
    pub resulting_alert_id: Option<String>,
}

/// Equality filter for queue scans.
///
/// Listings are newest first. Batch selection sets `oldest_first` so a
/// bounded batch drains the backlog in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueFilter {
    pub status: Option<QueueStatus>,
    pub date: Option<String>,
    pub limit: usize,
    pub oldest_first: bool,
}

impl QueueFilter {
    /// Pending items only, oldest first, at most `limit`.
    pub fn pending(limit: usize) -> Self {
        Self {
            status: Some(QueueStatus::Pending),
            date: None,
            limit,
            oldest_first: true,
        }
    }
}

impl Default for QueueFilter {
    fn default() -> Self {
        Self {
            status: None,
            date: None,
            limit: 50,
            oldest_first: false,
        }
    }
}

/// Structured fields extracted from a payload. Never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertInfo {
    pub service: String,
    pub resource_id: String,
    pub alert_type: String,
    pub severity: Severity,
    pub region: String,
    pub account_id: String,
    pub message: String,
}

impl AlertInfo {
    /// True when extraction identified a known service.
    pub fn has_known_service(&self) -> bool {
        self.service != UNKNOWN
    }
}

/// A persisted, immutable alert materialized from a queue item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub account_id: String,
    pub service: String,
    pub resource_id: String,
    pub alert_type: String,
    pub severity: Severity,
    pub timestamp: String,
    pub message: String,
    pub region: String,
    pub source_queue_item_id: String,
    pub remediation: String,
}

impl Alert {
    /// Builds an alert from extracted fields.
    pub fn from_info(
        id: String,
        info: AlertInfo,
        source_queue_item_id: String,
        remediation: String,
    ) -> Self {
        Self {
            id,
            account_id: info.account_id,
            service: info.service,
            resource_id: info.resource_id,
            alert_type: info.alert_type,
            severity: info.severity,
            timestamp: now_timestamp(),
            message: info.message,
            region: info.region,
            source_queue_item_id,
            remediation,
        }
    }
}

/// Cached recommendation keyed by `(service, alert_type, severity)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationCacheEntry {
    pub service: String,
    pub alert_type: String,
    pub severity: Severity,
    pub recommendation: String,
    pub created_at: String,
}

/// Aggregate counts returned by one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub processed_count: usize,
    pub discarded_count: usize,
    pub error_count: usize,
    pub total_seen: usize,
}

/// Queue counts by status, optionally restricted to one date bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub date: Option<String>,
    pub total: u64,
    pub pending: u64,
    pub processed: u64,
    pub discarded: u64,
    pub error: u64,
}

impl QueueStats {
    /// Adds `count` items in `status` to the totals.
    pub fn record(&mut self, status: QueueStatus, count: u64) {
        match status {
            QueueStatus::Pending => self.pending += count,
            QueueStatus::Processed => self.processed += count,
            QueueStatus::Discarded => self.discarded += count,
            QueueStatus::Error => self.error += count,
        }
        self.total += count;
    }
}

/// A request to the generative-text backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
}

/// Text returned by the generative-text backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub text: String,
    pub model: String,
}
