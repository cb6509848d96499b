// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Alertflow webhook pipeline.
//!
//! This crate provides the error type, the domain types that flow between
//! the queue, classifier, resolver, and store, and the adapter traits that
//! storage and generative-text backends implement.

pub mod error;
pub mod traits;
pub mod types;

pub use error::AlertflowError;
pub use types::{
    AdapterType, Alert, AlertInfo, BatchSummary, CompletionRequest, CompletionResponse,
    HealthStatus, QueueFilter, QueueItem, QueueStats, QueueStatus, QueueUpdate,
    RemediationCacheEntry, Severity,
};

pub use traits::{CompletionAdapter, PluginAdapter, StorageAdapter};
