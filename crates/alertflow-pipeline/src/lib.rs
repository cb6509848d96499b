// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The webhook queue pipeline.
//!
//! - [`QueueService`] ingests payloads as `pending` items and exposes the
//!   admin operations (reprocess, stats, clear, lookups).
//! - [`QueueProcessor`] drains pending items through classification and
//!   remediation into alerts.
//! - [`BatchWorker`] runs the processor on a schedule.
//! - [`lifecycle`] holds the state machine both of them go through.
//!
//! Selection and state transition are separate store calls, so two
//! concurrent processors may both pick up the same item. Delivery is
//! at-least-once.

pub mod lifecycle;
pub mod processor;
pub mod queue;
pub mod worker;

pub use lifecycle::Transition;
pub use processor::{DiscardReason, ProcessOutcome, QueueProcessor, extract_defaults};
pub use queue::{DEFAULT_SOURCE, QueueService};
pub use worker::BatchWorker;
