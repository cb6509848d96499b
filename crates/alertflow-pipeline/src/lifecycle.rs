// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue item state machine.
//!
//! `pending` is the only initial state and the only state a terminal
//! outcome may be entered from. Reprocess moves any state back to
//! `pending` and clears the outcome fields.

use alertflow_core::types::now_timestamp;
use alertflow_core::{AlertflowError, QueueStatus, QueueUpdate};

/// Longest error message stored on a queue item, in characters.
pub const MAX_ERROR_MESSAGE_CHARS: usize = 500;

/// A requested state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// An alert was created from the item.
    Processed { alert_id: String },
    /// The payload is not an actionable alert.
    Discarded,
    /// Processing failed.
    Failed { message: String },
    /// Operator reset back to `pending`.
    Reprocess,
}

impl Transition {
    /// The state this transition leads to.
    pub fn target(&self) -> QueueStatus {
        match self {
            Transition::Processed { .. } => QueueStatus::Processed,
            Transition::Discarded => QueueStatus::Discarded,
            Transition::Failed { .. } => QueueStatus::Error,
            Transition::Reprocess => QueueStatus::Pending,
        }
    }
}

/// Computes the field overwrite for `transition` out of `from`.
///
/// Terminal outcomes are only reachable from `pending`. Reprocess is
/// accepted from every state, including `pending`, and always yields the
/// same cleared update.
pub fn apply(from: QueueStatus, transition: Transition) -> Result<QueueUpdate, AlertflowError> {
    let to = transition.target();
    if to.is_terminal() && from != QueueStatus::Pending {
        return Err(AlertflowError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    let update = match transition {
        Transition::Processed { alert_id } => QueueUpdate {
            status: to,
            processed_at: Some(now_timestamp()),
            error_message: None,
            resulting_alert_id: Some(alert_id),
        },
        Transition::Discarded => QueueUpdate {
            status: to,
            processed_at: Some(now_timestamp()),
            error_message: None,
            resulting_alert_id: None,
        },
        Transition::Failed { message } => QueueUpdate {
            status: to,
            processed_at: Some(now_timestamp()),
            error_message: Some(truncate_message(&message)),
            resulting_alert_id: None,
        },
        Transition::Reprocess => QueueUpdate {
            status: to,
            processed_at: None,
            error_message: None,
            resulting_alert_id: None,
        },
    };
    Ok(update)
}

fn truncate_message(message: &str) -> String {
    match message.char_indices().nth(MAX_ERROR_MESSAGE_CHARS) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}
