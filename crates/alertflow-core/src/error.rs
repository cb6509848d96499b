// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Alertflow pipeline.

use thiserror::Error;

/// The primary error type used across all Alertflow adapter traits and core operations.
#[derive(Debug, Error)]
pub enum AlertflowError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generative-text backend errors (API failure, auth, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// A queue item or alert with the given id does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// A lifecycle transition that the queue state machine does not allow.
    #[error("invalid queue transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AlertflowError {
    /// Shorthand for a `NotFound` on a queue item.
    pub fn queue_item_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "queue item".into(),
            id: id.into(),
        }
    }

    /// Shorthand for a `NotFound` on an alert.
    pub fn alert_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "alert".into(),
            id: id.into(),
        }
    }

    /// Returns true for errors a caller should surface as "absent" rather than failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
