// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generative-text backend trait.

use async_trait::async_trait;

use crate::error::AlertflowError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

/// A single-shot text completion backend.
///
/// Implementations perform one request per call. Callers impose their own
/// deadline with `tokio::time::timeout`; an implementation may also carry
/// its own HTTP timeout.
#[async_trait]
pub trait CompletionAdapter: PluginAdapter {
    /// Sends a system + user prompt pair and returns the generated text.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, AlertflowError>;
}
