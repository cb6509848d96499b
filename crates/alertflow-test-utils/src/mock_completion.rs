// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generative-text backend for deterministic testing.
//!
//! `MockCompletion` pops scripted outcomes from a FIFO queue and counts
//! every call, so tests can assert whether a tier was consulted at all.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use alertflow_core::{
    AdapterType, AlertflowError, CompletionAdapter, CompletionRequest, CompletionResponse,
    HealthStatus, PluginAdapter,
};

/// A mock completion backend returning pre-configured outcomes.
///
/// When the queue is empty, `"mock recommendation"` is returned.
pub struct MockCompletion {
    outcomes: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockCompletion {
    /// Create a mock with an empty outcome queue.
    pub fn new() -> Self {
        Self::with_outcomes(Vec::new())
    }

    /// Create a mock that succeeds with each of `responses` in turn.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self::with_outcomes(responses.into_iter().map(Ok).collect())
    }

    /// Create a mock whose every call fails with a provider error.
    pub fn failing(message: &str) -> Self {
        // A long run of failures; tests never make this many calls.
        Self::with_outcomes(std::iter::repeat_n(Err(message.to_string()), 64).collect())
    }

    /// Create a mock from explicit outcomes (`Err` becomes a provider error).
    pub fn with_outcomes(outcomes: Vec<Result<String, String>>) -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::from(outcomes)),
            requests: Mutex::new(Vec::new()),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `complete` calls so far, including failed ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared handle to the call counter, usable after the mock moves into an `Arc<dyn _>`.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Every request received, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockCompletion {
    fn name(&self) -> &str {
        "mock-completion"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, AlertflowError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AlertflowError> {
        Ok(())
    }
}

#[async_trait]
impl CompletionAdapter for MockCompletion {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, AlertflowError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self
            .outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock recommendation".to_string()));

        match outcome {
            Ok(text) => Ok(CompletionResponse {
                text,
                model: "mock-model".to_string(),
            }),
            Err(message) => Err(AlertflowError::Provider {
                message,
                source: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_prompt: "sys".into(),
            user_prompt: "user".into(),
            max_tokens: 50,
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let mock = MockCompletion::new();
        let resp = mock.complete(request()).await.unwrap();
        assert_eq!(resp.text, "mock recommendation");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn outcomes_returned_in_order() {
        let mock = MockCompletion::with_outcomes(vec![Ok("first".into()), Err("down".into())]);
        assert_eq!(mock.complete(request()).await.unwrap().text, "first");
        let err = mock.complete(request()).await.unwrap_err();
        assert!(matches!(err, AlertflowError::Provider { .. }));
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.requests().await.len(), 2);
    }

    #[tokio::test]
    async fn failing_mock_always_errors() {
        let mock = MockCompletion::failing("unauthorized");
        for _ in 0..3 {
            assert!(mock.complete(request()).await.is_err());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_applied() {
        let mock = MockCompletion::new().with_delay(Duration::from_secs(30));
        let started = tokio::time::Instant::now();
        mock.complete(request()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(30));
    }
}
