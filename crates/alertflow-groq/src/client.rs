// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for Groq's OpenAI-compatible chat completions API.
//!
//! [`GroqClient`] builds authenticated requests and retries once on
//! transient statuses (429, 500, 503, 529).

use std::time::Duration;

use alertflow_core::AlertflowError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

const COMPLETIONS_PATH: &str = "/chat/completions";

/// Transport timeout; the remediation resolver applies its own, shorter deadline.
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the Groq API.
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: reqwest::Client,
    default_model: String,
    max_retries: u32,
    endpoint: String,
}

impl GroqClient {
    /// Creates a client that authenticates with `api_key` against `base_url`.
    pub fn new(api_key: &str, model: String, base_url: &str) -> Result<Self, AlertflowError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
            AlertflowError::Config(format!("invalid API key header value: {e}"))
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| AlertflowError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            default_model: model,
            max_retries: 1,
            endpoint: endpoint_for(base_url),
        })
    }

    /// Returns the default model identifier.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a non-streaming completion request.
    ///
    /// On transient errors, retries once after a 1-second delay.
    pub async fn complete_chat(&self, request: &ChatRequest) -> Result<ChatResponse, AlertflowError> {
        let mut req = request.clone();
        req.stream = false;

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .json(&req)
                .send()
                .await
                .map_err(|e| AlertflowError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| AlertflowError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&body).map_err(|e| AlertflowError::Provider {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(AlertflowError::Provider {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "Groq API error ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(AlertflowError::Provider {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| AlertflowError::Provider {
            message: "completion request failed after retries".into(),
            source: None,
        }))
    }
}

fn endpoint_for(base_url: &str) -> String {
    format!("{}{COMPLETIONS_PATH}", base_url.trim_end_matches('/'))
}

/// Returns true for HTTP status codes worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503 | 529)
}
