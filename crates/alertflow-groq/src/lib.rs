// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Groq completion backend for the generative remediation tier.
//!
//! Implements [`CompletionAdapter`] over Groq's OpenAI-compatible chat
//! completions API. The backend only exists when an API key resolves;
//! callers treat its absence as "generative tier unavailable".

pub mod client;
pub mod types;

use async_trait::async_trait;
use alertflow_config::model::{AlertflowConfig, GroqConfig};
use alertflow_core::{
    AdapterType, AlertflowError, CompletionAdapter, CompletionRequest, CompletionResponse,
    HealthStatus, PluginAdapter,
};
use tracing::{debug, info};

use crate::client::GroqClient;
use crate::types::{ChatMessage, ChatRequest};

/// Prompt used by [`GroqProvider::check_connection`].
const PING_PROMPT: &str = "Say hello in one word";

/// Groq provider implementing [`CompletionAdapter`].
///
/// API key resolution order: `groq.api_key` -> `GROQ_API_KEY` env var.
pub struct GroqProvider {
    client: GroqClient,
}

impl GroqProvider {
    /// Creates a provider, failing when no API key resolves.
    pub fn new(config: &GroqConfig) -> Result<Self, AlertflowError> {
        let api_key = config.resolved_api_key().ok_or_else(|| {
            AlertflowError::Config(
                "Groq API key not configured (set groq.api_key or GROQ_API_KEY)".into(),
            )
        })?;
        let client = GroqClient::new(&api_key, config.model.clone(), &config.base_url)?;
        info!(model = %config.model, "Groq provider initialized");
        Ok(Self { client })
    }

    /// Creates a provider when a key is available, `None` otherwise.
    pub fn from_config(config: &AlertflowConfig) -> Result<Option<Self>, AlertflowError> {
        if config.groq.resolved_api_key().is_none() {
            debug!("no Groq API key, generative remediation unavailable");
            return Ok(None);
        }
        Self::new(&config.groq).map(Some)
    }

    /// Sends a tiny one-word completion to verify credentials and reachability.
    ///
    /// Returns the model's reply.
    pub async fn check_connection(&self) -> Result<String, AlertflowError> {
        let request = ChatRequest {
            model: self.client.default_model().to_string(),
            messages: vec![ChatMessage::user(PING_PROMPT)],
            max_completion_tokens: 10,
            temperature: Some(1.0),
            stream: false,
        };
        let response = self.client.complete_chat(&request).await?;
        Ok(response.first_text().unwrap_or_default().trim().to_string())
    }

    fn to_chat_request(&self, request: CompletionRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if !request.system_prompt.is_empty() {
            messages.push(ChatMessage::system(request.system_prompt));
        }
        messages.push(ChatMessage::user(request.user_prompt));
        ChatRequest {
            model: self.client.default_model().to_string(),
            messages,
            max_completion_tokens: request.max_tokens,
            temperature: None,
            stream: false,
        }
    }
}

#[async_trait]
impl PluginAdapter for GroqProvider {
    fn name(&self) -> &str {
        "groq"
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
        debug!("Groq provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl CompletionAdapter for GroqProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, AlertflowError> {
        let chat = self.to_chat_request(request);
        let response = self.client.complete_chat(&chat).await?;
        let text = response
            .first_text()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        debug!(model = %response.model, chars = text.len(), "completion received");
        Ok(CompletionResponse {
            text,
            model: response.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> GroqConfig {
        GroqConfig {
            api_key: Some("gsk-test".into()),
            model: "llama-test".into(),
            base_url: server.uri(),
        }
    }

    fn reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-1",
            "model": "llama-test",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}]
        }))
    }

    #[test]
    fn new_without_key_is_config_error() {
        let config = GroqConfig {
            api_key: Some("   ".into()),
            ..GroqConfig::default()
        };
        // Blank keys are ignored; the env var may still supply one.
        if config.resolved_api_key().is_none() {
            assert!(matches!(
                GroqProvider::new(&config),
                Err(AlertflowError::Config(_))
            ));
        }
    }

    #[tokio::test]
    async fn complete_maps_prompts_and_trims_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama-test",
                "max_completion_tokens": 200,
                "messages": [
                    {"role": "system", "content": "You are an SRE."},
                    {"role": "user", "content": "EC2 CPU critical"}
                ]
            })))
            .respond_with(reply("  Scale the instance.\n"))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GroqProvider::new(&config_for(&server)).unwrap();
        let resp = provider
            .complete(CompletionRequest {
                system_prompt: "You are an SRE.".into(),
                user_prompt: "EC2 CPU critical".into(),
                max_tokens: 200,
            })
            .await
            .unwrap();
        assert_eq!(resp.text, "Scale the instance.");
        assert_eq!(resp.model, "llama-test");
    }

    #[tokio::test]
    async fn missing_content_yields_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "llama-test",
                "choices": []
            })))
            .mount(&server)
            .await;

        let provider = GroqProvider::new(&config_for(&server)).unwrap();
        let resp = provider
            .complete(CompletionRequest {
                system_prompt: String::new(),
                user_prompt: "x".into(),
                max_tokens: 5,
            })
            .await
            .unwrap();
        assert!(resp.text.is_empty());
    }

    #[tokio::test]
    async fn check_connection_sends_one_word_ping() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "max_completion_tokens": 10,
                "messages": [{"role": "user", "content": "Say hello in one word"}]
            })))
            .respond_with(reply("Hello"))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GroqProvider::new(&config_for(&server)).unwrap();
        assert_eq!(provider.check_connection().await.unwrap(), "Hello");
    }

    #[tokio::test]
    async fn adapter_metadata() {
        let server = MockServer::start().await;
        let provider = GroqProvider::new(&config_for(&server)).unwrap();
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.adapter_type(), AdapterType::Completion);
        assert_eq!(provider.health_check().await.unwrap(), HealthStatus::Healthy);
    }
}
