// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Environment variable consulted when `groq.api_key` is unset.
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Top-level Alertflow configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AlertflowConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Remediation resolver settings.
    #[serde(default)]
    pub remediation: RemediationConfig,

    /// Generative-text backend settings.
    #[serde(default)]
    pub groq: GroqConfig,

    /// Batch processor settings.
    #[serde(default)]
    pub processor: ProcessorConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Name reported by the health endpoint and logs.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "alertflow".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("alertflow").join("alertflow.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("alertflow.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Remediation resolver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RemediationConfig {
    /// Operator flag enabling the generative tier. Also requires a Groq API key.
    #[serde(default)]
    pub ai_enabled: bool,

    /// Deadline for one generative request, in seconds.
    #[serde(default = "default_remediation_timeout")]
    pub timeout_secs: u64,

    /// Output cap passed to the generative backend.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for RemediationConfig {
    fn default() -> Self {
        Self {
            ai_enabled: false,
            timeout_secs: default_remediation_timeout(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_remediation_timeout() -> u64 {
    10
}

fn default_max_tokens() -> u32 {
    200
}

/// Groq (OpenAI-compatible chat completions) backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GroqConfig {
    /// API key. Falls back to the `GROQ_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_groq_model")]
    pub model: String,

    /// API base URL, without the `/chat/completions` suffix.
    #[serde(default = "default_groq_base_url")]
    pub base_url: String,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_groq_model(),
            base_url: default_groq_base_url(),
        }
    }
}

impl GroqConfig {
    /// The configured key, else `GROQ_API_KEY`, ignoring blank values.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(GROQ_API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

fn default_groq_model() -> String {
    "meta-llama/llama-4-scout-17b-16e-instruct".to_string()
}

fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

/// Batch processor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessorConfig {
    /// Maximum items pulled per batch run.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Seconds between scheduled batch runs under `serve`. 0 disables the worker.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Region used when a payload carries none.
    #[serde(default = "default_region")]
    pub default_region: String,

    /// Account id used when a payload carries none.
    #[serde(default = "default_account_id")]
    pub default_account_id: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            interval_secs: default_interval_secs(),
            default_region: default_region(),
            default_account_id: default_account_id(),
        }
    }
}

fn default_batch_size() -> usize {
    10
}

fn default_interval_secs() -> u64 {
    60
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_account_id() -> String {
    "000000000000".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind to.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bearer token for the `/v1` routes. Without one those routes reject every request.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            bearer_token: None,
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    3000
}
