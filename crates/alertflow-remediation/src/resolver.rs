// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiered remediation resolution.

use std::sync::Arc;
use std::time::Duration;

use alertflow_config::model::RemediationConfig;
use alertflow_core::types::now_timestamp;
use alertflow_core::{
    AlertflowError, CompletionAdapter, CompletionRequest, RemediationCacheEntry, Severity,
    StorageAdapter,
};
use strum::Display;
use tracing::{debug, warn};

use crate::rules::{default_recommendation, static_recommendation};

const SYSTEM_PROMPT: &str = "You are an AWS cloud infrastructure expert. \
    Give concise, actionable remediation steps for infrastructure alerts. \
    Answer in plain text without headings.";

/// Which tier produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    Cache,
    Generative,
    Static,
    Default,
}

/// A recommendation and the tier it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub tier: Tier,
}

/// Knobs for the generative tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Operator flag. The tier also needs a backend to be wired in.
    pub ai_enabled: bool,
    pub timeout: Duration,
    pub max_tokens: u32,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self::from(&RemediationConfig::default())
    }
}

impl From<&RemediationConfig> for ResolverSettings {
    fn from(config: &RemediationConfig) -> Self {
        Self {
            ai_enabled: config.ai_enabled,
            timeout: Duration::from_secs(config.timeout_secs),
            max_tokens: config.max_tokens,
        }
    }
}

/// Resolves `(service, alert_type, severity)` to a recommendation.
///
/// The backend is `None` when no credential is configured; the generative
/// tier then never runs regardless of the operator flag.
pub struct Resolver {
    store: Arc<dyn StorageAdapter>,
    backend: Option<Arc<dyn CompletionAdapter>>,
    settings: ResolverSettings,
}

impl Resolver {
    pub fn new(
        store: Arc<dyn StorageAdapter>,
        backend: Option<Arc<dyn CompletionAdapter>>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            store,
            backend,
            settings,
        }
    }

    /// A resolver with no generative backend.
    pub fn without_backend(store: Arc<dyn StorageAdapter>) -> Self {
        Self::new(store, None, ResolverSettings::default())
    }

    /// True when both a backend and the operator flag are present.
    pub fn generative_enabled(&self) -> bool {
        self.settings.ai_enabled && self.backend.is_some()
    }

    /// Recommendation text for the triple. Never fails.
    pub async fn resolve(&self, service: &str, alert_type: &str, severity: Severity) -> String {
        self.resolve_with_tier(service, alert_type, severity)
            .await
            .text
    }

    /// Like [`resolve`](Self::resolve) but also reports which tier answered.
    pub async fn resolve_with_tier(
        &self,
        service: &str,
        alert_type: &str,
        severity: Severity,
    ) -> Resolution {
        match self.store.get_remediation(service, alert_type, severity).await {
            Ok(Some(entry)) => {
                debug!(service, alert_type, %severity, "remediation cache hit");
                return Resolution {
                    text: entry.recommendation,
                    tier: Tier::Cache,
                };
            }
            Ok(None) => {}
            Err(e) => warn!(service, alert_type, %severity, error = %e, "remediation cache read failed"),
        }

        if let Some(text) = self.generate(service, alert_type, severity).await {
            return Resolution {
                text,
                tier: Tier::Generative,
            };
        }

        if let Some(text) = static_recommendation(service, alert_type, severity) {
            debug!(service, alert_type, %severity, "static remediation rule");
            return Resolution {
                text: text.to_string(),
                tier: Tier::Static,
            };
        }

        Resolution {
            text: default_recommendation(service, alert_type, severity),
            tier: Tier::Default,
        }
    }

    /// Generative tier: one bounded request, result written back to the cache.
    ///
    /// Every failure is logged and turned into `None`.
    async fn generate(&self, service: &str, alert_type: &str, severity: Severity) -> Option<String> {
        if !self.settings.ai_enabled {
            return None;
        }
        let backend = self.backend.as_ref()?;

        let request = CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: format!(
                "Recommend how to remediate a {severity} severity {alert_type} alert on an AWS \
                 {service} resource. Keep the answer under 100 words."
            ),
            max_tokens: self.settings.max_tokens,
        };

        let outcome = match tokio::time::timeout(self.settings.timeout, backend.complete(request))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(AlertflowError::Timeout {
                duration: self.settings.timeout,
            }),
        };

        let text = match outcome {
            Ok(response) if !response.text.trim().is_empty() => response.text.trim().to_string(),
            Ok(_) => {
                warn!(service, alert_type, %severity, "generative backend returned empty text");
                return None;
            }
            Err(e) => {
                warn!(service, alert_type, %severity, error = %e, "generative remediation unavailable");
                return None;
            }
        };

        let entry = RemediationCacheEntry {
            service: service.to_string(),
            alert_type: alert_type.to_string(),
            severity,
            recommendation: text.clone(),
            created_at: now_timestamp(),
        };
        if let Err(e) = self.store.put_remediation(&entry).await {
            warn!(service, alert_type, %severity, error = %e, "failed to cache generated remediation");
        }
        debug!(service, alert_type, %severity, backend = backend.name(), "generated remediation");
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertflow_test_utils::{MemoryStorage, MockCompletion};

    fn ai_settings() -> ResolverSettings {
        ResolverSettings {
            ai_enabled: true,
            timeout: Duration::from_secs(5),
            max_tokens: 200,
        }
    }

    fn cached(service: &str, alert_type: &str, severity: Severity, text: &str) -> RemediationCacheEntry {
        RemediationCacheEntry {
            service: service.into(),
            alert_type: alert_type.into(),
            severity,
            recommendation: text.into(),
            created_at: "2026-01-01T00:00:00.000Z".into(),
        }
    }

    #[tokio::test]
    async fn cache_hit_skips_generative_backend() {
        let store = Arc::new(MemoryStorage::new());
        store
            .put_remediation(&cached("EC2", "CPU", Severity::High, "cached answer"))
            .await
            .unwrap();
        let mock = Arc::new(MockCompletion::with_responses(vec!["fresh".into()]));
        let resolver = Resolver::new(store, Some(mock.clone()), ai_settings());

        let resolution = resolver
            .resolve_with_tier("EC2", "CPU", Severity::High)
            .await;
        assert_eq!(resolution.text, "cached answer");
        assert_eq!(resolution.tier, Tier::Cache);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn generated_text_is_cached_for_next_call() {
        let store = Arc::new(MemoryStorage::new());
        let mock = Arc::new(MockCompletion::with_responses(vec![
            "  Add a read replica.  ".into(),
        ]));
        let resolver = Resolver::new(store.clone(), Some(mock.clone()), ai_settings());

        let first = resolver
            .resolve_with_tier("RDS", "CPU", Severity::Critical)
            .await;
        assert_eq!(first.tier, Tier::Generative);
        assert_eq!(first.text, "Add a read replica.");
        assert_eq!(store.cache_len().await, 1);

        let second = resolver
            .resolve_with_tier("RDS", "CPU", Severity::Critical)
            .await;
        assert_eq!(second.tier, Tier::Cache);
        assert_eq!(second.text, "Add a read replica.");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn prompt_names_the_triple_and_caps_tokens() {
        let store = Arc::new(MemoryStorage::new());
        let mock = Arc::new(MockCompletion::new());
        let resolver = Resolver::new(store, Some(mock.clone()), ai_settings());
        resolver.resolve("Lambda", "Throttle", Severity::High).await;

        let requests = mock.requests().await;
        assert_eq!(requests.len(), 1);
        let prompt = &requests[0].user_prompt;
        assert!(prompt.contains("high") && prompt.contains("Throttle") && prompt.contains("Lambda"));
        assert!(prompt.contains("100 words"));
        assert_eq!(requests[0].max_tokens, 200);
    }

    #[tokio::test]
    async fn disabled_flag_never_calls_backend() {
        let store = Arc::new(MemoryStorage::new());
        let mock = Arc::new(MockCompletion::new());
        let settings = ResolverSettings {
            ai_enabled: false,
            ..ai_settings()
        };
        let resolver = Resolver::new(store, Some(mock.clone()), settings);
        assert!(!resolver.generative_enabled());

        let text = resolver.resolve("EC2", "CPU", Severity::Critical).await;
        assert_eq!(
            text,
            "Immediately scale up your instance and investigate the root cause."
        );
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn no_backend_falls_back_to_static_then_default() {
        let resolver = Resolver::without_backend(Arc::new(MemoryStorage::new()));

        let ec2 = resolver
            .resolve_with_tier("EC2", "CPU", Severity::Critical)
            .await;
        assert_eq!(ec2.tier, Tier::Static);
        assert_eq!(
            ec2.text,
            "Immediately scale up your instance and investigate the root cause."
        );

        let s3 = resolver
            .resolve_with_tier("S3", "Replication", Severity::High)
            .await;
        assert_eq!(s3.tier, Tier::Default);
        assert!(s3.text.contains("high"));
        assert!(s3.text.contains("Replication"));
        assert!(s3.text.contains("S3"));
    }

    #[tokio::test]
    async fn backend_failure_falls_through_to_static() {
        let store = Arc::new(MemoryStorage::new());
        let mock = Arc::new(MockCompletion::failing("401 unauthorized"));
        let resolver = Resolver::new(store.clone(), Some(mock.clone()), ai_settings());

        let resolution = resolver
            .resolve_with_tier("EC2", "Memory", Severity::Medium)
            .await;
        assert_eq!(resolution.tier, Tier::Static);
        assert_eq!(
            resolution.text,
            "Monitor memory usage and consider application optimization."
        );
        assert_eq!(mock.call_count(), 1);
        assert_eq!(store.cache_len().await, 0);
    }

    #[tokio::test]
    async fn empty_generation_counts_as_failure() {
        let store = Arc::new(MemoryStorage::new());
        let mock = Arc::new(MockCompletion::with_responses(vec!["   ".into()]));
        let resolver = Resolver::new(store.clone(), Some(mock), ai_settings());

        let resolution = resolver
            .resolve_with_tier("S3", "Replication", Severity::Medium)
            .await;
        assert_eq!(resolution.tier, Tier::Default);
        assert_eq!(store.cache_len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_backend_times_out() {
        let store = Arc::new(MemoryStorage::new());
        let mock = Arc::new(MockCompletion::new().with_delay(Duration::from_secs(60)));
        let settings = ResolverSettings {
            timeout: Duration::from_secs(2),
            ..ai_settings()
        };
        let resolver = Resolver::new(store, Some(mock.clone()), settings);

        let resolution = resolver
            .resolve_with_tier("Lambda", "Timeout", Severity::High)
            .await;
        assert_eq!(resolution.tier, Tier::Static);
        assert_eq!(
            resolution.text,
            "Increase timeout setting or break function into smaller parts."
        );
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn cache_failures_are_logged_not_returned() {
        let store = Arc::new(MemoryStorage::new());
        store.fail_cache(true);
        let mock = Arc::new(MockCompletion::with_responses(vec!["generated".into()]));
        let resolver = Resolver::new(store, Some(mock), ai_settings());

        // Read fails, generation succeeds, write-back fails: still answered.
        let resolution = resolver
            .resolve_with_tier("ECS", "CPU", Severity::High)
            .await;
        assert_eq!(resolution.tier, Tier::Generative);
        assert_eq!(resolution.text, "generated");
        assert!(logs_contain("remediation cache read failed"));
        assert!(logs_contain("failed to cache generated remediation"));
    }
}
