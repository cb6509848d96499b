// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Every rule is checked and all failures are reported together.

use crate::diagnostic::ConfigError;
use crate::model::AlertflowConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &AlertflowConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.service.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::validation(format!(
            "service.log_level `{}` must be one of {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    if config.processor.batch_size == 0 {
        errors.push(ConfigError::validation(
            "processor.batch_size must be at least 1",
        ));
    }

    let account = &config.processor.default_account_id;
    if account.len() != 12 || !account.chars().all(|c| c.is_ascii_digit()) {
        errors.push(ConfigError::validation(format!(
            "processor.default_account_id `{account}` must be exactly 12 digits"
        )));
    }

    if config.processor.default_region.trim().is_empty() {
        errors.push(ConfigError::validation(
            "processor.default_region must not be empty",
        ));
    }

    if config.remediation.timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "remediation.timeout_secs must be at least 1",
        ));
    }

    if config.remediation.max_tokens == 0 {
        errors.push(ConfigError::validation(
            "remediation.max_tokens must be at least 1",
        ));
    }

    if !config.groq.base_url.starts_with("http://") && !config.groq.base_url.starts_with("https://")
    {
        errors.push(ConfigError::validation(format!(
            "groq.base_url `{}` must start with http:// or https://",
            config.groq.base_url
        )));
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("gateway.host must not be empty"));
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::validation(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AlertflowConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_failure() {
        let mut config = AlertflowConfig::default();
        config.processor.batch_size = 0;
        config.processor.default_account_id = "12345".into();
        config.remediation.timeout_secs = 0;
        config.gateway.host = "not a host!".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4, "got: {errors:?}");
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = AlertflowConfig::default();
        config.service.log_level = "verbose".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("service.log_level"));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut config = AlertflowConfig::default();
        config.groq.base_url = "ftp://example.com".into();
        assert!(validate_config(&config).is_err());
    }
}
