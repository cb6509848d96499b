// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Alertflow configuration system.

use alertflow_config::diagnostic::ConfigError;
use alertflow_config::model::AlertflowConfig;
use alertflow_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_alertflow_config() {
    let toml = r#"
[service]
name = "alerts-prod"
log_level = "debug"

[storage]
database_path = "/tmp/alertflow-test.db"
wal_mode = false

[remediation]
ai_enabled = true
timeout_secs = 5
max_tokens = 150

[groq]
api_key = "gsk-test"
model = "llama-test"
base_url = "http://localhost:9000/v1"

[processor]
batch_size = 25
interval_secs = 0
default_region = "eu-west-1"
default_account_id = "123456789012"

[gateway]
host = "0.0.0.0"
port = 8080
bearer_token = "secret"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "alerts-prod");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/alertflow-test.db");
    assert!(!config.storage.wal_mode);
    assert!(config.remediation.ai_enabled);
    assert_eq!(config.remediation.timeout_secs, 5);
    assert_eq!(config.remediation.max_tokens, 150);
    assert_eq!(config.groq.api_key.as_deref(), Some("gsk-test"));
    assert_eq!(config.groq.model, "llama-test");
    assert_eq!(config.processor.batch_size, 25);
    assert_eq!(config.processor.interval_secs, 0);
    assert_eq!(config.processor.default_region, "eu-west-1");
    assert_eq!(config.gateway.port, 8080);
    assert_eq!(config.gateway.bearer_token.as_deref(), Some("secret"));
}

/// Empty TOML yields the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    let defaults = AlertflowConfig::default();
    assert_eq!(config.processor.batch_size, defaults.processor.batch_size);
    assert_eq!(config.processor.default_region, "us-east-1");
    assert_eq!(config.processor.default_account_id, "000000000000");
    assert!(!config.remediation.ai_enabled);
    assert_eq!(config.remediation.timeout_secs, 10);
    assert_eq!(
        config.groq.model,
        "meta-llama/llama-4-scout-17b-16e-instruct"
    );
    assert!(config.gateway.bearer_token.is_none());
}

/// A typo in a section key is rejected with a suggestion.
#[test]
fn unknown_key_produces_suggestion() {
    let toml = r#"
[processor]
batch_szie = 5
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "batch_szie");
            assert_eq!(suggestion.as_deref(), Some("batch_size"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// A misspelled top-level section is also rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[procesor]
batch_size = 5
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown section");
    assert!(matches!(
        &errors[0],
        ConfigError::UnknownKey { suggestion: Some(s), .. } if s == "processor"
    ));
}

/// A string where a number is expected is reported as InvalidType.
#[test]
fn wrong_type_produces_invalid_type() {
    let toml = r#"
[gateway]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject wrong type");
    assert!(
        matches!(&errors[0], ConfigError::InvalidType { key, .. } if key.contains("port")),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_errors_surface_through_load() {
    let toml = r#"
[processor]
batch_size = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("batch_size 0 is invalid");
    assert!(matches!(&errors[0], ConfigError::Validation { .. }));
}

/// Loading from an explicit path reads that file.
#[test]
fn load_from_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(
        &path,
        "[storage]\ndatabase_path = \"/var/lib/alertflow/queue.db\"\n",
    )
    .unwrap();

    let config = load_and_validate_path(&path).expect("file should load");
    assert_eq!(config.storage.database_path, "/var/lib/alertflow/queue.db");
}

/// The key in the config file wins over the environment fallback.
#[test]
fn configured_groq_key_wins_over_env() {
    let config = load_config_from_str("[groq]\napi_key = \"from-file\"\n").unwrap();
    assert_eq!(config.groq.resolved_api_key().as_deref(), Some("from-file"));
}

/// A blank key counts as unset.
#[test]
fn blank_groq_key_is_ignored() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("GROQ_API_KEY", "");
        let config = load_config_from_str("[groq]\napi_key = \"  \"\n").unwrap();
        assert!(config.groq.resolved_api_key().is_none());
        Ok(())
    });
}
