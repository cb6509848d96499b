// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./alertflow.toml` > `~/.config/alertflow/alertflow.toml`
//! > `/etc/alertflow/alertflow.toml`, with environment variable overrides via the
//! `ALERTFLOW_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::AlertflowConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG: &str = "/etc/alertflow/alertflow.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG: &str = "alertflow.toml";

/// Top-level sections recognised in `ALERTFLOW_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &[
    "service",
    "storage",
    "remediation",
    "groq",
    "processor",
    "gateway",
];

/// User config under the XDG config dir, if one can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("alertflow").join("alertflow.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/alertflow/alertflow.toml`
/// 3. `~/.config/alertflow/alertflow.toml`
/// 4. `./alertflow.toml`
/// 5. `ALERTFLOW_*` environment variables
pub fn load_config() -> Result<AlertflowConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<AlertflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AlertflowConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AlertflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AlertflowConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment without extracting it.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(AlertflowConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider mapping `ALERTFLOW_GROQ_API_KEY` to `groq.api_key`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// keys like `database_path` survive intact.
fn env_provider() -> Env {
    Env::prefixed("ALERTFLOW_").map(|key| {
        // Env keys arrive in their original case.
        let key_str = key.as_str().to_ascii_lowercase();
        for section in ENV_SECTIONS {
            if let Some(rest) = key_str
                .strip_prefix(section)
                .and_then(|r| r.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key_str.into()
    })
}
