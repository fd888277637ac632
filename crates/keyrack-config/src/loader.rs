// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./keyrack.toml` > `~/.config/keyrack/keyrack.toml` > `/etc/keyrack/keyrack.toml`
//! with environment variable overrides via `KEYRACK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::KeyrackConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/keyrack/keyrack.toml` (system-wide)
/// 3. `~/.config/keyrack/keyrack.toml` (user XDG config)
/// 4. `./keyrack.toml` (local directory)
/// 5. `KEYRACK_*` environment variables
pub fn load_config() -> Result<KeyrackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeyrackConfig::default()))
        .merge(Toml::file("/etc/keyrack/keyrack.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("keyrack/keyrack.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("keyrack.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a specific TOML string only (no XDG lookup,
/// no env overrides).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<KeyrackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeyrackConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<KeyrackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeyrackConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `KEYRACK_AUTH_SECRET_KEY` must map to
/// `auth.secret_key`, not `auth.secret.key`.
fn env_provider() -> Env {
    Env::prefixed("KEYRACK_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: KEYRACK_AUTH_SECRET_KEY -> "auth_secret_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("auth_", "auth.", 1);
        mapped.into()
    })
}
