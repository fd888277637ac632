// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, non-empty paths, and a
//! minimum secret length.

use crate::diagnostic::ConfigError;
use crate::model::KeyrackConfig;

/// Minimum length of `auth.secret_key` when set. The secret feeds both
/// the token HMAC and the field-encryption KDF.
pub const MIN_SECRET_LEN: usize = 32;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &KeyrackConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate host is not empty
    if config.server.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    }

    // Validate host looks like a valid IP or hostname
    if !config.server.host.trim().is_empty() {
        let addr = config.server.host.trim();
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{addr}` is not a valid IP address or hostname"),
            });
        }
    }

    // Validate log level is a known tracing level
    let level = config.server.log_level.as_str();
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ConfigError::Validation {
            message: format!(
                "server.log_level must be one of trace, debug, info, warn, error; got `{level}`"
            ),
        });
    }

    // Validate database_path is not empty
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Validate secret length when set
    if let Some(secret) = &config.auth.secret_key
        && secret.len() < MIN_SECRET_LEN
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "auth.secret_key must be at least {MIN_SECRET_LEN} characters, got {}",
                secret.len()
            ),
        });
    }

    // Validate token lifetime
    if config.auth.token_ttl_minutes < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "auth.token_ttl_minutes must be at least 1, got {}",
                config.auth.token_ttl_minutes
            ),
        });
    }

    // Validate session cookie name
    if config.auth.session_cookie.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "auth.session_cookie must not be empty".to_string(),
        });
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
    fn default_config_validates() {
        let config = KeyrackConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = KeyrackConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))));
    }

    #[test]
    fn short_secret_fails_validation() {
        let mut config = KeyrackConfig::default();
        config.auth.secret_key = Some("too-short".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("secret_key"))));
    }

    #[test]
    fn long_secret_passes_validation() {
        let mut config = KeyrackConfig::default();
        config.auth.secret_key = Some("a".repeat(MIN_SECRET_LEN));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_token_ttl_fails_validation() {
        let mut config = KeyrackConfig::default();
        config.auth.token_ttl_minutes = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("token_ttl_minutes"))));
    }

    #[test]
    fn bogus_log_level_fails_validation() {
        let mut config = KeyrackConfig::default();
        config.server.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))));
    }

    #[test]
    fn invalid_host_fails_validation() {
        let mut config = KeyrackConfig::default();
        config.server.host = "not a host!".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("server.host"))));
    }
}
