// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Keyrack configuration system.

use keyrack_config::diagnostic::{suggest_key, ConfigError};
use keyrack_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_keyrack_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
log_level = "debug"

[storage]
database_path = "/tmp/test.db"

[auth]
secret_key = "0123456789abcdef0123456789abcdef"
token_ttl_minutes = 15
session_cookie = "test_session"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert_eq!(
        config.auth.secret_key.as_deref(),
        Some("0123456789abcdef0123456789abcdef")
    );
    assert_eq!(config.auth.token_ttl_minutes, 15);
    assert_eq!(config.auth.session_cookie, "test_session");
}

/// Empty TOML yields the compiled defaults.
#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty config should use defaults");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8386);
    assert_eq!(config.storage.database_path, "keyrack.db");
    assert!(config.auth.secret_key.is_none());
    assert_eq!(config.auth.token_ttl_minutes, 30);
}

/// Unknown field in [server] section produces an error.
#[test]
fn unknown_field_in_server_produces_error() {
    let toml = r#"
[server]
prot = 9000
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    // Figment wraps serde's deny_unknown_fields error
    assert!(
        err_str.contains("unknown field") || err_str.contains("prot"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown field in [auth] is converted to a diagnostic naming the key.
#[test]
fn unknown_auth_field_is_diagnosed() {
    let toml = r#"
[auth]
secrt_key = "0123456789abcdef0123456789abcdef"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert!(!errors.is_empty());
    let rendered: String = errors.iter().map(|e| format!("{e} ")).collect();
    assert!(
        rendered.contains("secrt_key") || rendered.contains("unknown"),
        "diagnostic should name the bad key, got: {rendered}"
    );
}

/// Wrong value type produces an InvalidType diagnostic.
#[test]
fn wrong_type_produces_invalid_type_error() {
    let toml = r#"
[server]
port = "not-a-number"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject wrong type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. } | ConfigError::Other(_))),
        "expected a type error diagnostic"
    );
}

/// Semantic validation runs after deserialization.
#[test]
fn short_secret_is_rejected_by_validation() {
    let toml = r#"
[auth]
secret_key = "short"
"#;

    let errors = load_and_validate_str(toml).expect_err("short secret should fail");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("secret_key"))
    ));
}

/// Defaults pass full validation.
#[test]
fn defaults_pass_validation() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.server.port, 8386);
}

/// The suggestion helper is usable directly.
#[test]
fn suggest_key_matches_close_typos() {
    assert_eq!(
        suggest_key("databse_path", &["database_path"]),
        Some("database_path".to_string())
    );
}
