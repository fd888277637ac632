// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Keyrack credential vault.

use thiserror::Error;

/// The primary error type used across all Keyrack crates.
#[derive(Debug, Error)]
pub enum KeyrackError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid user input (blank fields, malformed URL, duplicate email).
    /// Surfaced to the caller as field-level messages.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The record does not exist, or belongs to another principal.
    /// The two cases are deliberately indistinguishable.
    #[error("record not found")]
    NotFound,

    /// Token authentication failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Cryptographic failure. Decryption failures are fatal for the
    /// containing operation: no partial or plaintext-leaking data is
    /// ever returned.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Bearer-token authentication errors.
///
/// The display strings are part of the API contract: clients match on
/// these exact messages in `{"errors": [...]}` bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Signature valid, but the token's expiry is in the past.
    #[error("Auth token has expired.")]
    Expired,

    /// Anything else: bad signature, foreign signing key, malformed
    /// structure, missing claims, empty or absent token.
    #[error("Invalid auth token.")]
    Invalid,
}

/// A single field-level validation message, e.g. "Name can't be blank".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The offending field.
    pub field: &'static str,
    /// Complete human-readable message for display.
    pub message: String,
}

/// Accumulated validation errors for one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Create an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// All messages, in the order they were recorded.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    /// Messages recorded against a specific field.
    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Consume into a `KeyrackError::Validation` if any message was
    /// recorded, otherwise `Ok(())`.
    pub fn into_result(self) -> Result<(), KeyrackError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(KeyrackError::Validation(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_accumulate_in_order() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Name can't be blank");
        errors.add("url", "URL must be valid");

        assert!(!errors.is_empty());
        assert_eq!(
            errors.messages(),
            vec!["Name can't be blank", "URL must be valid"]
        );
        assert_eq!(errors.for_field("url"), vec!["URL must be valid"]);
        assert!(errors.for_field("username").is_empty());
    }

    #[test]
    fn empty_validation_errors_into_result_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn non_empty_validation_errors_into_result_is_err() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Name can't be blank");
        let err = errors.into_result().unwrap_err();
        assert!(matches!(err, KeyrackError::Validation(_)));
        assert!(err.to_string().contains("Name can't be blank"));
    }

    #[test]
    fn auth_error_converts_into_keyrack_error() {
        let err: KeyrackError = AuthError::Expired.into();
        assert_eq!(err.to_string(), "Auth token has expired.");
    }
}
