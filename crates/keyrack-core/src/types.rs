// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Keyrack workspace.

use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A registered account.
///
/// `password_hash` is an Argon2id PHC string (algorithm parameters and
/// per-record salt embedded); the plaintext password is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    /// Unique, case-insensitive.
    pub email: String,
    pub password_hash: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

/// One stored credential, with sensitive fields already decrypted.
///
/// At rest, `username` is deterministically encrypted (searchable by
/// equality) and `password` is encrypted with a fresh nonce per write.
/// Ownership (`user_id`) is immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub username: String,
    pub password: String,
    pub url: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp.
    pub updated_at: String,
}

/// Input fields for creating or updating an entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEntry {
    pub name: String,
    pub username: String,
    pub password: String,
    pub url: String,
}

impl NewEntry {
    /// Validate all fields, accumulating every failure.
    ///
    /// The URL check is a deliberately loose substring test for the
    /// scheme token, not a full parser: `http://...` and `https://...`
    /// pass, `ftp://...` and bare hostnames do not.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.add("name", "Name can't be blank");
        }
        if self.username.trim().is_empty() {
            errors.add("username", "Username can't be blank");
        }
        if self.password.trim().is_empty() {
            errors.add("password", "Password can't be blank");
        }
        if self.url.trim().is_empty() {
            errors.add("url", "Url can't be blank");
        } else if !(self.url.contains("http") || self.url.contains("https")) {
            errors.add("url", "URL must be valid");
        }

        match errors.is_empty() {
            true => Ok(()),
            false => Err(errors),
        }
    }
}

/// Input fields for registering an account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
}

impl NewUser {
    /// Validate registration input. Email uniqueness is enforced by the
    /// store, not here.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.email.trim().is_empty() {
            errors.add("email", "Email can't be blank");
        } else if !self.email.contains('@') {
            errors.add("email", "Email is invalid");
        }
        if self.password.trim().is_empty() {
            errors.add("password", "Password can't be blank");
        } else if self.password.len() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Password is too short (minimum is {MIN_PASSWORD_LEN} characters)"),
            );
        }

        match errors.is_empty() {
            true => Ok(()),
            false => Err(errors),
        }
    }
}

/// The authenticated identity a request is acting as.
///
/// Resolved by the session or token middleware and threaded explicitly
/// through every store call; no handler accepts a caller-supplied user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_entry() -> NewEntry {
        NewEntry {
            name: "Gmail".to_string(),
            username: "u1".to_string(),
            password: "p1".to_string(),
            url: "https://gmail.com".to_string(),
        }
    }

    #[test]
    fn valid_entry_passes() {
        assert!(valid_entry().validate().is_ok());
    }

    #[test]
    fn blank_fields_are_rejected_with_messages() {
        let entry = NewEntry::default();
        let errors = entry.validate().unwrap_err();
        assert_eq!(
            errors.messages(),
            vec![
                "Name can't be blank",
                "Username can't be blank",
                "Password can't be blank",
                "Url can't be blank",
            ]
        );
    }

    #[test]
    fn http_and_https_urls_are_valid() {
        for url in ["http://example.com", "https://example.com"] {
            let mut entry = valid_entry();
            entry.url = url.to_string();
            assert!(entry.validate().is_ok(), "{url} should be valid");
        }
    }

    #[test]
    fn url_without_scheme_token_is_rejected() {
        for url in ["example.com", "ftp://example.com"] {
            let mut entry = valid_entry();
            entry.url = url.to_string();
            let errors = entry.validate().unwrap_err();
            assert_eq!(errors.for_field("url"), vec!["URL must be valid"]);
        }
    }

    #[test]
    fn whitespace_only_name_counts_as_blank() {
        let mut entry = valid_entry();
        entry.name = "   ".to_string();
        let errors = entry.validate().unwrap_err();
        assert_eq!(errors.for_field("name"), vec!["Name can't be blank"]);
    }

    #[test]
    fn new_user_requires_email_shape_and_password_length() {
        let user = NewUser {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = user.validate().unwrap_err();
        assert_eq!(errors.for_field("email"), vec!["Email is invalid"]);
        assert_eq!(
            errors.for_field("password"),
            vec!["Password is too short (minimum is 6 characters)"]
        );
    }

    #[test]
    fn valid_new_user_passes() {
        let user = NewUser {
            email: "a@x.com".to_string(),
            password: "secret123".to_string(),
        };
        assert!(user.validate().is_ok());
    }
}
