// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id password hashing for account credentials.
//!
//! Hashes are stored as PHC strings, so the algorithm parameters and the
//! per-record salt travel with the hash and verification needs no extra
//! state.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use keyrack_core::KeyrackError;

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, KeyrackError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| KeyrackError::Crypto(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch; an error only for a malformed stored
/// hash, which indicates data corruption rather than a bad credential.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, KeyrackError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| KeyrackError::Crypto(format!("malformed stored password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
