// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! [`seal`] takes an explicit 96-bit nonce so callers choose the nonce
//! policy: the randomized field policy generates a fresh random nonce per
//! write, the deterministic policy derives the nonce from the plaintext.
//! A nonce must never repeat under the same key with different plaintexts.

use keyrack_core::KeyrackError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};

/// Encrypt plaintext with AES-256-GCM under the given key and nonce.
///
/// Returns the ciphertext with the 16-byte authentication tag appended.
pub fn seal(
    key: &[u8; 32],
    nonce_bytes: &[u8; 12],
    plaintext: &[u8],
) -> Result<Vec<u8>, KeyrackError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| KeyrackError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let nonce = Nonce::assume_unique_for_key(*nonce_bytes);

    // Seal in place: plaintext buffer is extended with the authentication tag.
    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| KeyrackError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    Ok(in_out)
}

/// Decrypt ciphertext with AES-256-GCM.
///
/// `ciphertext` must include the 16-byte authentication tag appended by
/// [`seal`]. Returns an error if the key is wrong or the data is tampered.
pub fn open(
    key: &[u8; 32],
    nonce_bytes: &[u8; 12],
    ciphertext: &[u8],
) -> Result<Vec<u8>, KeyrackError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| KeyrackError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let nonce = Nonce::assume_unique_for_key(*nonce_bytes);

    let mut in_out = ciphertext.to_vec();
    let plaintext = less_safe
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| {
            KeyrackError::Crypto(
                "AES-256-GCM decryption failed -- wrong key or corrupted data".to_string(),
            )
        })?;

    Ok(plaintext.to_vec())
}

/// Generate a random 96-bit nonce from the system CSPRNG.
pub fn random_nonce() -> Result<[u8; 12], KeyrackError> {
    let rng = SystemRandom::new();
    let mut nonce = [0u8; 12];
    rng.fill(&mut nonce)
        .map_err(|_| KeyrackError::Crypto("failed to generate random nonce".to_string()))?;
    Ok(nonce)
}
