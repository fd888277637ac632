// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entry field encryption with deterministic and randomized policies.
//!
//! A single application-wide secret is expanded via HKDF-SHA256 into
//! three independent subkeys: one AES key per policy, plus an HMAC key
//! used to derive deterministic nonces. Under the deterministic policy
//! the nonce is HMAC-SHA256(nonce_key, plaintext) truncated to 96 bits,
//! so ciphertext is a pure function of (secret, plaintext) and equality
//! lookups work directly on stored ciphertext. Under the randomized
//! policy every write gets a fresh CSPRNG nonce, so repeated plaintexts
//! are unlinkable in storage.

use keyrack_core::KeyrackError;
use ring::{hkdf, hmac};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use crate::seal;

/// Which encryption policy a field uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Ciphertext is a pure function of the plaintext. Searchable.
    Deterministic,
    /// Fresh nonce per write. Maximal confidentiality, not searchable.
    Randomized,
}

/// An encrypted field as stored: ciphertext (with GCM tag) plus nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedField {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; 12],
}

/// Field encryptor/decryptor holding the derived subkeys in memory.
///
/// Debug output intentionally omits all key material.
pub struct FieldCipher {
    deterministic_key: Zeroizing<[u8; 32]>,
    randomized_key: Zeroizing<[u8; 32]>,
    nonce_mac_key: hmac::Key,
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher")
            .field("deterministic_key", &"[REDACTED]")
            .field("randomized_key", &"[REDACTED]")
            .field("nonce_mac_key", &"[REDACTED]")
            .finish()
    }
}

/// Domain-separation salt for HKDF extraction. Versioned so a future
/// scheme change can re-derive without colliding with existing keys.
const HKDF_SALT: &[u8] = b"keyrack-field-encryption-v1";

impl FieldCipher {
    /// Derive the field subkeys from the application secret.
    pub fn from_secret(secret: &SecretString) -> Result<Self, KeyrackError> {
        let salt = hkdf::Salt::new(hkdf::HKDF_SHA256, HKDF_SALT);
        let prk = salt.extract(secret.expose_secret().as_bytes());

        let deterministic_key = expand_key(&prk, b"field-deterministic")?;
        let randomized_key = expand_key(&prk, b"field-randomized")?;
        let mac_key_bytes = expand_key(&prk, b"field-nonce-mac")?;
        let nonce_mac_key = hmac::Key::new(hmac::HMAC_SHA256, mac_key_bytes.as_ref());

        Ok(Self {
            deterministic_key,
            randomized_key,
            nonce_mac_key,
        })
    }

    /// Encrypt a field value under the given policy.
    pub fn encrypt(
        &self,
        policy: FieldPolicy,
        plaintext: &str,
    ) -> Result<EncryptedField, KeyrackError> {
        let (key, nonce) = match policy {
            FieldPolicy::Deterministic => (
                &self.deterministic_key,
                self.deterministic_nonce(plaintext.as_bytes()),
            ),
            FieldPolicy::Randomized => (&self.randomized_key, seal::random_nonce()?),
        };

        let ciphertext = seal::seal(key, &nonce, plaintext.as_bytes())?;
        Ok(EncryptedField { ciphertext, nonce })
    }

    /// Decrypt a stored field value.
    ///
    /// Any failure here (wrong key, tampered ciphertext, corrupted nonce)
    /// is fatal for the containing read: the caller must abort rather
    /// than materialize partial data.
    pub fn decrypt(
        &self,
        policy: FieldPolicy,
        field: &EncryptedField,
    ) -> Result<String, KeyrackError> {
        let key = match policy {
            FieldPolicy::Deterministic => &self.deterministic_key,
            FieldPolicy::Randomized => &self.randomized_key,
        };

        let plaintext = seal::open(key, &field.nonce, &field.ciphertext)?;
        String::from_utf8(plaintext)
            .map_err(|e| KeyrackError::Crypto(format!("decrypted value is not valid UTF-8: {e}")))
    }

    /// Nonce for the deterministic policy: keyed MAC of the plaintext,
    /// truncated to the GCM nonce size.
    fn deterministic_nonce(&self, plaintext: &[u8]) -> [u8; 12] {
        let tag = hmac::sign(&self.nonce_mac_key, plaintext);
        let mut nonce = [0u8; 12];
        nonce.copy_from_slice(&tag.as_ref()[..12]);
        nonce
    }
}

/// Expand one labeled 32-byte subkey from the HKDF pseudorandom key.
fn expand_key(prk: &hkdf::Prk, label: &[u8]) -> Result<Zeroizing<[u8; 32]>, KeyrackError> {
    let info = [label];
    let okm = prk
        .expand(&info, hkdf::HKDF_SHA256)
        .map_err(|_| KeyrackError::Crypto("HKDF expand failed".to_string()))?;

    let mut out = Zeroizing::new([0u8; 32]);
    okm.fill(out.as_mut())
        .map_err(|_| KeyrackError::Crypto("HKDF fill failed".to_string()))?;
    Ok(out)
}
