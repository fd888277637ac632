// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cryptography for the Keyrack credential vault.
//!
//! Two concerns live here:
//! - Field encryption: AES-256-GCM over entry fields at rest, with a
//!   deterministic policy (searchable by ciphertext equality) and a
//!   randomized policy (fresh nonce per write). Subkeys are derived from
//!   the single application secret via HKDF-SHA256.
//! - Password hashing: Argon2id PHC strings with per-record salts for
//!   account credentials.

pub mod fields;
pub mod password;
pub mod seal;

pub use fields::{EncryptedField, FieldCipher, FieldPolicy};
pub use password::{hash_password, verify_password};
