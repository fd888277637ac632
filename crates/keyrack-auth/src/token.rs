// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stateless signed bearer tokens.
//!
//! Tokens use the compact JWS form `header.payload.signature`: base64url
//! (unpadded) segments, HMAC-SHA256 over the first two, keyed by the
//! application secret. Decoding verifies the signature before looking at
//! any claim, so `Expired` is only ever reported for tokens we actually
//! issued; everything else collapses into `Invalid`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use keyrack_core::AuthError;
use keyrack_core::KeyrackError;
use ring::hmac;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};

/// Default token lifetime in minutes.
pub const DEFAULT_TTL_MINUTES: i64 = 30;

/// Fixed JOSE header. Any other `alg` on an inbound token is rejected.
const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// The verified claim set of a decoded token.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// The `sub` claim, if present and a string.
    pub fn subject(&self) -> Option<&str> {
        self.0.get("sub").and_then(Value::as_str)
    }

    /// The `exp` claim as integer seconds since the epoch.
    pub fn expiry(&self) -> Option<i64> {
        self.0.get("exp").and_then(Value::as_i64)
    }

    /// Access an arbitrary claim.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Issues and validates signed tokens with the process-wide secret.
///
/// The key is loaded once at startup and is read-only thereafter; Debug
/// output omits it.
pub struct TokenSigner {
    key: hmac::Key,
    ttl_minutes: i64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("key", &"[REDACTED]")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

impl TokenSigner {
    /// Create a signer from the application secret.
    pub fn new(secret: &SecretString, ttl_minutes: i64) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret.expose_secret().as_bytes()),
            ttl_minutes,
        }
    }

    /// Sign a claim set, injecting `exp = now + ttl`.
    ///
    /// Any `exp` already present in `claims` is overwritten.
    pub fn encode(&self, claims: Map<String, Value>) -> Result<String, KeyrackError> {
        let exp = chrono::Utc::now().timestamp() + self.ttl_minutes * 60;
        self.encode_with_expiry(claims, exp)
    }

    /// Sign a claim set with an explicit expiry timestamp (integer
    /// seconds since the epoch).
    pub fn encode_with_expiry(
        &self,
        mut claims: Map<String, Value>,
        exp: i64,
    ) -> Result<String, KeyrackError> {
        claims.insert("exp".to_string(), Value::from(exp));

        let payload = serde_json::to_vec(&claims)
            .map_err(|e| KeyrackError::Internal(format!("claims serialization failed: {e}")))?;

        let header_b64 = URL_SAFE_NO_PAD.encode(HEADER.as_bytes());
        let payload_b64 = URL_SAFE_NO_PAD.encode(&payload);
        let signing_input = format!("{header_b64}.{payload_b64}");

        let tag = hmac::sign(&self.key, signing_input.as_bytes());
        let signature_b64 = URL_SAFE_NO_PAD.encode(tag.as_ref());

        Ok(format!("{signing_input}.{signature_b64}"))
    }

    /// Verify a token and return its claims.
    ///
    /// - `Expired`: the signature is valid but `now >= exp`.
    /// - `Invalid`: everything else -- bad signature, foreign key,
    ///   malformed structure, unexpected `alg`, missing or non-integer
    ///   `exp`, empty string.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let mut segments = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(AuthError::Invalid);
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthError::Invalid)?;

        // Constant-time signature check before touching any claim.
        let signing_input = format!("{header_b64}.{payload_b64}");
        hmac::verify(&self.key, signing_input.as_bytes(), &signature)
            .map_err(|_| AuthError::Invalid)?;

        let header_bytes = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| AuthError::Invalid)?;
        let header: Value =
            serde_json::from_slice(&header_bytes).map_err(|_| AuthError::Invalid)?;
        if header.get("alg").and_then(Value::as_str) != Some("HS256") {
            return Err(AuthError::Invalid);
        }

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthError::Invalid)?;
        let claims: Map<String, Value> =
            serde_json::from_slice(&payload_bytes).map_err(|_| AuthError::Invalid)?;

        let exp = claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or(AuthError::Invalid)?;
        if chrono::Utc::now().timestamp() >= exp {
            return Err(AuthError::Expired);
        }

        Ok(Claims(claims))
    }
}
