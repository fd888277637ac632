// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory browser sessions.
//!
//! Session ids are 256 random bits, hex encoded, mapped to user ids in a
//! DashMap. Memory-backed: a process restart invalidates every session.

use dashmap::DashMap;
use keyrack_core::KeyrackError;
use ring::rand::{SecureRandom, SystemRandom};
use tracing::debug;

/// Server-side session registry for the browser UI.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for a user and return its id.
    pub fn create(&self, user_id: &str) -> Result<String, KeyrackError> {
        let rng = SystemRandom::new();
        let mut bytes = [0u8; 32];
        rng.fill(&mut bytes)
            .map_err(|_| KeyrackError::Internal("failed to generate session id".to_string()))?;

        let session_id = hex::encode(bytes);
        self.sessions.insert(session_id.clone(), user_id.to_string());
        debug!(user_id = %user_id, "session created");
        Ok(session_id)
    }

    /// Resolve a session id to its user id, if the session is live.
    pub fn resolve(&self, session_id: &str) -> Option<String> {
        self.sessions.get(session_id).map(|entry| entry.clone())
    }

    /// Destroy a single session (logout).
    pub fn destroy(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    /// Destroy every session belonging to a user (account deletion).
    pub fn destroy_for_user(&self, user_id: &str) {
        self.sessions.retain(|_, uid| uid != user_id);
    }
}
