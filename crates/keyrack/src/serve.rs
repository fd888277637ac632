// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keyrack serve` command implementation.
//!
//! Wires configuration into the storage, crypto, auth, and gateway
//! layers, then serves until the process exits. The application secret
//! is loaded exactly once here and handed to the subsystems as derived
//! key material; it is never logged.

use std::sync::Arc;

use keyrack_auth::{SessionStore, TokenSigner};
use keyrack_config::KeyrackConfig;
use keyrack_core::KeyrackError;
use keyrack_crypto::FieldCipher;
use keyrack_gateway::{start_server, GatewayState, ServerConfig};
use keyrack_storage::Database;
use tracing::info;

/// Run the server with a validated configuration.
pub async fn run(config: KeyrackConfig) -> Result<(), KeyrackError> {
    init_tracing(&config.server.log_level);

    let Some(secret) = config.auth.secret() else {
        return Err(KeyrackError::Config(
            "auth.secret_key is required to serve (set it in keyrack.toml \
             or via KEYRACK_AUTH_SECRET_KEY)"
                .to_string(),
        ));
    };

    let db = Database::open(&config.storage.database_path).await?;
    info!(path = %config.storage.database_path, "storage ready");

    let state = GatewayState {
        db: db.clone(),
        fields: Arc::new(FieldCipher::from_secret(&secret)?),
        tokens: Arc::new(TokenSigner::new(&secret, config.auth.token_ttl_minutes)),
        sessions: Arc::new(SessionStore::new()),
        session_cookie: Arc::from(config.auth.session_cookie.as_str()),
    };

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    let result = start_server(&server_config, state).await;

    // Best-effort checkpoint on the way down.
    if let Err(e) = db.close().await {
        tracing::warn!("storage close failed: {e}");
    }

    result
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("keyrack={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
