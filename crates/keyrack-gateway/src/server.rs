// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Json, Router,
};
use keyrack_auth::{SessionStore, TokenSigner};
use keyrack_core::KeyrackError;
use keyrack_crypto::FieldCipher;
use keyrack_storage::Database;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{session_auth, token_auth};
use crate::{api, web};

/// Shared state for axum request handlers.
///
/// Everything here is read-only after startup (the session map mutates
/// internally but its handle does not), so clones are cheap and no
/// request-scoped locking is needed.
#[derive(Clone)]
pub struct GatewayState {
    /// Single-writer SQLite handle.
    pub db: Database,
    /// Field encryption keys derived from the application secret.
    pub fields: Arc<FieldCipher>,
    /// Bearer token signer/verifier.
    pub tokens: Arc<TokenSigner>,
    /// In-memory browser sessions.
    pub sessions: Arc<SessionStore>,
    /// Name of the session cookie.
    pub session_cookie: Arc<str>,
}

/// Gateway server configuration (mirrors ServerConfig from keyrack-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
}

/// GET /health
///
/// Unauthenticated liveness endpoint for process supervisors.
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Assemble the full application router.
///
/// Route groups:
/// - public: `/health`, login/signup/logout, `POST /api/v1/auth`
/// - session-protected browser routes: `/`, `/entries...`, `/account`
/// - token-protected API routes: `GET /api/v1/entries`
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(get_health))
        .with_state(state.clone());

    let api_public = Router::new()
        .route("/api/v1/auth", post(api::create_auth))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/api/v1/entries", get(api::entries_index))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            token_auth,
        ))
        .with_state(state.clone());

    let web_public = Router::new()
        .route("/login", get(web::login_form).post(web::login_submit))
        .route("/logout", post(web::logout))
        .route("/signup", get(web::signup_form).post(web::signup_submit))
        .with_state(state.clone());

    let web_routes = Router::new()
        .route("/", get(web::entries_index))
        .route(
            "/entries",
            get(web::entries_index).post(web::entries_create),
        )
        .route(
            "/entries/{id}",
            get(web::entries_show)
                .patch(web::entries_update)
                .delete(web::entries_destroy),
        )
        .route("/account", delete(web::account_destroy))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            session_auth,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_public)
        .merge(api_routes)
        .merge(web_public)
        .merge(web_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves until the process exits.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), KeyrackError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| KeyrackError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| KeyrackError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
