// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON API handlers under /api/v1.
//!
//! All error bodies use the shape `{"errors": [string, ...]}`. Every
//! authentication failure -- unknown email, wrong password, missing
//! fields -- produces the same generic message so nothing about account
//! existence leaks.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use keyrack_core::{Entry, KeyrackError, Principal};
use keyrack_storage::queries::{entries, users};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::auth::internal_error;
use crate::server::GatewayState;

/// Request body for POST /api/v1/auth.
///
/// Fields are optional so that a missing field authenticates (and fails)
/// like a wrong one, instead of surfacing a parse error.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Response body for POST /api/v1/auth.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Signed bearer token for subsequent API requests.
    pub token: String,
}

/// One entry in the GET /api/v1/entries response, decrypted.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: String,
    pub name: String,
    pub username: String,
    pub password: String,
    pub url: String,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            username: entry.username,
            password: entry.password,
            url: entry.url,
        }
    }
}

/// POST /api/v1/auth
///
/// Exchanges an email/password pair for a signed bearer token.
pub async fn create_auth(
    State(state): State<GatewayState>,
    Json(body): Json<AuthRequest>,
) -> Response {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return invalid_credentials();
    };

    match users::authenticate(&state.db, &email, &password).await {
        Ok(Some(user)) => {
            let mut claims = Map::new();
            claims.insert("sub".to_string(), Value::from(user.id));
            match state.tokens.encode(claims) {
                Ok(token) => (StatusCode::OK, Json(AuthResponse { token })).into_response(),
                Err(err) => {
                    tracing::error!("token issuance failed: {err}");
                    internal_error()
                }
            }
        }
        Ok(None) => invalid_credentials(),
        Err(err) => {
            tracing::error!("authentication lookup failed: {err}");
            internal_error()
        }
    }
}

/// GET /api/v1/entries
///
/// Returns the authenticated principal's entries, decrypted and ordered
/// by name ascending.
pub async fn entries_index(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
) -> Response {
    match entries::list_entries(&state.db, &state.fields, &principal.user_id, None).await {
        Ok(list) => {
            let body: Vec<EntryResponse> = list.into_iter().map(EntryResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(KeyrackError::Crypto(err)) => {
            // Fatal by contract: no partial data leaves the server.
            tracing::error!("entry decryption failed: {err}");
            internal_error()
        }
        Err(err) => {
            tracing::error!("entry listing failed: {err}");
            internal_error()
        }
    }
}

/// The one generic 401 for every credential failure on /api/v1/auth.
fn invalid_credentials() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "errors": ["Invalid Email or Password"] })),
    )
        .into_response()
}
