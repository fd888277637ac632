// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication middleware for the gateway.
//!
//! Two middlewares, one per surface:
//! - [`session_auth`] guards browser routes: a valid session cookie
//!   resolves to a principal, anything else redirects to /login.
//! - [`token_auth`] guards API routes: the credential is the LAST
//!   whitespace-separated token of the Authorization header value (a
//!   missing "Bearer " prefix is tolerated by design), verified
//!   statelessly on every request. Failures are 401 with
//!   `{"errors": [<message>]}` and the fixed message for the failure
//!   class.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use keyrack_core::{AuthError, Principal};
use keyrack_storage::queries::users;
use serde_json::json;

use crate::server::GatewayState;

/// Middleware guarding browser routes with the session cookie.
///
/// On success the resolved [`Principal`] is inserted into request
/// extensions; on failure the browser is redirected to the login page
/// (HTTP redirect semantics, never a JSON error).
pub async fn session_auth(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let principal = jar
        .get(state.session_cookie.as_ref())
        .and_then(|cookie| state.sessions.resolve(cookie.value()))
        .map(|user_id| Principal { user_id });

    match principal {
        Some(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        None => Redirect::to("/login").into_response(),
    }
}

/// Middleware guarding API routes with a signed bearer token.
///
/// The resolved subject must name an existing user: a validly-signed
/// token for a deleted account is treated as an invalid credential, not
/// a server error.
pub async fn token_auth(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Response {
    let raw_token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split_whitespace().last());

    let claims = match raw_token {
        Some(token) => state.tokens.decode(token),
        None => Err(AuthError::Invalid),
    };

    let claims = match claims {
        Ok(claims) => claims,
        Err(err) => return unauthorized(err),
    };

    let Some(subject) = claims.subject() else {
        return unauthorized(AuthError::Invalid);
    };

    match users::find_by_id(&state.db, subject).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(Principal { user_id: user.id });
            next.run(request).await
        }
        Ok(None) => unauthorized(AuthError::Invalid),
        Err(err) => {
            tracing::error!("token principal lookup failed: {err}");
            internal_error()
        }
    }
}

/// 401 response in the API error shape, with the fixed per-class message.
pub(crate) fn unauthorized(err: AuthError) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "errors": [err.to_string()] })),
    )
        .into_response()
}

/// 500 response in the API error shape. Details stay in the log.
pub(crate) fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "errors": ["Internal server error"] })),
    )
        .into_response()
}
