// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared harness for gateway integration tests: an isolated temp
//! database, real crypto, and the full production router driven via
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)] // not every test file uses every helper

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use keyrack_auth::{SessionStore, TokenSigner};
use keyrack_core::types::{NewEntry, NewUser, User};
use keyrack_crypto::FieldCipher;
use keyrack_gateway::{build_router, GatewayState};
use keyrack_storage::queries::{entries, users};
use keyrack_storage::Database;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789ab";
pub const SESSION_COOKIE: &str = "keyrack_session";

pub struct TestApp {
    pub state: GatewayState,
    pub router: Router,
    _dir: tempfile::TempDir,
}

pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("gateway.db");
    let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

    let secret = SecretString::from(TEST_SECRET.to_string());
    let state = GatewayState {
        db,
        fields: Arc::new(FieldCipher::from_secret(&secret).unwrap()),
        tokens: Arc::new(TokenSigner::new(&secret, 30)),
        sessions: Arc::new(SessionStore::new()),
        session_cookie: Arc::from(SESSION_COOKIE),
    };

    TestApp {
        router: build_router(state.clone()),
        state,
        _dir: dir,
    }
}

impl TestApp {
    /// Drive one request through a fresh clone of the router.
    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Register a user directly through the store.
    pub async fn register_user(&self, email: &str, password: &str) -> User {
        users::create_user(
            &self.state.db,
            &NewUser {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await
        .unwrap()
    }

    /// Seed an entry directly through the store.
    pub async fn seed_entry(&self, user_id: &str, name: &str) -> keyrack_core::Entry {
        entries::create_entry(
            &self.state.db,
            &self.state.fields,
            user_id,
            &NewEntry {
                name: name.to_string(),
                username: format!("{name}-user"),
                password: format!("{name}-pass"),
                url: "https://example.com".to_string(),
            },
        )
        .await
        .unwrap()
    }

    /// A freshly issued token for a user id.
    pub fn token_for(&self, user_id: &str) -> String {
        let mut claims = serde_json::Map::new();
        claims.insert("sub".to_string(), Value::from(user_id));
        self.state.tokens.encode(claims).unwrap()
    }

    /// A token for a user id with an explicit expiry timestamp.
    pub fn token_with_expiry(&self, user_id: &str, exp: i64) -> String {
        let mut claims = serde_json::Map::new();
        claims.insert("sub".to_string(), Value::from(user_id));
        self.state.tokens.encode_with_expiry(claims, exp).unwrap()
    }
}

/// GET request with an optional Authorization header value.
pub fn api_get(path: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

/// POST request with a JSON body.
pub fn api_post_json(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Request with an urlencoded form body and optional session cookie.
pub fn form_request(
    method: &str,
    path: &str,
    body: &str,
    session: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(sid) = session {
        builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE}={sid}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// GET request with an optional session cookie.
pub fn page_get(path: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(sid) = session {
        builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE}={sid}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Extract the session id from a login/signup response's Set-Cookie.
pub fn session_from(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response should set the session cookie")
        .to_str()
        .unwrap();
    let pair = set_cookie.split(';').next().unwrap();
    let (name, value) = pair.split_once('=').unwrap();
    assert_eq!(name, SESSION_COOKIE);
    value.to_string()
}

/// Assert a response redirects to the given location.
pub fn assert_redirect(response: &Response<Body>, location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        location,
        "unexpected redirect target"
    );
}
