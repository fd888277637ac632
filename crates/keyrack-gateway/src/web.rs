// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Browser-facing handlers (session-authenticated).
//!
//! Success paths redirect (303); validation failures re-render the same
//! form with field messages (422); cross-user and missing entries are
//! both 404. The principal always comes from the session middleware --
//! never from the request.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use keyrack_core::{KeyrackError, NewEntry, NewUser, Principal};
use keyrack_storage::queries::{entries, users};
use serde::Deserialize;
use tracing::error;

use crate::render;
use crate::server::GatewayState;

/// Query string for the entries index search box.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub name: Option<String>,
}

/// Form body for login.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

const LOGIN_FAILED: &str = "Invalid Email or Password";

/// GET / and GET /entries
pub async fn entries_index(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<SearchParams>,
) -> Response {
    let filter = params.name.as_deref();
    match entries::list_entries(&state.db, &state.fields, &principal.user_id, filter).await {
        Ok(list) => render::entries_page(&list, filter).into_response(),
        Err(err) => failure(err),
    }
}

/// GET /entries/{id}
pub async fn entries_show(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Response {
    match entries::get_entry(&state.db, &state.fields, &principal.user_id, &id).await {
        Ok(entry) => render::entry_page(&entry).into_response(),
        Err(err) => failure(err),
    }
}

/// POST /entries
pub async fn entries_create(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Form(form): Form<NewEntry>,
) -> Response {
    match entries::create_entry(&state.db, &state.fields, &principal.user_id, &form).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(KeyrackError::Validation(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            render::entry_form_page("New entry", "/entries", &form, Some(&errors)),
        )
            .into_response(),
        Err(err) => failure(err),
    }
}

/// PATCH /entries/{id}
pub async fn entries_update(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Form(form): Form<NewEntry>,
) -> Response {
    match entries::update_entry(&state.db, &state.fields, &principal.user_id, &id, &form).await {
        Ok(entry) => Redirect::to(&format!("/entries/{}", entry.id)).into_response(),
        Err(KeyrackError::Validation(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            render::entry_form_page(
                "Edit entry",
                &format!("/entries/{id}"),
                &form,
                Some(&errors),
            ),
        )
            .into_response(),
        Err(err) => failure(err),
    }
}

/// DELETE /entries/{id}
pub async fn entries_destroy(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Response {
    match entries::delete_entry(&state.db, &principal.user_id, &id).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(err) => failure(err),
    }
}

/// GET /login
pub async fn login_form() -> Response {
    render::login_page(None).into_response()
}

/// POST /login
///
/// Unknown email and wrong password take the same path to the same
/// generic message.
pub async fn login_submit(
    State(state): State<GatewayState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    match users::authenticate(&state.db, &form.email, &form.password).await {
        Ok(Some(user)) => match state.sessions.create(&user.id) {
            Ok(session_id) => {
                let jar = jar.add(session_cookie(&state, session_id));
                (jar, Redirect::to("/")).into_response()
            }
            Err(err) => failure(err),
        },
        Ok(None) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            render::login_page(Some(LOGIN_FAILED)),
        )
            .into_response(),
        Err(err) => failure(err),
    }
}

/// POST /logout
pub async fn logout(State(state): State<GatewayState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(state.session_cookie.as_ref()) {
        state.sessions.destroy(cookie.value());
    }
    let jar = jar.remove(removal_cookie(&state));
    (jar, Redirect::to("/login")).into_response()
}

/// GET /signup
pub async fn signup_form() -> Response {
    render::signup_page("", None).into_response()
}

/// POST /signup
///
/// Creates the account and logs it straight in.
pub async fn signup_submit(
    State(state): State<GatewayState>,
    jar: CookieJar,
    Form(form): Form<NewUser>,
) -> Response {
    match users::create_user(&state.db, &form).await {
        Ok(user) => match state.sessions.create(&user.id) {
            Ok(session_id) => {
                let jar = jar.add(session_cookie(&state, session_id));
                (jar, Redirect::to("/")).into_response()
            }
            Err(err) => failure(err),
        },
        Err(KeyrackError::Validation(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            render::signup_page(&form.email, Some(&errors)),
        )
            .into_response(),
        Err(err) => failure(err),
    }
}

/// DELETE /account
///
/// Destroys the account and, by cascade, every entry it owns.
pub async fn account_destroy(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    jar: CookieJar,
) -> Response {
    match users::delete_user(&state.db, &principal.user_id).await {
        Ok(()) => {
            state.sessions.destroy_for_user(&principal.user_id);
            let jar = jar.remove(removal_cookie(&state));
            (jar, Redirect::to("/login")).into_response()
        }
        Err(err) => failure(err),
    }
}

/// Build the session cookie for a fresh login.
fn session_cookie(state: &GatewayState, session_id: String) -> Cookie<'static> {
    Cookie::build((state.session_cookie.to_string(), session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// A cookie matching the session cookie's name and path, for removal.
fn removal_cookie(state: &GatewayState) -> Cookie<'static> {
    Cookie::build((state.session_cookie.to_string(), ""))
        .path("/")
        .build()
}

/// Map store errors to browser responses. Validation is handled
/// per-handler; everything else lands here.
fn failure(err: KeyrackError) -> Response {
    match err {
        KeyrackError::NotFound => {
            (StatusCode::NOT_FOUND, render::not_found_page()).into_response()
        }
        other => {
            error!("request failed: {other}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                render::error_page(),
            )
                .into_response()
        }
    }
}
