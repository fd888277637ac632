// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the session-authenticated browser surface.

mod common;

use axum::http::StatusCode;
use common::*;

// ---- Session gate ----

#[tokio::test]
async fn protected_pages_redirect_anonymous_browsers_to_login() {
    let app = spawn_app().await;

    for path in ["/", "/entries", "/entries/some-id", "/entries?name=x"] {
        let response = app.request(page_get(path, None)).await;
        assert_redirect(&response, "/login");
    }
}

#[tokio::test]
async fn stale_session_cookie_redirects_to_login() {
    let app = spawn_app().await;
    let response = app
        .request(page_get("/", Some("not-a-live-session-id")))
        .await;
    assert_redirect(&response, "/login");
}

// ---- Login / logout ----

#[tokio::test]
async fn login_establishes_a_session_and_redirects_home() {
    let app = spawn_app().await;
    app.register_user("web@example.com", "password123").await;

    let response = app
        .request(form_request(
            "POST",
            "/login",
            "email=web@example.com&password=password123",
            None,
        ))
        .await;
    assert_redirect(&response, "/");
    let session = session_from(&response);

    // The session now opens the entries page.
    let home = app.request(page_get("/", Some(&session))).await;
    assert_eq!(home.status(), StatusCode::OK);
    let html = body_string(home).await;
    assert!(html.contains("Keyrack"));
}

#[tokio::test]
async fn login_failures_share_one_generic_message() {
    let app = spawn_app().await;
    app.register_user("web@example.com", "password123").await;

    let cases = [
        "email=web@example.com&password=wrongpassword",
        "email=nobody@example.com&password=password123",
    ];

    for body in cases {
        let response = app.request(form_request("POST", "/login", body, None)).await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "case: {body}"
        );
        let html = body_string(response).await;
        assert!(html.contains("Invalid Email or Password"));
    }
}

#[tokio::test]
async fn logout_destroys_the_session() {
    let app = spawn_app().await;
    app.register_user("web@example.com", "password123").await;

    let login = app
        .request(form_request(
            "POST",
            "/login",
            "email=web@example.com&password=password123",
            None,
        ))
        .await;
    let session = session_from(&login);

    let logout = app
        .request(form_request("POST", "/logout", "", Some(&session)))
        .await;
    assert_redirect(&logout, "/login");

    // The old session no longer authenticates.
    let after = app.request(page_get("/", Some(&session))).await;
    assert_redirect(&after, "/login");
}

// ---- Signup ----

#[tokio::test]
async fn signup_creates_the_account_and_logs_in() {
    let app = spawn_app().await;

    let response = app
        .request(form_request(
            "POST",
            "/signup",
            "email=new@example.com&password=password123",
            None,
        ))
        .await;
    assert_redirect(&response, "/");
    let session = session_from(&response);

    let home = app.request(page_get("/", Some(&session))).await;
    assert_eq!(home.status(), StatusCode::OK);

    // And the credentials round-trip through login.
    let login = app
        .request(form_request(
            "POST",
            "/login",
            "email=new@example.com&password=password123",
            None,
        ))
        .await;
    assert_redirect(&login, "/");
}

#[tokio::test]
async fn signup_validation_failure_rerenders_with_messages() {
    let app = spawn_app().await;

    let response = app
        .request(form_request(
            "POST",
            "/signup",
            "email=new@example.com&password=short",
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_string(response).await;
    assert!(html.contains("Password is too short (minimum is 6 characters)"));
    // The submitted email is preserved in the re-rendered form.
    assert!(html.contains("new@example.com"));
}

#[tokio::test]
async fn duplicate_signup_is_rejected_with_a_message() {
    let app = spawn_app().await;
    app.register_user("taken@example.com", "password123").await;

    let response = app
        .request(form_request(
            "POST",
            "/signup",
            "email=taken@example.com&password=password123",
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_string(response).await;
    assert!(html.contains("Email has already been taken"));
}

// ---- Entries CRUD ----

async fn logged_in_session(app: &TestApp, email: &str) -> String {
    app.register_user(email, "password123").await;
    let login = app
        .request(form_request(
            "POST",
            "/login",
            &format!("email={email}&password=password123"),
            None,
        ))
        .await;
    session_from(&login)
}

#[tokio::test]
async fn create_entry_redirects_and_persists() {
    let app = spawn_app().await;
    let session = logged_in_session(&app, "crud@example.com").await;

    let response = app
        .request(form_request(
            "POST",
            "/entries",
            "name=Gmail&username=u1&password=p1&url=https://gmail.com",
            Some(&session),
        ))
        .await;
    assert_redirect(&response, "/");

    let home = app.request(page_get("/", Some(&session))).await;
    let html = body_string(home).await;
    assert!(html.contains("Gmail"));
    assert!(html.contains("u1"));
}

#[tokio::test]
async fn create_entry_validation_failure_returns_422_with_messages() {
    let app = spawn_app().await;
    let session = logged_in_session(&app, "crud@example.com").await;

    let response = app
        .request(form_request(
            "POST",
            "/entries",
            "name=&username=u1&password=p1&url=example.com",
            Some(&session),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_string(response).await;
    assert!(html.contains("Name can&#39;t be blank"));
    assert!(html.contains("URL must be valid"));
}

#[tokio::test]
async fn show_displays_decrypted_fields() {
    let app = spawn_app().await;
    let session = logged_in_session(&app, "crud@example.com").await;
    let user = keyrack_storage::queries::users::find_by_email(&app.state.db, "crud@example.com")
        .await
        .unwrap()
        .unwrap();
    let entry = app.seed_entry(&user.id, "Gmail").await;

    let response = app
        .request(page_get(&format!("/entries/{}", entry.id), Some(&session)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Gmail"));
    assert!(html.contains("Gmail-user"));
    assert!(html.contains("Gmail-pass"));
}

#[tokio::test]
async fn update_entry_redirects_and_applies_changes() {
    let app = spawn_app().await;
    let session = logged_in_session(&app, "crud@example.com").await;
    let user = keyrack_storage::queries::users::find_by_email(&app.state.db, "crud@example.com")
        .await
        .unwrap()
        .unwrap();
    let entry = app.seed_entry(&user.id, "Old Name").await;

    let response = app
        .request(form_request(
            "PATCH",
            &format!("/entries/{}", entry.id),
            "name=New Name&username=nu&password=np&url=https://new.example.com",
            Some(&session),
        ))
        .await;
    assert_redirect(&response, &format!("/entries/{}", entry.id));

    let show = app
        .request(page_get(&format!("/entries/{}", entry.id), Some(&session)))
        .await;
    let html = body_string(show).await;
    assert!(html.contains("New Name"));
    assert!(html.contains("nu"));
}

#[tokio::test]
async fn delete_entry_redirects_and_removes_it() {
    let app = spawn_app().await;
    let session = logged_in_session(&app, "crud@example.com").await;
    let user = keyrack_storage::queries::users::find_by_email(&app.state.db, "crud@example.com")
        .await
        .unwrap()
        .unwrap();
    let entry = app.seed_entry(&user.id, "Doomed").await;

    let response = app
        .request(form_request(
            "DELETE",
            &format!("/entries/{}", entry.id),
            "",
            Some(&session),
        ))
        .await;
    assert_redirect(&response, "/");

    let show = app
        .request(page_get(&format!("/entries/{}", entry.id), Some(&session)))
        .await;
    assert_eq!(show.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_filters_the_index_and_blank_shows_all() {
    let app = spawn_app().await;
    let session = logged_in_session(&app, "crud@example.com").await;
    let user = keyrack_storage::queries::users::find_by_email(&app.state.db, "crud@example.com")
        .await
        .unwrap()
        .unwrap();
    app.seed_entry(&user.id, "Gmail Account").await;
    app.seed_entry(&user.id, "GitHub Personal").await;

    let filtered = app
        .request(page_get("/entries?name=git", Some(&session)))
        .await;
    let html = body_string(filtered).await;
    assert!(html.contains("GitHub Personal"));
    assert!(!html.contains("Gmail Account"));

    // A blank filter is equivalent to no filter.
    let blank = app
        .request(page_get("/entries?name=", Some(&session)))
        .await;
    let html = body_string(blank).await;
    assert!(html.contains("GitHub Personal"));
    assert!(html.contains("Gmail Account"));
}

// ---- Ownership ----

#[tokio::test]
async fn cross_user_entry_access_is_a_plain_404() {
    let app = spawn_app().await;
    let victim = app.register_user("victim@example.com", "password123").await;
    let theirs = app.seed_entry(&victim.id, "Their Secret").await;

    let session = logged_in_session(&app, "attacker@example.com").await;

    let show = app
        .request(page_get(&format!("/entries/{}", theirs.id), Some(&session)))
        .await;
    assert_eq!(show.status(), StatusCode::NOT_FOUND);

    let update = app
        .request(form_request(
            "PATCH",
            &format!("/entries/{}", theirs.id),
            "name=Mine Now&username=x&password=y&url=https://x.com",
            Some(&session),
        ))
        .await;
    assert_eq!(update.status(), StatusCode::NOT_FOUND);

    let delete = app
        .request(form_request(
            "DELETE",
            &format!("/entries/{}", theirs.id),
            "",
            Some(&session),
        ))
        .await;
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);

    // A nonexistent id looks exactly the same.
    let missing = app
        .request(page_get("/entries/no-such-entry", Some(&session)))
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

// ---- Account deletion ----

#[tokio::test]
async fn deleting_the_account_cascades_and_ends_the_session() {
    let app = spawn_app().await;
    let session = logged_in_session(&app, "leaving@example.com").await;
    let user = keyrack_storage::queries::users::find_by_email(&app.state.db, "leaving@example.com")
        .await
        .unwrap()
        .unwrap();
    app.seed_entry(&user.id, "Gone Soon").await;

    let bystander = app.register_user("stays@example.com", "password123").await;
    app.seed_entry(&bystander.id, "Still Here").await;

    let response = app
        .request(form_request("DELETE", "/account", "", Some(&session)))
        .await;
    assert_redirect(&response, "/login");

    // Session is dead and the account cannot log back in.
    let after = app.request(page_get("/", Some(&session))).await;
    assert_redirect(&after, "/login");
    let login = app
        .request(form_request(
            "POST",
            "/login",
            "email=leaving@example.com&password=password123",
            None,
        ))
        .await;
    assert_eq!(login.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Their entries are gone; the bystander's remain.
    let doomed = keyrack_storage::queries::entries::list_entries(
        &app.state.db,
        &app.state.fields,
        &user.id,
        None,
    )
    .await
    .unwrap();
    assert!(doomed.is_empty());

    let kept = keyrack_storage::queries::entries::list_entries(
        &app.state.db,
        &app.state.fields,
        &bystander.id,
        None,
    )
    .await
    .unwrap();
    assert_eq!(kept.len(), 1);
}
