// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal server-rendered HTML for the browser routes.
//!
//! Real templating is an external concern; these helpers exist so the
//! browser surface can show lists, forms, and inline validation errors
//! without pulling a template engine into the core.

use axum::response::Html;
use keyrack_core::{Entry, NewEntry, ValidationErrors};

/// Escape text for safe interpolation into HTML.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wrap body content in the shared page shell.
pub fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{} - Keyrack</title></head>\n\
         <body>\n<header><h1><a href=\"/\">Keyrack</a></h1></header>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    ))
}

/// Render accumulated validation messages as a list.
pub fn error_list(errors: &ValidationErrors) -> String {
    let items: String = errors
        .messages()
        .iter()
        .map(|m| format!("<li>{}</li>", escape(m)))
        .collect();
    format!("<ul class=\"errors\">{items}</ul>")
}

/// Shared form fields for entry create/edit.
fn entry_fields(values: &NewEntry) -> String {
    format!(
        "<label>Name <input name=\"name\" value=\"{}\"></label>\n\
         <label>Username <input name=\"username\" value=\"{}\"></label>\n\
         <label>Password <input name=\"password\" type=\"password\" value=\"{}\"></label>\n\
         <label>Url <input name=\"url\" value=\"{}\"></label>\n\
         <button type=\"submit\">Save</button>",
        escape(&values.name),
        escape(&values.username),
        escape(&values.password),
        escape(&values.url),
    )
}

/// Entry create/edit form, optionally with validation errors (the 422
/// re-render path).
pub fn entry_form_page(
    heading: &str,
    action: &str,
    values: &NewEntry,
    errors: Option<&ValidationErrors>,
) -> Html<String> {
    let errors_html = errors.map(error_list).unwrap_or_default();
    page(
        heading,
        &format!(
            "<h2>{}</h2>\n{}\n<form method=\"post\" action=\"{}\">\n{}\n</form>",
            escape(heading),
            errors_html,
            escape(action),
            entry_fields(values),
        ),
    )
}

/// Entry list with the search box and an inline create form.
pub fn entries_page(entries: &[Entry], filter: Option<&str>) -> Html<String> {
    let rows: String = entries
        .iter()
        .map(|e| {
            format!(
                "<li><a href=\"/entries/{}\">{}</a> <span>{}</span> <span>{}</span></li>",
                escape(&e.id),
                escape(&e.name),
                escape(&e.username),
                escape(&e.url),
            )
        })
        .collect();

    page(
        "Entries",
        &format!(
            "<form method=\"get\" action=\"/entries\">\n\
             <input name=\"name\" value=\"{}\" placeholder=\"Search by name\">\n\
             <button type=\"submit\">Search</button>\n</form>\n\
             <ul id=\"entries-list\">{}</ul>\n\
             <h2>New entry</h2>\n\
             <form method=\"post\" action=\"/entries\">\n{}\n</form>\n\
             <form method=\"post\" action=\"/logout\"><button type=\"submit\">Log out</button></form>",
            escape(filter.unwrap_or("")),
            rows,
            entry_fields(&NewEntry::default()),
        ),
    )
}

/// Single-entry detail view with its edit form.
pub fn entry_page(entry: &Entry) -> Html<String> {
    let values = NewEntry {
        name: entry.name.clone(),
        username: entry.username.clone(),
        password: entry.password.clone(),
        url: entry.url.clone(),
    };
    page(
        &entry.name,
        &format!(
            "<h2>{}</h2>\n\
             <dl><dt>Username</dt><dd>{}</dd>\n\
             <dt>Password</dt><dd>{}</dd>\n\
             <dt>Url</dt><dd><a href=\"{}\">{}</a></dd></dl>\n\
             <h3>Edit</h3>\n<form method=\"post\" action=\"/entries/{}\">\n{}\n</form>",
            escape(&entry.name),
            escape(&entry.username),
            escape(&entry.password),
            escape(&entry.url),
            escape(&entry.url),
            escape(&entry.id),
            entry_fields(&values),
        ),
    )
}

/// Login form, optionally with the generic failure message.
pub fn login_page(error: Option<&str>) -> Html<String> {
    let error_html = error
        .map(|e| format!("<p class=\"alert\">{}</p>", escape(e)))
        .unwrap_or_default();
    page(
        "Log in",
        &format!(
            "<h2>Log in</h2>\n{error_html}\n\
             <form method=\"post\" action=\"/login\">\n\
             <label>Email <input name=\"email\" type=\"email\"></label>\n\
             <label>Password <input name=\"password\" type=\"password\"></label>\n\
             <button type=\"submit\">Log in</button>\n</form>\n\
             <p><a href=\"/signup\">Sign up</a></p>"
        ),
    )
}

/// Registration form, optionally re-rendered with validation errors.
pub fn signup_page(email: &str, errors: Option<&ValidationErrors>) -> Html<String> {
    let errors_html = errors.map(error_list).unwrap_or_default();
    page(
        "Sign up",
        &format!(
            "<h2>Sign up</h2>\n{}\n\
             <form method=\"post\" action=\"/signup\">\n\
             <label>Email <input name=\"email\" type=\"email\" value=\"{}\"></label>\n\
             <label>Password <input name=\"password\" type=\"password\"></label>\n\
             <button type=\"submit\">Sign up</button>\n</form>\n\
             <p><a href=\"/login\">Log in</a></p>",
            errors_html,
            escape(email),
        ),
    )
}

/// 404 body. Used for missing entries and for entries owned by someone
/// else -- the two are indistinguishable on purpose.
pub fn not_found_page() -> Html<String> {
    page("Not found", "<h2>Not found</h2>")
}

/// 500 body. Details stay in the log.
pub fn error_page() -> Html<String> {
    page("Error", "<h2>Something went wrong</h2>")
}
