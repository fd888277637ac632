// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Keyrack credential vault.
//!
//! Two surfaces share one router and one state:
//! - Browser routes, authenticated by the in-memory session store.
//!   Failures redirect to /login; responses are minimal server-rendered
//!   HTML (templating is deliberately out of scope here).
//! - JSON API routes under /api/v1, authenticated by signed bearer
//!   tokens. Failures are `401 {"errors": [...]}`; no session state is
//!   kept between requests.
//!
//! Both middlewares resolve a [`keyrack_core::Principal`] and insert it
//! into request extensions; handlers thread it explicitly into every
//! store call, so no operation ever trusts a caller-supplied user id.

pub mod api;
pub mod auth;
pub mod render;
pub mod server;
pub mod web;

pub use server::{build_router, start_server, GatewayState, ServerConfig};
