// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication for the Keyrack credential vault.
//!
//! Two independent mechanisms share the process-wide secret loaded at
//! startup:
//! - [`token`]: stateless HMAC-SHA256 signed bearer tokens for the JSON
//!   API. Nothing is stored server-side; every request reconstructs and
//!   verifies the claim set from the raw string.
//! - [`session`]: an in-memory session store for the browser UI. Sessions
//!   die with the process by design.

pub mod session;
pub mod token;

pub use session::SessionStore;
pub use token::{Claims, TokenSigner};
