// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Keyrack credential vault.
//!
//! This crate provides the error taxonomy and domain types shared across
//! the Keyrack workspace: users, credential entries, the authenticated
//! principal, and the validation machinery for entry and account input.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{AuthError, FieldError, KeyrackError, ValidationErrors};
pub use types::{Entry, NewEntry, NewUser, Principal, User};
