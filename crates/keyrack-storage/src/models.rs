// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `keyrack-core::types` for use
//! across crate boundaries. This module re-exports them for convenience
//! within the storage crate.

pub use keyrack_core::types::{Entry, NewEntry, NewUser, User};
