// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules. One module per entity.

pub mod entries;
pub mod users;
