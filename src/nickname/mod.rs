// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

/// Derivation and collision resolution of nicknames.
mod allocator;
/// Unit tests.
mod tests;

pub use self::allocator::{derive_candidate, nickname_query, resolve};
