// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#![warn(missing_docs)]
//! A webhook that collects a person's full name, derives a unique nickname
//! from it and stores both in an identity provider's user directory.

/// Types common to every component.
pub mod common;
pub use common::*;

/// Session token verification.
pub mod jwt;
pub use jwt::*;

/// Per-request logging.
pub mod log;
pub use log::*;

/// A client of the identity provider's Management API.
pub mod management;
pub use management::*;

/// Nickname derivation and allocation.
pub mod nickname;
pub use nickname::*;

/// Macros used with string wrappers.
pub mod serde_utils;

/// Ways of running the router.
pub mod serve;
pub use serve::*;

/// The full name submission endpoint.
pub mod submission;
pub use submission::*;
