// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// JWT unit tests.
mod tests;
/// JWT validation and unpacking.
mod validate;

pub use self::validate::{
    create_jwt, new_jwt_client, validate_jwt, validate_session_token, JwtClient, Session,
};
