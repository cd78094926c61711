// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::Error;
use axum::response::{IntoResponse, Response};
use hyper::header::CONTENT_TYPE;
use hyper::StatusCode;

/// Create a plain text `Response` suitable for `axum::Router`.
pub fn create_error_response(status: StatusCode, message: String) -> Response {
    (status, [(CONTENT_TYPE, "text/plain")], message).into_response()
}

/// Convert `Error` into a `Response` suitable for `axum::Router`.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        create_error_response(self.status(), self.to_string())
    }
}
