// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use hyper::StatusCode;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
/// An enum that encapsulates every way a submission can fail. Any failure
/// aborts the rest of the submission.
///
/// # Example
///
/// Error::Upstream(StatusCode::TOO_MANY_REQUESTS, "search users: rate limited".to_string())
pub enum Error {
    /// The credentials exchange with the identity provider was refused.
    Authentication(StatusCode, String),
    /// Missing or malformed token, state or form field.
    BadRequest(String),
    /// Only `POST` is accepted.
    MethodNotAllowed,
    /// The request was not for the submission resource.
    NotFound(String),
    /// Configuration (or miscellaneous) error.
    String(String),
    /// The session token did not verify.
    Unauthorized(String),
    /// The directory answered a search or update with a non-success status,
    /// or could not be reached.
    Upstream(StatusCode, String),
}

impl Error {
    /// The status code sent to the caller for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Authentication(..) | Self::Upstream(..) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::String(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::Authentication(status_code, mesg) => {
                write!(f, "authentication failed ({status_code}): {mesg}")
            }
            Self::BadRequest(mesg) => Display::fmt(mesg, f),
            Self::MethodNotAllowed => Display::fmt("method not allowed", f),
            Self::NotFound(path) => write!(f, "{path}: not found"),
            Self::String(s) => Display::fmt(s, f),
            Self::Unauthorized(mesg) => Display::fmt(mesg, f),
            Self::Upstream(status_code, mesg) => write!(f, "directory ({status_code}): {mesg}"),
        }
    }
}

impl std::error::Error for Error {}
