// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use crate::common::{Nickname, SubjectId};
use hyper::StatusCode;
use serde::{Deserialize, Serialize};

/// A partial update of one directory user.
///
/// # Example
///
/// `MetadataPatch::Audit { full_name_reviewed: true }` is sent as
/// `{"app_metadata":{"nombre_completo_revisado":true}}`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum MetadataPatch {
    /// User-visible profile fields.
    #[serde(rename = "user_metadata")]
    Profile {
        /// As typed by the user.
        full_name: String,
        /// The resolved, collision-free nickname.
        nickname: Nickname,
    },
    /// Internal flag recording that the full name has been collected.
    #[serde(rename = "app_metadata")]
    Audit {
        #[serde(rename = "nombre_completo_revisado")]
        /// Whether the full name has been reviewed.
        full_name_reviewed: bool,
    },
}

/// A user record as returned by a directory search, with only the fields we read.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct DirectoryUser {
    #[serde(default)]
    /// For example, "auth0|64f1c2...".
    pub user_id: Option<SubjectId>,
    #[serde(default)]
    /// Profile fields, if any were ever set.
    pub user_metadata: Option<UserMetadata>,
}

/// The profile fields of a directory user.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct UserMetadata {
    #[serde(default)]
    /// Full name.
    pub full_name: Option<String>,
    #[serde(default)]
    /// Nickname.
    pub nickname: Option<Nickname>,
}

/// A decoded Management API response. The status is left for the caller to judge.
#[derive(Clone, Debug)]
pub struct ManagementResponse<T> {
    /// Decoded body of a successful response, or `T::default()` otherwise.
    pub body: T,
    /// Body text of an unsuccessful response.
    pub error: Option<String>,
    /// HTTP status.
    pub status: StatusCode,
}

impl<T> ManagementResponse<T> {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Describes the status for error messages, e.g. "Not Found: user does not exist".
    pub fn reason(&self) -> String {
        let canonical = self.status.canonical_reason().unwrap_or("unknown status");
        match &self.error {
            Some(text) if !text.is_empty() => format!("{canonical}: {text}"),
            _ => canonical.to_string(),
        }
    }
}
