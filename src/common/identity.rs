// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
/// The directory's identifier for a user, taken from the `sub` claim of a
/// verified session token. For example, "auth0|64f1c2...".
pub struct SubjectId(pub String);
crate::impl_wrapper_str!(SubjectId);

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
/// A short unique username derived from a full name. For example, "jiperez".
pub struct Nickname(pub String);
crate::impl_wrapper_str!(Nickname);

impl Nickname {
    /// Returns this nickname with a numeric suffix appended, e.g. "jperez" -> "jperez2".
    pub fn with_suffix(&self, suffix: u64) -> Self {
        Self(format!("{}{suffix}", self.0))
    }
}
