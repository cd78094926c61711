// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::{DirectoryUser, ManagementResponse, MetadataPatch};
use crate::common::{Error, SubjectId};
use async_trait::async_trait;
use serde_json::Value;

/// The remote user directory. `ManagementClient` talks to the real one;
/// tests substitute an in-memory directory.
#[async_trait]
pub trait Directory {
    /// Searches users with a field-scoped query, e.g. `user_metadata.nickname.raw:"jperez"`.
    async fn search_users(
        &self,
        query: &str,
    ) -> Result<ManagementResponse<Vec<DirectoryUser>>, Error>;

    /// Applies a partial update to one user.
    async fn update_metadata(
        &self,
        subject: &SubjectId,
        patch: &MetadataPatch,
    ) -> Result<ManagementResponse<Value>, Error>;
}
