// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

/// Management API HTTP client.
mod client;
/// The directory seam used by the allocator and orchestrator.
mod directory;
/// An in-memory directory for unit tests.
#[cfg(test)]
pub(crate) mod memory;
/// Patch payloads, user records and responses.
mod metadata;

pub use self::client::{new_management_client, ManagementClient};
pub use self::directory::Directory;
pub use self::metadata::{DirectoryUser, ManagementResponse, MetadataPatch, UserMetadata};
