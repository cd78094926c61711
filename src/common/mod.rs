// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

mod config;
/// An enum that encapsulates the failures of a submission.
mod error;
mod http;
/// Identifiers shared by the directory, allocator and orchestrator.
mod identity;

pub use self::config::{HookConfig, HookConfigBuilder};
pub use self::error::Error;
pub use self::http::create_error_response;
pub use self::identity::{Nickname, SubjectId};
