// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// The submission flow.
mod orchestrator;
/// The `axum::Router` around the submission flow.
mod router;

pub use self::orchestrator::{SubmissionHandler, Submitted};
pub use self::router::{new_router, new_submission_router, submission_handler};
