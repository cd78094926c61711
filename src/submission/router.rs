// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{SubmissionHandler, Submitted};
use crate::common::{Error, HookConfig};
use crate::management::new_management_client;
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use axum::Router;
use hyper::header::LOCATION;
use hyper::StatusCode;
use std::sync::Arc;

/// Creates a router sending every request to `handler`, which does its own
/// method and path checks.
pub fn new_submission_router(handler: Arc<SubmissionHandler>) -> Router {
    Router::new()
        .fallback(submission_handler)
        .with_state(handler)
}

/// Creates a router backed by the Management API client described in `hook_config`.
pub fn new_router(hook_config: &HookConfig) -> Result<Router, Error> {
    let directory = Arc::new(new_management_client(hook_config)?);
    let handler = SubmissionHandler::new(hook_config, directory)?;
    Ok(new_submission_router(Arc::new(handler)))
}

/// Redirects (301) on success, otherwise responds with the error's status and message.
pub async fn submission_handler(
    State(handler): State<Arc<SubmissionHandler>>,
    request: Request,
) -> Response {
    match handler.submit(request).await {
        Ok(Submitted { location, .. }) => {
            (StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]).into_response()
        }
        Err(e) => {
            if !matches!(e, Error::MethodNotAllowed) {
                println!("submission failed with status {}: {e}", e.status().as_u16());
            }
            e.into_response()
        }
    }
}
