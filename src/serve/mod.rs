// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#[cfg(feature = "lambda")]
/// A wrapper to run a router via AWS API Gateway and Lambda Proxy.
mod lambda;
#[cfg(feature = "socket")]
/// Run an `axum::Router` on incoming requests from a socket.
mod socket;

#[cfg(feature = "lambda")]
pub use self::lambda::{is_lambda_env, run_router_on_lambda};
#[cfg(feature = "socket")]
pub use self::socket::run_router_on_socket;
