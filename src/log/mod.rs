// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Thread-safe per-request logging.
mod request_log;

pub use self::request_log::RequestLog;
