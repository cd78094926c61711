// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::common::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct LogInner {
    lines: Vec<String>,
    warn: bool,
}

/// Thread-safe trace of a single submission. Lines are echoed to stdout
/// when debug is enabled; warnings are always echoed.
#[derive(Clone, Default)]
pub struct RequestLog {
    debug: bool,
    inner: Arc<Mutex<LogInner>>,
    prefix: String,
}

impl RequestLog {
    /// Create a new request log. `prefix` (for example, the subject) is
    /// prepended to echoed lines.
    pub fn new(debug: bool, prefix: impl Into<String>) -> Self {
        Self {
            debug,
            inner: Arc::new(Mutex::new(Default::default())),
            prefix: prefix.into(),
        }
    }

    /// Trace the outcome of a step and pass its result through.
    pub fn call<T>(&self, line: &str, result: Result<T, Error>) -> Result<T, Error> {
        match &result {
            Ok(_) => self.trace(format!("{line} succeeded")),
            Err(e) => self.warn(format!("{line} failed: {e}")),
        }
        result
    }

    /// Whether the log contains any warnings.
    pub fn contains_warnings(&self) -> bool {
        self.inner
            .lock()
            .ok()
            .map(|inner| inner.warn)
            .unwrap_or(false)
    }

    /// Lines logged so far.
    pub fn lines(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.lines.clone())
            .unwrap_or_default()
    }

    /// Add a trace line.
    pub fn trace(&self, line: String) {
        self.push(line, false);
    }

    /// Add a warning or error line.
    pub fn warn(&self, line: String) {
        self.push(line, true);
    }

    fn push(&self, line: String, warn: bool) {
        if line.is_empty() {
            return;
        }
        if self.debug || warn {
            if self.prefix.is_empty() {
                println!("{line}");
            } else {
                println!("[{}] {line}", self.prefix);
            }
        }
        if let Ok(mut inner) = self.inner.lock() {
            inner.lines.push(line);
            inner.warn |= warn;
        }
    }
}

impl Display for RequestLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        Display::fmt(&self.lines().join("\n"), f)
    }
}
