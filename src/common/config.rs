// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::Error;
use serde::de::DeserializeOwned;
#[allow(deprecated)]
use std::env::{home_dir, var};
use std::fs::read_to_string;

/// Configuration for the hook. Each component reads its own TOML table, for
/// example `[management]`, `[jwt]` or `[submission]`.
#[derive(Debug)]
pub struct HookConfig {
    debug_enabled: bool,
    toml: String,
}

impl HookConfig {
    /// Creates a configuration builder.
    pub fn builder() -> HookConfigBuilder {
        HookConfigBuilder {
            debug_enabled: false,
            result: Err(Error::String("config not set".to_string())),
        }
    }

    /// Returns `true` if debug is enabled.
    pub fn debug(&self) -> bool {
        self.debug_enabled
    }

    /// Returns configuration parameters.
    pub fn get<T: DeserializeOwned>(&self) -> Result<T, Error> {
        toml::from_str(&self.toml).map_err(|e: toml::de::Error| Error::String(format!("toml: {e}")))
    }
}

/// Builds a `HookConfig` from a TOML file, string or environment variable.
#[derive(Debug)]
pub struct HookConfigBuilder {
    debug_enabled: bool,
    result: Result<String, Error>,
}

impl HookConfigBuilder {
    /// Returns the configuration or the first error encountered while building it.
    pub fn build(self) -> Result<HookConfig, Error> {
        let debug_enabled = self.debug_enabled;
        self.result.map(|toml| HookConfig {
            debug_enabled,
            toml,
        })
    }

    /// Enables printing of request logs.
    pub fn debug(self, debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            result: self.result,
        }
    }

    /// Reads `file_name` from the home directory or, failing that, the current directory.
    pub fn toml_file(self, file_name: &str) -> Self {
        #[allow(deprecated)]
        let home_path = home_dir()
            .and_then(|pathbuf| pathbuf.to_str().map(|path| format!("{path}/{file_name}")));
        let local_path = format!("./{file_name}");
        let result = match home_path.and_then(|path| read_to_string(path).ok()) {
            Some(toml) => Ok(toml),
            None => read_to_string(&local_path)
                .map_err(|_| Error::String(format!("{local_path}: cannot read"))),
        };
        Self {
            debug_enabled: self.debug_enabled,
            result,
        }
    }

    /// Uses the TOML text held by the environment variable `name`, if set.
    /// Otherwise the builder is left unchanged.
    pub fn toml_env(self, name: &str) -> Self {
        match var(name) {
            Ok(toml) => self.toml_string(toml),
            Err(_) => self,
        }
    }

    /// Uses TOML text.
    pub fn toml_str(self, toml: &str) -> Self {
        self.toml_string(toml.to_string())
    }

    /// Uses TOML text.
    pub fn toml_string(self, toml: String) -> Self {
        Self {
            debug_enabled: self.debug_enabled,
            result: Ok(toml),
        }
    }
}
