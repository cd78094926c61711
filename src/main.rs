// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use nickname_hook::{new_router, HookConfig};
use std::env::var;
use std::process::ExitCode;

const CONFIG_ENV: &str = "NICKNAME_HOOK_TOML";
const CONFIG_FILE: &str = "nickname_hook.toml";

#[tokio::main]
async fn main() -> ExitCode {
    let debug = var("NICKNAME_HOOK_DEBUG").is_ok();
    let router = match HookConfig::builder()
        .debug(debug)
        .toml_file(CONFIG_FILE)
        .toml_env(CONFIG_ENV)
        .build()
        .and_then(|hook_config| new_router(&hook_config))
    {
        Ok(router) => router,
        Err(e) => {
            eprintln!("cannot configure nickname hook: {e}");
            return ExitCode::FAILURE;
        }
    };

    #[cfg(feature = "lambda")]
    if nickname_hook::is_lambda_env() {
        return match nickname_hook::run_router_on_lambda(router).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("lambda: {e}");
                ExitCode::FAILURE
            }
        };
    }

    #[cfg(feature = "socket")]
    {
        match nickname_hook::run_router_on_socket(router).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("socket: {e}");
                ExitCode::FAILURE
            }
        }
    }

    #[cfg(not(feature = "socket"))]
    {
        let _ = router;
        eprintln!("not running on lambda and the socket feature is disabled");
        ExitCode::FAILURE
    }
}
