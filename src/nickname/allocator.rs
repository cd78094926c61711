// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use crate::common::{Error, Nickname};
use crate::log::RequestLog;
use crate::management::Directory;

/// The stored attribute nicknames are matched against.
const NICKNAME_FIELD: &str = "user_metadata.nickname.raw";

/// Derives a candidate nickname from a full name: the initial of every name
/// but the last, followed by the last name in full, all lower case.
///
/// # Example
///
/// "Juan Ignacio Perez" -> "jiperez", "Juan Perez" -> "jperez", "Juan" -> "juan".
///
/// Runs of whitespace separate names. A blank full name yields an empty nickname.
pub fn derive_candidate(full_name: &str) -> Nickname {
    let lowered = full_name.trim().to_lowercase();
    let mut names: Vec<&str> = lowered.split_whitespace().collect();
    let Some(last) = names.pop() else {
        return Nickname::default();
    };
    let mut nickname: String = names.iter().filter_map(|name| name.chars().next()).collect();
    nickname.push_str(last);
    Nickname(nickname)
}

/// The directory query matching users whose stored nickname is exactly `nickname`.
pub fn nickname_query(nickname: &str) -> String {
    let escaped = nickname.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{NICKNAME_FIELD}:\"{escaped}\"")
}

/// Resolves `candidate` to a nickname no directory user holds, trying
/// `candidate`, then `candidate1`, `candidate2` and so on.
///
/// Each probe is one directory query and probes run strictly in sequence, so a
/// nickname taken by a concurrent submission between probes is still seen.
/// There is no limit on the number of probes.
pub async fn resolve(
    candidate: &Nickname,
    directory: &(dyn Directory + Send + Sync),
    log: &RequestLog,
) -> Result<Nickname, Error> {
    let mut nickname = candidate.clone();
    let mut suffix: u64 = 0;
    loop {
        let response = directory.search_users(&nickname_query(&nickname)).await?;
        if !response.is_success() {
            return Err(Error::Upstream(
                response.status,
                format!("cannot search users with nickname {nickname}: {}", response.reason()),
            ));
        }
        if response.body.is_empty() {
            log.trace(format!("nickname {nickname} is free"));
            return Ok(nickname);
        }
        log.trace(format!("nickname {nickname} is taken"));
        suffix += 1;
        nickname = candidate.with_suffix(suffix);
    }
}
