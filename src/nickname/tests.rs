// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#[cfg(test)]
mod nickname_tests {
    use crate::common::{Error, Nickname};
    use crate::log::RequestLog;
    use crate::management::memory::MemoryDirectory;
    use crate::nickname::{derive_candidate, nickname_query, resolve};
    use hyper::StatusCode;

    #[test]
    fn derive_candidate_tests() {
        for (full_name, expected) in [
            ("Juan Perez", "jperez"),
            ("Juan Ignacio Perez", "jiperez"),
            ("  JUAN   Ignacio  PEREZ ", "jiperez"),
            ("Juan", "juan"),
            ("María José Núñez", "mjnúñez"),
            ("", ""),
            ("   ", ""),
        ] {
            assert_eq!(derive_candidate(full_name).as_str(), expected, "{full_name:?}");
        }
    }

    #[test]
    fn nickname_query_tests() {
        assert_eq!(nickname_query("jperez"), r#"user_metadata.nickname.raw:"jperez""#);
        assert_eq!(
            nickname_query(r#"o"neil\"#),
            r#"user_metadata.nickname.raw:"o\"neil\\""#
        );
    }

    #[tokio::test]
    async fn resolve_free_tests() {
        let directory = MemoryDirectory::default();
        let log = RequestLog::new(true, "");
        let candidate = Nickname("jperez".to_string());
        let resolved = resolve(&candidate, &directory, &log).await.expect("resolve");
        assert_eq!(resolved, candidate);
        assert_eq!(directory.queries(), vec![nickname_query("jperez")]);
    }

    #[tokio::test]
    async fn resolve_collision_tests() {
        let directory = MemoryDirectory::with_nicknames(&["jperez", "jperez1", "jiperez"]);
        let log = RequestLog::new(true, "");
        let resolved = resolve(&Nickname("jperez".to_string()), &directory, &log)
            .await
            .expect("resolve");
        assert_eq!(resolved.as_str(), "jperez2");
        // N collisions, N + 1 queries, in probe order.
        assert_eq!(
            directory.queries(),
            vec![
                nickname_query("jperez"),
                nickname_query("jperez1"),
                nickname_query("jperez2"),
            ]
        );
    }

    #[tokio::test]
    async fn resolve_suffix_counts_up_tests() {
        let taken: Vec<String> = std::iter::once("ana".to_string())
            .chain((1..=11).map(|n| format!("ana{n}")))
            .collect();
        let taken: Vec<&str> = taken.iter().map(String::as_str).collect();
        let directory = MemoryDirectory::with_nicknames(&taken);
        let log = RequestLog::new(false, "");
        let resolved = resolve(&Nickname("ana".to_string()), &directory, &log)
            .await
            .expect("resolve");
        assert_eq!(resolved.as_str(), "ana12");
        assert_eq!(directory.queries().len(), 13);
    }

    #[tokio::test]
    async fn resolve_search_failure_tests() {
        let directory = MemoryDirectory {
            search_status: Some(StatusCode::TOO_MANY_REQUESTS),
            ..Default::default()
        };
        let log = RequestLog::new(false, "");
        match resolve(&Nickname("jperez".to_string()), &directory, &log).await {
            Err(Error::Upstream(status, mesg)) => {
                assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
                assert!(mesg.contains("search unavailable"), "{mesg}");
            }
            other => panic!("expected upstream error: {other:?}"),
        }
        assert_eq!(directory.queries().len(), 1);
    }
}
