// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#[cfg(test)]
mod jwt_tests {
    use crate::common::{Error, HookConfig};
    use crate::jwt::{create_jwt, new_jwt_client, validate_jwt, validate_session_token, JwtClient};
    use std::collections::HashMap;

    fn client_with_secret(secret: &str) -> JwtClient {
        let hook_config = HookConfig::builder()
            .toml_string(format!(
                r#"
                [jwt]
                secret = "{secret}"
                "#
            ))
            .build()
            .expect("jwt_tests.toml");
        new_jwt_client(&hook_config).expect("jwt client")
    }

    fn claims(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn jwt_signing_tests() {
        println!("JWT signing tests");
        let client = client_with_secret("shared-secret");
        let claims_in = claims(&[("Foo", "1"), ("Bar", "2")]);
        let jwt = match create_jwt(&client, claims_in, 3600) {
            Ok(jwt) => jwt,
            Err(e) => panic!("cannot create JWT: {e:?}"),
        };
        println!("JWT is: {jwt}");

        let claims_out: serde_json::Value = validate_jwt(&client, &jwt).expect("cannot validate JWT");
        assert_eq!(claims_out["Foo"], "1");
        assert_eq!(claims_out["Bar"], "2");
        assert!(claims_out["exp"].is_u64());
    }

    #[test]
    fn session_token_tests() {
        let client = client_with_secret("shared-secret");
        let jwt = create_jwt(
            &client,
            claims(&[("sub", "abc"), ("sig", "s1"), ("sso", "sso1")]),
            600,
        )
        .expect("create session token");
        let session = validate_session_token(&client, &jwt).expect("valid session token");
        assert_eq!(session.subject.as_str(), "abc");
        assert_eq!(session.sig, "s1");
        assert_eq!(session.sso, "sso1");

        let without_correlation =
            create_jwt(&client, claims(&[("sub", "abc")]), 600).expect("create session token");
        let session = validate_session_token(&client, &without_correlation).expect("valid");
        assert!(session.sig.is_empty() && session.sso.is_empty());
    }

    #[test]
    fn session_token_rejection_tests() {
        let client = client_with_secret("shared-secret");
        let other = client_with_secret("some-other-secret");

        let forged = create_jwt(&other, claims(&[("sub", "abc")]), 600).expect("forged token");
        match validate_session_token(&client, &forged) {
            Err(Error::Unauthorized(mesg)) => println!("rejected forged token: {mesg}"),
            other => panic!("forged token accepted: {other:?}"),
        }

        match validate_session_token(&client, "not.a.token") {
            Err(Error::Unauthorized(_)) => {}
            other => panic!("garbage token accepted: {other:?}"),
        }

        let anonymous = create_jwt(&client, claims(&[("sig", "s1")]), 600).expect("anonymous");
        match validate_session_token(&client, &anonymous) {
            Err(Error::BadRequest(_)) => {}
            other => panic!("token without subject accepted: {other:?}"),
        }
    }

    #[test]
    fn jwt_config_tests() {
        let asymmetric = HookConfig::builder()
            .toml_str(
                r#"
                [jwt]
                algorithm = "RS256"
                secret = "shared-secret"
                "#,
            )
            .build()
            .expect("rs256.toml");
        assert!(new_jwt_client(&asymmetric).is_err());

        let missing = HookConfig::builder()
            .toml_str("[management]")
            .build()
            .expect("missing.toml");
        assert!(new_jwt_client(&missing).is_err());
    }
}
