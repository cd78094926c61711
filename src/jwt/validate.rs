// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use crate::common::{Error, HookConfig, SubjectId};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::ser::Serialize;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

// Session tokens are signed with a secret shared with the identity provider,
// so only the symmetric (HMAC) algorithms make sense here.
const DEFAULT_ALGORITHM: &str = "HS256";

/// Verifies (and, for tooling and tests, signs) session tokens.
pub struct JwtClient {
    algorithm: Algorithm,
    secret: String,
}

impl std::fmt::Debug for JwtClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtClient")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// The verified payload of a session token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Session {
    /// The directory user the submission is for.
    pub subject: SubjectId,
    /// Opaque correlation value, forwarded unmodified.
    pub sig: String,
    /// Opaque correlation value, forwarded unmodified.
    pub sso: String,
}

/// Creates a JWT client from the `[jwt]` table.
pub fn new_jwt_client(hook_config: &HookConfig) -> Result<JwtClient, Error> {
    #[derive(Deserialize)]
    struct JwtConfig {
        #[serde(default)]
        algorithm: Option<String>,
        secret: String,
    }
    #[derive(Deserialize)]
    struct ConfigToml {
        jwt: JwtConfig,
    }
    let ConfigToml {
        jwt: JwtConfig { algorithm, secret },
    } = hook_config.get()?;
    let algorithm = algorithm.unwrap_or(DEFAULT_ALGORITHM.to_string());
    let algorithm = match Algorithm::from_str(&algorithm) {
        Ok(a @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => a,
        _ => {
            return Err(Error::String(format!(
                "{algorithm}: cannot verify session tokens with this algorithm"
            )))
        }
    };
    if secret.is_empty() {
        return Err(Error::String("jwt secret must not be empty".to_string()));
    }
    Ok(JwtClient { algorithm, secret })
}

/// Creates a JWT that expires `ttl_seconds` from now.
pub fn create_jwt<T: Serialize>(
    client: &JwtClient,
    claims: T,
    ttl_seconds: u64,
) -> Result<String, Error> {
    let mut value = serde_json::to_value(&claims)
        .map_err(|e| Error::String(format!("cannot ser claims to JSON: {e:?}")))?;
    let Value::Object(ref mut claims_obj) = value else {
        return Err(Error::String("claims not an object".to_string()));
    };
    let iat = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::String(format!("clock before epoch: {e}")))?
        .as_secs();
    claims_obj.insert("iat".to_string(), Value::Number(iat.into()));
    claims_obj.insert("exp".to_string(), Value::Number((iat + ttl_seconds).into()));
    encode(
        &Header::new(client.algorithm),
        &value,
        &EncodingKey::from_secret(client.secret.as_bytes()),
    )
    .map_err(|e| Error::String(format!("cannot create JWT: {e:?}")))
}

/// Verifies the signature (and expiry, if present) of a JSON web token and
/// returns its claims. Any failure is `Error::Unauthorized`.
pub fn validate_jwt<T: DeserializeOwned>(client: &JwtClient, jw_token: &str) -> Result<T, Error> {
    let mut validation = Validation::new(client.algorithm);
    // Session tokens are not required to carry `exp`, and their audience is not ours to check.
    validation.required_spec_claims = HashSet::new();
    validation.validate_aud = false;
    decode::<T>(
        jw_token,
        &DecodingKey::from_secret(client.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| Error::Unauthorized(format!("the supplied token is not valid: {e}")))
}

/// Verifies a session token and extracts the subject and correlation values.
pub fn validate_session_token(client: &JwtClient, jw_token: &str) -> Result<Session, Error> {
    #[derive(Deserialize)]
    struct SessionClaims {
        #[serde(default)]
        sub: Option<SubjectId>,
        #[serde(default)]
        sig: Option<String>,
        #[serde(default)]
        sso: Option<String>,
    }
    let SessionClaims { sub, sig, sso } = validate_jwt(client, jw_token)?;
    match sub {
        Some(subject) if !subject.is_empty() => Ok(Session {
            subject,
            sig: sig.unwrap_or_default(),
            sso: sso.unwrap_or_default(),
        }),
        _ => Err(Error::BadRequest(
            "the supplied token lacks a subject".to_string(),
        )),
    }
}
