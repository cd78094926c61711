// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::common::{Error, HookConfig, Nickname, SubjectId};
use crate::jwt::{new_jwt_client, validate_session_token, JwtClient, Session};
use crate::log::RequestLog;
use crate::management::{Directory, MetadataPatch};
use crate::nickname::{derive_candidate, resolve};
use axum::body::Body;
use axum::extract::{Form, FromRequest, Multipart, Query};
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use urlencoding::encode;

const DEFAULT_PATH: &str = "/nombre-completo";
const FULL_NAME_FIELD: &str = "full_name";

/// Handles full name submissions: checks the request, allocates a nickname,
/// stores it in the directory and sends the caller on to the continuation URL.
pub struct SubmissionHandler {
    continue_url: String,
    debug: bool,
    directory: Arc<dyn Directory + Send + Sync>,
    jwt_client: JwtClient,
    path: String,
}

/// The outcome of a successful submission.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Submitted {
    /// Where the caller is redirected.
    pub location: String,
    /// The nickname stored for the subject.
    pub nickname: Nickname,
}

/// The submitted form.
#[derive(Clone, Debug, Eq, PartialEq)]
struct SubmissionForm {
    full_name: String,
}

impl SubmissionForm {
    fn from_fields(mut fields: HashMap<String, String>) -> Result<Self, Error> {
        let Some(full_name) = fields.remove(FULL_NAME_FIELD) else {
            return Err(Error::BadRequest(format!(
                "the form could not be processed: missing field `{FULL_NAME_FIELD}`"
            )));
        };
        if full_name.trim().is_empty() {
            return Err(Error::BadRequest(format!(
                "the form could not be processed: field `{FULL_NAME_FIELD}` is blank"
            )));
        }
        Ok(Self { full_name })
    }
}

impl SubmissionHandler {
    /// Creates a handler from the `[submission]` and `[jwt]` tables.
    pub fn new(
        hook_config: &HookConfig,
        directory: Arc<dyn Directory + Send + Sync>,
    ) -> Result<Self, Error> {
        #[derive(Deserialize)]
        struct SubmissionConfig {
            continue_host: String,
            #[serde(default)]
            path: Option<String>,
        }
        #[derive(Deserialize)]
        struct ConfigToml {
            submission: SubmissionConfig,
        }
        let ConfigToml {
            submission:
                SubmissionConfig {
                    continue_host,
                    path,
                },
        } = hook_config.get()?;
        Ok(Self {
            continue_url: format!("https://{continue_host}/continue"),
            debug: hook_config.debug(),
            directory,
            jwt_client: new_jwt_client(hook_config)?,
            path: path.unwrap_or(DEFAULT_PATH.to_string()),
        })
    }

    /// Runs one submission end to end. Any failure aborts the remaining steps;
    /// a profile update already applied is not undone if the audit update fails.
    pub async fn submit(&self, request: Request<Body>) -> Result<Submitted, Error> {
        if request.method() != Method::POST {
            return Err(Error::MethodNotAllowed);
        }
        let path = request.uri().path();
        if path != self.path {
            return Err(Error::NotFound(path.to_string()));
        }

        let Query(params) = Query::<HashMap<String, String>>::try_from_uri(request.uri())
            .map_err(|e| Error::BadRequest(format!("cannot parse query: {}", e.body_text())))?;
        let token = required_param(&params, "token")?;
        let state = required_param(&params, "state")?;
        let Session { subject, sig, sso } = validate_session_token(&self.jwt_client, token)?;

        let log = RequestLog::new(self.debug, subject.as_str());
        let SubmissionForm { full_name } = log.call("read form", read_form(request).await)?;

        let candidate = derive_candidate(&full_name);
        log.trace(format!("candidate nickname {candidate}"));
        let nickname = log.call(
            "resolve nickname",
            resolve(&candidate, self.directory.as_ref(), &log).await,
        )?;

        let profile = MetadataPatch::Profile {
            full_name,
            nickname: nickname.clone(),
        };
        self.update(&log, &subject, &profile, "the user's data").await?;
        let audit = MetadataPatch::Audit {
            full_name_reviewed: true,
        };
        self.update(&log, &subject, &audit, "the user's app data").await?;

        let location = format!(
            "{}?state={}&sig={}&sso={}&token={}",
            self.continue_url,
            encode(state),
            encode(&sig),
            encode(&sso),
            encode(token)
        );
        log.trace(format!("redirecting with nickname {nickname}"));
        Ok(Submitted { location, nickname })
    }

    async fn update(
        &self,
        log: &RequestLog,
        subject: &SubjectId,
        patch: &MetadataPatch,
        what: &str,
    ) -> Result<(), Error> {
        let result = match self.directory.update_metadata(subject, patch).await {
            Ok(response) if response.is_success() => Ok(()),
            Ok(response) => Err(Error::Upstream(
                response.status,
                format!("cannot update {what}: {}", response.reason()),
            )),
            Err(e) => Err(e),
        };
        log.call(&format!("update {what}"), result)
    }
}

fn required_param<'a>(params: &'a HashMap<String, String>, name: &str) -> Result<&'a str, Error> {
    params
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::BadRequest(format!("no valid {name} was supplied")))
}

/// Decodes a URL encoded or multipart form body into a `SubmissionForm`.
async fn read_form(request: Request<Body>) -> Result<SubmissionForm, Error> {
    let multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false);
    let fields = if multipart {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| form_error(e.body_text()))?;
        let mut fields = HashMap::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| form_error(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let value = field.text().await.map_err(|e| form_error(e.body_text()))?;
            fields.insert(name, value);
        }
        fields
    } else {
        let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
            .await
            .map_err(|e| form_error(e.body_text()))?;
        fields
    };
    SubmissionForm::from_fields(fields)
}

fn form_error(detail: String) -> Error {
    Error::BadRequest(format!("the form could not be processed: {detail}"))
}
