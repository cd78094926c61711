// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{Directory, DirectoryUser, ManagementResponse, MetadataPatch};
use crate::common::{Error, HookConfig, SubjectId};
use async_trait::async_trait;
use hyper::header::{HeaderValue, AUTHORIZATION};
use hyper::{Method, StatusCode};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::RwLock;
use std::time::Duration;
use urlencoding::encode;

const DEFAULT_SEARCH_ENGINE: &str = "v2";

/// Management API client for the identity provider's user directory.
///
/// The access token is obtained with a client credentials exchange the first
/// time it is needed and then reused for the life of the process.
pub struct ManagementClient {
    access_token: RwLock<Option<String>>,
    audience: String,
    base_url: String,
    client: Client,
    client_id: String,
    client_secret: String,
    debug: bool,
    search_engine: String,
}

impl ManagementClient {
    const TIMEOUT_SECS: u64 = 10;

    /// Create a Management API client from the `[management]` table.
    pub fn new(hook_config: &HookConfig) -> Result<Self, Error> {
        #[derive(Deserialize)]
        struct ManagementConfig {
            #[serde(default)]
            access_token: Option<String>,
            #[serde(default)]
            audience: Option<String>,
            #[serde(default)]
            base_url: Option<String>,
            #[serde(default)]
            client_id: String,
            #[serde(default)]
            client_secret: String,
            domain: String,
            #[serde(default)]
            search_engine: Option<String>,
        }
        #[derive(Deserialize)]
        struct ConfigToml {
            management: ManagementConfig,
        }
        let ConfigToml {
            management:
                ManagementConfig {
                    access_token,
                    audience,
                    base_url,
                    client_id,
                    client_secret,
                    domain,
                    search_engine,
                },
        } = hook_config.get()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::String(format!("cannot create http client: {e}")))?;
        Ok(Self {
            access_token: RwLock::new(access_token.filter(|token| !token.is_empty())),
            audience: audience.unwrap_or(format!("https://{domain}/api/v2/")),
            base_url: base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(format!("https://{domain}")),
            client,
            client_id,
            client_secret,
            debug: hook_config.debug(),
            search_engine: search_engine.unwrap_or(DEFAULT_SEARCH_ENGINE.to_string()),
        })
    }

    /// Returns the cached access token, exchanging client credentials for one
    /// if none is cached yet.
    pub async fn access_token(&self) -> Result<String, Error> {
        let cached = self.access_token.read().ok().and_then(|cached| cached.clone());
        if let Some(token) = cached {
            return Ok(token);
        }
        // Concurrent first callers may each exchange; whichever finishes last is kept.
        let token = self.exchange_credentials().await?;
        if let Ok(mut cached) = self.access_token.write() {
            *cached = Some(token.clone());
        }
        Ok(token)
    }

    async fn exchange_credentials(&self) -> Result<String, Error> {
        #[derive(Serialize)]
        struct TokenRequest<'a> {
            audience: &'a str,
            client_id: &'a str,
            client_secret: &'a str,
            grant_type: &'static str,
        }
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }
        let token_endpoint = format!("{}/oauth/token", self.base_url);
        if self.debug {
            println!(">> POST {token_endpoint}");
        }
        let response = self
            .client
            .request(Method::POST, token_endpoint)
            .json(&TokenRequest {
                audience: &self.audience,
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                grant_type: "client_credentials",
            })
            .send()
            .await
            .map_err(|e| Error::Authentication(StatusCode::SERVICE_UNAVAILABLE, e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Authentication(status, format!("token response: {e}")))?;
        if !status.is_success() {
            return Err(Error::Authentication(status, format!("token post: {text}")));
        }
        let TokenResponse { access_token } = serde_json::from_str(&text)
            .map_err(|e| Error::Authentication(status, format!("token parse: {e}")))?;
        Ok(access_token)
    }

    /// Sends an authenticated request and decodes the response without
    /// judging its status.
    async fn send<T: Default + DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<ManagementResponse<T>, Error> {
        let mut auth_header = HeaderValue::from_str(&format!("Bearer {}", self.access_token().await?))
            .map_err(|e| Error::String(format!("access token is not a header value: {e}")))?;
        auth_header.set_sensitive(true);
        let response = request
            .header(AUTHORIZATION, auth_header)
            .send()
            .await
            .map_err(|e| Error::Upstream(StatusCode::SERVICE_UNAVAILABLE, format!("{what}: {e}")))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Upstream(status, format!("{what}: {e}")))?;
        if self.debug {
            println!("<< {what} (code {status})");
        }
        if !status.is_success() {
            return Ok(ManagementResponse {
                body: T::default(),
                error: Some(text),
                status,
            });
        }
        let body = if text.trim().is_empty() {
            T::default()
        } else {
            serde_json::from_str(&text)
                .map_err(|e| Error::Upstream(status, format!("{what} JSON: {e}")))?
        };
        Ok(ManagementResponse {
            body,
            error: None,
            status,
        })
    }
}

#[async_trait]
impl Directory for ManagementClient {
    async fn search_users(
        &self,
        query: &str,
    ) -> Result<ManagementResponse<Vec<DirectoryUser>>, Error> {
        let request_path = format!("{}/api/v2/users", self.base_url);
        if self.debug {
            println!(">> GET {request_path} q={query}");
        }
        let request = self
            .client
            .request(Method::GET, request_path)
            .query(&[("q", query), ("search_engine", self.search_engine.as_str())]);
        self.send(request, "search users").await
    }

    async fn update_metadata(
        &self,
        subject: &SubjectId,
        patch: &MetadataPatch,
    ) -> Result<ManagementResponse<Value>, Error> {
        let request_path = format!("{}/api/v2/users/{}", self.base_url, encode(subject));
        if self.debug {
            println!(">> PATCH {request_path}\n{patch:?}");
        }
        let request = self.client.request(Method::PATCH, request_path).json(patch);
        self.send(request, "update user").await
    }
}

/// Create a Management API client.
pub fn new_management_client(hook_config: &HookConfig) -> Result<ManagementClient, Error> {
    ManagementClient::new(hook_config)
}
