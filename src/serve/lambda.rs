// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use axum::body::{to_bytes, Body};
use axum::http::StatusCode;
use axum::Router;
use base64::{alphabet, engine, Engine};
use core::convert::TryFrom;
use core::future::Future;
use core::task::Context;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{Method, Request};
use lambda_runtime::{Error, LambdaEvent, Service};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::convert::Infallible;
use std::env::var;
use std::pin::Pin;
use std::str::FromStr;
use urlencoding::encode;

const DEBUG: bool = false;

/// Returns true when executable is run in AWS Lambda environment.
pub fn is_lambda_env() -> bool {
    var("AWS_LAMBDA_RUNTIME_API").is_ok()
}

/// Run a router on a Lambda Proxy invoked via AWS API Gateway (REST).
pub async fn run_router_on_lambda(router: Router) -> Result<(), Error> {
    println!("Begin running router on lambda");
    lambda_runtime::run(RouterWrapper(router)).await?;
    println!("Done running router on lambda");
    Ok(())
}

/// The `GwRequest` (gateway request) type is what an `ApiGatewayEvent` becomes.
type GwRequest = Request<Body>;

/// The `RouterWrapper` struct turns API Gateway proxy events into requests for
/// an `axum::Router`, and the router's responses back into proxy responses.
struct RouterWrapper(Router);

impl Service<LambdaEvent<ApiGatewayEvent>> for RouterWrapper {
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<serde_json::Value, Infallible>> + Send>>;
    type Response = serde_json::Value;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> core::task::Poll<Result<(), Self::Error>> {
        <Router as Service<GwRequest>>::poll_ready(&mut self.0, cx)
    }

    fn call(&mut self, lambda_event: LambdaEvent<ApiGatewayEvent>) -> Self::Future {
        let path = lambda_event.payload.path.clone().unwrap_or_default();
        if DEBUG {
            println!("lambda begins with path {path}");
        }
        let router_future = GwRequest::try_from(lambda_event.payload)
            .map(|request| <Router as Service<GwRequest>>::call(&mut self.0, request));
        Box::pin(async move {
            let router_future = match router_future {
                Ok(router_future) => router_future,
                Err(e) => {
                    println!("Cannot convert gateway event for {path}: {e:?}");
                    return Ok(proxy_response(
                        StatusCode::BAD_REQUEST,
                        json!({ "content-type": "text/plain" }),
                        "Malformed gateway event".to_string(),
                    ));
                }
            };
            let response = match router_future.await {
                Ok(response) => response,
                Err(infallible) => match infallible {},
            };
            let (parts, body) = response.into_parts();
            let mut headers = serde_json::Map::new();
            for (k, v) in &parts.headers {
                if let Ok(value_str) = v.to_str() {
                    headers.insert(k.as_str().to_string(), json!(value_str));
                }
            }
            match to_bytes(body, usize::MAX).await {
                Ok(body) => {
                    let body = String::from_utf8_lossy(&body).to_string();
                    if DEBUG || parts.status.is_server_error() {
                        println!(
                            "lambda {path} ends with status {}: {body}",
                            parts.status.as_u16()
                        );
                    }
                    Ok(proxy_response(
                        parts.status,
                        serde_json::Value::Object(headers),
                        body,
                    ))
                }
                Err(e) => {
                    // In practice, this never happens.
                    println!("Teapot error {e:?}");
                    Ok(proxy_response(
                        StatusCode::IM_A_TEAPOT,
                        json!({ "content-type": "text/plain" }),
                        "Result body error".to_string(),
                    ))
                }
            }
        })
    }
}

fn proxy_response(status: StatusCode, headers: serde_json::Value, body: String) -> serde_json::Value {
    json!({
        "body": body,
        "headers": headers,
        "isBase64Encoded": false,
        "statusCode": status.as_u16(),
    })
}

/// Convert an AWS API Gateway event into a `hyper::Request` suitable for `axum::Router`.
impl TryFrom<ApiGatewayEvent> for GwRequest {
    type Error = Error;

    fn try_from(gw_event: ApiGatewayEvent) -> Result<Self, Self::Error> {
        let method = Method::try_from(gw_event.http_method.unwrap_or("GET".to_string()).as_str())?;
        let path = gw_event.path.unwrap_or("/".to_string());
        let uri = append_query_string(&path, &gw_event.multi_value_query_string_parameters);
        let mut builder = Request::builder().method(method).uri(uri);

        if let (Some(headers_mut), Some(multi_value_headers)) =
            (builder.headers_mut(), gw_event.multi_value_headers)
        {
            // For example content-type, host, x-forwarded-for and user-agent.
            let headers = multi_value_headers.iter().flat_map(|(key, value_list)| {
                value_list
                    .iter()
                    .map(move |value| (key.as_str(), value.as_str()))
            });
            for (key, value) in headers {
                if let (Ok(key), Ok(value)) =
                    (HeaderName::from_str(key), HeaderValue::from_str(value))
                {
                    headers_mut.insert(key, value);
                }
            }
        }

        // Form posts arrive base 64 encoded when API Gateway treats them as binary.
        let body = if gw_event.is_base64_encoded {
            let engine =
                engine::GeneralPurpose::new(&alphabet::STANDARD, engine::general_purpose::PAD);
            engine.decode(gw_event.body.unwrap_or_default())?
        } else {
            gw_event.body.unwrap_or_default().into_bytes()
        };

        Ok(builder.body(Body::from(body))?)
    }
}

/// An AWS API Gateway REST event, with only those fields necessary for `RouterWrapper`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiGatewayEvent {
    body: Option<String>,
    http_method: Option<String>,
    #[serde(default)]
    is_base64_encoded: bool,
    multi_value_headers: Option<HashMap<String, Vec<String>>>,
    multi_value_query_string_parameters: Option<HashMap<String, Vec<String>>>,
    path: Option<String>,
}

fn append_query_string(
    path: &str,
    multi_value_query_string_parameters: &Option<HashMap<String, Vec<String>>>,
) -> String {
    match multi_value_query_string_parameters {
        Some(query_parms) if !query_parms.is_empty() => {
            let query = query_parms
                .iter()
                .flat_map(|(k, vec)| vec.iter().map(move |v| format!("{}={}", encode(k), encode(v))))
                .collect::<Vec<_>>()
                .join("&");
            format!("{path}?{query}")
        }
        _ => path.to_owned(),
    }
}

#[cfg(test)]
mod lambda_tests {
    use super::{append_query_string, ApiGatewayEvent, GwRequest};
    use hyper::Method;
    use std::collections::HashMap;

    #[test]
    fn gateway_event_tests() {
        let event: ApiGatewayEvent = serde_json::from_value(serde_json::json!({
            "body": "ZnVsbF9uYW1lPUp1YW4rUGVyZXo=",
            "httpMethod": "POST",
            "isBase64Encoded": true,
            "multiValueHeaders": { "content-type": ["application/x-www-form-urlencoded"] },
            "multiValueQueryStringParameters": { "state": ["st 1"] },
            "path": "/nombre-completo",
            "requestContext": { "stage": "prod" }
        }))
        .expect("gateway event");
        let request = GwRequest::try_from(event).expect("request");
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.uri().path(), "/nombre-completo");
        assert_eq!(request.uri().query(), Some("state=st%201"));
        assert_eq!(
            request.headers().get("content-type").and_then(|v| v.to_str().ok()),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn query_string_tests() {
        assert_eq!(append_query_string("/a", &None), "/a");
        assert_eq!(append_query_string("/a", &Some(HashMap::new())), "/a");
        let parms = HashMap::from([("token".to_string(), vec!["x.y-z_".to_string()])]);
        assert_eq!(append_query_string("/a", &Some(parms)), "/a?token=x.y-z_");
    }
}
