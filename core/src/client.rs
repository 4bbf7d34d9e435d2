//! HTTP client for the stock API.
//!
//! # Design
//! `HttpClient` splits every call into three steps:
//! 1. `build_request` turns an endpoint, method, body and headers into an
//!    `HttpRequest` (pure).
//! 2. The `Transport` executes it under the configured timeout. If the
//!    timeout fires, the in-flight future is dropped.
//! 3. `parse_response` turns the `HttpResponse` into a JSON value or an
//!    `ApiError` (pure).
//!
//! The typed helpers (`get`, `post`, `put`, `patch`, `delete`) wrap
//! `request` and decode the JSON value into the caller's type.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::{ApiConfig, ConfigUpdate};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Client for a JSON HTTP API rooted at `ApiConfig::base_url`.
#[derive(Debug, Clone)]
pub struct HttpClient<T> {
    transport: T,
    config: ApiConfig,
}

impl<T> HttpClient<T> {
    pub fn new(transport: T, config: ApiConfig) -> Self {
        Self { transport, config }
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> ApiConfig {
        self.config.clone()
    }

    pub fn update_config(&mut self, update: ConfigUpdate) {
        self.config.apply(update);
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Join the base URL and `endpoint` and merge headers.
    ///
    /// Header precedence, lowest first: configured defaults,
    /// `content-type: application/json` when a body is present, then
    /// `headers`. Names are compared case-insensitively.
    pub fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<String>,
        headers: &[(String, String)],
    ) -> HttpRequest {
        let mut merged = Vec::new();
        for (name, value) in &self.config.headers {
            set_header(&mut merged, name, value);
        }
        if body.is_some() {
            set_header(&mut merged, "content-type", "application/json");
        }
        for (name, value) in headers {
            set_header(&mut merged, name, value);
        }

        HttpRequest {
            method,
            url: format!("{}{endpoint}", self.config.base_url.trim_end_matches('/')),
            headers: merged,
            body,
        }
    }

    /// Classify a response: non-2xx becomes `ApiError::Response`, 204 yields
    /// an empty object, JSON bodies are parsed and anything else is returned
    /// as a JSON string.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if !response.is_success() {
            return Err(ApiError::from_response(response));
        }
        if response.status == 204 {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        if response.is_json() {
            return serde_json::from_str(&response.body)
                .map_err(|e| ApiError::transport(format!("failed to parse response body: {e}")));
        }
        Ok(Value::String(response.body))
    }
}

impl<T: Transport> HttpClient<T> {
    /// Build, execute and parse one request.
    pub async fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<String>,
        headers: &[(String, String)],
    ) -> Result<Value, ApiError> {
        let request = self.build_request(method, endpoint, body, headers);
        tracing::debug!(method = method.as_str(), url = %request.url, "sending request");

        let timeout = self.config.timeout;
        let response = match tokio::time::timeout(timeout, self.transport.execute(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(err.into()),
            Err(_) => {
                return Err(ApiError::transport(format!(
                    "request timed out after {} ms",
                    timeout.as_millis()
                )))
            }
        };

        tracing::debug!(status = response.status, "received response");
        self.parse_response(response)
    }

    /// GET `endpoint`, appending `params` as a query string when non-empty.
    pub async fn get<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<R, ApiError> {
        let endpoint = with_query(endpoint, params);
        decode(self.request(HttpMethod::Get, &endpoint, None, &[]).await?)
    }

    pub async fn post<R: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        self.send_json(HttpMethod::Post, endpoint, body).await
    }

    pub async fn put<R: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        self.send_json(HttpMethod::Put, endpoint, body).await
    }

    pub async fn patch<R: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        self.send_json(HttpMethod::Patch, endpoint, body).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, ApiError> {
        decode(self.request(HttpMethod::Delete, endpoint, None, &[]).await?)
    }

    async fn send_json<R: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let body = serde_json::to_string(body)
            .map_err(|e| ApiError::transport(format!("failed to encode request body: {e}")))?;
        decode(self.request(method, endpoint, Some(body), &[]).await?)
    }
}

fn decode<R: DeserializeOwned>(value: Value) -> Result<R, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::transport(format!("unexpected response shape: {e}")))
}

/// Replace an existing header with the same name, or append.
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some(slot) => *slot = (name.to_string(), value.to_string()),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

/// Append `params` to `endpoint` as a form-urlencoded query string.
pub fn with_query(endpoint: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return endpoint.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();
    format!("{endpoint}?{query}")
}
