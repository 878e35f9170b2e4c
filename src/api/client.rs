/// Authenticated HTTP transport for the IPAL API.
///
/// A thin wrapper over a blocking `reqwest` client that attaches the bearer
/// token, applies the configured timeout, and maps transport/status
/// conditions onto the `ApiError` taxonomy. A missing token is rejected
/// before any network traffic, as an auth error, so the UI can go straight
/// to re-authentication.

use std::time::Duration;

use serde::Serialize;

use crate::config::ClientConfig;
use crate::model::ApiError;

pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer(&self) -> Result<&str, ApiError> {
        self.auth_token
            .as_deref()
            .ok_or_else(|| ApiError::Auth("no auth token configured".to_string()))
    }

    /// GET `{base_url}{path_and_query}`, returning the raw body on 2xx.
    pub fn get(&self, path_and_query: &str) -> Result<String, ApiError> {
        let token = self.bearer()?;
        let url = format!("{}{}", self.base_url, path_and_query);
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .map_err(classify_transport_error)?;

        read_body(response)
    }

    /// PUT a JSON body to `{base_url}{path}`, returning the raw body on 2xx.
    pub fn put_json<B: Serialize>(&self, path: &str, body: &B) -> Result<String, ApiError> {
        let token = self.bearer()?;
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "PUT");

        let response = self
            .http
            .put(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .map_err(classify_transport_error)?;

        read_body(response)
    }
}

fn classify_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Network(format!("request timed out: {e}"))
    } else {
        ApiError::Network(e.to_string())
    }
}

fn read_body(response: reqwest::blocking::Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| ApiError::Network(format!("failed to read response body: {e}")))?;

    match status.as_u16() {
        401 | 403 => Err(ApiError::Auth(format!("HTTP {status}: token missing or expired"))),
        _ if !status.is_success() => Err(ApiError::Http {
            status: status.as_u16(),
            message: snippet(&body),
        }),
        _ => Ok(body),
    }
}

/// First line of the body, bounded, for error messages.
fn snippet(body: &str) -> String {
    let line = body.lines().next().unwrap_or("");
    line.chars().take(200).collect()
}
