//! reqwest-backed HTTP client for the banking API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use tracing::debug;
use url::Url;

use crate::domain::result::{Error, HttpError, Result};
use crate::ports::{ApiRequest, HttpClient, Method};

/// HTTP adapter for the banking REST API
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl ReqwestHttpClient {
    /// Create a client for `base_url`. Without a timeout a request waits
    /// as long as the server takes.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid API base URL '{}': {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "API base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> std::result::Result<Url, HttpError> {
        let joined = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        Url::parse(&joined).map_err(|e| HttpError::Transport(format!("invalid URL '{}': {}", joined, e)))
    }

    fn map_request_error(&self, error: reqwest::Error) -> HttpError {
        if error.is_timeout() {
            let secs = self.timeout.map(|t| t.as_secs()).unwrap_or_default();
            HttpError::Transport(format!("Connection timed out after {} seconds", secs))
        } else if error.is_connect() {
            HttpError::Transport(format!("Unable to connect to {}", self.base_url))
        } else {
            HttpError::Transport(format!("Request failed: {}", error))
        }
    }
}

fn parse_body(text: &str) -> Option<JsonValue> {
    if text.trim().is_empty() {
        None
    } else {
        serde_json::from_str(text).ok()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: ApiRequest) -> std::result::Result<JsonValue, HttpError> {
        let url = self.url_for(&request.path)?;
        debug!(method = %request.method, path = %request.path, "api request");

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.map_request_error(e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_request_error(e))?;
        debug!(status = status.as_u16(), path = %request.path, "api response");

        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
                body: parse_body(&text),
            });
        }

        if text.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        serde_json::from_str(&text).map_err(|e| HttpError::Decode(e.to_string()))
    }
}
