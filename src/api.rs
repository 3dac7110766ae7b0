//! HTTP client for the headlines backend.
//!
//! [`ApiClient::call`] wraps every JSON request in the backend's response
//! envelope and never fails: transport errors, bad statuses and malformed
//! bodies are all folded into a synthesized `status: false` envelope, so
//! callers only ever check [`ApiResponse::status`].

use chrono::{SecondsFormat, Utc};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

pub const HEADLINE_PATH: &str = "/headline";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const UNKNOWN_ERROR: &str = "Unknown error!";
const INVALID_FORMAT: &str = "Invalid API response format!";
const FAILURE_CONTEXT: &str = "unknown";
const FAILURE_CODE: i64 = 500;

/// Response envelope shared by every JSON endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    /// Fields the envelope does not name, kept so valid responses pass
    /// through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiResponse {
    /// The envelope returned in place of any failed call.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: Some(message.into()),
            context: Some(FAILURE_CONTEXT.to_string()),
            code: Some(FAILURE_CODE),
            timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            data: Some(Map::new()),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response status: {status} at {url}")]
    Status { status: u16, url: String },

    #[error("{0}")]
    Rejected(String),

    #[error("Invalid API response format!")]
    InvalidFormat,

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("headlines/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a JSON request and validates the envelope that comes back.
    ///
    /// `method` is case-insensitive. A missing `body` is sent as `{}`.
    pub async fn call(&self, path: &str, method: &str, body: Option<Value>) -> ApiResponse {
        match self.try_call(path, method, body).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(path, method, error = %e, "api call failed");
                ApiResponse::failure(e.to_string())
            }
        }
    }

    async fn try_call(
        &self,
        path: &str,
        method: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        let method = Method::from_bytes(method.to_uppercase().as_bytes())
            .map_err(|_| ApiError::InvalidMethod(method.to_string()))?;
        let body = body.unwrap_or_else(|| Value::Object(Map::new()));
        let url = self.url(path);

        tracing::debug!(%method, %url, "sending api request");

        let response = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|payload| {
                    payload
                        .get("message")
                        .and_then(Value::as_str)
                        .filter(|m| !m.is_empty())
                        .map(str::to_string)
                })
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
            return Err(ApiError::Rejected(message));
        }

        let payload: Value = serde_json::from_str(&text)?;
        if payload.get("status").is_none() {
            return Err(ApiError::InvalidFormat);
        }

        let parsed: ApiResponse =
            serde_json::from_value(payload).map_err(|_| ApiError::InvalidFormat)?;
        if !parsed.status {
            return Err(ApiError::Rejected(parsed.message.unwrap_or_default()));
        }

        Ok(parsed)
    }

    /// Fetches the latest headline as trimmed plain text.
    pub async fn fetch_headline(&self) -> Result<String, ApiError> {
        let url = self.url(HEADLINE_PATH);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        Ok(response.text().await?.trim().to_string())
    }

    pub async fn submit_headline(&self, headline: &str) -> ApiResponse {
        self.call(
            HEADLINE_PATH,
            "put",
            Some(serde_json::json!({ "headline": headline })),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_envelope_shape() {
        let response = ApiResponse::failure("boom");
        assert!(!response.status);
        assert_eq!(response.message.as_deref(), Some("boom"));
        assert_eq!(response.context.as_deref(), Some("unknown"));
        assert_eq!(response.code, Some(500));
        assert_eq!(response.data, Some(Map::new()));

        let timestamp = response.timestamp.unwrap();
        assert!(timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&timestamp).is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url(HEADLINE_PATH), "http://localhost:8080/headline");
    }

    #[test]
    fn test_envelope_keeps_unknown_fields() {
        let payload = serde_json::json!({
            "status": true,
            "message": "ok",
            "requestId": "abc"
        });
        let parsed: ApiResponse = serde_json::from_value(payload.clone()).unwrap();
        assert_eq!(parsed.extra.get("requestId"), Some(&Value::from("abc")));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), payload);
    }

    #[tokio::test]
    async fn test_invalid_method_becomes_failure() {
        let client = ApiClient::new("http://127.0.0.1:1");
        let response = client.call(HEADLINE_PATH, "not a method", None).await;
        assert!(!response.status);
        assert_eq!(response.code, Some(500));
        assert!(response
            .message
            .unwrap()
            .starts_with("Invalid HTTP method"));
    }
}
