//! HTTP webhook client
//!
//! Sends the user's text to the configured endpoint and pulls the reply out
//! of the response. The wire format (method, request field, response path,
//! body format) comes entirely from `WebhookConfig`.

use crate::config::{ResponseFormat, WebhookConfig, WebhookMethod};
use crate::error::{ButterflyError, Result, WebhookError};
use crate::webhook::ReplySource;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

/// Longest error body kept in a `WebhookError::Status`
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Webhook-backed reply source
///
/// # Examples
///
/// ```
/// use butterfly::config::WebhookConfig;
/// use butterfly::webhook::WebhookClient;
///
/// let client = WebhookClient::new(WebhookConfig::default()).unwrap();
/// assert_eq!(client.endpoint(), "http://localhost:5678/webhook/chat");
/// ```
pub struct WebhookClient {
    client: Client,
    config: WebhookConfig,
}

impl WebhookClient {
    /// Create a new webhook client
    ///
    /// The underlying HTTP client applies `timeout_seconds` to every request.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: WebhookConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("butterfly/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ButterflyError::Http)?;

        tracing::info!(
            "Initialized webhook client: url={}, method={:?}, timeout={}s",
            config.url,
            config.method,
            config.timeout_seconds
        );

        Ok(Self { client, config })
    }

    /// Configured endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.config.url
    }

    fn build_request(&self, text: &str) -> RequestBuilder {
        match self.config.method {
            WebhookMethod::Post => {
                let mut body = serde_json::Map::new();
                body.insert(
                    self.config.request_field.clone(),
                    Value::String(text.to_string()),
                );
                self.client.post(&self.config.url).json(&body)
            }
            WebhookMethod::Get => self
                .client
                .get(&self.config.url)
                .query(&[(self.config.request_field.as_str(), text)]),
        }
    }

    fn classify(&self, err: reqwest::Error) -> WebhookError {
        if err.is_timeout() {
            WebhookError::Timeout {
                seconds: self.config.timeout_seconds,
            }
        } else {
            WebhookError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl ReplySource for WebhookClient {
    async fn fetch_reply(&self, text: &str) -> std::result::Result<String, WebhookError> {
        tracing::debug!(
            "Sending webhook request: {} chars to {}",
            text.chars().count(),
            self.config.url
        );

        let response = self.build_request(text).send().await.map_err(|e| {
            tracing::error!("Webhook request failed: {}", e);
            self.classify(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            tracing::error!("Webhook returned error {}: {}", status, body);
            return Err(WebhookError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read webhook response: {}", e);
            self.classify(e)
        })?;

        let reply = extract_reply(
            &body,
            self.config.response_format,
            &self.config.response_field,
        )?;

        tracing::debug!("Webhook reply: {} chars", reply.chars().count());
        Ok(reply)
    }
}

/// Extract the reply string from a webhook response body
///
/// With `ResponseFormat::Json`, `field` is a dot-separated path into the body.
/// A top-level array is resolved against its first element.
///
/// # Errors
///
/// Returns `InvalidBody` if the body is not JSON or the value is not a
/// string, `MissingField` if the path does not resolve, and `EmptyReply`
/// if the reply is blank
///
/// # Examples
///
/// ```
/// use butterfly::config::ResponseFormat;
/// use butterfly::webhook::extract_reply;
///
/// let reply = extract_reply(r#"{"data":{"reply":"hi"}}"#, ResponseFormat::Json, "data.reply");
/// assert_eq!(reply.unwrap(), "hi");
/// ```
pub fn extract_reply(
    body: &str,
    format: ResponseFormat,
    field: &str,
) -> std::result::Result<String, WebhookError> {
    let reply = match format {
        ResponseFormat::Text => body.to_string(),
        ResponseFormat::Json => {
            let value: Value = serde_json::from_str(body)
                .map_err(|e| WebhookError::InvalidBody(e.to_string()))?;

            let root = match &value {
                Value::Array(items) => items.first().ok_or_else(|| {
                    WebhookError::InvalidBody("response is an empty array".to_string())
                })?,
                other => other,
            };

            let mut current = root;
            for segment in field.split('.') {
                current = current
                    .get(segment)
                    .ok_or_else(|| WebhookError::MissingField {
                        field: field.to_string(),
                    })?;
            }

            current
                .as_str()
                .ok_or_else(|| {
                    WebhookError::InvalidBody(format!("field '{}' is not a string", field))
                })?
                .to_string()
        }
    };

    if reply.trim().is_empty() {
        return Err(WebhookError::EmptyReply);
    }

    Ok(reply)
}
