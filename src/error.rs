//! Error types for Butterfly
//!
//! This module defines the error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Failure of a single webhook round trip
///
/// Every variant carries enough context (status code or underlying cause)
/// to be logged. None of it is ever shown in the chat transcript.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// The request could not be sent or the connection failed
    #[error("Webhook request failed: {0}")]
    Network(String),

    /// No response arrived within the configured timeout
    #[error("Webhook request timed out after {seconds}s")]
    Timeout {
        /// The configured timeout that elapsed
        seconds: u64,
    },

    /// The webhook answered with a non-success status code
    #[error("Webhook returned status {status}: {body}")]
    Status {
        /// HTTP status code returned by the webhook
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// The response body could not be parsed
    #[error("Webhook returned an unparseable body: {0}")]
    InvalidBody(String),

    /// The response parsed but did not contain the configured reply field
    #[error("Webhook response is missing field '{field}'")]
    MissingField {
        /// Dot-separated path that was looked up
        field: String,
    },

    /// The reply was present but empty
    #[error("Webhook returned an empty reply")]
    EmptyReply,
}

/// Main error type for Butterfly operations
#[derive(Error, Debug)]
pub enum ButterflyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Webhook round trip errors
    #[error(transparent)]
    Webhook(#[from] WebhookError),

    /// Interactive shell errors (line editor, terminal)
    #[error("Shell error: {0}")]
    Shell(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<rustyline::error::ReadlineError> for ButterflyError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        Self::Shell(err.to_string())
    }
}

/// Result type alias for Butterfly operations
///
/// Uses `anyhow::Error` so application code can attach context while
/// propagating.
pub type Result<T> = anyhow::Result<T>;
