//! Configuration management for Butterfly
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ButterflyError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Butterfly
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote webhook settings
    #[serde(default)]
    pub webhook: WebhookConfig,
    /// Chat session settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// HTTP method used to reach the webhook
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WebhookMethod {
    /// POST a JSON object holding the message
    #[default]
    Post,
    /// GET with the message as a query parameter
    Get,
}

impl WebhookMethod {
    /// Parse a method name, case-insensitively
    ///
    /// # Examples
    ///
    /// ```
    /// use butterfly::config::WebhookMethod;
    ///
    /// assert_eq!(WebhookMethod::parse_str("GET").unwrap(), WebhookMethod::Get);
    /// assert!(WebhookMethod::parse_str("patch").is_err());
    /// ```
    pub fn parse_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "post" => Ok(Self::Post),
            "get" => Ok(Self::Get),
            other => Err(format!("Unknown webhook method: {}", other)),
        }
    }
}

/// How the reply is read out of the webhook response
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// JSON body; the reply is found at `response_field`
    #[default]
    Json,
    /// The whole body is the reply
    Text,
}

/// Webhook endpoint configuration
///
/// The wire format of the remote webhook is treated as configuration:
/// endpoint URL, request field name, and response field name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Absolute http(s) URL of the webhook
    #[serde(default = "default_webhook_url")]
    pub url: String,

    /// HTTP method
    #[serde(default)]
    pub method: WebhookMethod,

    /// Field (or query parameter) carrying the user's text
    #[serde(default = "default_request_field")]
    pub request_field: String,

    /// Dot-separated path to the reply string in the response
    #[serde(default = "default_response_field")]
    pub response_field: String,

    /// Response body format
    #[serde(default)]
    pub response_format: ResponseFormat,

    /// Upper bound on a single webhook round trip (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_webhook_url() -> String {
    "http://localhost:5678/webhook/chat".to_string()
}

fn default_request_field() -> String {
    "message".to_string()
}

fn default_response_field() -> String {
    "output".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: default_webhook_url(),
            method: WebhookMethod::default(),
            request_field: default_request_field(),
            response_field: default_response_field(),
            response_format: ResponseFormat::default(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Assistant name shown in the shell
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    /// Model message every session starts with
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

fn default_assistant_name() -> String {
    "Butterfly Assistant".to_string()
}

fn default_greeting() -> String {
    "Hello! I'm the Butterfly Assistant. How can I help you today?".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            assistant_name: default_assistant_name(),
            greeting: default_greeting(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ButterflyError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ButterflyError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(url) = std::env::var("BUTTERFLY_WEBHOOK_URL") {
            tracing::debug!(url = %url, "Env override: BUTTERFLY_WEBHOOK_URL");
            self.webhook.url = url;
        }

        if let Ok(method) = std::env::var("BUTTERFLY_WEBHOOK_METHOD") {
            match WebhookMethod::parse_str(&method) {
                Ok(m) => self.webhook.method = m,
                Err(e) => tracing::warn!("Invalid BUTTERFLY_WEBHOOK_METHOD: {}", e),
            }
        }

        if let Ok(field) = std::env::var("BUTTERFLY_REQUEST_FIELD") {
            self.webhook.request_field = field;
        }

        if let Ok(field) = std::env::var("BUTTERFLY_RESPONSE_FIELD") {
            self.webhook.response_field = field;
        }

        if let Ok(timeout) = std::env::var("BUTTERFLY_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.webhook.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid BUTTERFLY_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(greeting) = std::env::var("BUTTERFLY_GREETING") {
            self.chat.greeting = greeting;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(url) = cli.webhook_url_override() {
            tracing::debug!(url = %url, "CLI override: webhook url");
            self.webhook.url = url.to_string();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the webhook URL is not an absolute http(s) URL,
    /// a field name is empty, the timeout is zero, or the greeting is blank
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.webhook.url).map_err(|e| {
            ButterflyError::Config(format!("Invalid webhook url '{}': {}", self.webhook.url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ButterflyError::Config(format!(
                "Webhook url must use http or https, got: {}",
                url.scheme()
            ))
            .into());
        }

        if self.webhook.request_field.trim().is_empty() {
            return Err(ButterflyError::Config(
                "webhook.request_field cannot be empty".to_string(),
            )
            .into());
        }

        if self.webhook.response_format == ResponseFormat::Json
            && self.webhook.response_field.split('.').any(|s| s.is_empty())
        {
            return Err(ButterflyError::Config(format!(
                "webhook.response_field is not a valid path: '{}'",
                self.webhook.response_field
            ))
            .into());
        }

        if self.webhook.timeout_seconds == 0 {
            return Err(ButterflyError::Config(
                "webhook.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.greeting.trim().is_empty() {
            return Err(
                ButterflyError::Config("chat.greeting cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use serial_test::serial;

    const ENV_VARS: [&str; 6] = [
        "BUTTERFLY_WEBHOOK_URL",
        "BUTTERFLY_WEBHOOK_METHOD",
        "BUTTERFLY_REQUEST_FIELD",
        "BUTTERFLY_RESPONSE_FIELD",
        "BUTTERFLY_TIMEOUT_SECONDS",
        "BUTTERFLY_GREETING",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    fn chat_cli(url: Option<&str>) -> Cli {
        Cli {
            config: None,
            verbose: false,
            command: Commands::Chat {
                url: url.map(str::to_string),
            },
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.webhook.method, WebhookMethod::Post);
        assert_eq!(config.webhook.request_field, "message");
        assert_eq!(config.webhook.response_field, "output");
        assert_eq!(config.webhook.response_format, ResponseFormat::Json);
        assert_eq!(config.webhook.timeout_seconds, 30);
        assert_eq!(
            config.chat.greeting,
            "Hello! I'm the Butterfly Assistant. How can I help you today?"
        );
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_relative_url() {
        let mut config = Config::default();
        config.webhook.url = "/webhook/chat".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_non_http_scheme() {
        let mut config = Config::default();
        config.webhook.url = "ftp://example.com/hook".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_config_validation_empty_request_field() {
        let mut config = Config::default();
        config.webhook.request_field = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_response_path() {
        let mut config = Config::default();
        config.webhook.response_field = "data..reply".to_string();
        assert!(config.validate().is_err());

        // The path is irrelevant when the body is read as text
        config.webhook.response_format = ResponseFormat::Text;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.webhook.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_blank_greeting() {
        let mut config = Config::default();
        config.chat.greeting = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
webhook:
  url: https://hooks.example.com/chat
  method: get
  request_field: q
  response_field: data.reply
  timeout_seconds: 5
chat:
  greeting: Hi there
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.webhook.url, "https://hooks.example.com/chat");
        assert_eq!(config.webhook.method, WebhookMethod::Get);
        assert_eq!(config.webhook.request_field, "q");
        assert_eq!(config.webhook.response_field, "data.reply");
        assert_eq!(config.webhook.timeout_seconds, 5);
        assert_eq!(config.chat.greeting, "Hi there");
        assert_eq!(config.chat.assistant_name, "Butterfly Assistant");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("webhook:\n  url: http://x.test/h\n").unwrap();
        assert_eq!(config.webhook.request_field, "message");
        assert_eq!(config.webhook.timeout_seconds, 30);
        assert!(!config.chat.greeting.is_empty());
    }

    #[test]
    fn test_example_config_parses() {
        let contents = std::fs::read_to_string("config/config.yaml")
            .expect("Failed to read example config/config.yaml");
        let cfg: Config = serde_yaml::from_str(&contents).expect("Failed to parse config.yaml");

        assert_eq!(cfg.webhook.url, default_webhook_url());
        assert_eq!(cfg.webhook.method, WebhookMethod::Post);
        assert_eq!(cfg.chat.greeting, default_greeting());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_response_format_serialization() {
        let yaml = serde_yaml::to_string(&ResponseFormat::Text).unwrap();
        assert!(yaml.contains("text"));
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        clear_env();
        let config = Config::load("nonexistent.yaml", &chat_cli(None)).unwrap();
        assert_eq!(config.webhook.url, default_webhook_url());
    }

    #[test]
    #[serial]
    fn test_load_from_file_with_cli_override() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "webhook:\n  url: http://file.test/hook\n").unwrap();

        let config = Config::load(path.to_str().unwrap(), &chat_cli(None)).unwrap();
        assert_eq!(config.webhook.url, "http://file.test/hook");

        let config =
            Config::load(path.to_str().unwrap(), &chat_cli(Some("http://cli.test/hook"))).unwrap();
        assert_eq!(config.webhook.url, "http://cli.test/hook");
    }

    #[test]
    #[serial]
    fn test_load_invalid_yaml_fails() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "webhook: [unterminated").unwrap();

        let err = Config::load(path.to_str().unwrap(), &chat_cli(None)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_overrides_webhook_fields() {
        clear_env();
        std::env::set_var("BUTTERFLY_WEBHOOK_URL", "http://env.test/hook");
        std::env::set_var("BUTTERFLY_WEBHOOK_METHOD", "GET");
        std::env::set_var("BUTTERFLY_REQUEST_FIELD", "text");
        std::env::set_var("BUTTERFLY_RESPONSE_FIELD", "reply");
        std::env::set_var("BUTTERFLY_TIMEOUT_SECONDS", "7");
        std::env::set_var("BUTTERFLY_GREETING", "Welcome back");

        let mut cfg = Config::default();
        cfg.apply_env_vars();
        clear_env();

        assert_eq!(cfg.webhook.url, "http://env.test/hook");
        assert_eq!(cfg.webhook.method, WebhookMethod::Get);
        assert_eq!(cfg.webhook.request_field, "text");
        assert_eq!(cfg.webhook.response_field, "reply");
        assert_eq!(cfg.webhook.timeout_seconds, 7);
        assert_eq!(cfg.chat.greeting, "Welcome back");
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_ignores_invalid_values() {
        clear_env();
        std::env::set_var("BUTTERFLY_WEBHOOK_METHOD", "patch");
        std::env::set_var("BUTTERFLY_TIMEOUT_SECONDS", "soon");

        let mut cfg = Config::default();
        cfg.apply_env_vars();
        clear_env();

        assert_eq!(cfg.webhook.method, WebhookMethod::Post);
        assert_eq!(cfg.webhook.timeout_seconds, 30);
    }
}
