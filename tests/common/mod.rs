use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use butterfly::config::WebhookConfig;

/// Webhook config pointing at `<base_url>/webhook/chat`
#[allow(dead_code)]
pub fn webhook_config(base_url: &str) -> WebhookConfig {
    WebhookConfig {
        url: format!("{}/webhook/chat", base_url),
        timeout_seconds: 5,
        ..WebhookConfig::default()
    }
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
