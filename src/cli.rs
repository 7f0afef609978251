//! Command-line interface definition for Butterfly
//!
//! This module defines the CLI structure using clap's derive API,
//! providing an interactive chat command and a one-shot send command.

use clap::{Parser, Subcommand};

/// Butterfly - chat with a webhook-backed assistant
#[derive(Parser, Debug, Clone)]
#[command(name = "butterfly")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Butterfly
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Override the webhook URL from config
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Send a single message and print the reply
    Send {
        /// Message text to send
        text: String,

        /// Override the webhook URL from config
        #[arg(short, long)]
        url: Option<String>,

        /// Print the whole session as JSON instead of the reply
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Webhook URL given on the command line, if any
    pub fn webhook_url_override(&self) -> Option<&str> {
        match &self.command {
            Commands::Chat { url } | Commands::Send { url, .. } => url.as_deref(),
        }
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Chat { url: None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Chat { url: None }));
    }

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["butterfly", "chat"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat { url: None }));
        assert_eq!(cli.webhook_url_override(), None);
    }

    #[test]
    fn test_cli_parse_chat_with_url() {
        let cli =
            Cli::try_parse_from(["butterfly", "chat", "--url", "http://localhost:9000/hook"])
                .unwrap();
        assert_eq!(
            cli.webhook_url_override(),
            Some("http://localhost:9000/hook")
        );
    }

    #[test]
    fn test_cli_parse_send() {
        let cli = Cli::try_parse_from(["butterfly", "send", "hi there"]).unwrap();
        if let Commands::Send { text, url, json } = cli.command {
            assert_eq!(text, "hi there");
            assert_eq!(url, None);
            assert!(!json);
        } else {
            panic!("Expected Send command");
        }
    }

    #[test]
    fn test_cli_parse_send_with_json_and_url() {
        let cli = Cli::try_parse_from([
            "butterfly",
            "send",
            "hi",
            "--json",
            "-u",
            "http://h.test/x",
        ])
        .unwrap();
        assert_eq!(cli.webhook_url_override(), Some("http://h.test/x"));
        assert!(matches!(cli.command, Commands::Send { json: true, .. }));
    }

    #[test]
    fn test_cli_send_requires_text() {
        assert!(Cli::try_parse_from(["butterfly", "send"]).is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli =
            Cli::try_parse_from(["butterfly", "--verbose", "--config", "my.yaml", "chat"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some("my.yaml".to_string()));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["butterfly"]).is_err());
    }
}
