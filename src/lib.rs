//! Butterfly - webhook-backed chat client library
//!
//! This library provides the pieces of a small chat client: an append-only
//! message store, a webhook client that turns a user message into a reply,
//! and a conversation controller that sequences the two and tracks the
//! loading state.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `chat`: Messages, the message store, and the conversation controller
//! - `webhook`: Reply source abstraction and the HTTP webhook client
//! - `commands`: Interactive and one-shot command handlers
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use butterfly::{Cli, Config};
//! use butterfly::commands::build_controller;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Cli::default())?;
//!     config.validate()?;
//!
//!     let controller = build_controller(&config)?;
//!     let outcome = controller.send_message("hi").await;
//!     println!("{:?}", outcome.model_message());
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod webhook;

// Re-export commonly used types
pub use chat::{ChatController, ChatSession, Message, SendOutcome, Sender, APOLOGY_TEXT};
pub use cli::Cli;
pub use config::Config;
pub use error::{ButterflyError, Result, WebhookError};
pub use webhook::{ReplySource, WebhookClient};

#[cfg(test)]
pub mod test_utils;
