//! Webhook module for Butterfly
//!
//! This module contains the reply source abstraction and the HTTP webhook
//! client that implements it.

pub mod client;

pub use client::{extract_reply, WebhookClient};

use crate::error::WebhookError;
use async_trait::async_trait;

/// Something that turns a user message into a reply
///
/// Implementations make exactly one attempt per call and keep no state
/// between calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReplySource: Send + Sync {
    /// Fetch the reply for `text`
    ///
    /// # Errors
    ///
    /// Returns `WebhookError` on network failure, timeout, non-success
    /// status, or an unusable response body
    async fn fetch_reply(&self, text: &str) -> Result<String, WebhookError>;
}
