//! Test utilities for Butterfly
//!
//! Reply source doubles that `mockall` cannot express easily (suspending
//! and panicking sources), plus shared fixtures.

use crate::error::WebhookError;
use crate::webhook::ReplySource;
use async_trait::async_trait;
use tokio::sync::Notify;

/// Greeting used by controller fixtures
pub const GREETING: &str = "Hello! I'm the Butterfly Assistant. How can I help you today?";

/// Reply source that suspends until [`GatedSource::release`] is called
pub struct GatedSource {
    gate: Notify,
    reply: String,
}

impl GatedSource {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            gate: Notify::new(),
            reply: reply.into(),
        }
    }

    /// Let the pending `fetch_reply` complete
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl ReplySource for GatedSource {
    async fn fetch_reply(&self, _text: &str) -> Result<String, WebhookError> {
        self.gate.notified().await;
        Ok(self.reply.clone())
    }
}

/// Reply source that panics instead of answering
pub struct PanickingSource;

#[async_trait]
impl ReplySource for PanickingSource {
    async fn fetch_reply(&self, _text: &str) -> Result<String, WebhookError> {
        panic!("reply source exploded");
    }
}
