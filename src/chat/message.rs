//! Chat message types
//!
//! A message is created once, with its id, author and timestamp fixed at
//! creation. Nothing mutates a message after it enters the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Opaque unique message identifier (ULID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Ulid);

impl MessageId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The human typing into the shell
    User,
    /// The assistant behind the webhook
    Model,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Model => write!(f, "model"),
        }
    }
}

/// A single chat message
///
/// # Examples
///
/// ```
/// use butterfly::chat::{Message, Sender};
///
/// let msg = Message::user("hi");
/// assert_eq!(msg.sender, Sender::User);
/// assert_eq!(msg.text, "hi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique id, assigned at creation
    pub id: MessageId,
    /// Display text
    pub text: String,
    /// Author tag
    pub sender: Sender,
    /// Creation time (informational; ordering is by store position)
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a message with a freshly generated id
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            sender,
            created_at: Utc::now(),
        }
    }

    /// Creates a user-authored message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Creates a model-authored message
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Sender::Model, text)
    }

    /// Returns true if the user wrote this message
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}
