//! Append-only message store and session state

use crate::chat::message::Message;
use serde::Serialize;

/// Ordered, append-only sequence of chat messages
///
/// Order is creation order. Messages are never removed or reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message at the end of the sequence
    pub fn append(&mut self, message: Message) {
        tracing::trace!(id = %message.id, sender = %message.sender, "Appending message");
        self.messages.push(message);
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recently appended message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

/// State of one conversation: the message store plus the loading flag
///
/// `is_loading` is true from the moment a send is accepted until its reply
/// (or the apology) has been appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatSession {
    /// Transcript of the session
    pub messages: MessageStore,
    /// Whether a webhook call is in flight
    pub is_loading: bool,
}

impl ChatSession {
    /// Creates a session that opens with a model greeting
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut messages = MessageStore::new();
        messages.append(Message::model(greeting));
        Self {
            messages,
            is_loading: false,
        }
    }
}
