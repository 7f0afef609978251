//! Conversation controller
//!
//! Drives one user send through a `ReplySource` and keeps the session state
//! consistent whatever the outcome. Per send the session moves
//! `Idle -> Sending -> {Fulfilled, Failed} -> Idle`; it never stays in
//! `Sending`, even if the caller drops the send future.
//!
//! Session state lives in a `tokio::sync::watch` channel owned by the
//! controller. The shell reads it through [`ChatController::snapshot`] or
//! follows it through [`ChatController::subscribe`].

use crate::chat::message::Message;
use crate::chat::store::ChatSession;
use crate::webhook::ReplySource;

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// Model text appended when a reply could not be obtained
pub const APOLOGY_TEXT: &str =
    "Sorry, something went wrong while connecting to the server. Please try again.";

/// Why a send was refused before anything was appended
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The text was empty or whitespace only
    #[error("message is empty")]
    EmptyMessage,
    /// Another send is still waiting for its reply
    #[error("a reply is still pending")]
    Busy,
}

/// Result of a single `send_message` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The webhook replied; carries the appended model message
    Replied(Message),
    /// The call failed; carries the appended apology message
    Failed(Message),
    /// Nothing was sent or appended
    Rejected(RejectReason),
}

impl SendOutcome {
    /// The model message appended by this send, if any
    pub fn model_message(&self) -> Option<&Message> {
        match self {
            Self::Replied(m) | Self::Failed(m) => Some(m),
            Self::Rejected(_) => None,
        }
    }
}

/// Owns a chat session and sequences sends through a reply source
///
/// Only one send may be in flight; a send issued while another is pending
/// is rejected with [`RejectReason::Busy`].
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use butterfly::chat::ChatController;
/// use butterfly::config::WebhookConfig;
/// use butterfly::webhook::WebhookClient;
///
/// # async fn example() -> butterfly::error::Result<()> {
/// let client = WebhookClient::new(WebhookConfig::default())?;
/// let controller = ChatController::new(Arc::new(client), "Hello!");
/// let outcome = controller.send_message("hi").await;
/// println!("{:?}", outcome.model_message());
/// # Ok(())
/// # }
/// ```
pub struct ChatController {
    source: Arc<dyn ReplySource>,
    state: watch::Sender<ChatSession>,
}

impl ChatController {
    /// Create a controller whose session opens with `greeting`
    pub fn new(source: Arc<dyn ReplySource>, greeting: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ChatSession::with_greeting(greeting));
        Self { source, state }
    }

    /// Follow session changes
    pub fn subscribe(&self) -> watch::Receiver<ChatSession> {
        self.state.subscribe()
    }

    /// Copy of the current session state
    pub fn snapshot(&self) -> ChatSession {
        self.state.borrow().clone()
    }

    /// Copy of the current transcript, oldest first
    pub fn messages(&self) -> Vec<Message> {
        self.state.borrow().messages.messages().to_vec()
    }

    /// Whether a reply is pending
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Send `text` and record the outcome in the session
    ///
    /// The user message is appended and `is_loading` set in the same update,
    /// before the reply source is polled. Exactly one model message (the
    /// reply or [`APOLOGY_TEXT`]) follows, and `is_loading` is cleared with
    /// it. Errors from the reply source are logged and never returned.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring empty message");
            return SendOutcome::Rejected(RejectReason::EmptyMessage);
        }

        let mut accepted = false;
        self.state.send_if_modified(|session| {
            if session.is_loading {
                return false;
            }
            session.messages.append(Message::user(text));
            session.is_loading = true;
            accepted = true;
            true
        });

        if !accepted {
            tracing::warn!("Rejecting message while a reply is pending");
            return SendOutcome::Rejected(RejectReason::Busy);
        }

        let mut pending = PendingReply::new(&self.state);
        let result = AssertUnwindSafe(self.source.fetch_reply(text))
            .catch_unwind()
            .await;

        match result {
            Ok(Ok(reply)) if !reply.trim().is_empty() => {
                tracing::info!("Received reply ({} chars)", reply.chars().count());
                SendOutcome::Replied(pending.settle(Message::model(reply)))
            }
            Ok(Ok(_)) => {
                tracing::error!("Error getting response: reply source returned empty text");
                SendOutcome::Failed(pending.settle(Message::model(APOLOGY_TEXT)))
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Error getting response");
                SendOutcome::Failed(pending.settle(Message::model(APOLOGY_TEXT)))
            }
            Err(payload) => {
                tracing::error!(
                    "Error getting response: reply source panicked: {}",
                    panic_message(payload.as_ref())
                );
                SendOutcome::Failed(pending.settle(Message::model(APOLOGY_TEXT)))
            }
        }
    }
}

/// Closes out an accepted send
///
/// If dropped unsettled (the send future was abandoned mid-flight) it
/// appends the apology and clears the loading flag.
struct PendingReply<'a> {
    state: &'a watch::Sender<ChatSession>,
    settled: bool,
}

impl<'a> PendingReply<'a> {
    fn new(state: &'a watch::Sender<ChatSession>) -> Self {
        Self {
            state,
            settled: false,
        }
    }

    fn settle(&mut self, message: Message) -> Message {
        self.settled = true;
        let appended = message.clone();
        self.state.send_modify(|session| {
            session.messages.append(message);
            session.is_loading = false;
        });
        appended
    }
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Send abandoned before the reply arrived");
            self.settle(Message::model(APOLOGY_TEXT));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
