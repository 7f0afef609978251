//! Chat session module for Butterfly
//!
//! This module contains the chat message model, the append-only message
//! store, and the conversation controller that drives a webhook round trip.

pub mod controller;
pub mod message;
pub mod store;

pub use controller::{ChatController, RejectReason, SendOutcome, APOLOGY_TEXT};
pub use message::{Message, MessageId, Sender};
pub use store::{ChatSession, MessageStore};
