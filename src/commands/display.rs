//! Terminal rendering for the chat session
//!
//! Formatting helpers return plain `String`s (colored with `colored`) so they
//! can be tested; the `print_*` functions write them to stdout.

use crate::chat::{ChatSession, Message, Sender};
use crate::config::WebhookConfig;
use colored::Colorize;
use std::io::Write;

const TYPING_FRAMES: [&str; 3] = [".  ", ".. ", "..."];

/// Colored author tag for a message
///
/// # Examples
///
/// ```
/// use butterfly::chat::Sender;
/// use butterfly::commands::display::sender_tag;
///
/// colored::control::set_override(false);
/// assert_eq!(sender_tag(Sender::User, "Butterfly"), "[you]");
/// assert_eq!(sender_tag(Sender::Model, "Butterfly"), "[Butterfly]");
/// ```
pub fn sender_tag(sender: Sender, assistant_name: &str) -> String {
    match sender {
        Sender::User => format!("[{}]", "you".cyan()),
        Sender::Model => format!("[{}]", assistant_name.magenta()),
    }
}

/// Render a single message as `[author] text`
pub fn format_message(message: &Message, assistant_name: &str) -> String {
    format!(
        "{} {}",
        sender_tag(message.sender, assistant_name),
        message.text
    )
}

/// Typing indicator frame `n` (cycles through three frames)
pub fn typing_frame(assistant_name: &str, frame: usize) -> String {
    format!(
        "{} is typing{}",
        assistant_name,
        TYPING_FRAMES[frame % TYPING_FRAMES.len()]
    )
}

/// Draw the typing indicator in place on the current line
pub fn render_typing_indicator(assistant_name: &str, frame: usize) {
    print!("\r{}", typing_frame(assistant_name, frame).dimmed());
    let _ = std::io::stdout().flush();
}

/// Erase the typing indicator line
pub fn clear_typing_indicator() {
    print!("\r\x1b[2K");
    let _ = std::io::stdout().flush();
}

pub fn print_welcome_banner(assistant_name: &str, endpoint: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{:^62}║", assistant_name);
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("Webhook: {}", endpoint.dimmed());
    println!("Type '/help' for available commands, 'exit' to quit\n");
}

/// Print every message of the session, oldest first
pub fn print_history(messages: &[Message], assistant_name: &str) {
    println!();
    for message in messages {
        println!(
            "{} {}",
            message.created_at.format("%H:%M:%S").to_string().dimmed(),
            format_message(message, assistant_name)
        );
    }
    println!();
}

/// Display endpoint configuration and session state
pub fn print_status_display(session: &ChatSession, webhook: &WebhookConfig) {
    let user_count = session.messages.iter().filter(|m| m.is_user()).count();

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                        Session Status                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("Webhook:           {} ({:?})", webhook.url, webhook.method);
    println!(
        "Wire Format:       {} -> {} ({:?})",
        webhook.request_field, webhook.response_field, webhook.response_format
    );
    println!("Timeout:           {}s", webhook.timeout_seconds);
    println!(
        "Conversation Size: {} messages ({} from you)",
        session.messages.len(),
        user_count
    );
    println!(
        "Reply Pending:     {}",
        if session.is_loading { "yes" } else { "no" }
    );
    println!();
}
