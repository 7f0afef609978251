//! Special commands parser for interactive chat mode
//!
//! Special commands are handled by the shell instead of being sent to the
//! webhook. They are prefixed with `/` and are case-insensitive; `exit` and
//! `quit` also work without the prefix.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Display help information
    Help,

    /// Print the whole transcript of the session
    History,

    /// Display session status (endpoint, message count, loading flag)
    ShowStatus,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the webhook as a regular message.
    None,
}

/// Parse user input into a special command
///
/// # Examples
///
/// ```
/// use butterfly::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/HELP").unwrap(), SpecialCommand::Help);
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/history" => Ok(SpecialCommand::History),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/exit" | "/quit" | "exit" | "quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print the special command reference
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat
=====================================

  /help           - Show this help
  /history        - Print every message in this session
  /status         - Show the webhook endpoint and session state
  /exit, /quit    - Leave the chat (plain 'exit' and 'quit' work too)

Anything else is sent to the assistant as a message.
"#
    );
}
