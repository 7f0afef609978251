/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes two top-level command modules:

- `chat`: interactive chat session
- `send`: send a single message and print the reply

Both build a `ChatController` over a `WebhookClient` and only talk to the
session through the controller.
*/

use crate::chat::ChatController;
use crate::config::Config;
use crate::error::Result;
use crate::webhook::WebhookClient;
use std::sync::Arc;

// Transcript and status rendering
pub mod display;

// Special commands parser for the interactive session
pub mod special_commands;

/// Build a controller for the configured webhook
///
/// # Errors
///
/// Returns error if the HTTP client cannot be created
pub fn build_controller(config: &Config) -> Result<ChatController> {
    let client = WebhookClient::new(config.webhook.clone())?;
    Ok(ChatController::new(
        Arc::new(client),
        config.chat.greeting.clone(),
    ))
}

// Chat command handler
pub mod chat {
    //! Interactive chat session handler.
    //!
    //! Runs a readline-based loop. Each line is either a special command or
    //! a message for the controller; a typing indicator is drawn while the
    //! controller reports a pending reply.

    use super::display::{
        clear_typing_indicator, format_message, print_history, print_status_display,
        print_welcome_banner, render_typing_indicator,
    };
    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use super::*;
    use crate::chat::{SendOutcome, Sender};
    use crate::error::ButterflyError;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::time::Duration;

    const TYPING_FRAME_INTERVAL: Duration = Duration::from_millis(300);

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat session");

        let controller = build_controller(&config)?;
        let name = config.chat.assistant_name.clone();
        let mut rl = DefaultEditor::new().map_err(ButterflyError::from)?;

        print_welcome_banner(&name, &config.webhook.url);

        let mut rendered = print_new_model_messages(&controller, 0, &name);

        loop {
            match rl.readline("you> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::History) => {
                            print_history(&controller.messages(), &name);
                            continue;
                        }
                        Ok(SpecialCommand::ShowStatus) => {
                            print_status_display(&controller.snapshot(), &config.webhook);
                            continue;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {}
                        Err(e) => {
                            eprintln!("{}", e);
                            continue;
                        }
                    }

                    rl.add_history_entry(trimmed)
                        .map_err(ButterflyError::from)?;

                    let outcome = send_with_indicator(&controller, trimmed, &name).await;
                    if let SendOutcome::Rejected(reason) = outcome {
                        println!("Message not sent: {}\n", reason);
                    }

                    rendered = print_new_model_messages(&controller, rendered, &name);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        tracing::info!(
            messages = controller.messages().len(),
            "Chat session ended"
        );
        Ok(())
    }

    /// Drive a send while animating the typing indicator
    ///
    /// The indicator is drawn from the controller's loading flag, so it shows
    /// only while a reply is actually pending.
    async fn send_with_indicator(
        controller: &ChatController,
        text: &str,
        name: &str,
    ) -> SendOutcome {
        let send = controller.send_message(text);
        tokio::pin!(send);

        let mut ticker = tokio::time::interval(TYPING_FRAME_INTERVAL);
        let mut frame = 0usize;
        let mut drawn = false;

        let outcome = loop {
            tokio::select! {
                biased;
                outcome = &mut send => break outcome,
                _ = ticker.tick() => {
                    if controller.is_loading() {
                        render_typing_indicator(name, frame);
                        frame += 1;
                        drawn = true;
                    }
                }
            }
        };

        if drawn {
            clear_typing_indicator();
        }
        outcome
    }

    /// Print model messages appended since `rendered`; returns the new count
    ///
    /// User messages are skipped since the user's own line is already on
    /// screen.
    fn print_new_model_messages(
        controller: &ChatController,
        rendered: usize,
        name: &str,
    ) -> usize {
        let messages = controller.messages();
        for message in messages.iter().skip(rendered) {
            if message.sender == Sender::Model {
                println!("{}\n", format_message(message, name));
            }
        }
        messages.len()
    }
}

// One-shot send handler
pub mod send {
    //! Sends one message through a fresh session and prints the result.

    use super::*;
    use crate::chat::SendOutcome;

    /// Send `text` and print the reply (or the session as JSON)
    ///
    /// # Errors
    ///
    /// Returns error if the message was rejected or no reply was received,
    /// so the process exits non-zero. The apology text is still printed.
    pub async fn run_send(config: Config, text: String, json: bool) -> Result<()> {
        let controller = build_controller(&config)?;
        let outcome = controller.send_message(&text).await;

        if json {
            println!("{}", serde_json::to_string_pretty(&controller.snapshot())?);
        } else if let Some(message) = outcome.model_message() {
            println!("{}", message.text);
        }

        match outcome {
            SendOutcome::Replied(_) => Ok(()),
            SendOutcome::Failed(_) => anyhow::bail!("No reply received from {}", config.webhook.url),
            SendOutcome::Rejected(reason) => anyhow::bail!("Message not sent: {}", reason),
        }
    }
}
