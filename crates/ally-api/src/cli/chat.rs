//! `ally chat`: one-shot or interactive conversation with the assistant.
//!
//! The interactive loop reads lines from stdin. Lines starting with `/` are
//! in-chat commands; everything else is sent to the model.

use std::io::Write;

use anyhow::Result;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use ally_types::chat::{ChatReply, SessionId, TurnRole};

use crate::state::AppState;

/// Slash commands available inside the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Clear this session's history.
    Reset,
    /// Print this session's history.
    History,
    Exit,
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/reset" | "/new" => Some(ChatCommand::Reset),
        "/history" => Some(ChatCommand::History),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Send one message and print the reply.
pub async fn send_once(
    state: &AppState,
    session: Option<&str>,
    message: &str,
    json: bool,
) -> Result<()> {
    if message.trim().is_empty() {
        anyhow::bail!("message must not be empty");
    }

    let session_id = SessionId::from_optional(session);
    let reply = state.chat_service.send_message(&session_id, message).await;

    if json {
        let out = serde_json::json!({
            "session_id": session_id,
            "reply": reply.text(),
            "outcome": reply.outcome(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_reply(&reply);
    }

    if let ChatReply::Failed { message } = &reply {
        anyhow::bail!("chat request failed: {message}");
    }
    Ok(())
}

/// Run the interactive loop until `/exit` or end of input.
pub async fn run_interactive(state: &AppState, session: Option<&str>) -> Result<()> {
    let session_id = SessionId::from_optional(session);

    println!();
    println!(
        "  {} Ally legal assistant {}",
        style("⚖").bold(),
        style(format!("(session {session_id})")).dim()
    );
    println!(
        "  {}",
        style("Type /help for commands, /exit to quit.").dim()
    );
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", style("you ›").cyan().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match parse_command(input) {
            Some(ChatCommand::Exit) => break,
            Some(ChatCommand::Help) => print_help(),
            Some(ChatCommand::Reset) => {
                state.chat_service.reset_history(&session_id).await;
                println!("  {} History cleared", style("✓").green().bold());
            }
            Some(ChatCommand::History) => {
                let turns = state.chat_service.history(&session_id).await;
                if turns.is_empty() {
                    println!("  {}", style("No messages yet.").dim());
                }
                for turn in turns {
                    let who = match turn.role {
                        TurnRole::User => style("you").cyan(),
                        TurnRole::Model => style("ally").magenta(),
                    };
                    println!("  {who}: {}", turn.text());
                }
            }
            Some(ChatCommand::Unknown(cmd)) => {
                println!(
                    "  {} Unknown command {}. Try {}",
                    style("?").yellow().bold(),
                    style(cmd).bold(),
                    style("/help").yellow()
                );
            }
            None => {
                let reply = state.chat_service.send_message(&session_id, input).await;
                print_reply(&reply);
            }
        }
    }

    println!("  {}", style("Goodbye.").dim());
    Ok(())
}

fn print_reply(reply: &ChatReply) {
    match reply {
        ChatReply::Answer(text) => {
            println!("{} {text}", style("ally ›").magenta().bold());
        }
        ChatReply::Degraded { reason } => {
            println!(
                "{} {} {}",
                style("ally ›").magenta().bold(),
                reply.text(),
                style(format!("({reason})")).dim()
            );
        }
        ChatReply::Failed { .. } => {
            println!("{} {}", style("ally ›").red().bold(), style(reply.text()).red());
        }
    }
}

fn print_help() {
    println!();
    println!("  {}  show this help", style("/help").yellow());
    println!("  {}  clear the conversation", style("/reset").yellow());
    println!("  {}  show the conversation so far", style("/history").yellow());
    println!("  {}  leave the chat", style("/exit").yellow());
    println!();
}
