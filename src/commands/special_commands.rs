//! Special commands parser for interactive chat mode
//!
//! Lines starting with `/` are shell commands rather than questions:
//! - Start a new chat or open an existing one
//! - List sessions and collapse/expand the session sidebar
//! - Like or dislike an answer
//! - Display help information
//! - Exit the session
//!
//! Command words are case-insensitive; arguments (session and message ids)
//! keep their case.

use crate::chat::Feedback;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Which assistant message a feedback command targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackTarget {
    /// The most recent assistant message of the open session
    Last,
    /// A message by id
    Message(String),
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a new chat session and switch to it
    NewChat,

    /// Print the session list, marking the open session
    ListSessions,

    /// Collapse or expand the session list shown before each prompt
    ToggleSidebar,

    /// Switch to another session (id or unique prefix)
    Open(String),

    /// Re-print every message of the open session
    Show,

    /// Like or dislike an answer; repeating a value clears it
    Feedback {
        target: FeedbackTarget,
        value: Feedback,
    },

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be asked as a question.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is
/// not a valid command, `CommandError::MissingArgument` when `/open` has no
/// session id, and `CommandError::UnsupportedArgument` for arguments given
/// to commands that take none.
///
/// # Examples
///
/// ```
/// use tablechat::commands::special_commands::{
///     parse_special_command, FeedbackTarget, SpecialCommand,
/// };
/// use tablechat::chat::Feedback;
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewChat);
/// assert_eq!(
///     parse_special_command("/like").unwrap(),
///     SpecialCommand::Feedback { target: FeedbackTarget::Last, value: Feedback::Like }
/// );
/// assert_eq!(parse_special_command("what is rust?").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') {
        return Ok(match lower.as_str() {
            "exit" | "quit" => SpecialCommand::Exit,
            _ => SpecialCommand::None,
        });
    }

    let (word, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };

    let no_arg = |command: SpecialCommand| {
        if arg.is_empty() {
            Ok(command)
        } else {
            Err(CommandError::UnsupportedArgument {
                command: word.clone(),
                arg: arg.to_string(),
            })
        }
    };

    match word.as_str() {
        "/new" => no_arg(SpecialCommand::NewChat),
        "/sessions" | "/list" => no_arg(SpecialCommand::ListSessions),
        "/sidebar" => no_arg(SpecialCommand::ToggleSidebar),
        "/show" => no_arg(SpecialCommand::Show),
        "/help" | "/?" => no_arg(SpecialCommand::Help),
        "/exit" | "/quit" => no_arg(SpecialCommand::Exit),

        "/open" => {
            if arg.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "/open".to_string(),
                    usage: "/open <session-id>".to_string(),
                })
            } else {
                Ok(SpecialCommand::Open(arg.to_string()))
            }
        }

        "/like" | "/dislike" => {
            let value = if word == "/like" {
                Feedback::Like
            } else {
                Feedback::Dislike
            };
            let target = if arg.is_empty() || arg.eq_ignore_ascii_case("last") {
                FeedbackTarget::Last
            } else {
                FeedbackTarget::Message(arg.to_string())
            };
            Ok(SpecialCommand::Feedback { target, value })
        }

        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help for the interactive shell
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

SESSIONS:
  /new              - Start a new chat
  /sessions         - List chats, most recent first (* marks the open one)
  /open <id>        - Switch to a chat (a unique id prefix is enough)
  /show             - Print the open chat again
  /sidebar          - Collapse or expand the chat list shown before each prompt

FEEDBACK:
  /like [id|last]    - Like an answer (default: the latest answer)
  /dislike [id|last] - Dislike an answer
  Repeating the same mark on an answer clears it.

OTHER:
  /help             - Show this help
  /exit, exit, quit - Leave the chat

Anything else is sent as a question. Without an open chat a new one is
started automatically.
"#
    );
}
