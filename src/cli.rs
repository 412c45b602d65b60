//! Command-line interface definition for Tablechat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the interactive chat loop and one-shot session commands.

use clap::{Parser, Subcommand, ValueEnum};

use crate::chat::Feedback;

/// Tablechat - ask questions, get tables
///
/// Keeps a history of chat sessions on disk and answers every question
/// with a table of data.
#[derive(Parser, Debug, Clone)]
#[command(name = "tablechat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory of the session store (overrides config)
    #[arg(long)]
    pub storage_path: Option<String>,

    /// Keep sessions in memory only; nothing is written to disk
    #[arg(long)]
    pub ephemeral: bool,

    /// Skip the artificial response delays
    #[arg(long)]
    pub no_delay: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Tablechat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start interactive chat mode
    Chat {
        /// Open this session on start (id or unique id prefix)
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Ask a single question and print the answer
    Ask {
        /// Session to ask in; a new session is created when omitted
        #[arg(short, long)]
        session: Option<String>,

        /// The question text
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Inspect stored sessions
    Sessions {
        /// Session subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Like or dislike an assistant message
    Feedback {
        /// Session id (or unique prefix)
        session: String,

        /// Message id
        message: String,

        /// Feedback value; repeating the current value clears it
        #[arg(value_enum)]
        value: FeedbackArg,
    },
}

/// Session history subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List sessions, most recently updated first
    List,

    /// Print every message of a session
    Show {
        /// Session id (or unique prefix)
        id: String,
    },
}

/// Feedback values accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackArg {
    Like,
    Dislike,
}

impl From<FeedbackArg> for Feedback {
    fn from(arg: FeedbackArg) -> Self {
        match arg {
            FeedbackArg::Like => Feedback::Like,
            FeedbackArg::Dislike => Feedback::Dislike,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
