//! Terminal rendering for sessions, messages and answer tables
//!
//! Renderers return `String`s so the interactive shell and the one-shot
//! commands print identical output and tests can inspect it.

use crate::chat::{Message, Role, Session, Table};
use crate::storage::SessionSummary;
use colored::Colorize;
use prettytable::{format, Cell, Row};
use std::fmt::Write as _;

/// Render an answer table with box borders and a header row
pub fn render_table(table: &Table) -> String {
    let mut out = prettytable::Table::new();
    out.set_format(*format::consts::FORMAT_BOX_CHARS);
    out.set_titles(Row::new(
        table.headers.iter().map(|h| Cell::new(h).style_spec("b")).collect(),
    ));
    for row in &table.rows {
        out.add_row(Row::new(row.iter().map(|cell| Cell::new(cell)).collect()));
    }
    out.to_string()
}

/// Render one message: author line, content, and for answers the table,
/// feedback mark and id
pub fn render_message(message: &Message) -> String {
    let mut out = String::new();
    let time = message.timestamp.format("%H:%M");

    match message.role {
        Role::User => {
            let _ = writeln!(out, "{} {}", "You".bold().blue(), time.to_string().dimmed());
            let _ = writeln!(out, "{}", message.content);
        }
        Role::Assistant => {
            let _ = writeln!(
                out,
                "{} {}",
                "Assistant".bold().green(),
                time.to_string().dimmed()
            );
            let _ = writeln!(out, "{}", message.content);
            if let Some(table) = &message.table {
                out.push_str(&render_table(table));
            }
            let mark = match message.feedback {
                Some(feedback) => format!("[{}]", feedback),
                None => "[no feedback]".to_string(),
            };
            let _ = writeln!(out, "{} {}", mark.dimmed(), message.id.dimmed());
        }
    }

    out
}

/// Render a whole thread, or the welcome placeholder when it is empty
pub fn render_session(session: &Session) -> String {
    if session.messages.is_empty() {
        return welcome_screen();
    }

    let mut out = String::new();
    let _ = writeln!(out, "\n{}  {}\n", session.title.bold(), session.id.dimmed());
    for message in &session.messages {
        out.push_str(&render_message(message));
        out.push('\n');
    }
    out
}

/// Placeholder shown before the first question of a chat
pub fn welcome_screen() -> String {
    let mut out = String::new();
    out.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
    out.push_str("║                   Welcome to Tablechat                       ║\n");
    out.push_str("╚══════════════════════════════════════════════════════════════╝\n\n");
    out.push_str("Start a conversation and get answers with structured data.\n\n");
    let _ = writeln!(
        out,
        "  {}  answers come with tables of data",
        "Smart Responses ".bold()
    );
    let _ = writeln!(
        out,
        "  {}  quick, organized information",
        "Fast & Efficient".bold()
    );
    let _ = writeln!(
        out,
        "  {}  every chat is saved and can be reopened",
        "Session History ".bold()
    );
    out.push_str("\nType a question to start, or '/help' for commands.\n");
    out
}

/// Shown while a question waits for its answer
pub fn thinking_indicator() -> String {
    format!("{}", "Thinking...".dimmed().italic())
}

/// Render the session list, marking the open session with `*`
pub fn render_sidebar(summaries: &[SessionSummary], current: Option<&str>) -> String {
    if summaries.is_empty() {
        return format!("{}\n", "No chats yet.".yellow());
    }

    let mut out = prettytable::Table::new();
    out.set_format(*format::consts::FORMAT_CLEAN);
    for summary in summaries {
        let marker = if Some(summary.id.as_str()) == current {
            "*"
        } else {
            " "
        };
        out.add_row(prettytable::row![marker, short_id(&summary.id), summary.title]);
    }
    out.to_string()
}

/// Display form of a session id: the ULID part without the `session_` prefix
pub fn short_id(id: &str) -> &str {
    id.strip_prefix("session_").unwrap_or(id)
}

/// Log a failed store call and show the user a generic notification
pub fn notify_error(action: &str, err: &anyhow::Error) {
    tracing::error!("{}: {:#}", action, err);
    eprintln!("{} {}", "Error:".red().bold(), action.red());
}
