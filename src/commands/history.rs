use crate::chat::SessionStore;
use crate::cli::SessionCommand;
use crate::commands::render::{render_session, short_id};
use crate::error::{Result, TableChatError};
use crate::storage::SessionSummary;
use colored::Colorize;
use prettytable::{format, Table};

/// Handle `sessions` subcommands
pub async fn handle_sessions(store: &SessionStore, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::List => {
            let sessions: Vec<SessionSummary> = store
                .list_sessions()
                .await?
                .iter()
                .map(SessionSummary::from)
                .collect();

            if sessions.is_empty() {
                println!("{}", "No conversation history found.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "ID".bold(),
                "Title".bold(),
                "Messages".bold(),
                "Last Updated".bold()
            ]);

            for session in sessions {
                let updated = session.updated_at.format("%Y-%m-%d %H:%M").to_string();
                table.add_row(prettytable::row![
                    short_id(&session.id).cyan(),
                    session.title,
                    session.message_count,
                    updated
                ]);
            }

            println!("\nConversation History:");
            table.printstd();
            println!();
            println!(
                "Use {} to continue a session.",
                "tablechat chat --session <ID>".cyan()
            );
            println!();
        }
        SessionCommand::Show { id } => {
            let id = store.resolve_id(&id)?;
            let session = store
                .get_session(&id)
                .await?
                .ok_or(TableChatError::SessionNotFound(id))?;
            print!("{}", render_session(&session));
        }
    }

    Ok(())
}
