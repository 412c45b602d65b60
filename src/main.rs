//! Tablechat - chat sessions answered with tables
//!
#![doc = "Main entry point for the Tablechat CLI."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tablechat::cli::{Cli, Commands};
use tablechat::commands;
use tablechat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    let mut store = commands::open_store(&config, cli.ephemeral)?;

    match cli.command {
        Commands::Chat { session } => {
            if let Some(s) = &session {
                tracing::debug!("Opening session: {}", s);
            }
            commands::chat::run_chat(store, config.chat.show_sidebar, session).await?;
            Ok(())
        }
        Commands::Ask { session, question } => {
            tracing::info!("Asking a single question");
            commands::ask::run_ask(&mut store, session, &question.join(" ")).await?;
            Ok(())
        }
        Commands::Sessions { command } => {
            tracing::info!("Starting sessions command");
            commands::history::handle_sessions(&store, command).await?;
            Ok(())
        }
        Commands::Feedback {
            session,
            message,
            value,
        } => {
            commands::feedback::run_feedback(&mut store, &session, &message, value.into()).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with rendered tables.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "tablechat=debug"
    } else {
        "tablechat=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
