/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`: Interactive chat shell
- `ask`: Ask one question and print the answer
- `feedback`: Like or dislike one answer
- `history`: List and show stored sessions

Every handler works against a [`SessionStore`] opened by [`open_store`].
*/

use crate::chat::{FeedbackOutcome, SessionStore};
use crate::config::Config;
use crate::error::Result;
use crate::storage::open_blob_store;
use colored::Colorize;

pub mod history;
pub mod render;
pub mod special_commands;

/// Open the session store described by `config`
///
/// Logs a warning when persisted records had to be quarantined.
pub fn open_store(config: &Config, ephemeral: bool) -> Result<SessionStore> {
    let blob = open_blob_store(&config.storage, ephemeral)?;
    let store = SessionStore::open(blob, config)?;

    let report = store.load_report();
    if report.quarantined > 0 {
        tracing::warn!(
            "{} stored sessions were malformed and moved to '{}.quarantine'",
            report.quarantined,
            config.storage.key
        );
    }

    Ok(store)
}

fn describe_feedback(message_id: &str, outcome: FeedbackOutcome) -> String {
    match outcome {
        FeedbackOutcome::Applied(Some(value)) => {
            format!("Marked {} as {}", message_id, value).green().to_string()
        }
        FeedbackOutcome::Applied(None) => format!("Cleared feedback on {}", message_id)
            .green()
            .to_string(),
        FeedbackOutcome::NotApplicable => format!("No answer {} to rate", message_id)
            .yellow()
            .to_string(),
    }
}

// Interactive chat shell
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! A readline loop standing in for a chat window: an optional session
    //! list before each prompt, questions answered inline with tables, and
    //! slash commands for session switching and feedback. Failed store calls
    //! are reported with a short notification and the loop carries on.

    use super::*;
    use crate::chat::Feedback;
    use crate::commands::render::{
        notify_error, render_message, render_session, render_sidebar, short_id,
        thinking_indicator, welcome_screen,
    };
    use crate::commands::special_commands::{
        parse_special_command, print_help, FeedbackTarget, SpecialCommand,
    };
    use crate::storage::SessionSummary;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// What the loop does after handling a line
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Flow {
        Continue,
        Exit,
    }

    /// Shell state kept between prompts
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ShellState {
        /// Id of the open session, if any
        pub current: Option<String>,
        /// Whether the session list is printed before each prompt
        pub sidebar_open: bool,
    }

    impl ShellState {
        pub fn new(sidebar_open: bool) -> Self {
            Self {
                current: None,
                sidebar_open,
            }
        }
    }

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `store` - Session store to work against
    /// * `show_sidebar` - Initial sidebar state
    /// * `session` - Session to open on start (id or unique prefix)
    pub async fn run_chat(
        mut store: SessionStore,
        show_sidebar: bool,
        session: Option<String>,
    ) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let mut state = ShellState::new(show_sidebar);
        if let Some(requested) = session {
            match store.resolve_id(&requested) {
                Ok(id) => state.current = Some(id),
                Err(e) => notify_error("Failed to load session", &e),
            }
        }

        let mut rl = DefaultEditor::new()?;
        show_current(&store, &state).await;

        loop {
            if state.sidebar_open {
                print_sidebar(&store, &state).await;
            }

            match rl.readline(&format_prompt(&store, &state)) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    if handle_input(&mut store, &mut state, trimmed).await == Flow::Exit {
                        break;
                    }
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

        println!("Goodbye!");
        Ok(())
    }

    /// Handle one line of input
    ///
    /// Never returns an error: store failures are shown as notifications.
    pub async fn handle_input(
        store: &mut SessionStore,
        state: &mut ShellState,
        input: &str,
    ) -> Flow {
        let command = match parse_special_command(input) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e.to_string().red());
                return Flow::Continue;
            }
        };

        match command {
            SpecialCommand::Exit => return Flow::Exit,
            SpecialCommand::NewChat => match store.create_session().await {
                Ok(session) => {
                    state.current = Some(session.id.clone());
                    print!("{}", render_session(&session));
                }
                Err(e) => notify_error("Failed to create new chat", &e),
            },
            SpecialCommand::ListSessions => print_sidebar(store, state).await,
            SpecialCommand::ToggleSidebar => {
                state.sidebar_open = !state.sidebar_open;
                let status = if state.sidebar_open {
                    "expanded"
                } else {
                    "collapsed"
                };
                println!("Sidebar {}", status);
            }
            SpecialCommand::Open(requested) => match store.resolve_id(&requested) {
                Ok(id) => {
                    state.current = Some(id);
                    show_current(store, state).await;
                }
                Err(e) => notify_error("Failed to load session", &e),
            },
            SpecialCommand::Show => show_current(store, state).await,
            SpecialCommand::Feedback { target, value } => {
                give_feedback(store, state, target, value).await
            }
            SpecialCommand::Help => print_help(),
            SpecialCommand::None => send_message(store, state, input).await,
        }

        Flow::Continue
    }

    /// Ask `text` in the open session, starting a new one if none is open
    async fn send_message(store: &mut SessionStore, state: &mut ShellState, text: &str) {
        let session_id = match &state.current {
            Some(id) => id.clone(),
            None => match store.create_session().await {
                Ok(session) => {
                    state.current = Some(session.id.clone());
                    session.id
                }
                Err(e) => {
                    notify_error("Failed to create new chat", &e);
                    return;
                }
            },
        };

        println!("{}", thinking_indicator());
        match store.ask_question(&session_id, text).await {
            Ok(answer) => print!("\n{}\n", render_message(&answer)),
            Err(e) => notify_error("Failed to send message", &e),
        }
    }

    async fn give_feedback(
        store: &mut SessionStore,
        state: &ShellState,
        target: FeedbackTarget,
        value: Feedback,
    ) {
        let Some(session_id) = state.current.as_deref() else {
            println!("{}", "Open a chat first (/new or /open <id>)".yellow());
            return;
        };

        let message_id = match target {
            FeedbackTarget::Message(id) => id,
            FeedbackTarget::Last => match store.get_session(session_id).await {
                Ok(Some(session)) => match session.last_assistant_message() {
                    Some(message) => message.id.clone(),
                    None => {
                        println!("{}", "No answers to rate yet".yellow());
                        return;
                    }
                },
                Ok(None) => {
                    println!("{}", "No answers to rate yet".yellow());
                    return;
                }
                Err(e) => {
                    notify_error("Failed to load session", &e);
                    return;
                }
            },
        };

        match store.set_feedback(session_id, &message_id, value).await {
            Ok(outcome) => println!("{}", describe_feedback(&message_id, outcome)),
            Err(e) => notify_error("Failed to update feedback", &e),
        }
    }

    /// Print the session list with the open session marked
    async fn print_sidebar(store: &SessionStore, state: &ShellState) {
        match store.list_sessions().await {
            Ok(sessions) => {
                let summaries: Vec<SessionSummary> =
                    sessions.iter().map(SessionSummary::from).collect();
                print!("{}", render_sidebar(&summaries, state.current.as_deref()));
            }
            Err(e) => notify_error("Failed to load sessions", &e),
        }
    }

    async fn show_current(store: &SessionStore, state: &ShellState) {
        let Some(id) = state.current.as_deref() else {
            print!("{}", welcome_screen());
            return;
        };

        match store.get_session(id).await {
            Ok(Some(session)) => print!("{}", render_session(&session)),
            Ok(None) => {
                print!("{}", welcome_screen());
            }
            Err(e) => notify_error("Failed to load session", &e),
        }
    }

    fn format_prompt(store: &SessionStore, state: &ShellState) -> String {
        let title = state
            .current
            .as_deref()
            .and_then(|id| store.peek(id))
            .map(|session| session.title.as_str());

        match (title, state.current.as_deref()) {
            (Some(title), Some(id)) => format!("[{} {}] > ", title.cyan(), short_id(id).dimmed()),
            _ => "> ".to_string(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::chat::SessionStore;

        fn test_store() -> SessionStore {
            crate::test_utils::memory_store().0
        }

        #[tokio::test]
        async fn test_question_without_session_starts_one() {
            let mut store = test_store();
            let mut state = ShellState::new(false);

            let flow = handle_input(&mut store, &mut state, "Which web framework?").await;

            assert_eq!(flow, Flow::Continue);
            let id = state.current.clone().expect("a session was opened");
            let session = store.get_session(&id).await.unwrap().unwrap();
            assert_eq!(session.messages.len(), 2);
            assert_eq!(session.title, "Which web framework?");
        }

        #[tokio::test]
        async fn test_new_chat_switches_current() {
            let mut store = test_store();
            let mut state = ShellState::new(false);

            handle_input(&mut store, &mut state, "first question").await;
            let first = state.current.clone();
            handle_input(&mut store, &mut state, "/new").await;

            assert_ne!(state.current, first);
            assert_eq!(store.len(), 2);
        }

        #[tokio::test]
        async fn test_like_last_then_like_again_clears() {
            let mut store = test_store();
            let mut state = ShellState::new(false);
            handle_input(&mut store, &mut state, "cloud provider costs").await;
            let id = state.current.clone().unwrap();

            handle_input(&mut store, &mut state, "/like").await;
            let session = store.get_session(&id).await.unwrap().unwrap();
            assert_eq!(
                session.last_assistant_message().unwrap().feedback,
                Some(Feedback::Like)
            );

            handle_input(&mut store, &mut state, "/like last").await;
            let session = store.get_session(&id).await.unwrap().unwrap();
            assert_eq!(session.last_assistant_message().unwrap().feedback, None);
        }

        #[tokio::test]
        async fn test_open_unknown_session_keeps_current() {
            let mut store = test_store();
            let mut state = ShellState::new(false);
            handle_input(&mut store, &mut state, "/new").await;
            let before = state.current.clone();

            handle_input(&mut store, &mut state, "/open session_missing").await;
            assert_eq!(state.current, before);
        }

        #[tokio::test]
        async fn test_sidebar_toggle_and_exit() {
            let mut store = test_store();
            let mut state = ShellState::new(true);

            handle_input(&mut store, &mut state, "/sidebar").await;
            assert!(!state.sidebar_open);
            assert_eq!(
                handle_input(&mut store, &mut state, "quit").await,
                Flow::Exit
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_session_list_command_waits_for_listing() {
            let config = crate::config::Config::default();
            let mut store =
                SessionStore::open(Box::new(crate::storage::MemoryBlobStore::new()), &config)
                    .unwrap();
            let mut state = ShellState::new(false);
            handle_input(&mut store, &mut state, "/new").await;

            let started = tokio::time::Instant::now();
            let flow = handle_input(&mut store, &mut state, "/sessions").await;
            assert_eq!(flow, Flow::Continue);
            assert!(
                started.elapsed() >= std::time::Duration::from_millis(config.latency.list_ms)
            );
        }

        #[tokio::test]
        async fn test_unknown_command_is_not_sent_as_question() {
            let mut store = test_store();
            let mut state = ShellState::new(false);

            handle_input(&mut store, &mut state, "/bogus").await;
            assert!(store.is_empty());
            assert!(state.current.is_none());
        }
    }
}

// One-shot question
pub mod ask {
    use super::*;
    use crate::commands::render::render_message;
    use crate::error::TableChatError;

    /// Ask one question and print the answer
    ///
    /// Creates a session when `session` is `None`.
    pub async fn run_ask(
        store: &mut SessionStore,
        session: Option<String>,
        question: &str,
    ) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(TableChatError::EmptyQuestion.into());
        }

        let session_id = match session {
            Some(requested) => store.resolve_id(&requested)?,
            None => store.create_session().await?.id,
        };

        let answer = store.ask_question(&session_id, question).await?;
        print!("{}", render_message(&answer));
        println!("Session: {}", session_id.cyan());

        Ok(session_id)
    }
}

// One-shot feedback
pub mod feedback {
    use super::*;
    use crate::chat::Feedback;

    /// Toggle feedback on one answer and print the result
    pub async fn run_feedback(
        store: &mut SessionStore,
        session: &str,
        message_id: &str,
        value: Feedback,
    ) -> Result<FeedbackOutcome> {
        let session_id = store.resolve_id(session)?;
        let outcome = store.set_feedback(&session_id, message_id, value).await?;
        println!("{}", describe_feedback(message_id, outcome));
        Ok(outcome)
    }
}
