//! Tablechat - chat sessions answered with tables
//!
//! This library provides the session model, the canned answer generator,
//! and the persisted session store behind the `tablechat` CLI.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `chat`: Session/message/table records, answer routing and the session store
//! - `storage`: Durable key-value blob storage (sled or in-memory)
//! - `commands`: CLI command handlers, rendering and the interactive shell
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use tablechat::{Config, SessionStore};
//! use tablechat::storage::MemoryBlobStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let mut store = SessionStore::open(Box::new(MemoryBlobStore::new()), &config)?;
//!
//!     let session = store.create_session().await?;
//!     let answer = store.ask_question(&session.id, "Compare cloud providers").await?;
//!     println!("{}", answer.content);
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod storage;

// Re-export commonly used types
pub use chat::{Feedback, FeedbackOutcome, Message, Role, Session, SessionStore, Table};
pub use config::Config;
pub use error::{Result, TableChatError};

#[cfg(test)]
pub mod test_utils;
