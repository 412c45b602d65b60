//! Session, message and table records
//!
//! These are the shapes persisted in the blob store and handed to the
//! shell. Field names serialize in camelCase (`createdAt`, `tableData`)
//! and timestamps as RFC 3339 strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use ulid::Ulid;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// Like/dislike mark on an assistant message
///
/// "No feedback" is represented by `None` wherever a `Feedback` is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Like,
    Dislike,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Like => write!(f, "like"),
            Self::Dislike => write!(f, "dislike"),
        }
    }
}

/// Tabular payload attached to an assistant message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Column headers, in display order
    pub headers: Vec<String>,
    /// Rows of cells; each row has exactly `headers.len()` cells
    pub rows: Vec<Vec<String>>,
    /// Prose summary shown above the table
    pub description: String,
}

impl Table {
    /// True when the table has headers, rows, and no ragged row
    pub fn is_well_formed(&self) -> bool {
        !self.headers.is_empty()
            && !self.rows.is_empty()
            && self.rows.iter().all(|row| row.len() == self.headers.len())
    }
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(rename = "tableData", default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Build a user message carrying `content`
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: new_message_id(Role::User),
            role: Role::User,
            content: content.into(),
            table: None,
            feedback: None,
            timestamp,
        }
    }

    /// Build an assistant answer whose content is the table description
    pub fn assistant(table: Table, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: new_message_id(Role::Assistant),
            role: Role::Assistant,
            content: table.description.clone(),
            table: Some(table),
            feedback: None,
            timestamp,
        }
    }

    /// Check the role-specific invariants of a message
    ///
    /// User messages carry neither a table nor feedback; assistant
    /// messages always carry a well-formed table.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self.role {
            Role::User => {
                if self.table.is_some() {
                    return Err(format!("user message {} carries a table", self.id));
                }
                if self.feedback.is_some() {
                    return Err(format!("user message {} carries feedback", self.id));
                }
            }
            Role::Assistant => match &self.table {
                None => return Err(format!("assistant message {} has no table", self.id)),
                Some(table) if !table.is_well_formed() => {
                    return Err(format!(
                        "assistant message {} has a malformed table",
                        self.id
                    ))
                }
                Some(_) => {}
            },
        }
        Ok(())
    }
}

/// One conversation thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty session titled `title`, stamped at `now`
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: new_session_id(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of user-authored messages
    pub fn user_message_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == Role::User)
            .count()
    }

    /// Look up a message by id
    pub fn message(&self, message_id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == message_id)
    }

    pub(crate) fn message_mut(&mut self, message_id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == message_id)
    }

    /// Most recent assistant message, if any
    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
    }

    /// Check the session and every message it holds
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("session id is empty".to_string());
        }
        if self.updated_at < self.created_at {
            return Err(format!("session {} was updated before it was created", self.id));
        }

        let mut seen = HashSet::new();
        for message in &self.messages {
            if !seen.insert(message.id.as_str()) {
                return Err(format!(
                    "session {} repeats message id {}",
                    self.id, message.id
                ));
            }
            message.validate()?;
        }
        Ok(())
    }
}

/// Generate a session identifier: `session_<ULID>`
///
/// The ULID encodes the creation millisecond followed by 80 random bits.
pub fn new_session_id() -> String {
    format!("session_{}", Ulid::new())
}

/// Generate a message identifier: `msg_<ULID>_<role>`
pub fn new_message_id(role: Role) -> String {
    format!("msg_{}_{}", Ulid::new(), role)
}
