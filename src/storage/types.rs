use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::Session;

/// Listing metadata for a stored session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Unique identifier for the session
    pub id: String,
    /// Title derived from the first question
    pub title: String,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// When a question was last asked
    pub updated_at: DateTime<Utc>,
    /// Number of messages in the session
    pub message_count: usize,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            title: session.title.clone(),
            created_at: session.created_at,
            updated_at: session.updated_at,
            message_count: session.messages.len(),
        }
    }
}

/// Outcome of loading the persisted collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Sessions accepted into the store
    pub loaded: usize,
    /// Records rejected and moved to the quarantine key
    pub quarantined: usize,
}
