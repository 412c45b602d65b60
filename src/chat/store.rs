//! Session store
//!
//! Owns every [`Session`] and persists the whole collection as one JSON
//! array under a single blob key after each mutation. The persisted
//! collection is read exactly once, in [`SessionStore::open`], where every
//! record is decoded and validated on its own; records that fail are moved
//! to a quarantine key instead of aborting the load.
//!
//! Every operation follows the same shape: validate, wait out the
//! configured artificial delay, build the changed session, persist, and
//! only then commit it to memory. A failed write leaves the store as it
//! was before the call.

use crate::chat::responder::Responder;
use crate::chat::types::{Feedback, Message, Role, Session};
use crate::config::{Config, LatencyConfig};
use crate::error::{Result, TableChatError};
use crate::storage::{BlobStore, LoadReport};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;

/// Result of a feedback request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// Feedback was toggled; holds the mark now on the message
    Applied(Option<Feedback>),
    /// The session or message does not exist, or the message was written
    /// by the user. Nothing changed.
    NotApplicable,
}

/// Owner of all chat sessions
pub struct SessionStore {
    blob: Box<dyn BlobStore>,
    key: String,
    sessions: HashMap<String, Session>,
    responder: Responder,
    latency: LatencyConfig,
    default_title: String,
    load_report: LoadReport,
}

impl SessionStore {
    /// Open the store, loading and validating the persisted collection
    ///
    /// A missing key yields an empty store. Individual malformed records
    /// are quarantined under `<key>.quarantine` and reported in
    /// [`SessionStore::load_report`].
    ///
    /// # Errors
    ///
    /// Returns `TableChatError::CorruptStore` when the stored value is not
    /// a JSON array, and storage errors from the blob store.
    pub fn open(blob: Box<dyn BlobStore>, config: &Config) -> Result<Self> {
        let key = config.storage.key.clone();
        let (sessions, rejected) = decode_collection(blob.get(&key)?.as_deref())?;

        let load_report = LoadReport {
            loaded: sessions.len(),
            quarantined: rejected.len(),
        };

        let store = Self {
            blob,
            key,
            sessions,
            responder: Responder::from_config(&config.chat),
            latency: config.latency.clone(),
            default_title: config.chat.default_title.clone(),
            load_report,
        };

        if !rejected.is_empty() {
            store.quarantine(rejected)?;
            store.persist()?;
        }

        tracing::info!(
            "Opened session store with {} sessions ({} quarantined)",
            store.load_report.loaded,
            store.load_report.quarantined
        );

        Ok(store)
    }

    /// What happened while loading the persisted collection
    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// Number of sessions held
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Start a new, empty session
    pub async fn create_session(&mut self) -> Result<Session> {
        self.pause(self.latency.create_ms).await;

        let session = Session::new(self.default_title.clone(), Utc::now());
        self.commit(session.clone())?;

        tracing::info!("Created session {}", session.id);
        Ok(session)
    }

    /// All sessions, most recently updated first
    ///
    /// Sessions with equal `updated_at` are ordered by id.
    pub async fn list_sessions(&self) -> Result<Vec<Session>> {
        self.pause(self.latency.list_ms).await;
        Ok(self.sorted().into_iter().cloned().collect())
    }

    /// Fetch one session; an unknown id yields `None`
    pub async fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        self.pause(self.latency.get_ms).await;
        Ok(self.sessions.get(session_id).cloned())
    }

    /// Ask a question in a session and return the assistant's answer
    ///
    /// Appends the user message and the answer, titles the session from
    /// its first question, and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `TableChatError::SessionNotFound` if the session does not
    /// exist; nothing is changed or persisted in that case.
    pub async fn ask_question(&mut self, session_id: &str, text: &str) -> Result<Message> {
        if !self.sessions.contains_key(session_id) {
            return Err(TableChatError::SessionNotFound(session_id.to_string()).into());
        }

        self.pause(self.latency.ask_ms).await;

        let table = self.responder.respond(text);
        let first_question_title = self.responder.title(text);

        let mut session = self
            .sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| TableChatError::SessionNotFound(session_id.to_string()))?;

        let now = Utc::now();
        session.messages.push(Message::user(text, now));
        let answer = Message::assistant(table, now);
        session.messages.push(answer.clone());

        if session.user_message_count() == 1 {
            session.title = first_question_title;
        }
        session.updated_at = now;

        tracing::debug!(
            "Session {} now holds {} messages",
            session_id,
            session.messages.len()
        );

        self.commit(session)?;
        Ok(answer)
    }

    /// Toggle feedback on an assistant message
    ///
    /// Giving the value a message already holds clears it; any other value
    /// replaces it. Requests against a missing session, a missing message,
    /// or a user message are not errors: they report
    /// [`FeedbackOutcome::NotApplicable`] and persist nothing.
    pub async fn set_feedback(
        &mut self,
        session_id: &str,
        message_id: &str,
        value: Feedback,
    ) -> Result<FeedbackOutcome> {
        self.pause(self.latency.feedback_ms).await;

        let Some(mut session) = self.sessions.get(session_id).cloned() else {
            tracing::debug!("Feedback ignored: no session {}", session_id);
            return Ok(FeedbackOutcome::NotApplicable);
        };
        let Some(message) = session.message_mut(message_id) else {
            tracing::debug!(
                "Feedback ignored: no message {} in session {}",
                message_id,
                session_id
            );
            return Ok(FeedbackOutcome::NotApplicable);
        };

        if message.role != Role::Assistant {
            tracing::debug!("Feedback ignored: message {} is a user message", message_id);
            return Ok(FeedbackOutcome::NotApplicable);
        }

        message.feedback = if message.feedback == Some(value) {
            None
        } else {
            Some(value)
        };
        let current = message.feedback;

        self.commit(session)?;
        Ok(FeedbackOutcome::Applied(current))
    }

    /// Borrow a session without the artificial delay
    ///
    /// For presentation only, such as the shell prompt.
    pub fn peek(&self, session_id: &str) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    /// Resolve a full session id or a unique id prefix
    ///
    /// Prefixes may omit the leading `session_`.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` when nothing matches, `AmbiguousSession` when the
    /// prefix matches several sessions.
    pub fn resolve_id(&self, id_or_prefix: &str) -> Result<String> {
        let id_or_prefix = id_or_prefix.trim();
        if id_or_prefix.is_empty() {
            return Err(TableChatError::SessionNotFound(String::new()).into());
        }
        if self.sessions.contains_key(id_or_prefix) {
            return Ok(id_or_prefix.to_string());
        }

        let mut matches: Vec<&String> = self
            .sessions
            .keys()
            .filter(|id| {
                id.starts_with(id_or_prefix)
                    || id
                        .strip_prefix("session_")
                        .is_some_and(|ulid| ulid.starts_with(id_or_prefix))
            })
            .collect();

        match matches.len() {
            0 => Err(TableChatError::SessionNotFound(id_or_prefix.to_string()).into()),
            1 => Ok(matches.remove(0).clone()),
            _ => Err(TableChatError::AmbiguousSession(id_or_prefix.to_string()).into()),
        }
    }

    fn sorted(&self) -> Vec<&Session> {
        let mut sessions: Vec<&Session> = self.sessions.values().collect();
        sessions.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        sessions
    }

    async fn pause(&self, millis: u64) {
        let delay = self.latency.delay(millis);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Persist the collection with `session` in place, then keep it
    fn commit(&mut self, session: Session) -> Result<()> {
        self.persist_with(Some(&session))?;
        self.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    /// Write the full collection under the store key
    fn persist(&self) -> Result<()> {
        self.persist_with(None)
    }

    /// Write the collection as it would be with `changed` replacing the
    /// held session of the same id
    fn persist_with(&self, changed: Option<&Session>) -> Result<()> {
        let mut sessions: Vec<&Session> = self
            .sessions
            .values()
            .filter(|held| changed.map_or(true, |c| c.id != held.id))
            .collect();
        sessions.extend(changed);
        sessions.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let blob = serde_json::to_string(&sessions)?;
        self.blob.set(&self.key, &blob)?;

        tracing::debug!(
            "Persisted {} sessions ({} bytes) under '{}'",
            sessions.len(),
            blob.len(),
            self.key
        );
        Ok(())
    }

    /// Append rejected raw records to the quarantine key
    fn quarantine(&self, rejected: Vec<Value>) -> Result<()> {
        let quarantine_key = format!("{}.quarantine", self.key);

        let mut held = match self.blob.get(&quarantine_key)? {
            Some(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Array(items)) => items,
                _ => {
                    tracing::warn!("Replacing unreadable quarantine under '{}'", quarantine_key);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        held.extend(rejected);

        self.blob
            .set(&quarantine_key, &serde_json::to_string(&held)?)?;
        Ok(())
    }
}

/// Decode a persisted collection into valid sessions and rejected records
fn decode_collection(raw: Option<&str>) -> Result<(HashMap<String, Session>, Vec<Value>)> {
    let mut sessions = HashMap::new();
    let mut rejected = Vec::new();

    let Some(raw) = raw else {
        return Ok((sessions, rejected));
    };

    let records = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => records,
        Ok(other) => {
            return Err(TableChatError::CorruptStore(format!(
                "expected a JSON array of sessions, found {}",
                json_kind(&other)
            ))
            .into())
        }
        Err(e) => return Err(TableChatError::CorruptStore(e.to_string()).into()),
    };

    for record in records {
        let verdict = serde_json::from_value::<Session>(record.clone())
            .map_err(|e| e.to_string())
            .and_then(|session| session.validate().map(|_| session));

        match verdict {
            Ok(session) if sessions.contains_key(&session.id) => {
                tracing::warn!("Quarantining duplicate session {}", session.id);
                rejected.push(record);
            }
            Ok(session) => {
                sessions.insert(session.id.clone(), session);
            }
            Err(reason) => {
                tracing::warn!("Quarantining malformed session record: {}", reason);
                rejected.push(record);
            }
        }
    }

    Ok((sessions, rejected))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
