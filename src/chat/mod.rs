//! Chat sessions: records, canned answers and the owning store

pub mod responder;
pub mod store;
pub mod types;

pub use responder::{Responder, Topic};
pub use store::{FeedbackOutcome, SessionStore};
pub use types::{Feedback, Message, Role, Session, Table};
