//! Error types for Tablechat
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Tablechat operations
///
/// Covers session lookups, persisted store loading, blob storage I/O and
/// configuration. Operations that are merely "not applicable" (such as
/// feedback on a missing message) are not errors and never appear here.
#[derive(Error, Debug)]
pub enum TableChatError {
    /// No session exists with the given identifier
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// A session id prefix matched more than one session
    #[error("Session id prefix is ambiguous: {0}")]
    AmbiguousSession(String),

    /// A question was empty after trimming whitespace
    #[error("Question cannot be empty")]
    EmptyQuestion,

    /// The persisted session blob could not be interpreted at all
    #[error("Persisted session store is corrupt: {0}")]
    CorruptStore(String),

    /// Blob storage errors (open, read, write, flush)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Tablechat operations
///
/// Uses `anyhow::Error` so context can be attached while propagating;
/// callers that need to branch on a kind use `downcast_ref::<TableChatError>()`.
pub type Result<T> = anyhow::Result<T>;

/// Returns true when `err` wraps [`TableChatError::SessionNotFound`]
pub fn is_session_not_found(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<TableChatError>(),
        Some(TableChatError::SessionNotFound(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_not_found_display() {
        let error = TableChatError::SessionNotFound("session_abc".to_string());
        assert_eq!(error.to_string(), "Session not found: session_abc");
    }

    #[test]
    fn test_corrupt_store_display() {
        let error = TableChatError::CorruptStore("expected array".to_string());
        assert_eq!(
            error.to_string(),
            "Persisted session store is corrupt: expected array"
        );
    }

    #[test]
    fn test_config_error_display() {
        let error = TableChatError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_storage_error_display() {
        let error = TableChatError::Storage("flush failed".to_string());
        assert_eq!(error.to_string(), "Storage error: flush failed");
    }

    #[test]
    fn test_ambiguous_session_display() {
        let error = TableChatError::AmbiguousSession("session_01".to_string());
        assert!(error.to_string().contains("session_01"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: TableChatError = io_error.into();
        assert!(matches!(error, TableChatError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: TableChatError = json_error.into();
        assert!(matches!(error, TableChatError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: TableChatError = yaml_error.into();
        assert!(matches!(error, TableChatError::Yaml(_)));
    }

    #[test]
    fn test_is_session_not_found_through_anyhow() {
        let err: anyhow::Error = TableChatError::SessionNotFound("x".to_string()).into();
        assert!(is_session_not_found(&err));

        let other: anyhow::Error = TableChatError::Storage("x".to_string()).into();
        assert!(!is_session_not_found(&other));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TableChatError>();
    }
}
