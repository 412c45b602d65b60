//! Configuration management for Tablechat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, TableChatError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound accepted for any configured artificial delay
const MAX_DELAY_MS: u64 = 10_000;

/// Main configuration structure for Tablechat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where and under which key sessions are persisted
    #[serde(default)]
    pub storage: StorageConfig,
    /// Artificial latency applied to session store operations
    #[serde(default)]
    pub latency: LatencyConfig,
    /// Chat presentation and title settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Session persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the embedded store; `None` uses the platform data dir
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Key under which the whole session collection is stored
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    "chatSessions".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            key: default_storage_key(),
        }
    }
}

/// Artificial latency per store operation, in milliseconds
///
/// These mirror the delays of the hosted mock service the CLI imitates.
/// Disabling them makes every operation complete immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyConfig {
    /// Apply the delays at all
    #[serde(default = "default_latency_enabled")]
    pub enabled: bool,

    #[serde(default = "default_create_ms")]
    pub create_ms: u64,

    #[serde(default = "default_read_ms")]
    pub list_ms: u64,

    #[serde(default = "default_read_ms")]
    pub get_ms: u64,

    #[serde(default = "default_ask_ms")]
    pub ask_ms: u64,

    #[serde(default = "default_feedback_ms")]
    pub feedback_ms: u64,
}

fn default_latency_enabled() -> bool {
    true
}

fn default_create_ms() -> u64 {
    300
}

fn default_read_ms() -> u64 {
    200
}

fn default_ask_ms() -> u64 {
    800
}

fn default_feedback_ms() -> u64 {
    100
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            enabled: default_latency_enabled(),
            create_ms: default_create_ms(),
            list_ms: default_read_ms(),
            get_ms: default_read_ms(),
            ask_ms: default_ask_ms(),
            feedback_ms: default_feedback_ms(),
        }
    }
}

impl LatencyConfig {
    /// Latency settings with every delay disabled
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Resolve a configured delay, honoring the `enabled` switch
    pub fn delay(&self, millis: u64) -> Duration {
        if self.enabled {
            Duration::from_millis(millis)
        } else {
            Duration::ZERO
        }
    }
}

/// Chat behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Title given to a session before its first question
    #[serde(default = "default_title")]
    pub default_title: String,

    /// Number of leading words of the first question used for the title
    #[serde(default = "default_title_max_words")]
    pub title_max_words: usize,

    /// Maximum title length in characters before truncation
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,

    /// Print the session list before every prompt in interactive mode
    #[serde(default = "default_show_sidebar")]
    pub show_sidebar: bool,
}

fn default_title() -> String {
    "New Chat".to_string()
}

fn default_title_max_words() -> usize {
    5
}

fn default_title_max_chars() -> usize {
    40
}

fn default_show_sidebar() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_title: default_title(),
            title_max_words: default_title_max_words(),
            title_max_chars: default_title_max_chars(),
            show_sidebar: default_show_sidebar(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TableChatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| TableChatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(path) = std::env::var("TABLECHAT_STORAGE_PATH") {
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Ok(key) = std::env::var("TABLECHAT_STORAGE_KEY") {
            self.storage.key = key;
        }

        if let Ok(enabled) = std::env::var("TABLECHAT_LATENCY_ENABLED") {
            match enabled.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.latency.enabled = true,
                "0" | "false" | "no" | "off" => self.latency.enabled = false,
                other => {
                    tracing::warn!("Ignoring invalid TABLECHAT_LATENCY_ENABLED value: {}", other)
                }
            }
        }

        if let Ok(title) = std::env::var("TABLECHAT_DEFAULT_TITLE") {
            self.chat.default_title = title;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(path) = &cli.storage_path {
            self.storage.path = Some(PathBuf::from(path));
        }

        if cli.no_delay {
            self.latency.enabled = false;
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(TableChatError::Config("storage.key cannot be empty".to_string()).into());
        }

        if self.chat.default_title.trim().is_empty() {
            return Err(
                TableChatError::Config("chat.default_title cannot be empty".to_string()).into(),
            );
        }

        if self.chat.title_max_words == 0 {
            return Err(TableChatError::Config(
                "chat.title_max_words must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.title_max_chars == 0 {
            return Err(TableChatError::Config(
                "chat.title_max_chars must be greater than 0".to_string(),
            )
            .into());
        }

        let delays = [
            ("create_ms", self.latency.create_ms),
            ("list_ms", self.latency.list_ms),
            ("get_ms", self.latency.get_ms),
            ("ask_ms", self.latency.ask_ms),
            ("feedback_ms", self.latency.feedback_ms),
        ];
        for (name, value) in delays {
            if value > MAX_DELAY_MS {
                return Err(TableChatError::Config(format!(
                    "latency.{} must be less than or equal to {}",
                    name, MAX_DELAY_MS
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage.key, "chatSessions");
        assert!(config.storage.path.is_none());
        assert!(config.latency.enabled);
        assert_eq!(config.latency.ask_ms, 800);
        assert_eq!(config.chat.default_title, "New Chat");
        assert_eq!(config.chat.title_max_words, 5);
        assert_eq!(config.chat.title_max_chars, 40);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_key() {
        let mut config = Config::default();
        config.storage.key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_title_chars() {
        let mut config = Config::default();
        config.chat.title_max_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_delay_too_large() {
        let mut config = Config::default();
        config.latency.ask_ms = MAX_DELAY_MS + 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("latency.ask_ms"));
    }

    #[test]
    fn test_latency_delay_respects_enabled() {
        let latency = LatencyConfig::default();
        assert_eq!(latency.delay(300), Duration::from_millis(300));
        assert_eq!(LatencyConfig::disabled().delay(300), Duration::ZERO);
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
storage:
  path: /tmp/tablechat-store
  key: sessions
latency:
  enabled: false
  ask_ms: 50
chat:
  default_title: Untitled
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.storage.path,
            Some(PathBuf::from("/tmp/tablechat-store"))
        );
        assert_eq!(config.storage.key, "sessions");
        assert!(!config.latency.enabled);
        assert_eq!(config.latency.ask_ms, 50);
        assert_eq!(config.latency.create_ms, 300);
        assert_eq!(config.chat.default_title, "Untitled");
        assert_eq!(config.chat.title_max_chars, 40);
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        let cli = Cli::try_parse_from(["tablechat", "sessions", "list"]).unwrap();
        let config = Config::load("/nonexistent/tablechat.yaml", &cli).unwrap();
        assert_eq!(config.storage.key, "chatSessions");
    }

    #[test]
    #[serial]
    fn test_env_overrides_apply() {
        std::env::set_var("TABLECHAT_STORAGE_KEY", "otherSessions");
        std::env::set_var("TABLECHAT_LATENCY_ENABLED", "off");

        let cli = Cli::try_parse_from(["tablechat", "sessions", "list"]).unwrap();
        let config = Config::load("/nonexistent/tablechat.yaml", &cli).unwrap();

        std::env::remove_var("TABLECHAT_STORAGE_KEY");
        std::env::remove_var("TABLECHAT_LATENCY_ENABLED");

        assert_eq!(config.storage.key, "otherSessions");
        assert!(!config.latency.enabled);
    }

    #[test]
    #[serial]
    fn test_cli_overrides_apply() {
        let cli = Cli::try_parse_from([
            "tablechat",
            "--storage-path",
            "/tmp/elsewhere",
            "--no-delay",
            "sessions",
            "list",
        ])
        .unwrap();
        let config = Config::load("/nonexistent/tablechat.yaml", &cli).unwrap();
        assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/elsewhere")));
        assert!(!config.latency.enabled);
    }

    #[test]
    fn test_invalid_yaml_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "storage: [unclosed").unwrap();
        let err = Config::from_file(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
