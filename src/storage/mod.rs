//! Durable key-value storage for the session collection
//!
//! The session store persists its whole collection as one JSON document
//! under a single key. This module provides the [`BlobStore`] boundary and
//! two backends: [`SledBlobStore`] (embedded on-disk database) and
//! [`MemoryBlobStore`] (process-local, used by tests and `--ephemeral`).

use crate::config::StorageConfig;
use crate::error::{Result, TableChatError};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub mod types;
pub use types::{LoadReport, SessionSummary};

/// Key-value storage holding whole documents under string keys
pub trait BlobStore: Send + Sync {
    /// Read the document stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document stored under `key` and make it durable
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Blob store backed by an embedded `sled` database
pub struct SledBlobStore {
    db: sled::Db,
    path: PathBuf,
}

impl SledBlobStore {
    /// Open or create a store in the directory `path`
    ///
    /// # Errors
    ///
    /// Returns `TableChatError::Storage` if the database cannot be opened,
    /// for example because another process holds it.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablechat::storage::{BlobStore, SledBlobStore};
    ///
    /// # fn main() -> tablechat::error::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let store = SledBlobStore::open(dir.path().join("store"))?;
    /// store.set("chatSessions", "[]")?;
    /// assert_eq!(store.get("chatSessions")?.as_deref(), Some("[]"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TableChatError::Storage(format!("Failed to create data directory: {}", e))
            })?;
        }

        let db = sled::open(&path)
            .map_err(|e| TableChatError::Storage(format!("Failed to open database: {}", e)))?;
        tracing::debug!("Opened session database at {}", path.display());

        Ok(Self { db, path })
    }

    /// Location of the database directory
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BlobStore for SledBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| TableChatError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let text = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    TableChatError::CorruptStore(format!("value under {} is not UTF-8: {}", key, e))
                })?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| TableChatError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| TableChatError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }
}

/// Blob store that lives only as long as the process
///
/// Clones share the same contents, so a test can keep a handle while the
/// session store owns another.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| TableChatError::Storage("memory store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| TableChatError::Storage("memory store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Default database directory inside the user's data directory
pub fn default_store_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "tablechat", "tablechat")
        .ok_or_else(|| TableChatError::Storage("Could not determine data directory".into()))?;
    Ok(proj_dirs.data_dir().join("store"))
}

/// Open the blob store described by `config`
///
/// `ephemeral` selects the in-memory backend regardless of the configured
/// path.
pub fn open_blob_store(config: &StorageConfig, ephemeral: bool) -> Result<Box<dyn BlobStore>> {
    if ephemeral {
        tracing::info!("Using in-memory session storage");
        return Ok(Box::new(MemoryBlobStore::new()));
    }

    let path = match &config.path {
        Some(path) => path.clone(),
        None => default_store_path()?,
    };
    tracing::info!("Using session storage at {}", path.display());
    Ok(Box::new(SledBlobStore::open(path)?))
}
