//! Test utilities for Tablechat
//!
//! Helpers for building stores without artificial latency and for seeding
//! a blob store with hand-written records.

use crate::chat::SessionStore;
use crate::config::{Config, LatencyConfig};
use crate::storage::{BlobStore, MemoryBlobStore};

/// Default configuration with every artificial delay disabled
pub fn instant_config() -> Config {
    Config {
        latency: LatencyConfig::disabled(),
        ..Config::default()
    }
}

/// Open an instant store over a fresh in-memory blob
///
/// Returns the blob handle too so tests can inspect what was persisted.
pub fn memory_store() -> (SessionStore, MemoryBlobStore) {
    let blob = MemoryBlobStore::new();
    let store = SessionStore::open(Box::new(blob.clone()), &instant_config())
        .expect("Failed to open memory store");
    (store, blob)
}

/// Write `records` as the persisted session collection
///
/// # Panics
///
/// Panics if the blob store rejects the write
pub fn seed_blob(blob: &MemoryBlobStore, records: &serde_json::Value) {
    blob.set(&instant_config().storage.key, &records.to_string())
        .expect("Failed to seed blob store");
}
