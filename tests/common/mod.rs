use std::fs;
use std::path::PathBuf;
use tablechat::config::{Config, LatencyConfig};
use tablechat::storage::SledBlobStore;
use tablechat::SessionStore;
use tempfile::TempDir;

/// Configuration with every artificial delay disabled
#[allow(dead_code)]
pub fn instant_config() -> Config {
    Config {
        latency: LatencyConfig::disabled(),
        ..Config::default()
    }
}

/// Open a session store over an on-disk sled database at `path`
#[allow(dead_code)]
pub fn open_disk_store(path: &std::path::Path) -> SessionStore {
    let blob = SledBlobStore::open(path).expect("failed to open sled store");
    SessionStore::open(Box::new(blob), &instant_config()).expect("failed to open session store")
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
