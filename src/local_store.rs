//! Local Key-Value Store
//!
//! Persistent string key-value pairs, the desktop counterpart of a
//! browser's local storage. Only the dark-mode flag lives here today.
//!
//! The file store keeps the whole map in memory and rewrites the JSON file on
//! every `set_item`. A missing or unreadable file is treated as empty.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// String key-value storage
pub trait KeyValueStore: Send {
    /// Value stored under `key`, if any
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Errors from persisting the store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Default location of the store file
pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("floodwatch").join("local_storage.json"))
        .unwrap_or_else(|| PathBuf::from("./floodwatch_local_storage.json"))
}

/// JSON-file-backed store
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`
    ///
    /// Never fails: a missing file starts empty, a corrupted one is logged
    /// and also starts empty (it is overwritten on the next write).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = ?path, error = %e, "Ignoring unreadable local store");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Failed to read local store");
                BTreeMap::new()
            }
        };

        Self { path, entries }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

/// In-memory store (nothing survives the process)
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nope.json"));
        assert!(store.get_item("darkMode").is_none());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = FileStore::open(&path);
        store.set_item("darkMode", "true").unwrap();
        assert!(path.exists());

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get_item("darkMode").as_deref(), Some("true"));
    }

    #[test]
    fn test_corrupted_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let mut store = FileStore::open(&path);
        assert!(store.get_item("darkMode").is_none());

        // Next write replaces the garbage
        store.set_item("darkMode", "false").unwrap();
        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get_item("darkMode").as_deref(), Some("false"));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.get_item("k").is_none());
        store.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").as_deref(), Some("v"));
    }
}
