//! Key-value storage collaborators
//!
//! Persistence only needs to save and load one text blob per key. Two
//! backends are provided: an in-process map and a directory with one file
//! per key.

use rustc_hash::FxHashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Not found
    #[error("Key not found: {0}")]
    NotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Named text store
pub trait KeyValueStore {
    /// Save `text` under `key`, replacing any previous value
    fn store(&mut self, key: &str, text: &str) -> StorageResult<()>;

    /// Load the text saved under `key`
    fn retrieve(&self, key: &str) -> StorageResult<String>;
}

/// In-memory store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn store(&mut self, key: &str, text: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), text.to_string());
        Ok(())
    }

    fn retrieve(&self, key: &str) -> StorageResult<String> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}

/// Directory-backed store, one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open or create the store directory
    pub fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        info!("Opening file store at: {:?}", dir);
        Ok(FileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Anything outside `[A-Za-z0-9.-]` is hex-escaped
    /// so distinct keys never share a file.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'.' {
                name.push(byte as char);
            } else {
                name.push_str(&format!("_{:02x}", byte));
            }
        }
        name.push_str(".json");
        self.dir.join(name)
    }
}

impl KeyValueStore for FileStore {
    fn store(&mut self, key: &str, text: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        debug!(key, path = ?path, bytes = text.len(), "Writing entry");
        fs::write(path, text)?;
        Ok(())
    }

    fn retrieve(&self, key: &str) -> StorageResult<String> {
        let path = self.path_for(key);
        debug!(key, path = ?path, "Reading entry");
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
            _ => StorageError::Io(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.retrieve("a"), Err(StorageError::NotFound(_))));
        store.store("a", "1").unwrap();
        store.store("a", "2").unwrap();
        assert_eq!(store.retrieve("a").unwrap(), "2");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::open(temp_dir.path().join("nested")).unwrap();

        store.store("PULLGRAPH::graph", "{}").unwrap();
        assert_eq!(store.retrieve("PULLGRAPH::graph").unwrap(), "{}");
        assert!(matches!(store.retrieve("other"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_names_are_distinct() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();
        assert_ne!(store.path_for("a::b"), store.path_for("a__b"));
        assert_ne!(store.path_for("a/b"), store.path_for("a_b"));
        assert_eq!(
            store.path_for("../x").parent(),
            Some(temp_dir.path())
        );
    }
}
