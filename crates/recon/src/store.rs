//! Key-value byte stores used to persist review state between sessions.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Key under which the review state is persisted unless configured otherwise.
pub const DEFAULT_STATE_KEY: &str = "matches";

/// A minimal byte store: a missing key is `Ok(None)`, never an error.
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;
    /// Removing a missing key is a no-op.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Keys become file stems, so keep them to a safe alphabet.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && !key.starts_with('.');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key inside a directory.
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn io_err(key: &str, source: std::io::Error) -> StoreError {
        StoreError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_key(key)?;
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_err(key, e)),
        }
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        validate_key(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| Self::io_err(key, e))?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).map_err(|e| Self::io_err(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| Self::io_err(key, e))?;
        log::debug!("wrote {} byte(s) to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_err(key, e)),
        }
    }
}

// ---------------------------------------------------------------------------
// Memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path().join("state"));
        assert_eq!(store.get("matches").unwrap(), None);

        store.put("matches", b"{\"1\": 2}").unwrap();
        assert_eq!(store.get("matches").unwrap().as_deref(), Some(&b"{\"1\": 2}"[..]));
        assert!(store.path_for("matches").exists());

        store.remove("matches").unwrap();
        assert_eq!(store.get("matches").unwrap(), None);
        store.remove("matches").unwrap();
    }

    #[test]
    fn file_store_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path());
        store.put("k", b"one").unwrap();
        store.put("k", b"two").unwrap();
        assert_eq!(store.get("k").unwrap().unwrap(), b"two");
        assert!(!tmp.path().join(".k.json.tmp").exists());
    }

    #[test]
    fn rejects_path_like_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path());
        assert!(matches!(store.put("../x", b""), Err(StoreError::InvalidKey(_))));
        assert!(store.get("").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("matches-v2").is_ok());
    }

    #[test]
    fn memory_store_basics() {
        let mut store = MemoryStore::new();
        store.put("a", b"1").unwrap();
        assert_eq!(store.get("a").unwrap().unwrap(), b"1");
        store.remove("a").unwrap();
        assert!(store.get("a").unwrap().is_none());
    }

    #[test]
    fn memory_store_rejects_path_like_keys() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.put("../x", b""), Err(StoreError::InvalidKey(_))));
        assert!(matches!(store.get(""), Err(StoreError::InvalidKey(_))));
        assert!(matches!(store.remove(".hidden"), Err(StoreError::InvalidKey(_))));
    }
}
