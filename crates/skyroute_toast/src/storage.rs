//! Durable key/value storage for the dismissal timestamp

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use skyroute_core::Timestamp;

use crate::error::StorageError;

/// Key under which the last manual dismissal is stored, as a decimal
/// milliseconds-since-epoch string
pub const DISMISSED_AT_KEY: &str = "toast_dismissed_at";

/// String key/value store
pub trait DismissalStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: DismissalStore + ?Sized> DismissalStore for &mut S {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }
}

impl<S: DismissalStore + ?Sized> DismissalStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }
}

/// Read a stored timestamp.
///
/// Values that do not parse as a timestamp are treated as absent.
pub fn load_timestamp<S: DismissalStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<Timestamp>, StorageError> {
    let Some(raw) = store.load(key)? else {
        return Ok(None);
    };
    match raw.parse::<Timestamp>() {
        Ok(at) => Ok(Some(at)),
        Err(err) => {
            tracing::debug!(key, value = %raw, %err, "ignoring unparseable stored timestamp");
            Ok(None)
        }
    }
}

pub fn save_timestamp<S: DismissalStore + ?Sized>(
    store: &mut S,
    key: &str,
    at: Timestamp,
) -> Result<(), StorageError> {
    store.save(key, &at.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory
// ─────────────────────────────────────────────────────────────────────────────

/// In-process store; lost when dropped
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DismissalStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON file
// ─────────────────────────────────────────────────────────────────────────────

/// A JSON object file mapping keys to strings.
///
/// A missing file reads as empty. Every save rewrites the whole file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })
    }
}

impl DismissalStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());

        let json = serde_json::to_string_pretty(&entries).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load(DISMISSED_AT_KEY).unwrap(), None);
        save_timestamp(&mut store, DISMISSED_AT_KEY, Timestamp::from_millis(1_234)).unwrap();
        assert_eq!(store.get(DISMISSED_AT_KEY), Some("1234"));
        assert_eq!(
            load_timestamp(&store, DISMISSED_AT_KEY).unwrap(),
            Some(Timestamp::from_millis(1_234))
        );
    }

    #[test]
    fn test_garbage_value_reads_as_absent() {
        let store = MemoryStore::new().with_entry(DISMISSED_AT_KEY, "yesterday");
        assert_eq!(load_timestamp(&store, DISMISSED_AT_KEY).unwrap(), None);
    }

    #[test]
    fn test_json_file_roundtrip_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let mut store = JsonFileStore::new(&path);
        save_timestamp(&mut store, DISMISSED_AT_KEY, Timestamp::from_millis(99)).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(
            load_timestamp(&reopened, DISMISSED_AT_KEY).unwrap(),
            Some(Timestamp::from_millis(99))
        );
    }

    #[test]
    fn test_json_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load(DISMISSED_AT_KEY).unwrap(), None);
    }

    #[test]
    fn test_json_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.load(DISMISSED_AT_KEY),
            Err(StorageError::Json { .. })
        ));
    }

    #[test]
    fn test_store_through_mut_ref() {
        fn write<S: DismissalStore>(mut store: S) {
            store.save("k", "v").unwrap();
        }

        let mut inner = MemoryStore::new();
        write(&mut inner);
        write(Box::new(MemoryStore::new()));
        assert_eq!(inner.get("k"), Some("v"));
    }
}
