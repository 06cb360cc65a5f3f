//! Durable key-value storage for client-scoped counters.
//!
//! The usage gate keeps a handful of values (success count, dismiss count,
//! opt-in flag) across sessions. They live behind the [`KeyValueStore`] trait
//! so hosts can plug in whatever storage they have; two implementations ship
//! with the crate:
//!
//! - [`MemoryStore`] - an in-process map, for tests and ephemeral hosts
//! - [`JsonFileStore`] - a JSON object persisted to a file, rewritten on every write
//!
//! Values are JSON values. Typed access goes through [`get_or`] and [`set`].

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, trace};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access store file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Store file {path} is not a JSON object: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode value for key `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String-keyed durable storage.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the value could not be persisted.
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Reads `key` as `T`, falling back to `default` when it is missing or has
/// an unexpected shape.
pub fn get_or<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
            debug!(key, err:%; "Ignoring stored value with unexpected shape");
            default
        }),
        None => default,
    }
}

/// Writes `value` under `key`.
///
/// # Errors
///
/// Returns [`StoreError`] if the value cannot be encoded or persisted.
pub fn set<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let value = serde_json::to_value(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, value)
}

/// An in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// A store persisted as a single JSON object in a file.
///
/// The file is read once when the store is opened and rewritten in full on
/// every [`set`](KeyValueStore::set). A missing file is an empty store; the
/// file and its parent directories are created on the first write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Opens the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or does
    /// not contain a JSON object.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                    path: path.clone(),
                    source,
                })?
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = path.display().to_string(); "Store file not found, starting empty");
                BTreeMap::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        trace!(path = path.display().to_string(), keys = values.len(); "Opened store");
        Ok(Self { path, values })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(&self.values).map_err(|source| {
            StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, content).map_err(io_err)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.get("count").is_none());

        store.set("count", json!(3)).expect("memory set");
        assert_eq!(store.get("count"), Some(json!(3)));
    }

    #[test]
    fn test_get_or_default_when_missing() {
        let store = MemoryStore::new();
        assert_eq!(get_or(&store, "count", 7u64), 7);
        assert!(!get_or(&store, "flag", false));
    }

    #[test]
    fn test_get_or_default_on_wrong_shape() {
        let mut store = MemoryStore::new();
        store.set("count", json!("not a number")).expect("memory set");

        assert_eq!(get_or(&store, "count", 0u64), 0);
    }

    #[test]
    fn test_typed_set() {
        let mut store = MemoryStore::new();
        set(&mut store, "flag", &true).expect("typed set");
        assert!(get_or(&store, "flag", false));
    }

    #[test]
    fn test_json_file_store_missing_file_is_empty() {
        let dir = tempdir().expect("tempdir");
        let store = JsonFileStore::open(dir.path().join("absent.json")).expect("open");
        assert!(store.get("anything").is_none());
    }

    #[test]
    fn test_json_file_store_persists_across_opens() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("counters.json");

        {
            let mut store = JsonFileStore::open(&path).expect("open");
            set(&mut store, "usage_count", &4u64).expect("write");
            set(&mut store, "opted_in", &true).expect("write");
        }

        let reopened = JsonFileStore::open(&path).expect("reopen");
        assert_eq!(get_or(&reopened, "usage_count", 0u64), 4);
        assert!(get_or(&reopened, "opted_in", false));
    }

    #[test]
    fn test_json_file_store_rejects_corrupt_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("counters.json");
        fs::write(&path, "[1, 2, 3]").expect("write fixture");

        let result = JsonFileStore::open(&path);
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }
}
