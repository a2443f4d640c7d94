use std::{collections::HashMap, fs, path::PathBuf, sync::RwLock};

use tracing::debug;

use crate::errors::StorageError;
use crate::port::KeyValueStore;

/// JSON file-backed key-value store.
///
/// Persists a `HashMap<String, String>` to a single JSON file and rewrites it on
/// every mutation. Intended for CLI use and tests where a browser store is absent.
#[derive(Debug)]
pub struct FileStore {
    inner: RwLock<HashMap<String, String>>,
    file_path: PathBuf,
}

fn fault<E: std::fmt::Display>(e: E) -> StorageError { StorageError::StoreFault(e.to_string()) }

impl FileStore {
    /// Initialize the store from a path. Creates the file with an empty map if missing.
    ///
    /// The parent directory must already exist.
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self, StorageError> {
        let file_path = path.into();
        let map: HashMap<String, String> = if file_path.exists() {
            let bytes = fs::read(&file_path).map_err(fault)?;
            serde_json::from_slice(&bytes).map_err(|e| {
                let path = file_path.display();
                StorageError::StoreFault(format!("corrupt store file {}: {}", path, e))
            })?
        } else {
            let empty: HashMap<String, String> = HashMap::new();
            fs::write(&file_path, serde_json::to_vec(&empty).map_err(fault)?).map_err(fault)?;
            empty
        };
        debug!(path = %file_path.display(), entries = map.len(), "file store opened");

        Ok(Self { inner: RwLock::new(map), file_path })
    }

    pub fn path(&self) -> &std::path::Path { &self.file_path }

    fn save(&self, map: &HashMap<String, String>) -> Result<(), StorageError> {
        let data = serde_json::to_vec(map).map_err(fault)?;
        fs::write(&self.file_path, data).map_err(fault)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.inner.read().map_err(fault)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.inner.write().map_err(fault)?;
        let previous = map.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save(&map) {
            // keep memory consistent with disk
            match previous {
                Some(old) => map.insert(key.to_string(), old),
                None => map.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let mut map = self.inner.write().map_err(fault)?;
        let Some(old) = map.remove(key) else { return Ok(false) };
        if let Err(e) = self.save(&map) {
            map.insert(key.to_string(), old);
            return Err(e);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StorageErrorKind;

    #[test]
    fn file_store_crud_persists() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("file_store_{}.json", uuid::Uuid::new_v4()));
        let store = FileStore::new(&tmp)?;

        // initially empty
        assert_eq!(store.get("a")?, None);

        store.set("a", "1")?;
        store.set("b", "{\"x\":2}")?;
        assert_eq!(store.get("a")?.as_deref(), Some("1"));

        // remove and reload persistence
        assert!(store.remove("a")?);
        assert!(!store.remove("a")?);
        let reloaded = FileStore::new(&tmp)?;
        assert_eq!(reloaded.get("a")?, None);
        assert_eq!(reloaded.get("b")?.as_deref(), Some("{\"x\":2}"));

        let _ = fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn failed_persist_rolls_back_memory() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir()
            .join(format!("file_store_rollback_{}.json", uuid::Uuid::new_v4()));
        let store = FileStore::new(&tmp)?;
        store.set("a", "1")?;

        // a directory in place of the file makes every write fail
        fs::remove_file(&tmp)?;
        fs::create_dir(&tmp)?;

        let err = store.set("a", "2").unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::StoreFault);
        assert_eq!(store.get("a")?.as_deref(), Some("1"));

        let err = store.set("b", "3").unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::StoreFault);
        assert_eq!(store.get("b")?, None);

        let err = store.remove("a").unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::StoreFault);
        assert_eq!(store.get("a")?.as_deref(), Some("1"));

        let _ = fs::remove_dir(&tmp);
        Ok(())
    }

    #[test]
    fn missing_parent_dir_is_a_store_fault() {
        let tmp = std::env::temp_dir()
            .join(format!("file_store_nodir_{}", uuid::Uuid::new_v4()))
            .join("store.json");
        let err = FileStore::new(&tmp).unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::StoreFault);
    }

    #[test]
    fn corrupt_file_is_a_store_fault() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir()
            .join(format!("file_store_bad_{}.json", uuid::Uuid::new_v4()));
        fs::write(&tmp, b"not json")?;

        let err = FileStore::new(&tmp).unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::StoreFault);

        let _ = fs::remove_file(&tmp);
        Ok(())
    }
}
