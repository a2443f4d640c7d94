use dashmap::DashMap;

use crate::errors::StorageError;
use crate::port::KeyValueStore;

/// In-memory key-value store standing in for the browser's persistent storage.
///
/// An optional byte quota (sum of key and value lengths) mimics the browser's
/// quota error on oversized writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: DashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self { inner: DashMap::new(), quota_bytes: Some(quota_bytes) }
    }

    pub fn len(&self) -> usize { self.inner.len() }

    pub fn is_empty(&self) -> bool { self.inner.is_empty() }

    pub fn clear(&self) { self.inner.clear() }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.inner
            .iter()
            .filter(|e| e.key() != key)
            .map(|e| e.key().len() + e.value().len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_excluding(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::StoreFault(format!(
                    "quota exceeded: {} bytes needed, {} allowed",
                    needed, quota
                )));
            }
        }
        self.inner.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.inner.remove(key).is_some())
    }
}
