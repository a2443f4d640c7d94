use std::sync::Arc;

use crate::errors::StorageError;

/// Trait abstraction for the external string-keyed store.
/// Implementations can be in-memory, file-backed, or a browser `localStorage` binding.
///
/// Backends report their own failures as [`StorageError::StoreFault`].
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removes the entry; returns whether one existed.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> { (**self).get(key) }
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> { (**self).set(key, value) }
    fn remove(&self, key: &str) -> Result<bool, StorageError> { (**self).remove(key) }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> { (**self).get(key) }
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> { (**self).set(key, value) }
    fn remove(&self, key: &str) -> Result<bool, StorageError> { (**self).remove(key) }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> { (**self).get(key) }
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> { (**self).set(key, value) }
    fn remove(&self, key: &str) -> Result<bool, StorageError> { (**self).remove(key) }
}
