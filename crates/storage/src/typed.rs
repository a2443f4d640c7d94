//! Result-carrying accessor surface.
//!
//! Every call returns a [`StorageResult`] whose `error` carries the human-readable
//! failure message, so callers can report outcomes without matching on error types.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::accessor::StorageAccessor;
use crate::errors::StorageError;
use crate::port::KeyValueStore;

/// Tagged outcome of a storage call.
///
/// `success == true` never carries `error`; `success == false` never carries `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageResult<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> StorageResult<T> {
    pub fn ok(data: T) -> Self { Self { success: true, data: Some(data), error: None } }

    pub fn ok_empty() -> Self { Self { success: true, data: None, error: None } }

    pub fn err(message: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(message.into()) }
    }

    /// Convert back into a `Result`, discarding the success payload shape.
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.error.unwrap_or_default())
        }
    }
}

impl<T> From<Result<T, StorageError>> for StorageResult<T> {
    fn from(res: Result<T, StorageError>) -> Self {
        match res {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

fn unit(res: Result<(), StorageError>) -> StorageResult<()> {
    match res {
        Ok(()) => StorageResult::ok_empty(),
        Err(e) => StorageResult::err(e.to_string()),
    }
}

/// Accessor returning [`StorageResult`] from every operation.
#[derive(Debug, Clone)]
pub struct TypedAccessor<S> {
    inner: StorageAccessor<S>,
}

impl<S: KeyValueStore> TypedAccessor<S> {
    pub fn new(store: S) -> Self { Self { inner: StorageAccessor::new(store) } }

    pub fn accessor(&self) -> &StorageAccessor<S> { &self.inner }

    pub fn get_entry_from_storage<T: DeserializeOwned>(&self, key: &str) -> StorageResult<T> {
        self.inner.read(key).into()
    }

    pub fn set_item_in_storage<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        preserve_existing: bool,
    ) -> StorageResult<()> {
        unit(self.inner.write(key, value, preserve_existing))
    }

    pub fn has_property_for_key(&self, key: &str, property: &str) -> StorageResult<bool> {
        self.inner.has_property(key, property).into()
    }

    pub fn update_stored_props_for_key<U: Serialize + ?Sized>(
        &self,
        key: &str,
        updates: &U,
    ) -> StorageResult<()> {
        unit(self.inner.update_properties(key, updates))
    }

    pub fn remove_from_storage(&self, key: &str) -> StorageResult<bool> {
        self.inner.remove(key).into()
    }
}

impl<S> From<StorageAccessor<S>> for TypedAccessor<S> {
    fn from(inner: StorageAccessor<S>) -> Self { Self { inner } }
}
