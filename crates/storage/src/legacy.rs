//! Sentinel-returning accessor surface.
//!
//! Failures collapse to `None` or `false` and are reported through `tracing` only,
//! so callers cannot tell failure kinds apart. Prefer [`crate::typed::TypedAccessor`]
//! or [`StorageAccessor`] when the distinction matters.

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::accessor::StorageAccessor;
use crate::port::KeyValueStore;

#[derive(Debug, Clone)]
pub struct LegacyAccessor<S> {
    inner: StorageAccessor<S>,
}

impl<S: KeyValueStore> LegacyAccessor<S> {
    pub fn new(store: S) -> Self { Self { inner: StorageAccessor::new(store) } }

    pub fn accessor(&self) -> &StorageAccessor<S> { &self.inner }

    pub fn get_entry_from_storage<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.inner
            .read(key)
            .map_err(|e| {
                warn!(op = "get_entry_from_storage", key, error = %e, "storage read failed")
            })
            .ok()
    }

    pub fn set_item_in_storage<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        preserve_existing: bool,
    ) -> bool {
        self.inner
            .write(key, value, preserve_existing)
            .map_err(|e| {
                warn!(op = "set_item_in_storage", key, error = %e, "storage write failed")
            })
            .is_ok()
    }

    /// A missing entry yields `false`, indistinguishable from a missing property.
    pub fn has_property_for_key(&self, key: &str, property: &str) -> bool {
        self.inner
            .has_property(key, property)
            .unwrap_or_else(|e| {
                warn!(
                    op = "has_property_for_key",
                    key,
                    property,
                    error = %e,
                    "storage lookup failed"
                );
                false
            })
    }

    pub fn update_stored_props_for_key<U: Serialize + ?Sized>(
        &self,
        key: &str,
        updates: &U,
    ) -> bool {
        self.inner
            .update_properties(key, updates)
            .map_err(|e| {
                warn!(op = "update_stored_props_for_key", key, error = %e, "storage update failed")
            })
            .is_ok()
    }
}

impl<S> From<StorageAccessor<S>> for LegacyAccessor<S> {
    fn from(inner: StorageAccessor<S>) -> Self { Self { inner } }
}
