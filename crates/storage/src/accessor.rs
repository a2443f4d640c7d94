//! JSON entry accessor over a [`KeyValueStore`].
//!
//! Each operation is a single get or a get-then-set against the store. The pair
//! is not atomic: concurrent writers to the same key can lose updates.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::StorageError;
use crate::port::KeyValueStore;

/// Reads, writes and partially updates JSON entries held in a string store.
#[derive(Debug, Clone)]
pub struct StorageAccessor<S> {
    store: S,
}

impl<S: KeyValueStore> StorageAccessor<S> {
    pub fn new(store: S) -> Self { Self { store } }

    pub fn store(&self) -> &S { &self.store }

    pub fn into_store(self) -> S { self.store }

    /// Read the entry for `key` as an untyped JSON value.
    ///
    /// An absent or empty entry is `NotFound`; text that is not JSON is `Parse`.
    pub fn read_value(&self, key: &str) -> Result<Value, StorageError> {
        let raw = match self.store.get(key)? {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                debug!(op = "read", key, "entry not found");
                return Err(StorageError::not_found(key));
            }
        };
        serde_json::from_str(&raw)
            .map_err(|e| StorageError::Parse(format!("entry '{}' is not valid JSON: {}", key, e)))
    }

    /// Read the entry for `key` and deserialize it into `T`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<T, StorageError> {
        let value = self.read_value(key)?;
        serde_json::from_value(value)
            .map_err(|e| {
                StorageError::Parse(format!("entry '{}' has unexpected shape: {}", key, e))
            })
    }

    /// Write `value` under `key`.
    ///
    /// With `preserve_existing`, an existing object entry keeps all of its keys and only
    /// gains the keys it lacks. A non-object on either side leaves the existing entry as is.
    pub fn write<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        preserve_existing: bool,
    ) -> Result<(), StorageError> {
        let incoming = to_json(value)?;
        let merged = if preserve_existing {
            match self.read_value(key) {
                Ok(existing) => merge_preserving(existing, incoming),
                Err(StorageError::NotFound(_)) => incoming,
                Err(e) => return Err(e),
            }
        } else {
            incoming
        };
        debug!(op = "write", key, preserve_existing, "writing entry");
        self.put(key, &merged)
    }

    /// Whether the entry for `key` has `property` as a top-level key.
    ///
    /// Fails with `NotFound` when the entry is absent. Non-object entries have no properties.
    pub fn has_property(&self, key: &str, property: &str) -> Result<bool, StorageError> {
        let entry = self.read_value(key)?;
        Ok(entry.as_object().is_some_and(|obj| obj.contains_key(property)))
    }

    /// Overwrite the keys of the entry for `key` that `updates` also carries.
    ///
    /// Keys absent from the stored entry are dropped, so this never adds properties.
    /// `updates` must serialize to a JSON object.
    pub fn update_properties<U: Serialize + ?Sized>(
        &self,
        key: &str,
        updates: &U,
    ) -> Result<(), StorageError> {
        let Value::Object(updates) = to_json(updates)? else {
            return Err(StorageError::Serialization(
                "updates must serialize to a JSON object".into(),
            ));
        };
        let existing = self.read_value(key)?;
        let updated = apply_existing_only(existing, updates);
        debug!(op = "update", key, "updating existing properties");
        self.put(key, &updated)
    }

    /// Remove the entry for `key`; returns whether one existed.
    pub fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let existed = self.store.remove(key)?;
        debug!(op = "remove", key, existed, "entry removed");
        Ok(existed)
    }

    fn put(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let text = serde_json::to_string(value)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(key, &text)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, StorageError> {
    serde_json::to_value(value).map_err(|e| StorageError::Serialization(e.to_string()))
}

fn merge_preserving(existing: Value, incoming: Value) -> Value {
    match (existing, incoming) {
        (Value::Object(mut current), Value::Object(new)) => {
            for (k, v) in new {
                current.entry(k).or_insert(v);
            }
            Value::Object(current)
        }
        (existing, _) => existing,
    }
}

fn apply_existing_only(existing: Value, updates: Map<String, Value>) -> Value {
    match existing {
        Value::Object(mut current) => {
            for (k, v) in updates {
                if let Some(slot) = current.get_mut(&k) {
                    *slot = v;
                }
            }
            Value::Object(current)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StorageErrorKind;
    use crate::memory_store::MemoryStore;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::HashMap;

    fn accessor() -> StorageAccessor<MemoryStore> { StorageAccessor::new(MemoryStore::new()) }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        theme: String,
        font_size: u32,
    }

    #[test]
    fn write_then_read_round_trips_typed_value() -> Result<(), anyhow::Error> {
        let acc = accessor();
        let prefs = Prefs { theme: "dark".into(), font_size: 14 };
        acc.write("prefs", &prefs, false)?;
        assert_eq!(acc.read::<Prefs>("prefs")?, prefs);

        acc.write("list", &vec![1, 2, 3], false)?;
        assert_eq!(acc.read_value("list")?, json!([1, 2, 3]));
        Ok(())
    }

    #[test]
    fn missing_and_empty_entries_are_not_found() {
        let acc = accessor();
        assert_eq!(acc.read_value("missing-key").unwrap_err().kind(), StorageErrorKind::NotFound);

        acc.store().set("blank", "").unwrap();
        assert_eq!(acc.read_value("blank").unwrap_err().kind(), StorageErrorKind::NotFound);
    }

    #[test]
    fn invalid_json_and_wrong_shape_are_parse_errors() {
        let acc = accessor();
        acc.store().set("broken", "{not json").unwrap();
        assert_eq!(acc.read_value("broken").unwrap_err().kind(), StorageErrorKind::Parse);

        acc.store().set("num", "42").unwrap();
        assert_eq!(acc.read::<Prefs>("num").unwrap_err().kind(), StorageErrorKind::Parse);
    }

    #[test]
    fn preserve_mode_adds_new_keys_only() -> Result<(), anyhow::Error> {
        let acc = accessor();
        acc.write("k", &json!({"a": 1}), false)?;
        acc.write("k", &json!({"b": 2}), true)?;
        assert_eq!(acc.read_value("k")?, json!({"a": 1, "b": 2}));

        acc.write("k", &json!({"a": 99}), true)?;
        assert_eq!(acc.read_value("k")?, json!({"a": 1, "b": 2}));
        Ok(())
    }

    #[test]
    fn preserve_mode_on_absent_entry_is_plain_write() -> Result<(), anyhow::Error> {
        let acc = accessor();
        acc.write("fresh", &json!({"a": 1}), true)?;
        assert_eq!(acc.read_value("fresh")?, json!({"a": 1}));
        Ok(())
    }

    #[test]
    fn preserve_mode_keeps_non_object_entry() -> Result<(), anyhow::Error> {
        let acc = accessor();
        acc.write("n", &7, false)?;
        acc.write("n", &json!({"a": 1}), true)?;
        assert_eq!(acc.read_value("n")?, json!(7));
        Ok(())
    }

    #[test]
    fn preserve_mode_propagates_parse_error() {
        let acc = accessor();
        acc.store().set("k", "oops").unwrap();
        let err = acc.write("k", &json!({"a": 1}), true).unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::Parse);
        assert_eq!(acc.store().get("k").unwrap().as_deref(), Some("oops"));
    }

    #[test]
    fn update_overwrites_existing_keys_and_drops_new_ones() -> Result<(), anyhow::Error> {
        let acc = accessor();
        acc.write("k", &json!({"a": 1}), false)?;
        acc.update_properties("k", &json!({"a": 99, "b": 2}))?;
        assert_eq!(acc.read_value("k")?, json!({"a": 99}));
        Ok(())
    }

    #[test]
    fn update_requires_existing_entry_and_object_updates() {
        let acc = accessor();
        let err = acc.update_properties("missing", &json!({"a": 1})).unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::NotFound);

        acc.write("k", &json!({"a": 1}), false).unwrap();
        let err = acc.update_properties("k", &json!([1, 2])).unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::Serialization);
    }

    #[test]
    fn has_property_reports_top_level_keys() -> Result<(), anyhow::Error> {
        let acc = accessor();
        acc.write("k", &json!({"a": null, "nested": {"x": 1}}), false)?;
        assert!(acc.has_property("k", "a")?);
        assert!(!acc.has_property("k", "x")?);

        acc.write("s", "plain", false)?;
        assert!(!acc.has_property("s", "len")?);

        let err = acc.has_property("missing", "a").unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::NotFound);
        Ok(())
    }

    #[test]
    fn non_string_map_keys_fail_serialization() {
        let acc = accessor();
        let mut bad: HashMap<Vec<u8>, u8> = HashMap::new();
        bad.insert(vec![1], 1);
        let err = acc.write("bad", &bad, false).unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::Serialization);
        assert!(acc.store().is_empty());
    }

    #[test]
    fn remove_reports_existence() -> Result<(), anyhow::Error> {
        let acc = accessor();
        acc.write("k", &1, false)?;
        assert!(acc.remove("k")?);
        assert!(!acc.remove("k")?);
        Ok(())
    }
}
