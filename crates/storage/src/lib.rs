//! JSON entry storage over a pluggable string key-value store.
//! - `port` defines the store capability (`get`/`set`/`remove` of strings).
//! - `accessor` holds read, preserve-mode write, property lookup and update semantics.
//! - `typed` and `legacy` expose the same operations as `StorageResult` or sentinel values.

pub mod errors;
pub mod port;
pub mod memory_store;
pub mod file_store;
pub mod accessor;
pub mod typed;
pub mod legacy;

pub use accessor::StorageAccessor;
pub use errors::{StorageError, StorageErrorKind};
pub use file_store::FileStore;
pub use legacy::LegacyAccessor;
pub use memory_store::MemoryStore;
pub use port::KeyValueStore;
pub use typed::{StorageResult, TypedAccessor};
