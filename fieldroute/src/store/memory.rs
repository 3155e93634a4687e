//! In-memory key-value store.
//!
//! Used by tests and by sessions where persistent storage is unavailable.
//! A `parking_lot::RwLock` is sufficient: entries are small JSON strings
//! and the engine resolves legs sequentially, so contention is negligible.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{BoxFuture, KeyValueStore, StoreError};

/// Non-persistent store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, StoreError>> {
        let value = self.entries.read().get(key).cloned();
        Box::pin(async move { Ok(value) })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'_, Result<(), StoreError>> {
        self.entries.write().insert(key.to_string(), value);
        Box::pin(async move { Ok(()) })
    }
}
