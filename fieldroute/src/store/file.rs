//! JSON-file-backed key-value store.
//!
//! Persists the whole map as one pretty-printed JSON object so cache and
//! quota state survive process restarts. At the scale of one technician's
//! day (tens of entries) rewriting the file on every set is fine.
//!
//! Storage failures degrade to in-memory-only behavior for the session:
//! a missing or unparseable file starts empty, and a failed write logs a
//! warning while the in-memory map keeps serving reads.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::RwLock;
use tracing::warn;

use super::{BoxFuture, KeyValueStore, StoreError};

/// Persistent store backed by a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Opens the store, loading any existing file at `path`.
    ///
    /// Never fails: a missing file starts an empty store, and a corrupt
    /// one is logged and ignored so the scheduling flow is not blocked
    /// by a bad cache file.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring unparseable store file");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "store file unreadable, starting in-memory");
                HashMap::new()
            }
        };

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    async fn persist(&self) {
        let snapshot = self.entries.read().clone();
        let raw = match serde_json::to_string_pretty(&snapshot) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "failed to serialize store contents");
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    warn!(path = %parent.display(), error = %e, "failed to create store directory");
                }
            }
        }

        if let Err(e) = tokio::fs::write(&self.path, raw).await {
            // Session continues from memory; the next write retries the file.
            warn!(path = %self.path.display(), error = %e, "store write failed, keeping entries in memory");
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, StoreError>> {
        let value = self.entries.read().get(key).cloned();
        Box::pin(async move { Ok(value) })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'_, Result<(), StoreError>> {
        self.entries.write().insert(key.to_string(), value);
        Box::pin(async move {
            self.persist().await;
            Ok(())
        })
    }
}
