//! Persisted key-value storage.
//!
//! The cache store and quota tracker are layered on top of a generic
//! get/set-by-string-key contract. The trait is dyn-compatible (boxed
//! futures) so services can hold `Arc<dyn KeyValueStore>` and tests can
//! substitute an in-memory backend.
//!
//! # Degradation
//!
//! Storage is a best-effort optimization layer, never a system of record.
//! The file-backed store therefore degrades rather than fails: an
//! unreadable file starts an empty session, an unwritable one keeps
//! serving from memory for the rest of the session.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure reading or writing the backing file.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted payload could not be serialized or parsed.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Generic persisted key-value storage.
///
/// Keys are strings (human-readable in logs and on disk); values are the
/// callers' own serialized entries. There is no built-in TTL; expiration
/// is a caller concern.
pub trait KeyValueStore: Send + Sync {
    /// Retrieve a value by key. `Ok(None)` if the key was never written.
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, StoreError>>;

    /// Store a value, replacing any prior value for the key.
    fn set(&self, key: &str, value: String) -> BoxFuture<'_, Result<(), StoreError>>;
}
