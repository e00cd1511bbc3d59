//! Durable key-value persistence for the flow session.
//!
//! The engine is the single logical writer; this crate only promises that a
//! record written by `set` comes back from `get` until removed. Values are
//! opaque JSON strings — the schema belongs to the engine, and any backing
//! technology satisfying [`SessionStore`] is conformant.

pub mod file;
pub mod memory;

use std::future::Future;

use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Async key-value port for session persistence.
///
/// Implementations must be resilient: a missing or unreadable record is
/// `Ok(None)`, not an error. Errors are reserved for failed writes, which
/// the caller is expected to log and swallow — persistence must never block
/// in-memory progress.
pub trait SessionStore: Send + Sync {
    /// Fetch the record stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Durably store `value` under `key`, replacing any prior record.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove the record under `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

// A shared handle to a store is itself a store.
impl<S: SessionStore> SessionStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).remove(key)
    }
}
