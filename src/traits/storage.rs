//! Key/value storage trait abstraction.
//!
//! Durable client-side storage for the handful of string values that must
//! survive a restart (the bearer token and the theme preference). Calls are
//! synchronous: `logout()` and `set_mode()` are synchronous operations and
//! the values involved are tiny.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Failed to read the backing store
    #[error("Failed to read storage: {0}")]
    ReadFailed(String),
    /// Failed to write the backing store
    #[error("Failed to write storage: {0}")]
    WriteFailed(String),
    /// Backing store exists but is not valid
    #[error("Storage is corrupt: {0}")]
    Corrupt(String),
}

/// Trait for durable string key/value storage.
///
/// Production code uses [`crate::adapters::FileStore`]; tests use
/// [`crate::adapters::mock::InMemoryStore`].
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` means the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
