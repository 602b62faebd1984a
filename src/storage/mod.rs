//! Client-local key/value storage
//!
//! Plays the role browser local storage plays for a web client: a flat map
//! of string keys to string values that survives restarts.

pub mod file;
pub mod memory;

use crate::error::AppResult;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Persistent string key/value storage.
pub trait Storage: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a key-value pair, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> AppResult<()>;
}
