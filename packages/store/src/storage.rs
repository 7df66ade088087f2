//! # Durable key-value storage
//!
//! [`KeyValueStorage`] is a tiny synchronous interface modelled on the browser's
//! `localStorage`: string keys, string values. Implementations:
//!
//! | Type | Where | Backing |
//! |------|-------|---------|
//! | [`MemoryStorage`](crate::MemoryStorage) | tests, fallback | `HashMap` behind `Rc<RefCell<_>>` |
//! | [`FileStorage`](crate::FileStorage) | native | one `<key>.json` file per key |
//! | `LocalStorage` | WASM with the `web` feature | `window.localStorage` |
//!
//! [`load_json`], [`save_json`] and [`remove`] layer typed JSON values on top.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// String key-value storage that survives process restarts.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and deserialize the value under `key`.
pub fn load_json<T, S>(storage: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStorage + ?Sized,
{
    match storage.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize `value` and store it under `key`.
pub fn save_json<T, S>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStorage + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}

pub fn remove<S>(storage: &S, key: &str) -> Result<(), StorageError>
where
    S: KeyValueStorage + ?Sized,
{
    storage.remove(key)
}
