//! # `window.localStorage` storage: browser-side persistence
//!
//! [`LocalStorage`] is the [`KeyValueStorage`] used on the **web platform**. Keys
//! are prefixed with a namespace (default `"user-console"`) so the console can
//! share an origin with other apps.
//!
//! `localStorage` can be missing (some privacy modes) or throw on write (quota).
//! Both surface as [`StorageError::Unavailable`]; callers log and carry on.

use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::storage::{KeyValueStorage, StorageError};

const DEFAULT_PREFIX: &str = "user-console";

#[derive(Clone, Debug)]
pub struct LocalStorage {
    prefix: String,
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorage {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    fn storage(&self) -> Result<Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))
    }
}

fn js_error(value: JsValue) -> StorageError {
    StorageError::Unavailable(format!("{value:?}"))
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get_item(&self.key(key)).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(&self.key(key), value)
            .map_err(js_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?.remove_item(&self.key(key)).map_err(js_error)
    }
}
