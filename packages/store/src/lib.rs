//! Durable client-side storage and configuration for the console.

use std::rc::Rc;

pub mod config;
pub mod storage;

mod memory;
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStorage;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local::LocalStorage;

pub use config::ConsoleConfig;
pub use storage::{load_json, remove, save_json, KeyValueStorage, StorageError};

/// The durable storage for the current platform: `localStorage` in the browser,
/// files under the data directory on native, memory when neither is available.
pub fn platform_storage() -> Rc<dyn KeyValueStorage> {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        Rc::new(LocalStorage::new())
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        Rc::new(MemoryStorage::new())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        match FileStorage::in_data_dir() {
            Some(storage) => Rc::new(storage) as Rc<dyn KeyValueStorage>,
            None => {
                tracing::warn!("No data directory; the session will not survive a restart");
                Rc::new(MemoryStorage::new())
            }
        }
    }
}
