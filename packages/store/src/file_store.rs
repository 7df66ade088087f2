//! # Filesystem-backed key-value storage
//!
//! [`FileStorage`] keeps each key in its own file so native builds retain the
//! session across restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── <key>.json
//! ```
//!
//! ## Platform data directories
//!
//! [`FileStorage::in_data_dir`] uses [`dirs::data_dir()`]:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/user-console/` |
//! | Linux | `~/.local/share/user-console/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\user-console\` |

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::storage::{KeyValueStorage, StorageError};

const APP_DIR: &str = "user-console";

/// `<data_dir>/user-console`, home of the session files and `console.toml`.
pub(crate) fn app_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR))
}

#[derive(Clone, Debug)]
pub struct FileStorage {
    base: PathBuf,
}

impl FileStorage {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    /// Storage under the platform data directory, if the platform has one.
    pub fn in_data_dir() -> Option<Self> {
        app_data_dir().map(Self::new)
    }

    fn path(&self, key: &str) -> PathBuf {
        // Keys map to a single file name inside the base directory.
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base.join(format!("{name}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.base)?;
        std::fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = std::env::temp_dir().join(format!("user_console_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let storage = FileStorage::new(dir.clone());
        assert!(storage.get("user").unwrap().is_none());
        storage.set("user", r#"{"token":"x"}"#).unwrap();

        // Re-open from same directory
        let reopened = FileStorage::new(dir.clone());
        assert_eq!(
            reopened.get("user").unwrap().as_deref(),
            Some(r#"{"token":"x"}"#)
        );

        reopened.remove("user").unwrap();
        reopened.remove("user").unwrap();
        assert!(storage.get("user").unwrap().is_none());

        // Cleanup
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_key_cannot_escape_base() {
        let storage = FileStorage::new(PathBuf::from("/tmp/base"));
        assert_eq!(storage.path("../etc/passwd"), PathBuf::from("/tmp/base/___etc_passwd.json"));
    }
}
