//! # Console configuration: `console.toml`
//!
//! Where the accounts API lives and where the session is kept.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:4000"
//!
//! [storage]
//! session_key = "user"
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`ConsoleConfig`] | Top-level config with builder helpers and TOML (de)serialisation. |
//! | [`ApiConfig`] | Base URL of the accounts API. |
//! | [`StorageConfig`] | Durable storage key holding the serialized session. |
//!
//! All structs have defaults, so an empty file is the default configuration.
//! [`ConsoleConfig::load`] reads `console.toml` from the platform data directory
//! on native builds and writes the defaults there on first run. The web build has
//! no file system; it uses [`ConsoleConfig::from_build_env`], which reads
//! `USER_CONSOLE_API_URL` when the crate is compiled.

#[cfg(not(target_arch = "wasm32"))]
use std::io::ErrorKind;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the serialized session is stored under.
    #[serde(default = "default_session_key")]
    pub session_key: String,
}

fn default_base_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_session_key() -> String {
    "user".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_key: default_session_key(),
        }
    }
}

impl ConsoleConfig {
    /// Builder method to set the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "console.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Parse `s`, falling back to the defaults (with a warning) when it is invalid.
    pub fn from_toml_or_default(s: &str) -> Self {
        Self::from_toml(s).unwrap_or_else(|e| {
            tracing::warn!("Invalid {}: {}; using defaults", Self::filename(), e);
            Self::default()
        })
    }

    /// Defaults, with the API URL taken from `USER_CONSOLE_API_URL` at compile time.
    pub fn from_build_env() -> Self {
        match option_env!("USER_CONSOLE_API_URL") {
            Some(url) if !url.trim().is_empty() => Self::default().with_base_url(url.trim()),
            _ => Self::default(),
        }
    }

    /// The configuration for this platform.
    pub fn load() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            match crate::file_store::app_data_dir() {
                Some(dir) => Self::load_from_dir(&dir),
                None => Self::from_build_env(),
            }
        }
        #[cfg(target_arch = "wasm32")]
        {
            Self::from_build_env()
        }
    }

    /// Read `console.toml` from `dir`. When there is none, the build defaults are
    /// written there so they can be edited.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_dir(dir: &Path) -> Self {
        let path = dir.join(Self::filename());
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                tracing::info!("Loaded {}", path.display());
                Self::from_toml_or_default(&text)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let config = Self::from_build_env();
                if let Err(e) = config.write_to_dir(dir) {
                    tracing::warn!("Could not write {}: {}", path.display(), e);
                }
                config
            }
            Err(e) => {
                tracing::warn!("Could not read {}: {}; using defaults", path.display(), e);
                Self::from_build_env()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn write_to_dir(&self, dir: &Path) -> std::io::Result<()> {
        let text = self
            .to_toml()
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;
        std::fs::create_dir_all(dir)?;
        std::fs::write(dir.join(Self::filename()), text)
    }
}
