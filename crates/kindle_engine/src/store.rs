//! Durable storage for the client's single setting, the server URL.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use kindle_logging::{kindle_info, kindle_warn};
use serde::{Deserialize, Serialize};

use crate::persist::{write_atomic, PersistError};

const APP_DIR: &str = "kindle-sender";
const SETTINGS_FILENAME: &str = "settings.ron";

pub trait SettingsStore: Send + Sync {
    /// The stored server URL; `None` when nothing was ever saved.
    fn load_server_url(&self) -> Result<Option<String>, PersistError>;
    fn store_server_url(&self, server_url: &str) -> Result<(), PersistError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredSettings {
    #[serde(default)]
    server_url: Option<String>,
}

/// `{config_dir}/kindle-sender/settings.ron`, if the platform has a config dir.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILENAME))
}

/// RON file store, written atomically.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load_server_url(&self) -> Result<Option<String>, PersistError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let settings: StoredSettings = ron::from_str(&content).map_err(|err| {
            kindle_warn!("Failed to parse settings from {:?}: {}", self.path, err);
            PersistError::Format(err.to_string())
        })?;
        Ok(settings.server_url)
    }

    fn store_server_url(&self, server_url: &str) -> Result<(), PersistError> {
        let settings = StoredSettings {
            server_url: Some(server_url.to_string()),
        };
        let content = ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::new())
            .map_err(|err| PersistError::Format(err.to_string()))?;
        write_atomic(&self.path, &content)?;
        kindle_info!("Saved server URL {} to {:?}", server_url, self.path);
        Ok(())
    }
}

/// Process-local store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    server_url: Mutex<Option<String>>,
}

impl MemorySettingsStore {
    pub fn new(server_url: Option<String>) -> Self {
        Self {
            server_url: Mutex::new(server_url),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned lock still holds a valid Option.
        self.server_url
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load_server_url(&self) -> Result<Option<String>, PersistError> {
        Ok(self.slot().clone())
    }

    fn store_server_url(&self, server_url: &str) -> Result<(), PersistError> {
        *self.slot() = Some(server_url.to_string());
        Ok(())
    }
}
