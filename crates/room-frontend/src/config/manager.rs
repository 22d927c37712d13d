//! RON-backed persistence for [`AppConfig`]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use super::AppConfig;

/// Configuration shared between the console loop and action handlers
pub type SharedConfig = Arc<RwLock<ConfigManager>>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Owns the loaded configuration and the file it is written back to
pub struct ConfigManager {
    config: AppConfig,
    path: PathBuf,
    /// Changed since the last load or save
    dirty: bool,
}

impl ConfigManager {
    /// Load `room-editor/config.ron` from the OS config directory
    pub fn new() -> Self {
        let path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("room-editor")
            .join("config.ron");
        Self::with_path(path)
    }

    /// Load from `path`, falling back to defaults when the file is absent
    /// or does not parse
    pub fn with_path(path: PathBuf) -> Self {
        let config = read_config(&path).unwrap_or_else(|| {
            tracing::info!("No usable config at {:?}, using defaults", path);
            AppConfig::new()
        });
        Self {
            config,
            path,
            dirty: false,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Mutable access; the next `save` writes the file
    pub fn config_mut(&mut self) -> &mut AppConfig {
        self.dirty = true;
        &mut self.config
    }

    /// Write the file if anything changed
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        let text = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, text).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::info!("Saved config to {:?}", self.path);
        self.dirty = false;
        Ok(())
    }

    /// Replace the configuration with defaults. Takes effect on the next start.
    pub fn reset_to_defaults(&mut self) {
        self.config = AppConfig::new();
        self.dirty = true;
    }

    pub fn config_file_path(&self) -> &Path {
        &self.path
    }
}

fn read_config(path: &Path) -> Option<AppConfig> {
    let text = std::fs::read_to_string(path).ok()?;
    match ron::from_str(&text) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", path);
            Some(config)
        }
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}", path, e);
            None
        }
    }
}

/// Load the user's configuration behind a shared lock
pub fn create_shared_config() -> SharedConfig {
    Arc::new(RwLock::new(ConfigManager::new()))
}
