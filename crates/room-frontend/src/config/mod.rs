//! Application configuration module
//!
//! Engine tuning lives in [`room_core::EditorConfig`]; this module wraps it
//! together with console shell preferences and persists both.

mod manager;

pub use manager::{ConfigError, ConfigManager, SharedConfig, create_shared_config};

use std::path::PathBuf;

use room_core::EditorConfig;
use serde::{Deserialize, Serialize};

/// Console shell preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt printed before each command
    pub prompt: String,
    /// Directory that relative model paths are resolved against
    pub model_dir: Option<PathBuf>,
    /// Finish model imports right away instead of on the next `tick`
    pub complete_imports: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "room> ".to_string(),
            model_dir: None,
            complete_imports: true,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    /// Scene engine settings
    #[serde(default)]
    pub editor: EditorConfig,
    /// Console settings
    #[serde(default)]
    pub shell: ShellConfig,
}

impl AppConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }
}
