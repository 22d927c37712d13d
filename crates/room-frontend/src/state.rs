//! Application state shared between the console loop and action handlers

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use room_core::{
    Editor, EditorConfig, FrameInput, InsertMode, Key, KeySet, LightFields, LightKind,
    ModelFields, PrimitiveFields,
};

use crate::host::ShellHost;

/// Shared application state type
pub type SharedAppState = Arc<Mutex<AppState>>;

/// Actions that can be performed on the application
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    // Object actions
    /// Create or (with `Update`) replace a box or pyramid
    SubmitPrimitive {
        fields: PrimitiveFields,
        mode: InsertMode,
    },
    /// Read a model file from disk and queue its import
    ImportModel {
        fields: ModelFields,
        path: Option<PathBuf>,
        mode: InsertMode,
    },
    Select(String),
    Deselect,
    Delete(String),
    DeleteSelected,
    ToggleCollisions,

    // Input actions
    PressKey(Key),
    ReleaseKey(Key),
    /// Run this many frames with the current input
    Tick(u32),
    SetCapture(bool),
    Look { dx: f32, dy: f32 },

    // Light actions
    SetLight {
        kind: LightKind,
        fields: LightFields,
    },
    ResetLight(LightKind),

    // Shell actions
    List,
    ShowConfig,
    /// Write the configuration file now
    SaveConfig,
    /// Restore default configuration (applies on next start)
    ResetConfig,
    Help,
    Quit,
}

/// Everything the console operates on
pub struct AppState {
    pub editor: Editor<ShellHost>,
    /// Keys currently held down
    pub keys: KeySet,
    /// Pointer capture for first-person navigation
    pub capture_active: bool,
    /// Base directory for relative model paths
    pub model_dir: Option<PathBuf>,
    /// Cleared by `Quit`
    pub running: bool,
}

impl AppState {
    pub fn new(config: EditorConfig, model_dir: Option<PathBuf>) -> Self {
        Self {
            editor: Editor::new(config, ShellHost::new()),
            keys: KeySet::new(),
            capture_active: false,
            model_dir,
            running: true,
        }
    }

    /// Input snapshot for the next frame
    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            keys: self.keys.clone(),
            capture_active: self.capture_active,
        }
    }

    /// Resolve a model path against the configured model directory
    pub fn resolve_model_path(&self, path: &std::path::Path) -> PathBuf {
        match &self.model_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Create a new shared application state
pub fn create_shared_state(config: EditorConfig, model_dir: Option<PathBuf>) -> SharedAppState {
    Arc::new(Mutex::new(AppState::new(config, model_dir)))
}
