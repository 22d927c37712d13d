//! Action handling
//!
//! Every console command ends up here as an [`AppAction`]. Handlers lock the
//! shared state, call into the editor and return the lines to print.

use std::path::{Path, PathBuf};

use room_core::{
    InsertMode, LightFields, LightKind, ModelFields, ModelFile, ObjectKind, ObjectView,
};
use tracing::{debug, warn};

use crate::command::HELP;
use crate::config::SharedConfig;
use crate::state::{AppAction, AppState, SharedAppState};

/// Context for action handlers
pub struct ActionContext {
    pub app_state: SharedAppState,
    pub config: SharedConfig,
}

impl ActionContext {
    pub fn new(app_state: SharedAppState, config: SharedConfig) -> Self {
        Self { app_state, config }
    }
}

impl AppAction {
    /// Get a description of the action for display
    pub fn description(&self) -> &'static str {
        match self {
            AppAction::SubmitPrimitive {
                mode: InsertMode::Create,
                ..
            } => "Create Primitive",
            AppAction::SubmitPrimitive {
                mode: InsertMode::Update,
                ..
            } => "Update Primitive",
            AppAction::ImportModel {
                mode: InsertMode::Create,
                ..
            } => "Import Model",
            AppAction::ImportModel {
                mode: InsertMode::Update,
                ..
            } => "Replace Model",
            AppAction::Select(_) => "Select Object",
            AppAction::Deselect => "Deselect",
            AppAction::Delete(_) | AppAction::DeleteSelected => "Delete Object",
            AppAction::ToggleCollisions => "Toggle Collisions",
            AppAction::PressKey(_) => "Press Key",
            AppAction::ReleaseKey(_) => "Release Key",
            AppAction::Tick(_) => "Run Frames",
            AppAction::SetCapture(_) => "Pointer Capture",
            AppAction::Look { .. } => "Look",
            AppAction::SetLight { .. } => "Set Light",
            AppAction::ResetLight(_) => "Reset Light",
            AppAction::List => "List Scene",
            AppAction::ShowConfig => "Show Config",
            AppAction::SaveConfig => "Save Config",
            AppAction::ResetConfig => "Reset Config",
            AppAction::Help => "Help",
            AppAction::Quit => "Quit",
        }
    }
}

/// Perform an action and collect the lines to show the user
pub fn dispatch(action: AppAction, ctx: &ActionContext) -> Vec<String> {
    debug!("Action: {}", action.description());

    let mut output = match action {
        AppAction::SubmitPrimitive { fields, mode } => {
            let mut state = ctx.app_state.lock();
            match state.editor.submit_primitive(&fields, mode) {
                Ok(id) => vec![format!("{} '{}'", past_tense(mode), id)],
                Err(_) => Vec::new(),
            }
        }
        AppAction::ImportModel { fields, path, mode } => handle_import(ctx, &fields, path, mode),
        AppAction::Select(id) => {
            let mut state = ctx.app_state.lock();
            match state.editor.select(&id) {
                Ok(outcome) => vec![format!("{:?} '{}'", outcome, id)],
                Err(_) => Vec::new(),
            }
        }
        AppAction::Deselect => {
            let mut state = ctx.app_state.lock();
            if state.editor.deselect() {
                vec!["Selection cleared".to_string()]
            } else {
                vec!["Nothing selected".to_string()]
            }
        }
        AppAction::Delete(id) => {
            let mut state = ctx.app_state.lock();
            match state.editor.delete(&id) {
                Ok(()) => vec![format!("Deleted '{}'", id)],
                Err(_) => Vec::new(),
            }
        }
        AppAction::DeleteSelected => {
            let mut state = ctx.app_state.lock();
            match state.editor.delete_selected() {
                Some(id) => vec![format!("Deleted '{}'", id)],
                None => vec!["Nothing selected".to_string()],
            }
        }
        AppAction::ToggleCollisions => {
            let mut state = ctx.app_state.lock();
            match state.editor.toggle_collisions() {
                Some(true) => vec!["Collisions on".to_string()],
                Some(false) => vec!["Collisions off".to_string()],
                None => vec!["Select an object first".to_string()],
            }
        }
        AppAction::PressKey(key) => {
            ctx.app_state.lock().keys.press(key);
            Vec::new()
        }
        AppAction::ReleaseKey(key) => {
            ctx.app_state.lock().keys.release(key);
            Vec::new()
        }
        AppAction::Tick(frames) => {
            let mut state = ctx.app_state.lock();
            for _ in 0..frames {
                let input = state.frame_input();
                state.editor.frame(&input);
            }
            vec![format!("Frame {}", state.editor.frames())]
        }
        AppAction::SetCapture(active) => {
            let mut state = ctx.app_state.lock();
            state.capture_active = active;
            // Releasing capture lets go of every held key
            if !active {
                state.keys.clear();
            }
            Vec::new()
        }
        AppAction::Look { dx, dy } => {
            let mut state = ctx.app_state.lock();
            if state.capture_active {
                state.editor.look(dx, dy);
                Vec::new()
            } else {
                vec!["Pointer is not captured".to_string()]
            }
        }
        AppAction::SetLight { kind, fields } => handle_set_light(ctx, kind, &fields),
        AppAction::ResetLight(kind) => {
            let mut state = ctx.app_state.lock();
            if state.editor.reset_light(kind) {
                vec![format!("Removed {} light", kind.name())]
            } else {
                vec![format!("No {} light", kind.name())]
            }
        }
        AppAction::List => list_scene(&ctx.app_state.lock()),
        AppAction::ShowConfig => {
            let config = ctx.config.read();
            let text = ron::ser::to_string_pretty(config.config(), ron::ser::PrettyConfig::default())
                .unwrap_or_else(|e| format!("Cannot display config: {}", e));
            vec![
                format!("# {}", config.config_file_path().display()),
                text,
            ]
        }
        AppAction::SaveConfig => {
            let mut config = ctx.config.write();
            // Force a write even when nothing changed
            config.config_mut();
            match config.save() {
                Ok(()) => vec![format!("Saved {}", config.config_file_path().display())],
                Err(e) => vec![format!("error: {}", e)],
            }
        }
        AppAction::ResetConfig => {
            ctx.config.write().reset_to_defaults();
            vec!["Configuration reset; restart to apply".to_string()]
        }
        AppAction::Help => vec![HELP.to_string()],
        AppAction::Quit => {
            ctx.app_state.lock().running = false;
            Vec::new()
        }
    };

    let errors = ctx.app_state.lock().editor.host_mut().take_errors();
    output.extend(errors.into_iter().map(|e| format!("error: {}", e)));
    output
}

fn handle_import(
    ctx: &ActionContext,
    fields: &ModelFields,
    path: Option<PathBuf>,
    mode: InsertMode,
) -> Vec<String> {
    let complete = ctx.config.read().config().shell.complete_imports;
    let mut state = ctx.app_state.lock();

    let file = match path.map(|path| state.resolve_model_path(&path)) {
        Some(path) => match read_model_file(&path) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!("Failed to read {:?}: {}", path, e);
                return vec![format!("error: Cannot read {}: {}", path.display(), e)];
            }
        },
        None => None,
    };
    if state.editor.request_model(fields, file, mode).is_err() {
        return Vec::new();
    }
    if !complete {
        return vec!["Import queued".to_string()];
    }

    state
        .editor
        .pump_imports()
        .iter()
        .map(|id| format!("{} '{}'", past_tense(mode), id))
        .collect()
}

fn handle_set_light(ctx: &ActionContext, kind: LightKind, fields: &LightFields) -> Vec<String> {
    let mut state = ctx.app_state.lock();
    state.editor.submit_light(kind, fields);
    match state.editor.lights().get(kind) {
        Some(light) => vec![format!(
            "{} light #{:06x} x{}",
            kind.name(),
            light.params.color,
            light.params.intensity
        )],
        None => Vec::new(),
    }
}

/// Read a model file from disk, named by its last path component
fn read_model_file(path: &Path) -> std::io::Result<ModelFile> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned();
    Ok(ModelFile::new(name, bytes))
}

fn list_scene(state: &AppState) -> Vec<String> {
    let editor = &state.editor;
    let mut lines = Vec::new();

    lines.push(format!(
        "Objects ({}/{})",
        editor.registry().count(),
        editor.registry().max_objects()
    ));
    for object in editor.registry().objects() {
        let view = object.view();
        let marker = if editor.selected() == Some(object.id()) { "*" } else { " " };
        lines.push(format!("{} {}", marker, describe(&view)));
    }

    lines.push("Lights".to_string());
    for light in editor.lights().active() {
        lines.push(format!(
            "  {} #{:06x} x{}",
            light.params.kind.name(),
            light.params.color,
            light.params.intensity
        ));
    }

    let camera = editor.camera();
    lines.push(format!(
        "Camera ({:.2}, {:.2}, {:.2}) yaw {:.1} pitch {:.1}",
        camera.position.x,
        camera.position.y,
        camera.position.z,
        camera.yaw.to_degrees(),
        camera.pitch.to_degrees()
    ));
    lines.push(format!(
        "Collisions {}, capture {}",
        if editor.collisions_enabled() { "on" } else { "off" },
        if state.capture_active { "on" } else { "off" }
    ));
    lines
}

fn describe(view: &ObjectView) -> String {
    let kind = match &view.kind {
        ObjectKind::Primitive(kind) => kind.name().to_string(),
        ObjectKind::Model => format!(
            "model {}",
            view.source_file.as_deref().unwrap_or_default()
        ),
    };
    format!(
        "{} [{}] at ({:.2}, {:.2}, {:.2}) size {}x{}x{}",
        view.id,
        kind,
        view.position.x,
        view.position.y,
        view.position.z,
        view.width,
        view.height,
        view.depth
    )
}

fn past_tense(mode: InsertMode) -> &'static str {
    match mode {
        InsertMode::Create => "Created",
        InsertMode::Update => "Updated",
    }
}
