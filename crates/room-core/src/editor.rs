//! Editor façade
//!
//! Owns every engine component and the host, and is the single entry point
//! for user actions. Failing operations are shown on the host's error
//! surface and returned to the caller.

use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::controller::{ManipulationController, ManipulationStep, SelectOutcome, Selection};
use crate::error::EditorError;
use crate::factory::ObjectFactory;
use crate::form::{ModelFields, ModelFile, PrimitiveFields};
use crate::host::EditorHost;
use crate::import::{ImportQueue, ImportToken};
use crate::input::FrameInput;
use crate::lights::{LightFields, LightKind, LightManager};
use crate::navigation::FirstPersonCamera;
use crate::object::{ObjectId, SceneObject};
use crate::placement::room_shell;
use crate::registry::{InsertMode, ObjectRegistry};
use crate::schedule::{FrameLoops, LoopKind, TickOutcome};

/// Scene engine bound to a host
pub struct Editor<H: EditorHost> {
    config: EditorConfig,
    host: H,
    registry: ObjectRegistry,
    factory: ObjectFactory,
    controller: ManipulationController,
    lights: LightManager,
    imports: ImportQueue,
    camera: FirstPersonCamera,
    loops: FrameLoops,
}

impl<H: EditorHost> Editor<H> {
    /// Build the editor and attach the room shell (and default lights, if
    /// configured) to the host scene
    pub fn new(config: EditorConfig, mut host: H) -> Self {
        for node in room_shell() {
            host.attach(&node);
        }
        let mut lights = LightManager::new();
        if config.default_lights {
            lights.install_defaults(&mut host);
        }

        info!(
            "Editor ready (capacity {}, collisions {})",
            config.max_objects,
            if config.collisions_enabled { "on" } else { "off" }
        );

        Self {
            registry: ObjectRegistry::new(config.max_objects),
            factory: ObjectFactory::new(&config),
            controller: ManipulationController::new(
                config.nudge_step,
                config.fast_multiplier,
                config.collisions_enabled,
            ),
            lights,
            imports: ImportQueue::new(),
            camera: FirstPersonCamera::default(),
            loops: FrameLoops::new(),
            config,
            host,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn lights(&self) -> &LightManager {
        &self.lights
    }

    pub fn camera(&self) -> &FirstPersonCamera {
        &self.camera
    }

    pub fn selection(&self) -> &Selection {
        self.controller.selection()
    }

    pub fn selected(&self) -> Option<&ObjectId> {
        self.controller.selected_id()
    }

    pub fn collisions_enabled(&self) -> bool {
        self.controller.collisions_enabled()
    }

    pub fn is_armed(&self, kind: LoopKind) -> bool {
        self.loops.is_armed(kind)
    }

    pub fn frames(&self) -> u64 {
        self.loops.frames()
    }

    /// Number of model imports still waiting for a frame
    pub fn pending_imports(&self) -> usize {
        self.imports.len()
    }

    /// Create (or with `Update`, replace) a box or pyramid
    pub fn submit_primitive(
        &mut self,
        fields: &PrimitiveFields,
        mode: InsertMode,
    ) -> Result<ObjectId, EditorError> {
        let result = self
            .factory
            .build_primitive(fields, mode, &self.registry)
            .and_then(|primitive| self.commit(SceneObject::Primitive(primitive), mode));
        self.report(result)
    }

    /// Validate a model request and queue it for parsing on the next frame
    pub fn request_model(
        &mut self,
        fields: &ModelFields,
        file: Option<ModelFile>,
        mode: InsertMode,
    ) -> Result<ImportToken, EditorError> {
        let result = self
            .factory
            .prepare_model(fields, file, mode, &self.registry)
            .map(|pending| {
                debug!("Queued import of '{}' for '{}'", pending.file.name, pending.id);
                self.imports.enqueue(pending)
            });
        self.report(result)
    }

    /// Finish every queued import in request order. Returns the ids that
    /// were committed.
    pub fn pump_imports(&mut self) -> Vec<ObjectId> {
        let mut committed = Vec::new();
        while let Some((_, pending, current)) = self.imports.next() {
            if !current {
                warn!(
                    "Discarding stale import of '{}' for '{}'",
                    pending.file.name, pending.id
                );
                continue;
            }
            let mode = pending.mode;
            let result = self
                .factory
                .finish_model(pending)
                .and_then(|model| self.commit(SceneObject::Model(model), mode));
            if let Ok(id) = self.report(result) {
                committed.push(id);
            }
        }
        committed
    }

    /// Select `id`, or toggle it off if it is already selected
    pub fn select(&mut self, id: &str) -> Result<SelectOutcome, EditorError> {
        let result = ObjectId::parse(id).and_then(|id| {
            self.controller
                .select(&id, &self.registry, &mut self.host)
        });
        match result {
            Ok(SelectOutcome::Selected) => self.loops.arm(LoopKind::Manipulation),
            Ok(SelectOutcome::Deselected) => self.loops.disarm(LoopKind::Manipulation),
            Err(_) => {}
        }
        self.report(result)
    }

    /// Clear the selection. Returns false if nothing was selected.
    pub fn deselect(&mut self) -> bool {
        self.loops.disarm(LoopKind::Manipulation);
        self.controller.deselect(&mut self.host)
    }

    /// Remove an object, clearing the selection first if it is the one
    pub fn delete(&mut self, id: &str) -> Result<(), EditorError> {
        let result = ObjectId::parse(id).and_then(|id| self.remove(&id));
        self.report(result)
    }

    /// Remove the selected object. `None` if nothing was selected.
    pub fn delete_selected(&mut self) -> Option<ObjectId> {
        let id = self.controller.selected_id()?.clone();
        let result = self.remove(&id);
        self.report(result).ok().map(|_| id)
    }

    /// Flip collision checking while an object is selected
    pub fn toggle_collisions(&mut self) -> Option<bool> {
        self.controller.toggle_collisions()
    }

    /// Add or replace the light of `kind`
    pub fn submit_light(&mut self, kind: LightKind, fields: &LightFields) {
        self.lights.add_or_replace(kind, fields, &mut self.host);
    }

    /// Remove the light of `kind`; false if there was none
    pub fn reset_light(&mut self, kind: LightKind) -> bool {
        self.lights.reset(kind, &mut self.host)
    }

    /// Pointer movement. Ignored unless navigation is active.
    pub fn look(&mut self, dx: f32, dy: f32) {
        if self.loops.is_armed(LoopKind::Navigation) {
            self.camera.look(dx, dy, self.config.look_sensitivity);
        }
    }

    /// Run one frame: finish queued imports, then tick the armed loops
    pub fn frame(&mut self, input: &FrameInput) -> u64 {
        let frame = self.loops.advance();
        self.pump_imports();

        if input.capture_active {
            self.loops.arm(LoopKind::Navigation);
        } else {
            self.loops.disarm(LoopKind::Navigation);
        }

        if self.loops.is_armed(LoopKind::Navigation) {
            self.camera.step(&input.keys, self.config.camera_speed);
        }

        if self.loops.is_armed(LoopKind::Manipulation) {
            let outcome = self.manipulate(input);
            self.loops.settle(LoopKind::Manipulation, outcome);
        }
        frame
    }

    fn manipulate(&mut self, input: &FrameInput) -> TickOutcome {
        let step = self
            .controller
            .tick(&input.keys, &mut self.registry, &mut self.host);
        match step {
            ManipulationStep::Idle => TickOutcome::Stop,
            ManipulationStep::Commit => {
                self.deselect();
                TickOutcome::Stop
            }
            ManipulationStep::Delete(id) => {
                let result = self.remove(&id);
                let _ = self.report(result);
                TickOutcome::Stop
            }
            ManipulationStep::Still | ManipulationStep::Blocked | ManipulationStep::Moved(_) => {
                TickOutcome::Continue
            }
        }
    }

    /// Insert a validated object, dropping the selection if it is about to
    /// be replaced
    fn commit(&mut self, object: SceneObject, mode: InsertMode) -> Result<ObjectId, EditorError> {
        let id = object.id().clone();
        if mode == InsertMode::Update && self.controller.is_selected(&id) {
            self.deselect();
        }
        self.registry.insert(object, mode, &mut self.host)?;
        Ok(id)
    }

    fn remove(&mut self, id: &ObjectId) -> Result<(), EditorError> {
        if !self.registry.exists(id) {
            return Err(EditorError::NotFound(id.to_string()));
        }
        if self.controller.is_selected(id) {
            self.deselect();
        }
        self.registry.remove(id, &mut self.host).map(|_| ())
    }

    fn report<T>(&mut self, result: Result<T, EditorError>) -> Result<T, EditorError> {
        if let Err(error) = &result {
            warn!("{}: {}", error.title(), error);
            self.host.show_error(error);
        }
        result
    }
}
