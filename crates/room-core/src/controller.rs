//! Selection state machine and keyboard manipulation
//!
//! `Idle` ↔ `Selected`. Selecting always clears the previous highlight
//! first, so at most one object is bordered at any time. While selected,
//! each manipulation tick turns the pressed keys into a translation that is
//! clamped per axis to the room and, with collision checking on, dropped
//! entirely if it would overlap another object.

use glam::Vec3;
use tracing::{debug, info};

use crate::error::EditorError;
use crate::host::{SceneSink, SelectionMirror};
use crate::input::{Key, KeySet};
use crate::object::{NodeId, NodeKind, ObjectId, RenderNode};
use crate::placement::clamp_translation;
use crate::registry::ObjectRegistry;

/// Current selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Selected {
        id: ObjectId,
        /// Border node drawn around the object
        highlight: NodeId,
    },
}

impl Selection {
    pub fn id(&self) -> Option<&ObjectId> {
        match self {
            Selection::Idle => None,
            Selection::Selected { id, .. } => Some(id),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Selection::Idle)
    }
}

/// Result of a `select` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected,
    /// The id was already selected, so it was toggled off
    Deselected,
}

/// What one manipulation tick did
#[derive(Debug, Clone, PartialEq)]
pub enum ManipulationStep {
    /// Nothing is selected
    Idle,
    /// No movement keys held
    Still,
    Moved(Vec3),
    /// Movement requested but suppressed by the room or a collision
    Blocked,
    /// Commit key: the caller should deselect
    Commit,
    /// Delete key: the caller should delete this object
    Delete(ObjectId),
}

/// Selection plus keyboard-driven movement of the selected object
#[derive(Debug)]
pub struct ManipulationController {
    selection: Selection,
    collisions_enabled: bool,
    nudge_step: f32,
    fast_multiplier: f32,
    /// Collision toggle key was down on the previous tick
    toggle_held: bool,
}

impl ManipulationController {
    pub fn new(nudge_step: f32, fast_multiplier: f32, collisions_enabled: bool) -> Self {
        Self {
            selection: Selection::Idle,
            collisions_enabled,
            nudge_step,
            fast_multiplier,
            toggle_held: false,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_id(&self) -> Option<&ObjectId> {
        self.selection.id()
    }

    pub fn is_selected(&self, id: &ObjectId) -> bool {
        self.selection.id() == Some(id)
    }

    pub fn collisions_enabled(&self) -> bool {
        self.collisions_enabled
    }

    /// Flip collision checking. Only has an effect while something is
    /// selected; returns the new state in that case.
    pub fn toggle_collisions(&mut self) -> Option<bool> {
        if self.selection.is_idle() {
            return None;
        }
        self.collisions_enabled = !self.collisions_enabled;
        info!(
            "Collision checking {}",
            if self.collisions_enabled { "enabled" } else { "disabled" }
        );
        Some(self.collisions_enabled)
    }

    /// Select `id`, or deselect it if it is already the selection
    pub fn select<H>(
        &mut self,
        id: &ObjectId,
        registry: &ObjectRegistry,
        host: &mut H,
    ) -> Result<SelectOutcome, EditorError>
    where
        H: SceneSink + SelectionMirror + ?Sized,
    {
        let Some(object) = registry.get(id) else {
            return Err(EditorError::NotFound(id.to_string()));
        };

        if self.is_selected(id) {
            self.deselect(host);
            return Ok(SelectOutcome::Deselected);
        }
        self.deselect(host);

        let highlight = RenderNode::new(
            NodeId::new(),
            format!("{id} border"),
            NodeKind::Highlight {
                target: object.node(),
            },
        );
        host.attach(&highlight);
        host.show_selection(Some(&object.view()));
        self.selection = Selection::Selected {
            id: id.clone(),
            highlight: highlight.id,
        };
        self.toggle_held = false;
        info!("Selected '{}'", id);
        Ok(SelectOutcome::Selected)
    }

    /// Clear the selection. Returns false if nothing was selected.
    pub fn deselect<H>(&mut self, host: &mut H) -> bool
    where
        H: SceneSink + SelectionMirror + ?Sized,
    {
        let Selection::Selected { id, highlight } = std::mem::take(&mut self.selection) else {
            return false;
        };
        host.detach(highlight);
        host.show_selection(None);
        debug!("Deselected '{}'", id);
        true
    }

    /// One manipulation step for the pressed keys. A successful move also
    /// refreshes the mirrored form with the new position.
    pub fn tick<H>(
        &mut self,
        keys: &KeySet,
        registry: &mut ObjectRegistry,
        host: &mut H,
    ) -> ManipulationStep
    where
        H: SceneSink + SelectionMirror + ?Sized,
    {
        let Some(id) = self.selection.id().cloned() else {
            return ManipulationStep::Idle;
        };

        if keys.is_pressed(Key::Enter) {
            return ManipulationStep::Commit;
        }
        if keys.is_pressed(Key::Delete) || keys.is_pressed(Key::Backspace) {
            return ManipulationStep::Delete(id);
        }

        let toggle_down = keys.is_pressed(Key::C);
        if toggle_down && !self.toggle_held {
            self.toggle_collisions();
        }
        self.toggle_held = toggle_down;

        let direction = keys.nudge_vector();
        if direction == Vec3::ZERO {
            return ManipulationStep::Still;
        }
        let speed = if keys.is_pressed(Key::Shift) {
            self.nudge_step * self.fast_multiplier
        } else {
            self.nudge_step
        };

        let Some(object) = registry.get(&id) else {
            return ManipulationStep::Idle;
        };
        let node = object.node();
        let bounds = object.world_bounds();
        let mut delta = clamp_translation(&bounds, direction * speed);

        if self.collisions_enabled && delta != Vec3::ZERO {
            let moved = bounds.translate(delta);
            if let Some((other, _)) = registry
                .other_bounds(&id)
                .find(|(_, other)| moved.intersects(other))
            {
                debug!("Movement of '{}' blocked by '{}'", id, other);
                delta = Vec3::ZERO;
            }
        }

        if delta == Vec3::ZERO {
            return ManipulationStep::Blocked;
        }
        let Ok(matrix) = registry.translate(&id, delta) else {
            return ManipulationStep::Idle;
        };
        host.set_transform(node, matrix);
        if let Some(object) = registry.get(&id) {
            host.show_selection(Some(&object.view()));
        }
        ManipulationStep::Moved(delta)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::host::recording::{Call, RecordingHost};
    use crate::object::{Primitive, PrimitiveKind, SceneObject, Surface};
    use crate::primitive::generate_box_mesh;
    use crate::registry::InsertMode;
    use crate::transform::Transform;

    fn id(s: &str) -> ObjectId {
        ObjectId::parse(s).unwrap()
    }

    fn setup(cubes: &[(&str, Vec3)]) -> (ObjectRegistry, RecordingHost) {
        let mut registry = ObjectRegistry::new(10);
        let mut host = RecordingHost::new();
        for (name, position) in cubes {
            let cube = Primitive {
                id: id(name),
                kind: PrimitiveKind::Box,
                height: 1.0,
                width: 1.0,
                depth: 1.0,
                transform: Transform::new(*position, Vec3::ZERO),
                surface: Surface::Color("blue".into()),
                mesh: Arc::new(generate_box_mesh(1.0, 1.0, 1.0)),
                node: NodeId::new(),
            };
            registry
                .insert(SceneObject::Primitive(cube), InsertMode::Create, &mut host)
                .unwrap();
        }
        host.clear_calls();
        (registry, host)
    }

    fn keys(list: &[Key]) -> KeySet {
        list.iter().copied().collect()
    }

    #[test]
    fn test_select_missing_is_not_found() {
        let (registry, mut host) = setup(&[]);
        let mut controller = ManipulationController::new(0.05, 3.0, true);
        assert_eq!(
            controller.select(&id("ghost"), &registry, &mut host),
            Err(EditorError::NotFound("ghost".into()))
        );
        assert!(controller.selection().is_idle());
    }

    #[test]
    fn test_reselect_clears_previous_highlight_first() {
        let (registry, mut host) =
            setup(&[("a", Vec3::new(0.0, 0.5, 0.0)), ("b", Vec3::new(3.0, 0.5, 0.0))]);
        let mut controller = ManipulationController::new(0.05, 3.0, true);

        controller.select(&id("a"), &registry, &mut host).unwrap();
        let Selection::Selected { highlight: first, .. } = controller.selection().clone() else {
            panic!("not selected");
        };
        host.clear_calls();

        controller.select(&id("b"), &registry, &mut host).unwrap();
        assert_eq!(host.calls[0], Call::Detach(first));
        assert_eq!(host.calls[1], Call::ShowSelection(None));
        assert!(matches!(host.calls[2], Call::Attach(_)));
        assert_eq!(host.calls[3], Call::ShowSelection(Some("b".into())));
        assert_eq!(host.highlight_count(), 1);
        assert_eq!(host.mirrored.as_ref().unwrap().id, "b");
    }

    #[test]
    fn test_select_same_id_toggles_off() {
        let (registry, mut host) = setup(&[("a", Vec3::new(0.0, 0.5, 0.0))]);
        let mut controller = ManipulationController::new(0.05, 3.0, true);
        assert_eq!(
            controller.select(&id("a"), &registry, &mut host),
            Ok(SelectOutcome::Selected)
        );
        assert_eq!(
            controller.select(&id("a"), &registry, &mut host),
            Ok(SelectOutcome::Deselected)
        );
        assert!(controller.selection().is_idle());
        assert_eq!(host.highlight_count(), 0);
        assert!(host.mirrored.is_none());
    }

    #[test]
    fn test_deselect_when_idle_is_noop() {
        let (_registry, mut host) = setup(&[]);
        let mut controller = ManipulationController::new(0.05, 3.0, true);
        assert!(!controller.deselect(&mut host));
        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_boundary_blocks_only_violating_axis() {
        let (mut registry, mut host) = setup(&[("a", Vec3::new(4.5, 0.5, 0.0))]);
        let mut controller = ManipulationController::new(0.05, 3.0, true);
        controller.select(&id("a"), &registry, &mut host).unwrap();

        let pressed = keys(&[Key::ArrowRight, Key::ArrowUp]);
        for _ in 0..10 {
            controller.tick(&pressed, &mut registry, &mut host);
        }
        let position = registry.get(&id("a")).unwrap().position();
        assert_relative_eq!(position.x, 4.5);
        assert_relative_eq!(position.z, -0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_collision_zeroes_whole_translation() {
        let (mut registry, mut host) =
            setup(&[("a", Vec3::new(0.0, 0.5, 0.0)), ("b", Vec3::new(1.02, 0.5, 0.0))]);
        let mut controller = ManipulationController::new(0.05, 3.0, true);
        controller.select(&id("a"), &registry, &mut host).unwrap();

        // Moving right and back would touch b: the z component is dropped too
        let step = controller.tick(
            &keys(&[Key::ArrowRight, Key::ArrowDown]),
            &mut registry,
            &mut host,
        );
        assert_eq!(step, ManipulationStep::Blocked);
        assert_eq!(
            registry.get(&id("a")).unwrap().position(),
            Vec3::new(0.0, 0.5, 0.0)
        );
    }

    #[test]
    fn test_collision_disabled_allows_overlap() {
        let (mut registry, mut host) =
            setup(&[("a", Vec3::new(0.0, 0.5, 0.0)), ("b", Vec3::new(1.02, 0.5, 0.0))]);
        let mut controller = ManipulationController::new(0.05, 3.0, false);
        controller.select(&id("a"), &registry, &mut host).unwrap();
        let node = registry.get(&id("a")).unwrap().node();
        host.clear_calls();

        let step = controller.tick(&keys(&[Key::ArrowRight]), &mut registry, &mut host);
        assert!(matches!(step, ManipulationStep::Moved(_)));
        assert_relative_eq!(registry.get(&id("a")).unwrap().position().x, 0.05);
        assert_eq!(
            host.calls,
            vec![Call::SetTransform(node), Call::ShowSelection(Some("a".into()))]
        );
    }

    #[test]
    fn test_form_follows_moved_object() {
        let (mut registry, mut host) = setup(&[("a", Vec3::new(0.0, 0.5, 0.0))]);
        let mut controller = ManipulationController::new(0.05, 3.0, true);
        controller.select(&id("a"), &registry, &mut host).unwrap();

        let pressed = keys(&[Key::ArrowRight]);
        for _ in 0..20 {
            controller.tick(&pressed, &mut registry, &mut host);
        }
        let position = registry.get(&id("a")).unwrap().position();
        assert_relative_eq!(position.x, 1.0, epsilon = 1e-5);
        assert_eq!(host.mirrored.as_ref().unwrap().position, position);
    }

    #[test]
    fn test_blocked_move_leaves_form_alone() {
        let (mut registry, mut host) = setup(&[("a", Vec3::new(4.5, 0.5, 0.0))]);
        let mut controller = ManipulationController::new(0.05, 3.0, true);
        controller.select(&id("a"), &registry, &mut host).unwrap();
        host.clear_calls();

        let step = controller.tick(&keys(&[Key::ArrowRight]), &mut registry, &mut host);
        assert_eq!(step, ManipulationStep::Blocked);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_shift_speeds_up() {
        let (mut registry, mut host) = setup(&[("a", Vec3::new(0.0, 0.5, 0.0))]);
        let mut controller = ManipulationController::new(0.05, 3.0, true);
        controller.select(&id("a"), &registry, &mut host).unwrap();
        controller.tick(&keys(&[Key::PageUp, Key::Shift]), &mut registry, &mut host);
        assert_relative_eq!(registry.get(&id("a")).unwrap().position().y, 0.65, epsilon = 1e-6);
    }

    #[test]
    fn test_toggle_is_edge_triggered() {
        let (mut registry, mut host) = setup(&[("a", Vec3::new(0.0, 0.5, 0.0))]);
        let mut controller = ManipulationController::new(0.05, 3.0, true);
        assert_eq!(controller.toggle_collisions(), None);

        controller.select(&id("a"), &registry, &mut host).unwrap();
        let held = keys(&[Key::C]);
        for _ in 0..5 {
            controller.tick(&held, &mut registry, &mut host);
        }
        assert!(!controller.collisions_enabled());
        controller.tick(&KeySet::new(), &mut registry, &mut host);
        controller.tick(&held, &mut registry, &mut host);
        assert!(controller.collisions_enabled());
    }

    #[test]
    fn test_commit_and_delete_keys() {
        let (mut registry, mut host) = setup(&[("a", Vec3::new(0.0, 0.5, 0.0))]);
        let mut controller = ManipulationController::new(0.05, 3.0, true);
        controller.select(&id("a"), &registry, &mut host).unwrap();
        assert_eq!(
            controller.tick(&keys(&[Key::Enter]), &mut registry, &mut host),
            ManipulationStep::Commit
        );
        assert_eq!(
            controller.tick(&keys(&[Key::Backspace]), &mut registry, &mut host),
            ManipulationStep::Delete(id("a"))
        );
    }
}
