//! Collaborator interfaces implemented by the embedding UI
//!
//! The engine never renders, draws forms or shows dialogs itself. It calls
//! into these traits instead; [`EditorHost`] bundles all of them.

use glam::Mat4;

use crate::error::EditorError;
use crate::object::{NodeId, ObjectView, RenderNode};

/// External render scene graph
pub trait SceneSink {
    /// Add a subtree to the scene
    fn attach(&mut self, node: &RenderNode);
    /// Remove a subtree (root and all children) from the scene
    fn detach(&mut self, node: NodeId);
    /// Replace a node's world transform
    fn set_transform(&mut self, node: NodeId, transform: Mat4);
}

/// Form that mirrors the selected object's fields
pub trait SelectionMirror {
    /// `None` clears the form and resets button captions
    fn show_selection(&mut self, selection: Option<&ObjectView>);
}

/// Object picker kept in sync with registry membership
pub trait ObjectPicker {
    fn option_added(&mut self, id: &str);
    fn option_removed(&mut self, id: &str);
}

/// Presentation of user-facing errors
pub trait ErrorSurface {
    fn show_error(&mut self, error: &EditorError);
}

/// Everything the editor needs from its host
pub trait EditorHost: SceneSink + SelectionMirror + ObjectPicker + ErrorSurface {}

impl<T> EditorHost for T where T: SceneSink + SelectionMirror + ObjectPicker + ErrorSurface {}
