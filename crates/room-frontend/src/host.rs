//! In-memory host for the console shell
//!
//! Stands in for the render scene, the object form, the picker and the
//! error modal. Everything it receives is kept so `list` can print it.

use std::collections::HashMap;

use glam::Mat4;
use room_core::{
    EditorError, ErrorSurface, NodeId, NodeKind, ObjectPicker, ObjectView, RenderNode, SceneSink,
    SelectionMirror,
};
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct ShellHost {
    nodes: HashMap<NodeId, RenderNode>,
    options: Vec<String>,
    form: Option<ObjectView>,
    errors: Vec<String>,
}

impl ShellHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root nodes currently in the scene
    pub fn nodes(&self) -> impl Iterator<Item = &RenderNode> {
        self.nodes.values()
    }

    /// Total nodes in the scene, children included
    pub fn node_count(&self) -> usize {
        self.nodes.values().map(RenderNode::node_count).sum()
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn highlighted(&self) -> Option<NodeId> {
        self.nodes.values().find_map(|n| match n.kind {
            NodeKind::Highlight { target } => Some(target),
            _ => None,
        })
    }

    /// Picker options in insertion order
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Object form contents, `None` when cleared
    pub fn form(&self) -> Option<&ObjectView> {
        self.form.as_ref()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Drain errors shown since the last call
    pub fn take_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }
}

impl SceneSink for ShellHost {
    fn attach(&mut self, node: &RenderNode) {
        debug!("attach {} ({})", node.name, node.node_count());
        self.nodes.insert(node.id, node.clone());
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.remove(&node) {
            debug!("detach {}", n.name);
        }
    }

    fn set_transform(&mut self, node: NodeId, transform: Mat4) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.transform = transform;
        }
    }
}

impl SelectionMirror for ShellHost {
    fn show_selection(&mut self, selection: Option<&ObjectView>) {
        self.form = selection.cloned();
    }
}

impl ObjectPicker for ShellHost {
    fn option_added(&mut self, id: &str) {
        self.options.push(id.to_string());
    }

    fn option_removed(&mut self, id: &str) {
        self.options.retain(|o| o != id);
    }
}

impl ErrorSurface for ShellHost {
    fn show_error(&mut self, error: &EditorError) {
        warn!("{}: {}", error.title(), error);
        self.errors.push(format!("{}: {}", error.title(), error));
    }
}
