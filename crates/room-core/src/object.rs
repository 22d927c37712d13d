//! Scene object definitions
//!
//! A [`SceneObject`] is either a procedurally generated [`Primitive`] or an
//! imported [`Model`]. The object's fields are the source of truth; the
//! [`RenderNode`] handed to the scene is derived from them.

use std::fmt;
use std::sync::Arc;

use glam::{Mat4, Vec3};
use uuid::Uuid;

use crate::bounds::BoundingBox;
use crate::error::EditorError;
use crate::lights::LightKind;
use crate::mesh::MeshData;
use crate::transform::Transform;

/// User-chosen object identifier: trimmed and never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn parse(raw: &str) -> Result<Self, EditorError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EditorError::InvalidId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Primitive shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveKind {
    #[default]
    Box,
    Pyramid,
}

impl PrimitiveKind {
    /// Only the exact keyword `pyramid` selects a pyramid
    pub fn from_keyword(keyword: &str) -> Self {
        if keyword == "pyramid" {
            PrimitiveKind::Pyramid
        } else {
            PrimitiveKind::Box
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Box => "Box",
            PrimitiveKind::Pyramid => "Pyramid",
        }
    }
}

/// How a primitive is painted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Surface {
    /// Color specifier as entered (e.g. `red`, `#ff8800`)
    Color(String),
    /// Texture reference
    Texture(String),
}

/// Opaque handle of a node in the external render scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Material of a renderable mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub surface: Surface,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

/// Purely visual helpers attached next to lights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperKind {
    /// Arrow from a light toward its target
    DirectionArrow,
    /// Small sphere marking a point light's position
    PositionSphere,
    /// Cone outlining a spot light's beam
    Cone,
}

/// What a render node draws
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Mesh {
        mesh: Arc<MeshData>,
        material: Material,
    },
    /// Transform-only parent of its children
    Group,
    Light {
        kind: LightKind,
        color: u32,
        intensity: f32,
    },
    Helper {
        kind: HelperKind,
        light: NodeId,
    },
    /// Empty object whose position aims a directional or spot light
    TargetAnchor,
    /// Selection border drawn around `target`
    Highlight { target: NodeId },
}

/// A renderable subtree handed to the scene sink
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub transform: Mat4,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn new(id: NodeId, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            transform: Mat4::IDENTITY,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_children(mut self, children: Vec<RenderNode>) -> Self {
        self.children = children;
        self
    }

    /// Number of nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(RenderNode::node_count).sum::<usize>()
    }
}

/// Procedurally generated box or pyramid
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub id: ObjectId,
    pub kind: PrimitiveKind,
    pub height: f32,
    pub width: f32,
    pub depth: f32,
    pub transform: Transform,
    pub surface: Surface,
    pub mesh: Arc<MeshData>,
    pub node: NodeId,
}

impl Primitive {
    pub fn render_node(&self) -> RenderNode {
        RenderNode::new(
            self.node,
            self.id.as_str(),
            NodeKind::Mesh {
                mesh: Arc::clone(&self.mesh),
                material: Material {
                    surface: self.surface.clone(),
                    cast_shadow: true,
                    receive_shadow: true,
                },
            },
        )
        .with_transform(self.transform.to_mat4())
    }

    pub fn world_bounds(&self) -> BoundingBox {
        let matrix = self.transform.to_mat4();
        self.mesh
            .world_bounds(&matrix)
            .unwrap_or_else(|| BoundingBox::new(self.transform.position, self.transform.position))
    }
}

/// One mesh of an imported model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPart {
    pub name: String,
    pub mesh: Arc<MeshData>,
    pub texture: String,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub node: NodeId,
}

/// Model imported from a 3D file and scaled to the room
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub id: ObjectId,
    /// Desired size factors relative to the room, per axis
    pub height: f32,
    pub width: f32,
    pub depth: f32,
    /// Scale is computed from the factors, never authored directly
    pub transform: Transform,
    pub source_file: String,
    pub texture_name: String,
    pub parts: Vec<ModelPart>,
    pub node: NodeId,
}

impl Model {
    pub fn render_node(&self) -> RenderNode {
        let children = self
            .parts
            .iter()
            .map(|part| {
                RenderNode::new(
                    part.node,
                    part.name.clone(),
                    NodeKind::Mesh {
                        mesh: Arc::clone(&part.mesh),
                        material: Material {
                            surface: Surface::Texture(part.texture.clone()),
                            cast_shadow: part.cast_shadow,
                            receive_shadow: part.receive_shadow,
                        },
                    },
                )
            })
            .collect();

        RenderNode::new(self.node, self.id.as_str(), NodeKind::Group)
            .with_transform(self.transform.to_mat4())
            .with_children(children)
    }

    pub fn world_bounds(&self) -> BoundingBox {
        let matrix = self.transform.to_mat4();
        self.parts
            .iter()
            .filter_map(|part| part.mesh.world_bounds(&matrix))
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| BoundingBox::new(self.transform.position, self.transform.position))
    }
}

/// Either kind of live object
#[derive(Debug, Clone, PartialEq)]
pub enum SceneObject {
    Primitive(Primitive),
    Model(Model),
}

impl SceneObject {
    pub fn as_object(&self) -> ObjectRef<'_> {
        match self {
            SceneObject::Primitive(p) => ObjectRef::Primitive(p),
            SceneObject::Model(m) => ObjectRef::Model(m),
        }
    }

    pub fn id(&self) -> &ObjectId {
        self.as_object().id()
    }

    pub fn node(&self) -> NodeId {
        self.as_object().node()
    }

    pub fn transform(&self) -> &Transform {
        self.as_object().transform()
    }

    pub fn world_bounds(&self) -> BoundingBox {
        self.as_object().world_bounds()
    }

    pub fn render_node(&self) -> RenderNode {
        self.as_object().render_node()
    }
}

/// Borrowed view of a live object
#[derive(Debug, Clone, Copy)]
pub enum ObjectRef<'a> {
    Primitive(&'a Primitive),
    Model(&'a Model),
}

impl<'a> ObjectRef<'a> {
    pub fn id(&self) -> &'a ObjectId {
        match self {
            ObjectRef::Primitive(p) => &p.id,
            ObjectRef::Model(m) => &m.id,
        }
    }

    /// Root node of the object's render subtree
    pub fn node(&self) -> NodeId {
        match self {
            ObjectRef::Primitive(p) => p.node,
            ObjectRef::Model(m) => m.node,
        }
    }

    pub fn transform(&self) -> &'a Transform {
        match self {
            ObjectRef::Primitive(p) => &p.transform,
            ObjectRef::Model(m) => &m.transform,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform().position
    }

    pub fn world_bounds(&self) -> BoundingBox {
        match self {
            ObjectRef::Primitive(p) => p.world_bounds(),
            ObjectRef::Model(m) => m.world_bounds(),
        }
    }

    pub fn render_node(&self) -> RenderNode {
        match self {
            ObjectRef::Primitive(p) => p.render_node(),
            ObjectRef::Model(m) => m.render_node(),
        }
    }

    /// Snapshot used to mirror the selection in an external form
    pub fn view(&self) -> ObjectView {
        match self {
            ObjectRef::Primitive(p) => ObjectView {
                id: p.id.to_string(),
                kind: ObjectKind::Primitive(p.kind),
                height: p.height,
                width: p.width,
                depth: p.depth,
                position: p.transform.position,
                rotation: p.transform.rotation,
                surface: Some(p.surface.clone()),
                source_file: None,
            },
            ObjectRef::Model(m) => ObjectView {
                id: m.id.to_string(),
                kind: ObjectKind::Model,
                height: m.height,
                width: m.width,
                depth: m.depth,
                position: m.transform.position,
                rotation: m.transform.rotation,
                surface: Some(Surface::Texture(m.texture_name.clone())),
                source_file: Some(m.source_file.clone()),
            },
        }
    }
}

/// Kind tag shown in the selection form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Primitive(PrimitiveKind),
    Model,
}

/// Field values of the selected object, as mirrored into the UI form
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectView {
    pub id: String,
    pub kind: ObjectKind,
    pub height: f32,
    pub width: f32,
    pub depth: f32,
    pub position: Vec3,
    pub rotation: Vec3,
    pub surface: Option<Surface>,
    pub source_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_trims() {
        assert_eq!(ObjectId::parse("  lamp ").unwrap().as_str(), "lamp");
        assert_eq!(ObjectId::parse("   "), Err(EditorError::InvalidId));
        assert_eq!(ObjectId::parse(""), Err(EditorError::InvalidId));
    }

    #[test]
    fn test_primitive_kind_keyword_is_exact() {
        assert_eq!(PrimitiveKind::from_keyword("pyramid"), PrimitiveKind::Pyramid);
        assert_eq!(PrimitiveKind::from_keyword("Pyramid"), PrimitiveKind::Box);
        assert_eq!(PrimitiveKind::from_keyword("cone"), PrimitiveKind::Box);
        assert_eq!(PrimitiveKind::from_keyword(""), PrimitiveKind::Box);
    }

    #[test]
    fn test_render_node_counts_model_parts() {
        let mesh = Arc::new(crate::primitive::generate_box_mesh(1.0, 1.0, 1.0));
        let part = |name: &str| ModelPart {
            name: name.to_string(),
            mesh: Arc::clone(&mesh),
            texture: "chair_texture.png".into(),
            cast_shadow: true,
            receive_shadow: true,
            node: NodeId::new(),
        };
        let model = Model {
            id: ObjectId::parse("chair").unwrap(),
            height: 0.2,
            width: 0.2,
            depth: 0.2,
            transform: Transform::default(),
            source_file: "chair.obj".into(),
            texture_name: "chair_texture.png".into(),
            parts: vec![part("seat"), part("back")],
            node: NodeId::new(),
        };
        let node = model.render_node();
        assert_eq!(node.node_count(), 3);
        assert!(matches!(node.kind, NodeKind::Group));
    }
}
