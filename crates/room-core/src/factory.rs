//! Raw form input to validated scene objects
//!
//! Nothing built here touches the registry or the scene. The caller commits
//! the result only after every check has passed, so a rejected object never
//! becomes visible.

use std::sync::Arc;

use glam::Vec3;
use tracing::debug;

use crate::bounds::BoundingBox;
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::form::{ModelFields, ModelFile, PlacementFields, PrimitiveFields, parse_opt, parse_or};
use crate::mesh::{self, MeshData};
use crate::object::{Model, ModelPart, NodeId, ObjectId, Primitive, PrimitiveKind, Surface};
use crate::placement::{ROOM_SIZE, is_inside_room};
use crate::primitive::{generate_box_mesh, generate_pyramid_mesh};
use crate::registry::{InsertMode, ObjectRegistry};
use crate::transform::Transform;

/// Builds primitives and models from form input
#[derive(Debug, Clone)]
pub struct ObjectFactory {
    texture_suffix: String,
    default_model_factor: f32,
}

impl ObjectFactory {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            texture_suffix: config.texture_suffix.clone(),
            default_model_factor: config.default_model_factor,
        }
    }

    /// Validate and build a primitive.
    ///
    /// Checks run in order: id, uniqueness (create only), capacity, then
    /// placement of the fully transformed geometry.
    pub fn build_primitive(
        &self,
        fields: &PrimitiveFields,
        mode: InsertMode,
        registry: &ObjectRegistry,
    ) -> Result<Primitive, EditorError> {
        let id = check_id(&fields.id, mode, registry)?;
        registry.check_capacity(replacing(&id, mode))?;

        let height = parse_or(&fields.height, 1.0);
        let width = parse_or(&fields.width, 1.0);
        let depth = parse_or(&fields.depth, 1.0);
        let kind = PrimitiveKind::from_keyword(fields.kind.trim());
        let surface = if fields.attribute.trim() == "texture" {
            Surface::Texture(fields.texture.trim().to_string())
        } else {
            Surface::Color(fields.color.trim().to_string())
        };

        let mesh = match kind {
            PrimitiveKind::Box => generate_box_mesh(width, height, depth),
            PrimitiveKind::Pyramid => generate_pyramid_mesh(width, height),
        };

        let (position, rotation) = parse_placement(&fields.placement);
        let position = Vec3::new(
            position.x.unwrap_or(0.0),
            position.y.unwrap_or(height / 2.0),
            position.z.unwrap_or(0.0),
        );

        let primitive = Primitive {
            id,
            kind,
            height,
            width,
            depth,
            transform: Transform::new(position, rotation),
            surface,
            mesh: Arc::new(mesh),
            node: NodeId::new(),
        };

        if !is_inside_room(&primitive.world_bounds()) {
            return Err(EditorError::OutOfBounds(primitive.id.to_string()));
        }
        Ok(primitive)
    }

    /// First half of a model import: everything that can be checked before
    /// the file is parsed. Order: id, uniqueness, file present, capacity.
    pub fn prepare_model(
        &self,
        fields: &ModelFields,
        file: Option<ModelFile>,
        mode: InsertMode,
        registry: &ObjectRegistry,
    ) -> Result<PendingModel, EditorError> {
        let id = check_id(&fields.id, mode, registry)?;
        let file = file.ok_or(EditorError::MissingFile)?;
        registry.check_capacity(replacing(&id, mode))?;

        let factor = self.default_model_factor;
        let (position, rotation) = parse_placement(&fields.placement);
        let texture_name = format!("{}{}", mesh::file_stem(&file.name), self.texture_suffix);

        Ok(PendingModel {
            id,
            mode,
            height: parse_or(&fields.height, factor),
            width: parse_or(&fields.width, factor),
            depth: parse_or(&fields.depth, factor),
            position,
            rotation,
            texture_name,
            file,
        })
    }

    /// Second half of a model import: parse, texture, scale, validate
    pub fn finish_model(&self, pending: PendingModel) -> Result<Model, EditorError> {
        let PendingModel {
            id,
            height,
            width,
            depth,
            position,
            rotation,
            texture_name,
            file,
            ..
        } = pending;

        let parsed = mesh::parse_model(&file.name, &file.bytes).map_err(|source| {
            EditorError::Import {
                file: file.name.clone(),
                source,
            }
        })?;

        let parts: Vec<ModelPart> = parsed
            .into_iter()
            .filter(|p| !p.mesh.is_empty())
            .map(|p| ModelPart {
                name: p.name,
                mesh: Arc::new(p.mesh),
                texture: texture_name.clone(),
                cast_shadow: true,
                receive_shadow: true,
                node: NodeId::new(),
            })
            .collect();

        let scale = fit_scale(&parts, Vec3::new(width, height, depth));
        debug!("Scaling model '{}' by {:?}", id, scale);

        let mut model = Model {
            id,
            height,
            width,
            depth,
            transform: Transform::new(
                Vec3::new(
                    position.x.unwrap_or(0.0),
                    position.y.unwrap_or(0.0),
                    position.z.unwrap_or(0.0),
                ),
                rotation,
            )
            .with_scale(scale),
            source_file: file.name,
            texture_name,
            parts,
            node: NodeId::new(),
        };

        if position.y.is_none() {
            // Rest on the floor
            model.transform.position.y -= model.world_bounds().min.y;
        }

        if !is_inside_room(&model.world_bounds()) {
            return Err(EditorError::OutOfBounds(model.id.to_string()));
        }
        Ok(model)
    }
}

/// Model request that passed the synchronous checks and awaits parsing
#[derive(Debug, Clone, PartialEq)]
pub struct PendingModel {
    pub id: ObjectId,
    pub mode: InsertMode,
    pub height: f32,
    pub width: f32,
    pub depth: f32,
    pub position: PartialPosition,
    pub rotation: Vec3,
    pub texture_name: String,
    pub file: ModelFile,
}

/// Position inputs; `None` where the field did not parse
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialPosition {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

/// Per-axis scale making the model's box `room size × factor`.
///
/// Each axis is scaled independently, so a non-cubic source model is
/// stretched. Axes with no extent keep scale 1.
pub fn fit_scale(parts: &[ModelPart], factors: Vec3) -> Vec3 {
    let Some(bounds) = local_bounds(parts.iter().map(|p| p.mesh.as_ref())) else {
        return Vec3::ONE;
    };
    let size = bounds.size();
    Vec3::from_array(std::array::from_fn(|axis| {
        if size[axis] > f32::EPSILON {
            ROOM_SIZE[axis] / size[axis] * factors[axis]
        } else {
            1.0
        }
    }))
}

fn local_bounds<'a>(meshes: impl Iterator<Item = &'a MeshData>) -> Option<BoundingBox> {
    meshes
        .filter_map(MeshData::local_bounds)
        .reduce(|a, b| a.union(&b))
}

fn check_id(
    raw: &str,
    mode: InsertMode,
    registry: &ObjectRegistry,
) -> Result<ObjectId, EditorError> {
    let id = ObjectId::parse(raw)?;
    if mode == InsertMode::Create && registry.exists(&id) {
        return Err(EditorError::DuplicateId(id.to_string()));
    }
    Ok(id)
}

fn replacing(id: &ObjectId, mode: InsertMode) -> Option<&ObjectId> {
    match mode {
        InsertMode::Create => None,
        InsertMode::Update => Some(id),
    }
}

fn parse_placement(fields: &PlacementFields) -> (PartialPosition, Vec3) {
    let position = PartialPosition {
        x: parse_opt(&fields.x),
        y: parse_opt(&fields.y),
        z: parse_opt(&fields.z),
    };
    let rotation = Vec3::new(
        parse_or(&fields.rotation_x, 0.0),
        parse_or(&fields.rotation_y, 0.0),
        parse_or(&fields.rotation_z, 0.0),
    );
    (position, rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::recording::RecordingHost;
    use crate::object::SceneObject;
    use approx::assert_relative_eq;

    const CUBE_OBJ: &str = "\
o cube
v -1 -1 -1
v 1 -1 -1
v 1 1 -1
v -1 1 -1
v -1 -1 1
v 1 -1 1
v 1 1 1
v -1 1 1
f 1 2 3 4
f 5 6 7 8
f 1 2 6 5
f 4 3 7 8
";

    fn factory() -> ObjectFactory {
        ObjectFactory::new(&EditorConfig::default())
    }

    #[test]
    fn test_defaults_rest_on_floor() {
        let registry = ObjectRegistry::new(10);
        let fields = PrimitiveFields::new("a").with("height", "4");
        let p = factory()
            .build_primitive(&fields, InsertMode::Create, &registry)
            .unwrap();
        assert_eq!(p.height, 4.0);
        assert_eq!(p.width, 1.0);
        assert_eq!(p.depth, 1.0);
        assert_eq!(p.transform.position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(p.transform.rotation, Vec3::ZERO);
        assert_relative_eq!(p.world_bounds().min.y, 0.0);
    }

    #[test]
    fn test_fields_round_trip() {
        let registry = ObjectRegistry::new(10);
        let fields = PrimitiveFields::new(" shelf ")
            .with("kind", "pyramid")
            .with("height", "2")
            .with("width", "0.5")
            .with("depth", "3")
            .with("x", "1.5")
            .with("y", "1")
            .with("z", "-2")
            .with("ry", "30")
            .with("attribute", "texture")
            .with("texture", "wood.jpg");
        let p = factory()
            .build_primitive(&fields, InsertMode::Create, &registry)
            .unwrap();
        assert_eq!(p.id.as_str(), "shelf");
        assert_eq!(p.kind, PrimitiveKind::Pyramid);
        assert_eq!((p.height, p.width, p.depth), (2.0, 0.5, 3.0));
        assert_eq!(p.transform.position, Vec3::new(1.5, 1.0, -2.0));
        assert_eq!(p.transform.rotation, Vec3::new(0.0, 30.0, 0.0));
        assert_eq!(p.surface, Surface::Texture("wood.jpg".into()));
    }

    #[test]
    fn test_color_is_default_surface() {
        let registry = ObjectRegistry::new(10);
        let fields = PrimitiveFields::new("a").with("color", "#ff8800");
        let p = factory()
            .build_primitive(&fields, InsertMode::Create, &registry)
            .unwrap();
        assert_eq!(p.surface, Surface::Color("#ff8800".into()));
        assert_eq!(p.kind, PrimitiveKind::Box);
    }

    #[test]
    fn test_validation_order() {
        let mut registry = ObjectRegistry::new(1);
        let mut host = RecordingHost::new();
        let f = factory();

        let blank = PrimitiveFields::new("  ");
        assert_eq!(
            f.build_primitive(&blank, InsertMode::Create, &registry),
            Err(EditorError::InvalidId)
        );

        let p = f
            .build_primitive(&PrimitiveFields::new("a"), InsertMode::Create, &registry)
            .unwrap();
        registry
            .insert(SceneObject::Primitive(p), InsertMode::Create, &mut host)
            .unwrap();

        // Duplicate is reported before capacity
        assert_eq!(
            f.build_primitive(&PrimitiveFields::new("a"), InsertMode::Create, &registry),
            Err(EditorError::DuplicateId("a".into()))
        );
        assert_eq!(
            f.build_primitive(&PrimitiveFields::new("b"), InsertMode::Create, &registry),
            Err(EditorError::CapacityExceeded { limit: 1 })
        );
        // Updating the existing id is still allowed at capacity
        assert!(f
            .build_primitive(&PrimitiveFields::new("a"), InsertMode::Update, &registry)
            .is_ok());
    }

    #[test]
    fn test_out_of_bounds_on_every_face() {
        let registry = ObjectRegistry::new(10);
        let f = factory();
        for (key, value) in [
            ("x", "4.6"),
            ("x", "-4.6"),
            ("y", "0.4"),
            ("y", "9.6"),
            ("z", "4.6"),
            ("z", "-4.6"),
        ] {
            let fields = PrimitiveFields::new("a").with(key, value);
            assert_eq!(
                f.build_primitive(&fields, InsertMode::Create, &registry),
                Err(EditorError::OutOfBounds("a".into())),
                "{key}={value}"
            );
        }
    }

    #[test]
    fn test_rotation_counts_toward_bounds() {
        let registry = ObjectRegistry::new(10);
        // Fits axis-aligned, but the rotated corners poke through the wall
        let fields = PrimitiveFields::new("a")
            .with("width", "2")
            .with("depth", "2")
            .with("x", "3.9")
            .with("ry", "45");
        assert_eq!(
            factory().build_primitive(&fields, InsertMode::Create, &registry),
            Err(EditorError::OutOfBounds("a".into()))
        );
    }

    #[test]
    fn test_prepare_model_requires_file() {
        let registry = ObjectRegistry::new(10);
        let result =
            factory().prepare_model(&ModelFields::new("chair"), None, InsertMode::Create, &registry);
        assert_eq!(result, Err(EditorError::MissingFile));

        let result = factory().prepare_model(
            &ModelFields::new(""),
            None,
            InsertMode::Create,
            &registry,
        );
        assert_eq!(result, Err(EditorError::InvalidId));
    }

    #[test]
    fn test_prepare_model_at_capacity() {
        let mut registry = ObjectRegistry::new(1);
        let mut host = RecordingHost::new();
        let f = factory();
        let p = f
            .build_primitive(&PrimitiveFields::new("a"), InsertMode::Create, &registry)
            .unwrap();
        registry
            .insert(SceneObject::Primitive(p), InsertMode::Create, &mut host)
            .unwrap();

        let file = || Some(ModelFile::new("crate.obj", CUBE_OBJ));
        assert_eq!(
            f.prepare_model(&ModelFields::new("m"), file(), InsertMode::Create, &registry),
            Err(EditorError::CapacityExceeded { limit: 1 })
        );
        // A missing file is reported before the full room
        assert_eq!(
            f.prepare_model(&ModelFields::new("m"), None, InsertMode::Create, &registry),
            Err(EditorError::MissingFile)
        );
        // Replacing the only object does not need a free slot
        assert!(f
            .prepare_model(&ModelFields::new("a"), file(), InsertMode::Update, &registry)
            .is_ok());
    }

    #[test]
    fn test_model_is_scaled_textured_and_grounded() {
        let registry = ObjectRegistry::new(10);
        let f = factory();
        let fields = ModelFields::new("crate")
            .with("height", "0.3")
            .with("width", "0.2")
            .with("depth", "0.1");
        let pending = f
            .prepare_model(
                &fields,
                Some(ModelFile::new("models/crate.obj", CUBE_OBJ)),
                InsertMode::Create,
                &registry,
            )
            .unwrap();
        assert_eq!(pending.texture_name, "crate_texture.png");

        let model = f.finish_model(pending).unwrap();
        // Source cube is 2 units on every axis: scale = 10 / 2 * factor
        assert_relative_eq!(model.transform.scale.x, 1.0);
        assert_relative_eq!(model.transform.scale.y, 1.5);
        assert_relative_eq!(model.transform.scale.z, 0.5);

        let size = model.world_bounds().size();
        assert_relative_eq!(size.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(size.y, 3.0, epsilon = 1e-5);
        assert_relative_eq!(size.z, 1.0, epsilon = 1e-5);
        assert_relative_eq!(model.world_bounds().min.y, 0.0, epsilon = 1e-5);

        assert!(model.parts.iter().all(|p| p.texture == "crate_texture.png"
            && p.cast_shadow
            && p.receive_shadow));
    }

    #[test]
    fn test_oversized_model_is_out_of_bounds() {
        let registry = ObjectRegistry::new(10);
        let f = factory();
        let fields = ModelFields::new("huge").with("width", "1.5");
        let pending = f
            .prepare_model(
                &fields,
                Some(ModelFile::new("huge.obj", CUBE_OBJ)),
                InsertMode::Create,
                &registry,
            )
            .unwrap();
        assert_eq!(
            f.finish_model(pending),
            Err(EditorError::OutOfBounds("huge".into()))
        );
    }

    #[test]
    fn test_unparseable_model_file() {
        let registry = ObjectRegistry::new(10);
        let f = factory();
        let pending = f
            .prepare_model(
                &ModelFields::new("junk"),
                Some(ModelFile::new("junk.stl", "garbage")),
                InsertMode::Create,
                &registry,
            )
            .unwrap();
        assert!(matches!(
            f.finish_model(pending),
            Err(EditorError::Import { .. })
        ));
    }
}
