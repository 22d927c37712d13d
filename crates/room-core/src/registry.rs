//! Authoritative store of live scene objects
//!
//! Primitives and models live in separate maps whose key sets are kept
//! disjoint. Membership changes are mirrored to the scene and to the
//! host's object picker.

use std::collections::HashMap;

use glam::{Mat4, Vec3};
use tracing::info;

use crate::bounds::BoundingBox;
use crate::error::EditorError;
use crate::host::{ObjectPicker, SceneSink};
use crate::object::{Model, ObjectId, ObjectRef, Primitive, SceneObject};

/// Whether an insert may replace an existing object with the same id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// Reject ids that are already taken
    Create,
    /// Replace whatever currently lives under the id
    Update,
}

/// Owner of all live primitives and models
#[derive(Debug)]
pub struct ObjectRegistry {
    primitives: HashMap<ObjectId, Primitive>,
    models: HashMap<ObjectId, Model>,
    /// Insertion order, for listing
    order: Vec<ObjectId>,
    max_objects: usize,
}

impl ObjectRegistry {
    pub fn new(max_objects: usize) -> Self {
        Self {
            primitives: HashMap::new(),
            models: HashMap::new(),
            order: Vec::new(),
            max_objects,
        }
    }

    pub fn max_objects(&self) -> usize {
        self.max_objects
    }

    /// True if either map holds `id`
    pub fn exists(&self, id: &ObjectId) -> bool {
        self.primitives.contains_key(id) || self.models.contains_key(id)
    }

    /// Total number of live objects
    pub fn count(&self) -> usize {
        self.primitives.len() + self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Look up an object of either kind
    pub fn get(&self, id: &ObjectId) -> Option<ObjectRef<'_>> {
        self.primitives
            .get(id)
            .map(ObjectRef::Primitive)
            .or_else(|| self.models.get(id).map(ObjectRef::Model))
    }

    /// Current position of an object of either kind
    pub fn position_of(&self, id: &ObjectId) -> Option<Vec3> {
        self.get(id).map(|o| o.position())
    }

    pub fn primitive(&self, id: &ObjectId) -> Option<&Primitive> {
        self.primitives.get(id)
    }

    pub fn model(&self, id: &ObjectId) -> Option<&Model> {
        self.models.get(id)
    }

    /// Ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &ObjectId> {
        self.order.iter()
    }

    /// Objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = ObjectRef<'_>> {
        self.order.iter().filter_map(|id| self.get(id))
    }

    /// World bounds of every object except `id`
    pub fn other_bounds<'a>(
        &'a self,
        id: &'a ObjectId,
    ) -> impl Iterator<Item = (&'a ObjectId, BoundingBox)> + 'a {
        self.objects()
            .filter(move |o| o.id() != id)
            .map(|o| (o.id(), o.world_bounds()))
    }

    /// Fail with `CapacityExceeded` if one more object would not fit.
    ///
    /// An object about to replace `replacing` does not count twice.
    pub fn check_capacity(&self, replacing: Option<&ObjectId>) -> Result<(), EditorError> {
        let freed = usize::from(replacing.is_some_and(|id| self.exists(id)));
        if self.count() - freed >= self.max_objects {
            return Err(EditorError::CapacityExceeded {
                limit: self.max_objects,
            });
        }
        Ok(())
    }

    /// Register an object, attach its render subtree and add a picker option
    pub fn insert<H>(
        &mut self,
        object: SceneObject,
        mode: InsertMode,
        host: &mut H,
    ) -> Result<(), EditorError>
    where
        H: SceneSink + ObjectPicker + ?Sized,
    {
        let id = object.id().clone();
        match mode {
            InsertMode::Create => {
                if self.exists(&id) {
                    return Err(EditorError::DuplicateId(id.to_string()));
                }
                self.check_capacity(None)?;
            }
            InsertMode::Update => {
                self.check_capacity(Some(&id))?;
                if self.exists(&id) {
                    self.remove(&id, host)?;
                }
            }
        }

        host.attach(&object.render_node());
        host.option_added(id.as_str());
        self.order.push(id.clone());
        match object {
            SceneObject::Primitive(p) => {
                info!("Added {} '{}'", p.kind.name(), id);
                self.primitives.insert(id, p);
            }
            SceneObject::Model(m) => {
                info!("Added model '{}' ({} parts)", id, m.parts.len());
                self.models.insert(id, m);
            }
        }
        Ok(())
    }

    /// Unregister an object, detach its render subtree and drop its option
    pub fn remove<H>(&mut self, id: &ObjectId, host: &mut H) -> Result<SceneObject, EditorError>
    where
        H: SceneSink + ObjectPicker + ?Sized,
    {
        let object = if let Some(p) = self.primitives.remove(id) {
            SceneObject::Primitive(p)
        } else if let Some(m) = self.models.remove(id) {
            SceneObject::Model(m)
        } else {
            return Err(EditorError::NotFound(id.to_string()));
        };

        self.order.retain(|o| o != id);
        host.detach(object.node());
        host.option_removed(id.as_str());
        info!("Removed '{}'", id);
        Ok(object)
    }

    /// Move an object by `delta`, returning its new world matrix
    pub fn translate(&mut self, id: &ObjectId, delta: Vec3) -> Result<Mat4, EditorError> {
        let transform = if let Some(p) = self.primitives.get_mut(id) {
            &mut p.transform
        } else if let Some(m) = self.models.get_mut(id) {
            &mut m.transform
        } else {
            return Err(EditorError::NotFound(id.to_string()));
        };
        transform.position += delta;
        Ok(transform.to_mat4())
    }
}
