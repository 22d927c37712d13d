//! Room bounds checks
//!
//! Creation is all-or-nothing: an object whose initial box leaves the room
//! is rejected. Movement is per axis: only the offending axis is dropped.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use tracing::debug;

use crate::bounds::BoundingBox;
use crate::mesh::MeshData;
use crate::object::{Material, NodeId, NodeKind, RenderNode, Surface};

/// The room: x in [-5, 5], y in [0, 10], z in [-5, 5]
pub const ROOM: BoundingBox = BoundingBox::new(Vec3::new(-5.0, 0.0, -5.0), Vec3::new(5.0, 10.0, 5.0));

/// Edge length of the room on every axis
pub const ROOM_SIZE: Vec3 = Vec3::new(10.0, 10.0, 10.0);

pub fn is_inside_room(bounds: &BoundingBox) -> bool {
    bounds.is_within(&ROOM)
}

/// Zero each axis of `delta` whose single-axis move would leave the room
pub fn clamp_translation(bounds: &BoundingBox, delta: Vec3) -> Vec3 {
    let mut clamped = delta;
    for (axis, unit) in [Vec3::X, Vec3::Y, Vec3::Z].into_iter().enumerate() {
        let step = delta[axis];
        if step == 0.0 {
            continue;
        }
        if !is_inside_room(&bounds.translate(unit * step)) {
            debug!("Blocked movement on axis {} at room boundary", axis);
            clamped[axis] = 0.0;
        }
    }
    clamped
}

/// Static floor and back walls drawn around the room
pub fn room_shell() -> Vec<RenderNode> {
    let plane = Arc::new(plane_mesh(ROOM_SIZE.x, ROOM_SIZE.z));
    let surface = |texture: &str| NodeKind::Mesh {
        mesh: Arc::clone(&plane),
        material: Material {
            surface: Surface::Texture(texture.to_string()),
            cast_shadow: false,
            receive_shadow: true,
        },
    };

    let half = ROOM_SIZE * 0.5;
    vec![
        RenderNode::new(NodeId::new(), "floor", surface("floor.jpg")),
        RenderNode::new(NodeId::new(), "back wall", surface("wall.jpg")).with_transform(
            Mat4::from_translation(Vec3::new(0.0, half.y, ROOM.min.z))
                * Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2),
        ),
        RenderNode::new(NodeId::new(), "side wall", surface("wall.jpg")).with_transform(
            Mat4::from_translation(Vec3::new(ROOM.min.x, half.y, 0.0))
                * Mat4::from_rotation_z(-std::f32::consts::FRAC_PI_2),
        ),
    ]
}

/// Horizontal plane facing +Y, centered on the origin
fn plane_mesh(width: f32, depth: f32) -> MeshData {
    let (w, d) = (width * 0.5, depth * 0.5);
    MeshData {
        vertices: vec![[-w, 0.0, d], [w, 0.0, d], [w, 0.0, -d], [-w, 0.0, -d]],
        normals: vec![[0.0, 1.0, 0.0]; 4],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(center: Vec3, half: f32) -> BoundingBox {
        BoundingBox::new(center - Vec3::splat(half), center + Vec3::splat(half))
    }

    #[test]
    fn test_inside_room() {
        assert!(is_inside_room(&cube(Vec3::new(0.0, 0.5, 0.0), 0.5)));
        assert!(!is_inside_room(&cube(Vec3::new(4.8, 0.5, 0.0), 0.5)));
        assert!(!is_inside_room(&cube(Vec3::new(0.0, 9.8, 0.0), 0.5)));
        assert!(!is_inside_room(&cube(Vec3::new(0.0, 0.5, -5.0), 0.5)));
    }

    #[test]
    fn test_clamp_only_offending_axis() {
        let at_wall = cube(Vec3::new(4.5, 2.0, 0.0), 0.5);
        let clamped = clamp_translation(&at_wall, Vec3::new(0.05, 0.05, -0.05));
        assert_eq!(clamped, Vec3::new(0.0, 0.05, -0.05));

        let on_floor = cube(Vec3::new(0.0, 0.5, 0.0), 0.5);
        let clamped = clamp_translation(&on_floor, Vec3::new(0.05, -0.05, 0.0));
        assert_eq!(clamped, Vec3::new(0.05, 0.0, 0.0));
    }

    #[test]
    fn test_room_shell_planes_lie_on_room_faces() {
        let shell = room_shell();
        assert_eq!(shell.len(), 3);
        for node in &shell {
            let NodeKind::Mesh { mesh, .. } = &node.kind else {
                panic!("shell node is not a mesh");
            };
            let b = mesh.world_bounds(&node.transform).unwrap();
            let size = b.size();
            // Each plane is flat on exactly one axis and spans the room on the others
            let flat_axes = size.to_array().iter().filter(|s| s.abs() < 1e-4).count();
            assert_eq!(flat_axes, 1, "{} is not a plane", node.name);
            assert!(b.is_within(&ROOM), "{} leaves the room", node.name);
        }
    }
}
