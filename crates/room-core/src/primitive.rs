//! Procedural geometry for box and pyramid primitives
//!
//! Both generators produce meshes centered on the origin, so an object whose
//! position y equals half its height rests on the floor.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::mesh::MeshData;

/// Number of sides of the pyramid's base
pub const PYRAMID_SIDES: usize = 4;

/// Rectangular prism of the given extents
pub fn generate_box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let h = Vec3::new(width, height, depth) * 0.5;

    // (normal, u axis, v axis) per face; corners are n ± u ± v
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = MeshData::default();
    for (normal, u, v) in faces {
        let base = mesh.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner = (normal + u * su + v * sv) * h;
            mesh.vertices.push(corner.to_array());
            mesh.normals.push(normal.to_array());
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Four-sided cone: base corners on a circle of `radius`, apex above center
pub fn generate_pyramid_mesh(radius: f32, height: f32) -> MeshData {
    let half = height * 0.5;
    let apex = Vec3::new(0.0, half, 0.0);
    let ring: Vec<Vec3> = (0..PYRAMID_SIDES)
        .map(|i| {
            let theta = i as f32 / PYRAMID_SIDES as f32 * TAU;
            Vec3::new(radius * theta.sin(), -half, radius * theta.cos())
        })
        .collect();

    let mut mesh = MeshData::default();
    for i in 0..PYRAMID_SIDES {
        let a = ring[i];
        let b = ring[(i + 1) % PYRAMID_SIDES];
        let normal = (b - a).cross(apex - a).try_normalize().unwrap_or(Vec3::Y);
        let base = mesh.vertices.len() as u32;
        for p in [a, b, apex] {
            mesh.vertices.push(p.to_array());
            mesh.normals.push(normal.to_array());
        }
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    let center = mesh.vertices.len() as u32;
    mesh.vertices.push([0.0, -half, 0.0]);
    mesh.normals.push(Vec3::NEG_Y.to_array());
    for p in &ring {
        mesh.vertices.push(p.to_array());
        mesh.normals.push(Vec3::NEG_Y.to_array());
    }
    for i in 0..PYRAMID_SIDES as u32 {
        let next = (i + 1) % PYRAMID_SIDES as u32;
        mesh.indices
            .extend_from_slice(&[center, center + 1 + next, center + 1 + i]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_extents() {
        let mesh = generate_box_mesh(2.0, 4.0, 6.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        let b = mesh.local_bounds().unwrap();
        assert_eq!(b.min.to_array(), [-1.0, -2.0, -3.0]);
        assert_eq!(b.max.to_array(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_pyramid_extents() {
        let mesh = generate_pyramid_mesh(1.5, 3.0);
        assert_eq!(mesh.triangle_count(), PYRAMID_SIDES * 2);
        let b = mesh.local_bounds().unwrap();
        assert_relative_eq!(b.min.y, -1.5);
        assert_relative_eq!(b.max.y, 1.5);
        assert_relative_eq!(b.max.x, 1.5, epsilon = 1e-5);
        assert_relative_eq!(b.min.z, -1.5, epsilon = 1e-5);
    }

    #[test]
    fn test_pyramid_side_normals_point_outward() {
        let mesh = generate_pyramid_mesh(1.0, 1.0);
        for tri in mesh.indices.chunks_exact(3).take(PYRAMID_SIDES) {
            let centroid: Vec3 = tri
                .iter()
                .map(|&i| Vec3::from(mesh.vertices[i as usize]))
                .sum::<Vec3>()
                / 3.0;
            let normal = Vec3::from(mesh.normals[tri[0] as usize]);
            assert!(normal.dot(centroid - Vec3::new(0.0, 0.0, 0.0)) > 0.0);
        }
    }
}
