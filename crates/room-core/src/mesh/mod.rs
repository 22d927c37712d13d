//! Mesh data and model file parsing (OBJ, STL)

mod obj;
mod stl;

use std::path::Path;

use glam::{Mat4, Vec3};

use crate::bounds::BoundingBox;

pub use obj::parse_obj;
pub use stl::parse_stl;

/// Indexed triangle mesh in local space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<[f32; 3]>,
    /// One normal per vertex
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounding box of the untransformed vertices
    pub fn local_bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.vertices.iter().map(|v| Vec3::from(*v)))
    }

    /// Bounding box of the vertices after applying `matrix`
    pub fn world_bounds(&self, matrix: &Mat4) -> Option<BoundingBox> {
        BoundingBox::from_points(
            self.vertices
                .iter()
                .map(|v| matrix.transform_point3(Vec3::from(*v))),
        )
    }
}

/// Accumulate face normals onto vertices and normalize
pub fn calculate_vertex_normals(vertices: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vec3::ZERO; vertices.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }
        let v0 = Vec3::from(vertices[a]);
        let face = (Vec3::from(vertices[b]) - v0).cross(Vec3::from(vertices[c]) - v0);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

/// Mesh file format, detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Stl,
    Unknown,
}

impl MeshFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("obj") => MeshFormat::Obj,
            Some("stl") => MeshFormat::Stl,
            _ => MeshFormat::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MeshFormat::Obj => "OBJ",
            MeshFormat::Stl => "STL",
            MeshFormat::Unknown => "Unknown",
        }
    }
}

/// A named mesh extracted from a model file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMesh {
    pub name: String,
    pub mesh: MeshData,
}

/// Parse raw model file bytes, choosing the parser from the file name
pub fn parse_model(file_name: &str, bytes: &[u8]) -> Result<Vec<ParsedMesh>, MeshError> {
    let format = MeshFormat::from_path(Path::new(file_name));
    let meshes = match format {
        MeshFormat::Obj => parse_obj(bytes)?,
        MeshFormat::Stl => parse_stl(bytes, file_stem(file_name))?,
        MeshFormat::Unknown => {
            return Err(MeshError::UnsupportedFormat(
                Path::new(file_name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            ));
        }
    };

    if meshes.iter().all(|m| m.mesh.is_empty()) {
        return Err(MeshError::EmptyMesh);
    }
    Ok(meshes)
}

/// File name without directories and extension
pub fn file_stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
}

/// Mesh-related errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty mesh: no geometry found")]
    EmptyMesh,
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(MeshFormat::from_path(Path::new("chair.OBJ")), MeshFormat::Obj);
        assert_eq!(MeshFormat::from_path(Path::new("dir/lamp.stl")), MeshFormat::Stl);
        assert_eq!(MeshFormat::from_path(Path::new("scene.fbx")), MeshFormat::Unknown);
    }

    #[test]
    fn test_unsupported_format() {
        let result = parse_model("teapot.fbx", b"");
        assert_eq!(result, Err(MeshError::UnsupportedFormat("fbx".into())));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("models/chair.obj"), "chair");
        assert_eq!(file_stem("lamp"), "lamp");
    }

    #[test]
    fn test_vertex_normals_of_flat_triangle() {
        let normals =
            calculate_vertex_normals(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], &[0, 1, 2]);
        assert_eq!(normals, vec![[0.0, 0.0, 1.0]; 3]);
    }
}
