//! Wavefront OBJ parsing

use std::io::{BufReader, Cursor};

use super::{MeshData, MeshError, ParsedMesh, calculate_vertex_normals};

/// Parse OBJ text into one mesh per object/group.
///
/// Material libraries are ignored; imported models are textured from the
/// companion texture derived from the file name.
pub fn parse_obj(bytes: &[u8]) -> Result<Vec<ParsedMesh>, MeshError> {
    let mut reader = BufReader::new(Cursor::new(bytes));
    let (models, _materials) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Err(tobj::LoadError::OpenFileFailed),
    )
    .map_err(|e| MeshError::Parse(e.to_string()))?;

    let meshes = models
        .into_iter()
        .map(|model| {
            let mesh = model.mesh;
            let vertices: Vec<[f32; 3]> = mesh
                .positions
                .chunks_exact(3)
                .map(|p| [p[0], p[1], p[2]])
                .collect();

            let normals = if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len()
            {
                mesh.normals
                    .chunks_exact(3)
                    .map(|n| [n[0], n[1], n[2]])
                    .collect()
            } else {
                calculate_vertex_normals(&vertices, &mesh.indices)
            };

            ParsedMesh {
                name: model.name,
                mesh: MeshData {
                    vertices,
                    normals,
                    indices: mesh.indices,
                },
            }
        })
        .collect();

    Ok(meshes)
}
