//! STL parsing (binary and ASCII)

use std::io::Cursor;

use super::{MeshData, MeshError, ParsedMesh, calculate_vertex_normals};

/// Parse an STL file into a single mesh named `name`
pub fn parse_stl(bytes: &[u8], name: &str) -> Result<Vec<ParsedMesh>, MeshError> {
    let mut cursor = Cursor::new(bytes);
    let stl = stl_io::read_stl(&mut cursor).map_err(|e| MeshError::Parse(e.to_string()))?;

    let vertices: Vec<[f32; 3]> = stl.vertices.iter().map(|v| [v[0], v[1], v[2]]).collect();
    let indices: Vec<u32> = stl
        .faces
        .iter()
        .flat_map(|face| face.vertices.iter().map(|&i| i as u32))
        .collect();
    let normals = calculate_vertex_normals(&vertices, &indices);

    Ok(vec![ParsedMesh {
        name: name.to_string(),
        mesh: MeshData {
            vertices,
            normals,
            indices,
        },
    }])
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
solid tri
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 3 0 0
      vertex 0 2 0
    endloop
  endfacet
endsolid tri
";

    #[test]
    fn test_parse_ascii_stl() {
        let meshes = parse_stl(TRIANGLE.as_bytes(), "tri").unwrap();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].name, "tri");
        assert_eq!(meshes[0].mesh.vertices.len(), 3);
        assert_eq!(meshes[0].mesh.indices.len(), 3);
        let size = meshes[0].mesh.local_bounds().unwrap().size();
        assert_eq!(size.to_array(), [3.0, 2.0, 0.0]);
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(matches!(
            parse_stl(b"not an stl", "x"),
            Err(MeshError::Parse(_))
        ));
    }
}
