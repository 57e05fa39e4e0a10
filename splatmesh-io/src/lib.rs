//! I/O for splat clouds and reconstructed meshes
//!
//! Reading is PLY only (the format splat trainers emit); writing
//! supports PLY and OBJ, both carrying vertex positions, triangle
//! indices, and (when assigned) per-vertex colors and normals.

pub mod obj;
pub mod ply;

pub use obj::ObjWriter;
pub use ply::{PlyLoader, PlyWriter, ShFieldNames};

use splatmesh_core::{Result, TriangleMesh};
use std::path::Path;

/// Trait for writing meshes to files
pub trait MeshWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()>;
}

/// Write a mesh to `path`, choosing the writer by file extension.
///
/// Returns `Ok(false)` when no writer covers the extension; the
/// writer declines rather than erroring, and the caller decides what a
/// declined export means. I/O failures are still `Err`.
pub fn export_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<bool> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    match extension.as_deref() {
        Some("ply") => {
            PlyWriter::write_mesh(mesh, path)?;
            Ok(true)
        }
        Some("obj") => {
            ObjWriter::write_mesh(mesh, path)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splatmesh_core::Point3d;

    fn colored_triangle() -> TriangleMesh {
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        mesh.set_colors(vec![[0.5, 0.5, 0.5]; 3]);
        mesh.compute_vertex_normals();
        mesh
    }

    #[test]
    fn test_export_declines_unknown_extension() {
        let mesh = colored_triangle();
        let path = std::env::temp_dir().join("splatmesh_decline.stl");

        assert!(!export_mesh(&mesh, &path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_export_dispatches_on_extension() {
        let mesh = colored_triangle();
        let ply_path = std::env::temp_dir().join("splatmesh_dispatch.ply");
        let obj_path = std::env::temp_dir().join("splatmesh_dispatch.obj");

        assert!(export_mesh(&mesh, &ply_path).unwrap());
        assert!(export_mesh(&mesh, &obj_path).unwrap());
        assert!(ply_path.exists());
        assert!(obj_path.exists());

        let _ = std::fs::remove_file(ply_path);
        let _ = std::fs::remove_file(obj_path);
    }
}
