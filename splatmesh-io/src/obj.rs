//! OBJ format support
//!
//! Writes the widely understood vertex-color extension: each `v` line
//! carries `x y z r g b` when colors are assigned. Normals go out as
//! `vn` lines paired with vertices one-to-one, so faces reference both
//! with the same index.

use crate::MeshWriter;
use splatmesh_core::{Result, TriangleMesh};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct ObjWriter;

impl MeshWriter for ObjWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        for (i, vertex) in mesh.vertices.iter().enumerate() {
            match &mesh.colors {
                Some(colors) => {
                    let [r, g, b] = colors[i];
                    writeln!(
                        writer,
                        "v {} {} {} {} {} {}",
                        vertex.x, vertex.y, vertex.z, r, g, b
                    )?;
                }
                None => writeln!(writer, "v {} {} {}", vertex.x, vertex.y, vertex.z)?,
            }
        }

        if let Some(normals) = &mesh.normals {
            for normal in normals {
                writeln!(writer, "vn {} {} {}", normal.x, normal.y, normal.z)?;
            }
        }

        // OBJ indices are 1-based.
        for face in &mesh.faces {
            if mesh.normals.is_some() {
                writeln!(
                    writer,
                    "f {0}//{0} {1}//{1} {2}//{2}",
                    face[0] + 1,
                    face[1] + 1,
                    face[2] + 1
                )?;
            } else {
                writeln!(writer, "f {} {} {}", face[0] + 1, face[1] + 1, face[2] + 1)?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splatmesh_core::Point3d;

    #[test]
    fn test_obj_output_with_colors_and_normals() {
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

        let path = std::env::temp_dir().join("splatmesh_test.obj");
        ObjWriter::write_mesh(&mesh, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(contents.lines().filter(|l| l.starts_with("v ")).count(), 3);
        assert!(contents.contains("v 0 0 0 0.5 0.5 0.5"));
        assert_eq!(contents.lines().filter(|l| l.starts_with("vn ")).count(), 3);
        assert!(contents.contains("f 1//1 2//2 3//3"));
    }

    #[test]
    fn test_obj_output_uncolored() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );

        let path = std::env::temp_dir().join("splatmesh_test_plain.obj");
        ObjWriter::write_mesh(&mesh, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!(contents.contains("v 0 0 0\n"));
        assert!(contents.contains("f 1 2 3"));
    }
}
