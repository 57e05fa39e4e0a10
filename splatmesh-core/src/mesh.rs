//! Triangle mesh data structure

use crate::point::*;
use serde::{Deserialize, Serialize};

/// A triangle mesh with optional per-vertex colors and normals.
///
/// `faces` index into `vertices`. Whenever `colors` or `normals` are
/// assigned they have the same length as `vertices`; the setters
/// enforce this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3d>,
    pub faces: Vec<[u32; 3]>,
    pub colors: Option<Vec<[f64; 3]>>,
    pub normals: Option<Vec<Vector3d>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            colors: None,
            normals: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3d>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            faces,
            colors: None,
            normals: None,
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Set per-vertex colors; ignored unless the length matches the
    /// vertex count.
    pub fn set_colors(&mut self, colors: Vec<[f64; 3]>) {
        if colors.len() == self.vertices.len() {
            self.colors = Some(colors);
        }
    }

    /// Set per-vertex normals; ignored unless the length matches the
    /// vertex count.
    pub fn set_normals(&mut self, normals: Vec<Vector3d>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }

    /// Calculate one normal per face from the vertex winding.
    ///
    /// Degenerate faces yield a zero normal rather than NaN.
    pub fn calculate_face_normals(&self) -> Vec<Vector3d> {
        self.faces
            .iter()
            .map(|face| {
                let v0 = self.vertices[face[0] as usize];
                let v1 = self.vertices[face[1] as usize];
                let v2 = self.vertices[face[2] as usize];

                let cross = (v1 - v0).cross(&(v2 - v0));
                if cross.norm() > f64::EPSILON {
                    cross.normalize()
                } else {
                    Vector3d::zeros()
                }
            })
            .collect()
    }

    /// Recompute per-vertex normals by accumulating area-weighted face
    /// normals and normalizing, replacing any previously assigned set.
    pub fn compute_vertex_normals(&mut self) {
        let mut accumulated = vec![Vector3d::zeros(); self.vertices.len()];

        for face in &self.faces {
            let v0 = self.vertices[face[0] as usize];
            let v1 = self.vertices[face[1] as usize];
            let v2 = self.vertices[face[2] as usize];

            // Cross product magnitude is twice the face area, so this
            // accumulation is area-weighted without an explicit weight.
            let cross = (v1 - v0).cross(&(v2 - v0));
            for &idx in face {
                accumulated[idx as usize] += cross;
            }
        }

        let normals = accumulated
            .into_iter()
            .map(|n| {
                if n.norm() > f64::EPSILON {
                    n.normalize()
                } else {
                    Vector3d::new(0.0, 0.0, 1.0)
                }
            })
            .collect();

        self.normals = Some(normals);
    }

    /// True when any vertex coordinate is NaN or infinite.
    pub fn has_non_finite_vertices(&self) -> bool {
        self.vertices
            .iter()
            .any(|v| !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()))
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_quad() -> TriangleMesh {
        TriangleMesh::from_vertices_and_faces(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(1.0, 1.0, 0.0),
                Point3d::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn test_set_colors_rejects_length_mismatch() {
        let mut mesh = unit_quad();
        mesh.set_colors(vec![[1.0, 0.0, 0.0]; 3]);
        assert!(mesh.colors.is_none());

        mesh.set_colors(vec![[1.0, 0.0, 0.0]; 4]);
        assert!(mesh.colors.is_some());
    }

    #[test]
    fn test_compute_vertex_normals_planar_quad() {
        let mut mesh = unit_quad();
        mesh.compute_vertex_normals();

        let normals = mesh.normals.as_ref().unwrap();
        assert_eq!(normals.len(), 4);
        for n in normals {
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(n.z.abs(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_has_non_finite_vertices() {
        let mut mesh = unit_quad();
        assert!(!mesh.has_non_finite_vertices());

        mesh.vertices[2].y = f64::NAN;
        assert!(mesh.has_non_finite_vertices());
    }
}
