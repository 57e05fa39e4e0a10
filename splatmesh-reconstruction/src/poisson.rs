//! Poisson surface reconstruction adapter
//!
//! Wraps the external `poisson_reconstruction` solver. This module owns
//! the parameter mapping and buffer conversion only; the octree solve
//! itself is the library's job.

use crate::spatial::SpatialIndex;
use poisson_reconstruction::PoissonReconstruction;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use splatmesh_core::{Error, OrientedCloud, Point3d, Result, TriangleMesh};

/// Gauss-Seidel relaxation iterations handed to the solver.
const MAX_RELAXATION_ITERS: usize = 8;

/// Neighbor count used for the per-vertex density estimate.
const DENSITY_NEIGHBORS: usize = 8;

/// Configuration for the Poisson variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoissonParams {
    /// Maximum octree depth; higher means more detail and more cost.
    pub depth: u32,
    /// Bounding-volume margin around the input cloud.
    pub scale: f64,
    /// Linear iso-surface interpolation. The bundled solver does not
    /// expose this toggle, so the flag is recorded but not honored.
    pub linear_fit: bool,
}

impl Default for PoissonParams {
    fn default() -> Self {
        Self {
            depth: 9,
            scale: 1.1,
            linear_fit: false,
        }
    }
}

impl PoissonParams {
    pub(crate) fn describe(&self) -> String {
        format!(
            "poisson depth={} scale={} linear_fit={}",
            self.depth, self.scale, self.linear_fit
        )
    }
}

/// Reconstruct a watertight-biased mesh from an oriented cloud.
///
/// Alongside the mesh, returns one density estimate per mesh vertex
/// (inverse mean distance to the nearest input samples). Low-density
/// vertices mark poorly supported surface; [`prune_low_density`] can
/// remove them, but no pruning is applied here.
pub fn poisson_reconstruction(
    cloud: &OrientedCloud,
    params: &PoissonParams,
) -> Result<(TriangleMesh, Vec<f64>)> {
    if cloud.is_empty() {
        return Err(Error::EmptyCloud);
    }
    if cloud.len() < 10 {
        return Err(Error::ReconstructionFailure {
            params: format!("{}: fewer than 10 input points", params.describe()),
        });
    }

    let points: Vec<nalgebra::Point3<f64>> =
        cloud.points.par_iter().map(|p| p.position).collect();
    let normals: Vec<nalgebra::Vector3<f64>> =
        cloud.points.par_iter().map(|p| p.normal).collect();

    let poisson = PoissonReconstruction::from_points_and_normals(
        &points,
        &normals,
        params.scale,
        params.depth as usize,
        MAX_RELAXATION_ITERS,
        0, // max memory usage, 0 = unlimited
    );

    let buffers = poisson.reconstruct_mesh_buffers();

    let vertices: Vec<Point3d> = buffers
        .vertices()
        .iter()
        .map(|v| Point3d::new(v.x, v.y, v.z))
        .collect();

    let indices = buffers.indices();
    if indices.len() % 3 != 0 {
        return Err(Error::Format(
            "Poisson solver returned a non-triangular index buffer".into(),
        ));
    }

    let faces: Vec<[u32; 3]> = indices
        .chunks_exact(3)
        .map(|chunk| [chunk[0] as u32, chunk[1] as u32, chunk[2] as u32])
        .collect();

    if vertices.is_empty() || faces.is_empty() {
        return Err(Error::ReconstructionFailure {
            params: params.describe(),
        });
    }

    let densities = estimate_vertex_densities(&vertices, &points);
    let mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);

    Ok((mesh, densities))
}

/// Per-vertex sampling density: inverse mean distance from the mesh
/// vertex to its nearest input points.
fn estimate_vertex_densities(
    vertices: &[Point3d],
    input_positions: &[nalgebra::Point3<f64>],
) -> Vec<f64> {
    let index = SpatialIndex::build(input_positions);

    vertices
        .par_iter()
        .map(|vertex| {
            let neighbors = index.knn(vertex, DENSITY_NEIGHBORS);
            if neighbors.is_empty() {
                return 0.0;
            }
            let mean: f64 =
                neighbors.iter().map(|&(_, d)| d).sum::<f64>() / neighbors.len() as f64;
            1.0 / (mean + f64::EPSILON)
        })
        .collect()
}

/// Remove the lowest-density fraction of vertices and every face that
/// touches them, reindexing the remainder. `quantile` is the fraction
/// pruned, in `[0, 1)`.
pub fn prune_low_density(
    mesh: &TriangleMesh,
    densities: &[f64],
    quantile: f64,
) -> Result<TriangleMesh> {
    if densities.len() != mesh.vertex_count() {
        return Err(Error::InvalidParameter(format!(
            "density count {} does not match vertex count {}",
            densities.len(),
            mesh.vertex_count()
        )));
    }
    if !(0.0..1.0).contains(&quantile) {
        return Err(Error::InvalidParameter(format!(
            "pruning quantile must be in [0, 1), got {quantile}"
        )));
    }
    if quantile == 0.0 || mesh.vertices.is_empty() {
        return Ok(mesh.clone());
    }

    let mut sorted = densities.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let cut = ((sorted.len() as f64 * quantile) as usize).min(sorted.len() - 1);
    let threshold = sorted[cut];

    let mut remap = vec![u32::MAX; mesh.vertices.len()];
    let mut kept_vertices = Vec::new();
    for (i, vertex) in mesh.vertices.iter().enumerate() {
        if densities[i] >= threshold {
            remap[i] = kept_vertices.len() as u32;
            kept_vertices.push(*vertex);
        }
    }

    let kept_faces = mesh
        .faces
        .iter()
        .filter_map(|face| {
            let mapped = face.map(|idx| remap[idx as usize]);
            if mapped.iter().all(|&idx| idx != u32::MAX) {
                Some(mapped)
            } else {
                None
            }
        })
        .collect();

    Ok(TriangleMesh::from_vertices_and_faces(
        kept_vertices,
        kept_faces,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use splatmesh_core::PointCloud;

    #[test]
    fn test_poisson_params_default() {
        let params = PoissonParams::default();
        assert_eq!(params.depth, 9);
        assert_eq!(params.scale, 1.1);
        assert!(!params.linear_fit);
    }

    #[test]
    fn test_poisson_empty_cloud_fails() {
        let cloud = PointCloud::new();
        let result = poisson_reconstruction(&cloud, &PoissonParams::default());
        assert!(matches!(result, Err(Error::EmptyCloud)));
    }

    #[test]
    fn test_poisson_failure_reports_parameters() {
        use splatmesh_core::{NormalPoint, Point3d, Vector3d};

        // Three points is below the solver minimum; the error must
        // carry the parameter string for manual retuning.
        let cloud = PointCloud::from_points(
            (0..3)
                .map(|i| NormalPoint {
                    position: Point3d::new(i as f64, 0.0, 0.0),
                    normal: Vector3d::new(0.0, 0.0, 1.0),
                })
                .collect(),
        );
        let err = poisson_reconstruction(&cloud, &PoissonParams::default()).unwrap_err();
        match err {
            Error::ReconstructionFailure { params } => {
                assert!(params.contains("depth=9"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_prune_low_density() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(0.0, 1.0, 0.0),
                Point3d::new(9.0, 9.0, 9.0),
            ],
            vec![[0, 1, 2], [1, 2, 3]],
        );
        let densities = vec![10.0, 10.0, 10.0, 0.1];

        let pruned = prune_low_density(&mesh, &densities, 0.25).unwrap();
        assert_eq!(pruned.vertex_count(), 3);
        assert_eq!(pruned.face_count(), 1);
        assert_eq!(pruned.faces[0], [0, 1, 2]);
    }

    #[test]
    fn test_prune_rejects_bad_quantile() {
        let mesh = TriangleMesh::new();
        assert!(matches!(
            prune_low_density(&mesh, &[], 1.0),
            Err(Error::InvalidParameter(_))
        ));
    }
}
