//! Nearest-neighbor color transfer
//!
//! Each mesh vertex takes the decoded color of the closest original
//! point. The loop is a parallel map over an immutable spatial index;
//! per-vertex faults are isolated into sentinel colors and counted,
//! never raised, so one degenerate vertex cannot invalidate the run.

use rayon::prelude::*;
use splatmesh_core::{ColoredCloud, Point3d, TriangleMesh};
use splatmesh_reconstruction::SpatialIndex;

/// Sentinel for a vertex the index could not answer for (non-finite
/// coordinates, numerical degeneracy): magenta.
pub const QUERY_FAILURE_COLOR: [f64; 3] = [1.0, 0.0, 1.0];

/// Sentinel for a vertex the index answered with zero neighbors:
/// green. Distinct from the query-failure sentinel; they mark
/// different fault kinds.
pub const NO_NEIGHBOR_COLOR: [f64; 3] = [0.0, 1.0, 0.0];

/// Aggregate per-vertex fault counts from one transfer pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    pub query_failures: usize,
    pub no_neighbor_vertices: usize,
}

enum VertexOutcome {
    Copied,
    QueryFailure,
    NoNeighbor,
}

/// Assign every mesh vertex the color of its nearest original point.
///
/// Tie-breaking among equidistant points is whatever the index
/// returns; callers must not depend on it. The original cloud is
/// expected to be non-empty with finite positions (enforced by the
/// validation stage before this runs).
pub fn transfer_colors(mesh: &mut TriangleMesh, cloud: &ColoredCloud) -> TransferStats {
    let positions: Vec<Point3d> = cloud.iter().map(|p| p.position).collect();
    let index = SpatialIndex::build(&positions);

    let outcomes: Vec<([f64; 3], VertexOutcome)> = mesh
        .vertices
        .par_iter()
        .map(|vertex| {
            if !(vertex.x.is_finite() && vertex.y.is_finite() && vertex.z.is_finite()) {
                return (QUERY_FAILURE_COLOR, VertexOutcome::QueryFailure);
            }
            match index.nearest(vertex) {
                Some((nearest, _)) => (cloud[nearest].rgb, VertexOutcome::Copied),
                None => (NO_NEIGHBOR_COLOR, VertexOutcome::NoNeighbor),
            }
        })
        .collect();

    let mut stats = TransferStats::default();
    let mut colors = Vec::with_capacity(outcomes.len());
    for (color, outcome) in outcomes {
        match outcome {
            VertexOutcome::Copied => {}
            VertexOutcome::QueryFailure => stats.query_failures += 1,
            VertexOutcome::NoNeighbor => stats.no_neighbor_vertices += 1,
        }
        colors.push(color);
    }

    mesh.set_colors(colors);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use splatmesh_core::{ColoredPoint, PointCloud};

    fn colored_cloud() -> ColoredCloud {
        PointCloud::from_points(vec![
            ColoredPoint {
                position: Point3d::new(0.0, 0.0, 0.0),
                rgb: [1.0, 0.0, 0.0],
            },
            ColoredPoint {
                position: Point3d::new(1.0, 0.0, 0.0),
                rgb: [0.0, 0.0, 1.0],
            },
        ])
    }

    #[test]
    fn test_coincident_vertex_gets_exact_color() {
        let cloud = colored_cloud();
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(0.9, 0.1, 0.0),
            ],
            vec![[0, 1, 2]],
        );

        let stats = transfer_colors(&mut mesh, &cloud);
        assert_eq!(stats, TransferStats::default());

        let colors = mesh.colors.as_ref().unwrap();
        assert_eq!(colors[0], [1.0, 0.0, 0.0]);
        assert_eq!(colors[1], [0.0, 0.0, 1.0]);
        assert_eq!(colors[2], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_non_finite_vertex_isolated_as_magenta() {
        let cloud = colored_cloud();
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(f64::NAN, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );

        let stats = transfer_colors(&mut mesh, &cloud);
        assert_eq!(stats.query_failures, 1);
        assert_eq!(stats.no_neighbor_vertices, 0);

        let colors = mesh.colors.as_ref().unwrap();
        assert_eq!(colors[1], QUERY_FAILURE_COLOR);
        // The fault did not leak into the neighbors.
        assert_eq!(colors[0], [1.0, 0.0, 0.0]);
        assert_eq!(colors[2], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_empty_cloud_yields_green_sentinels() {
        let cloud: ColoredCloud = PointCloud::new();
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![Point3d::new(0.0, 0.0, 0.0)],
            vec![],
        );

        let stats = transfer_colors(&mut mesh, &cloud);
        assert_eq!(stats.no_neighbor_vertices, 1);
        assert_eq!(mesh.colors.as_ref().unwrap()[0], NO_NEIGHBOR_COLOR);
    }
}
