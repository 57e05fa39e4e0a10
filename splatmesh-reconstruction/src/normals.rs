//! Surface normal estimation
//!
//! Per-point PCA over a hybrid neighborhood (up to `max_neighbors`
//! nearest points, restricted to `radius`), followed by a
//! tangent-plane consistency pass that aligns neighboring normal signs.
//! Both parameters are caller-tuned to the point density of the data;
//! no auto-tuning is performed.

use crate::spatial::SpatialIndex;
use nalgebra::{Matrix3, SymmetricEigen};
use rayon::prelude::*;
use splatmesh_core::{Error, NormalPoint, OrientedCloud, Point3d, Result, Vector3d};
use std::collections::VecDeque;

/// Default neighborhood radius, in point-cloud-local units.
pub const DEFAULT_NORMAL_RADIUS: f64 = 0.05;

/// Default neighbor cap for estimation and orientation.
pub const DEFAULT_MAX_NEIGHBORS: usize = 30;

/// Estimate an oriented normal for every input point.
///
/// Points whose neighborhood is too small for a plane fit receive a
/// `+z` placeholder normal; if no point at all has a usable
/// neighborhood the estimation has failed and reconstruction cannot
/// proceed.
pub fn estimate_normals(
    positions: &[Point3d],
    radius: f64,
    max_neighbors: usize,
) -> Result<OrientedCloud> {
    if !(radius > 0.0 && radius.is_finite()) {
        return Err(Error::InvalidParameter(format!(
            "normal estimation radius must be positive and finite, got {radius}"
        )));
    }
    if max_neighbors == 0 {
        return Err(Error::InvalidParameter(
            "normal estimation neighbor cap must be at least 1".into(),
        ));
    }
    if positions.len() < 2 {
        return Err(Error::EstimationFailure(format!(
            "need at least 2 points, got {}",
            positions.len()
        )));
    }

    let index = SpatialIndex::build(positions);

    let raw: Vec<Option<Vector3d>> = positions
        .par_iter()
        .map(|point| {
            let neighbors: Vec<usize> = index
                .knn(point, max_neighbors)
                .into_iter()
                .filter(|&(_, dist)| dist <= radius)
                .map(|(idx, _)| idx)
                .collect();
            plane_fit_normal(positions, &neighbors)
        })
        .collect();

    let usable = raw.iter().filter(|n| n.is_some()).count();
    if usable == 0 {
        return Err(Error::EstimationFailure(format!(
            "no point had enough neighbors within radius {radius} \
             (max {max_neighbors}); tune both to the point spacing"
        )));
    }

    let mut normals: Vec<Vector3d> = raw
        .into_iter()
        .map(|n| n.unwrap_or_else(|| Vector3d::new(0.0, 0.0, 1.0)))
        .collect();

    orient_consistent(positions, &mut normals, max_neighbors, &index);

    let cloud = positions
        .iter()
        .zip(normals)
        .map(|(&position, normal)| NormalPoint { position, normal })
        .collect();

    Ok(cloud)
}

/// Fit a plane to the neighborhood via PCA; the eigenvector of the
/// smallest covariance eigenvalue is the (unsigned) surface normal.
fn plane_fit_normal(positions: &[Point3d], neighbors: &[usize]) -> Option<Vector3d> {
    if neighbors.len() < 3 {
        return None;
    }

    let count = neighbors.len() as f64;
    let mut centroid = Vector3d::zeros();
    for &idx in neighbors {
        centroid += positions[idx].coords;
    }
    centroid /= count;

    let mut covariance = Matrix3::zeros();
    for &idx in neighbors {
        let d = positions[idx].coords - centroid;
        covariance += d * d.transpose();
    }

    let eigen = SymmetricEigen::new(covariance);
    let (smallest, _) = eigen.eigenvalues.argmin();
    let normal = eigen.eigenvectors.column(smallest).into_owned();

    let norm = normal.norm();
    if norm > 1e-12 && normal.iter().all(|v| v.is_finite()) {
        Some(normal / norm)
    } else {
        None
    }
}

/// Tangent-plane propagation: walk the k-NN graph breadth-first and
/// flip any normal that disagrees with the one it was reached from.
/// Disconnected components are seeded independently, so every point is
/// visited exactly once.
fn orient_consistent(
    positions: &[Point3d],
    normals: &mut [Vector3d],
    max_neighbors: usize,
    index: &SpatialIndex,
) {
    let n = positions.len();
    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();

    for seed in 0..n {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        queue.push_back(seed);

        while let Some(current) = queue.pop_front() {
            for (neighbor, _) in index.knn(&positions[current], max_neighbors) {
                if visited[neighbor] {
                    continue;
                }
                visited[neighbor] = true;
                if normals[current].dot(&normals[neighbor]) < 0.0 {
                    normals[neighbor] = -normals[neighbor];
                }
                queue.push_back(neighbor);
            }
        }
    }
}
