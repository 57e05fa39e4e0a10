//! Nearest-neighbor spatial index
//!
//! Thin wrapper over kiddo's `ImmutableKdTree` exposing exactly the
//! queries the pipeline needs: k-nearest, single-nearest, and radius
//! search. The tree is built once from a position slice and never
//! modified; stored items are `u32` indices back into that slice.

use kiddo::float::distance::SquaredEuclidean;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use splatmesh_core::Point3d;
use std::num::NonZero;

pub struct SpatialIndex {
    // None when built over zero points; every query then returns empty.
    tree: Option<ImmutableKdTree<f64, u32, 3, 32>>,
    num_points: usize,
}

fn to_array(p: &Point3d) -> [f64; 3] {
    [p.x, p.y, p.z]
}

fn is_finite(q: &[f64; 3]) -> bool {
    q.iter().all(|v| v.is_finite())
}

impl SpatialIndex {
    /// Build an index over the given positions.
    pub fn build(positions: &[Point3d]) -> Self {
        let points: Vec<[f64; 3]> = positions.iter().map(to_array).collect();
        let tree = if points.is_empty() {
            None
        } else {
            Some(ImmutableKdTree::new_from_slice(&points))
        };
        Self {
            tree,
            num_points: positions.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.num_points
    }

    pub fn is_empty(&self) -> bool {
        self.num_points == 0
    }

    /// Find the `k` nearest neighbors to `query`.
    ///
    /// Returns `(index, euclidean_distance)` pairs sorted ascending by
    /// distance. Empty if `k == 0`, the index is empty, or the query
    /// contains a non-finite coordinate. If `k > len()` all points are
    /// returned.
    pub fn knn(&self, query: &Point3d, k: usize) -> Vec<(usize, f64)> {
        let q = to_array(query);
        let (Some(tree), Some(k)) = (&self.tree, NonZero::new(k)) else {
            return Vec::new();
        };
        if !is_finite(&q) {
            return Vec::new();
        }

        tree.nearest_n::<SquaredEuclidean>(&q, k)
            .into_iter()
            .map(|nn| (nn.item as usize, nn.distance.sqrt()))
            .collect()
    }

    /// Find the single nearest neighbor to `query`, if any.
    pub fn nearest(&self, query: &Point3d) -> Option<(usize, f64)> {
        self.knn(query, 1).into_iter().next()
    }

    /// All points within `radius` of `query`, unsorted.
    pub fn within(&self, query: &Point3d, radius: f64) -> Vec<(usize, f64)> {
        let q = to_array(query);
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        if radius <= 0.0 || !is_finite(&q) {
            return Vec::new();
        }

        tree.within_unsorted::<SquaredEuclidean>(&q, radius * radius)
            .into_iter()
            .map(|nn| (nn.item as usize, nn.distance.sqrt()))
            .collect()
    }
}
