//! Ball Pivoting surface reconstruction
//!
//! Front-growing triangulation: a probe sphere of each configured
//! radius is rolled over the oriented point set, stitching a triangle
//! wherever it rests on three points without engulfing any other.
//! Radii are processed in ascending order; each larger radius resumes
//! from the open boundary the previous one left, bridging gaps the
//! smaller sphere could not close.
//!
//! Oriented normals are a precondition: they gate triangle validity and
//! pick the side of the surface the sphere sits on.

use crate::spatial::SpatialIndex;
use serde::{Deserialize, Serialize};
use splatmesh_core::{Error, OrientedCloud, Point3d, Result, TriangleMesh, Vector3d};
use std::collections::{HashMap, HashSet, VecDeque};

/// cos 60°: maximum disagreement between a face normal and the average
/// vertex normal before a candidate triangle is rejected.
const NORMAL_ANGLE_MAX_COS: f64 = 0.5;

/// Maximum triangle edge length, as a multiple of the ball radius.
const MAX_EDGE_RATIO: f64 = 2.0;

/// Neighbor pairs examined per point when hunting for a seed triangle.
const SEED_CANDIDATES: usize = 12;

/// Relative tolerance when testing whether a point sits strictly
/// inside the probe sphere.
const BALL_INTERIOR_TOL: f64 = 1e-7;

/// Configuration for the Ball Pivoting variant.
///
/// `radii` must be positive and strictly ascending, and must bracket
/// the true point spacing of the data: too small leaves holes, too
/// large bridges unrelated surface parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallPivotingParams {
    pub radii: Vec<f64>,
}

impl Default for BallPivotingParams {
    fn default() -> Self {
        Self {
            radii: vec![0.1, 0.2, 0.4, 0.8],
        }
    }
}

impl BallPivotingParams {
    pub(crate) fn describe(&self) -> String {
        format!("ball pivoting radii={:?}", self.radii)
    }
}

/// An undirected edge between two point indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Edge {
    a: usize,
    b: usize,
}

impl Edge {
    fn new(a: usize, b: usize) -> Self {
        if a < b {
            Edge { a, b }
        } else {
            Edge { a: b, b: a }
        }
    }
}

struct Pivoter<'a> {
    points: &'a [Point3d],
    normals: &'a [Vector3d],
    index: SpatialIndex,
    radius: f64,
    triangles: Vec<[usize; 3]>,
    front: VecDeque<Edge>,
    used: HashSet<usize>,
    edge_count: HashMap<Edge, u32>,
}

impl<'a> Pivoter<'a> {
    fn new(points: &'a [Point3d], normals: &'a [Vector3d]) -> Self {
        Self {
            points,
            normals,
            index: SpatialIndex::build(points),
            radius: 0.0,
            triangles: Vec::new(),
            front: VecDeque::new(),
            used: HashSet::new(),
            edge_count: HashMap::new(),
        }
    }

    /// Run one full pivot pass with the given radius, resuming from
    /// whatever boundary the previous pass left open.
    fn pass(&mut self, radius: f64) {
        self.radius = radius;
        self.reopen_boundary();

        loop {
            self.grow_front();
            match self.find_seed_triangle() {
                Some(tri) => self.add_triangle(tri),
                None => break,
            }
        }
    }

    /// Re-enqueue every edge currently bordered by exactly one
    /// triangle, so a larger radius can retry it.
    fn reopen_boundary(&mut self) {
        self.front.clear();
        for (&edge, &count) in &self.edge_count {
            if count == 1 {
                self.front.push_back(edge);
            }
        }
    }

    /// Pivot outward from front edges until no edge can be expanded.
    fn grow_front(&mut self) {
        while let Some(edge) = self.front.pop_front() {
            // Stale entry: the edge was closed by a later triangle.
            if self.edge_count.get(&edge) != Some(&1) {
                continue;
            }
            if let Some(tri) = self.expand_from_edge(&edge) {
                self.add_triangle(tri);
            }
        }
    }

    fn add_triangle(&mut self, tri: [usize; 3]) {
        for &v in &tri {
            self.used.insert(v);
        }
        let edges = [
            Edge::new(tri[0], tri[1]),
            Edge::new(tri[1], tri[2]),
            Edge::new(tri[2], tri[0]),
        ];
        for edge in edges {
            let count = self.edge_count.entry(edge).or_insert(0);
            *count += 1;
            if *count == 1 {
                self.front.push_back(edge);
            }
        }
        self.triangles.push(tri);
    }

    /// Look for a triangle of three unused points the ball can rest on.
    fn find_seed_triangle(&self) -> Option<[usize; 3]> {
        for i in 0..self.points.len() {
            if self.used.contains(&i) {
                continue;
            }

            let mut neighbors: Vec<(usize, f64)> = self
                .index
                .within(&self.points[i], 2.0 * self.radius)
                .into_iter()
                .filter(|&(idx, _)| idx != i && !self.used.contains(&idx))
                .collect();
            neighbors.sort_by(|a, b| a.1.total_cmp(&b.1));
            neighbors.truncate(SEED_CANDIDATES);

            for (a, &(j, _)) in neighbors.iter().enumerate() {
                for &(k, _) in &neighbors[a + 1..] {
                    if let Some(tri) = self.try_triangle(i, j, k) {
                        return Some(tri);
                    }
                }
            }
        }
        None
    }

    /// Pivot the ball around a front edge onto one unused point.
    fn expand_from_edge(&self, edge: &Edge) -> Option<[usize; 3]> {
        let midpoint = nalgebra::center(&self.points[edge.a], &self.points[edge.b]);

        let mut candidates: Vec<(usize, f64)> = self
            .index
            .within(&midpoint, 2.0 * self.radius)
            .into_iter()
            .filter(|&(idx, _)| {
                idx != edge.a && idx != edge.b && !self.used.contains(&idx)
            })
            .collect();
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

        candidates
            .iter()
            .find_map(|&(c, _)| self.try_triangle(edge.a, edge.b, c))
    }

    /// Full acceptance test for one candidate triangle. On success the
    /// returned winding agrees with the average vertex normal.
    fn try_triangle(&self, i: usize, j: usize, k: usize) -> Option<[usize; 3]> {
        let (p1, p2, p3) = (self.points[i], self.points[j], self.points[k]);

        let max_edge = self.radius * MAX_EDGE_RATIO;
        if (p2 - p1).norm() > max_edge
            || (p3 - p2).norm() > max_edge
            || (p1 - p3).norm() > max_edge
        {
            return None;
        }

        let face = (p2 - p1).cross(&(p3 - p1));
        if face.norm() < 1e-12 {
            return None;
        }
        let face = face.normalize();

        let avg = self.normals[i] + self.normals[j] + self.normals[k];
        if avg.norm() < 1e-12 {
            return None;
        }
        let alignment = face.dot(&avg.normalize());
        if alignment.abs() < NORMAL_ANGLE_MAX_COS {
            return None;
        }

        let center = self.ball_center(i, j, k)?;
        if !self.is_ball_empty(&center, [i, j, k]) {
            return None;
        }

        if alignment >= 0.0 {
            Some([i, j, k])
        } else {
            Some([i, k, j])
        }
    }

    /// Center of a ball of the current radius resting on three points,
    /// on the side the vertex normals face. None when the points are
    /// collinear or their circumradius exceeds the ball radius.
    fn ball_center(&self, i: usize, j: usize, k: usize) -> Option<Point3d> {
        let (p1, p2, p3) = (self.points[i], self.points[j], self.points[k]);
        let v1 = p2 - p1;
        let v2 = p3 - p1;

        let plane = v1.cross(&v2);
        let plane_norm_sq = plane.norm_squared();
        if plane_norm_sq < 1e-18 {
            return None;
        }

        let circumcenter =
            p1 + (v1.norm_squared() * v2 - v2.norm_squared() * v1).cross(&plane)
                / (2.0 * plane_norm_sq);

        let circumradius_sq = (circumcenter - p1).norm_squared();
        let radius_sq = self.radius * self.radius;
        if radius_sq < circumradius_sq {
            return None;
        }

        let height = (radius_sq - circumradius_sq).sqrt();
        let mut axis = plane / plane_norm_sq.sqrt();
        let avg = self.normals[i] + self.normals[j] + self.normals[k];
        if axis.dot(&avg) < 0.0 {
            axis = -axis;
        }

        Some(circumcenter + height * axis)
    }

    /// True when no point other than the triangle's own vertices lies
    /// strictly inside the ball.
    fn is_ball_empty(&self, center: &Point3d, triangle: [usize; 3]) -> bool {
        self.index
            .within(center, self.radius * (1.0 - BALL_INTERIOR_TOL))
            .into_iter()
            .all(|(idx, _)| triangle.contains(&idx))
    }
}

/// Ball Pivoting reconstruction over an oriented point cloud.
///
/// The output mesh reuses the input points as its vertex set, in load
/// order; points no triangle reached simply stay unreferenced.
pub fn ball_pivoting_reconstruction(
    cloud: &OrientedCloud,
    params: &BallPivotingParams,
) -> Result<TriangleMesh> {
    if cloud.is_empty() {
        return Err(Error::EmptyCloud);
    }
    validate_radii(&params.radii)?;

    let points: Vec<Point3d> = cloud.iter().map(|p| p.position).collect();
    let normals: Vec<Vector3d> = cloud.iter().map(|p| p.normal).collect();

    let mut pivoter = Pivoter::new(&points, &normals);
    for &radius in &params.radii {
        pivoter.pass(radius);
    }

    if pivoter.triangles.is_empty() {
        return Err(Error::ReconstructionFailure {
            params: params.describe(),
        });
    }

    let faces = pivoter
        .triangles
        .iter()
        .map(|tri| tri.map(|v| v as u32))
        .collect();

    Ok(TriangleMesh::from_vertices_and_faces(points, faces))
}

fn validate_radii(radii: &[f64]) -> Result<()> {
    if radii.is_empty() {
        return Err(Error::InvalidParameter(
            "ball pivoting needs at least one radius".into(),
        ));
    }
    if radii.iter().any(|r| !(r.is_finite() && *r > 0.0)) {
        return Err(Error::InvalidParameter(format!(
            "ball pivoting radii must be positive and finite: {radii:?}"
        )));
    }
    if radii.windows(2).any(|w| w[0] >= w[1]) {
        return Err(Error::InvalidParameter(format!(
            "ball pivoting radii must be strictly ascending: {radii:?}"
        )));
    }
    Ok(())
}
