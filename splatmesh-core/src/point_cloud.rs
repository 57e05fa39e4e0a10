//! Point cloud containers

use crate::point::*;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A generic ordered point cloud container.
///
/// Point identity throughout the pipeline is the load-order index into
/// this container; no operation reorders points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointCloud<T> {
    pub points: Vec<T>,
}

/// A point cloud with decoded per-point colors
pub type ColoredCloud = PointCloud<ColoredPoint>;

/// A point cloud with oriented normals, ready for reconstruction
pub type OrientedCloud = PointCloud<NormalPoint>;

impl<T> PointCloud<T> {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a new point cloud with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Create a point cloud from a vector of points
    pub fn from_points(points: Vec<T>) -> Self {
        Self { points }
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point to the cloud
    pub fn push(&mut self, point: T) {
        self.points.push(point);
    }

    /// Get an iterator over the points
    pub fn iter(&self) -> std::slice::Iter<T> {
        self.points.iter()
    }

    /// Get a mutable iterator over the points
    pub fn iter_mut(&mut self) -> std::slice::IterMut<T> {
        self.points.iter_mut()
    }
}

impl<T> Default for PointCloud<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for PointCloud<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<T> IndexMut<usize> for PointCloud<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.points[index]
    }
}

impl<T> IntoIterator for PointCloud<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PointCloud<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<T> FromIterator<T> for PointCloud<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            points: Vec::from_iter(iter),
        }
    }
}

/// Whether a loaded cloud carries spherical-harmonics color data.
///
/// Decided exactly once at load time from the vertex record field set.
/// SH coefficients are either fully present in a file or fully absent,
/// so this is a per-cloud capability, never a per-point branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorData {
    /// All three configured SH DC fields are present on every record
    ShCoefficients,
    /// At least one SH DC field is missing; decoding falls back to gray
    Missing,
}

/// A loaded splat cloud together with its color capability tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplatCloud {
    pub points: PointCloud<SplatPoint>,
    pub color_data: ColorData,
}

impl SplatCloud {
    pub fn new(points: PointCloud<SplatPoint>, color_data: ColorData) -> Self {
        Self { points, color_data }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Positions of all points, in load order.
    pub fn positions(&self) -> Vec<Point3d> {
        self.points.iter().map(|p| p.position).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_cloud_indexing_preserves_order() {
        let cloud: PointCloud<SplatPoint> = (0..4)
            .map(|i| SplatPoint::new(Point3d::new(i as f64, 0.0, 0.0), None))
            .collect();

        assert_eq!(cloud.len(), 4);
        for i in 0..4 {
            assert_eq!(cloud[i].position.x, i as f64);
        }
    }

    #[test]
    fn test_splat_cloud_positions() {
        let points = PointCloud::from_points(vec![
            SplatPoint::new(Point3d::new(1.0, 2.0, 3.0), None),
            SplatPoint::new(Point3d::new(4.0, 5.0, 6.0), None),
        ]);
        let cloud = SplatCloud::new(points, ColorData::Missing);

        let positions = cloud.positions();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[1], Point3d::new(4.0, 5.0, 6.0));
    }
}
