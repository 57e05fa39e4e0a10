//! Point types and related functionality

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// A raw per-vertex record as loaded from a splat PLY file.
///
/// `sh_dc` holds the three degree-0 spherical-harmonics color
/// coefficients when the file carries them. Presence is decided once
/// per file, so within one cloud either every point has coefficients
/// or none does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplatPoint {
    pub position: Point3d,
    pub sh_dc: Option<Vector3d>,
}

/// A point with decoded linear RGB color, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColoredPoint {
    pub position: Point3d,
    pub rgb: [f64; 3],
}

/// A point with an estimated, oriented surface normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalPoint {
    pub position: Point3d,
    pub normal: Vector3d,
}

impl SplatPoint {
    pub fn new(position: Point3d, sh_dc: Option<Vector3d>) -> Self {
        Self { position, sh_dc }
    }
}

impl Default for ColoredPoint {
    fn default() -> Self {
        Self {
            position: Point3d::origin(),
            rgb: [1.0, 1.0, 1.0],
        }
    }
}

impl Default for NormalPoint {
    fn default() -> Self {
        Self {
            position: Point3d::origin(),
            normal: Vector3d::new(0.0, 0.0, 1.0),
        }
    }
}
