//! Core data structures and error types for splatmesh
//!
//! This crate provides the fundamental types for the splat-to-mesh
//! pipeline: per-point records, point cloud containers, triangle meshes,
//! and the error taxonomy shared by every stage.

pub mod error;
pub mod mesh;
pub mod point;
pub mod point_cloud;

pub use error::*;
pub use mesh::*;
pub use point::*;
pub use point_cloud::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
