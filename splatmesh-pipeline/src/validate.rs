//! Stage-boundary integrity checks
//!
//! Non-finite input positions are fatal; the spatial index cannot be
//! built reliably over them and the source data must be cleaned.
//! Non-finite mesh vertices only downgrade the run: a partially
//! unstable reconstruction still has salvage value as uncolored
//! geometry, so the check yields a warning that disables color
//! transfer instead of aborting.

use crate::report::Warning;
use splatmesh_core::{Error, Result, SplatCloud, TriangleMesh};

/// Reject empty or non-finite input before any geometry work starts.
pub fn check_input_positions(cloud: &SplatCloud) -> Result<()> {
    if cloud.is_empty() {
        return Err(Error::EmptyCloud);
    }
    for (index, point) in cloud.points.iter().enumerate() {
        let p = point.position;
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            return Err(Error::NonFiniteInput { index });
        }
    }
    Ok(())
}

/// Check the reconstructed mesh. An empty vertex set is fatal; non-
/// finite vertices produce the transfer-disabling warning.
pub fn check_mesh(mesh: &TriangleMesh) -> Result<Option<Warning>> {
    if mesh.vertices.is_empty() {
        return Err(Error::EmptyMesh);
    }

    let count = mesh
        .vertices
        .iter()
        .filter(|v| !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()))
        .count();

    if count > 0 {
        Ok(Some(Warning::NonFiniteMeshVertices { count }))
    } else {
        Ok(None)
    }
}
