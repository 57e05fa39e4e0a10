//! # Splatmesh Reconstruction
//!
//! Normal estimation and surface reconstruction for oriented point
//! clouds. Two mutually exclusive strategies are provided, Poisson
//! (external solver) and Ball Pivoting (in-crate), selected once per
//! run through [`ReconstructionConfig`]. A reconstruction that yields
//! zero triangles is an error carrying the parameters used, so callers
//! can retune and retry manually; there are no automatic retries.

pub mod ball_pivoting;
pub mod normals;
pub mod poisson;
pub mod spatial;

pub use ball_pivoting::{ball_pivoting_reconstruction, BallPivotingParams};
pub use normals::{estimate_normals, DEFAULT_MAX_NEIGHBORS, DEFAULT_NORMAL_RADIUS};
pub use poisson::{poisson_reconstruction, prune_low_density, PoissonParams};
pub use spatial::SpatialIndex;

use serde::{Deserialize, Serialize};
use splatmesh_core::{OrientedCloud, Result, TriangleMesh};

/// Strategy selection for one pipeline run. No mixing: exactly one
/// variant applies from start to finish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReconstructionConfig {
    Poisson(PoissonParams),
    BallPivoting(BallPivotingParams),
}

impl ReconstructionConfig {
    /// Human-readable parameter summary, used in failure reports.
    pub fn describe(&self) -> String {
        match self {
            Self::Poisson(params) => params.describe(),
            Self::BallPivoting(params) => params.describe(),
        }
    }
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self::Poisson(PoissonParams::default())
    }
}

/// Mesh plus strategy-specific auxiliary data.
#[derive(Debug, Clone)]
pub struct ReconstructionOutput {
    pub mesh: TriangleMesh,
    /// Per-vertex sampling density; Poisson only.
    pub densities: Option<Vec<f64>>,
}

/// Reconstruct a mesh from an oriented cloud with the selected
/// strategy.
pub fn reconstruct(
    cloud: &OrientedCloud,
    config: &ReconstructionConfig,
) -> Result<ReconstructionOutput> {
    match config {
        ReconstructionConfig::Poisson(params) => {
            let (mesh, densities) = poisson_reconstruction(cloud, params)?;
            Ok(ReconstructionOutput {
                mesh,
                densities: Some(densities),
            })
        }
        ReconstructionConfig::BallPivoting(params) => {
            let mesh = ball_pivoting_reconstruction(cloud, params)?;
            Ok(ReconstructionOutput {
                mesh,
                densities: None,
            })
        }
    }
}
