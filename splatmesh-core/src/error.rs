//! Error types for splatmesh

use std::path::PathBuf;
use thiserror::Error;

/// Fatal error conditions for the splat-to-mesh pipeline.
///
/// Non-fatal conditions (missing color attributes, non-finite mesh
/// vertices, per-vertex transfer faults) are not errors; they are
/// accumulated into the run report by the pipeline crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("input file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("format error: {0}")]
    Format(String),

    #[error("normal estimation failed: {0}")]
    EstimationFailure(String),

    #[error("reconstruction produced no triangles ({params})")]
    ReconstructionFailure { params: String },

    #[error("non-finite coordinate in input cloud at point {index}")]
    NonFiniteInput { index: usize },

    #[error("point cloud is empty")]
    EmptyCloud,

    #[error("reconstructed mesh has no vertices")]
    EmptyMesh,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for splatmesh operations
pub type Result<T> = std::result::Result<T, Error>;
