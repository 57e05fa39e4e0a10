//! Pipeline configuration

use serde::{Deserialize, Serialize};
use splatmesh_io::ShFieldNames;
use splatmesh_reconstruction::{
    ReconstructionConfig, DEFAULT_MAX_NEIGHBORS, DEFAULT_NORMAL_RADIUS,
};
use std::path::PathBuf;

/// The full configuration surface of one pipeline run.
///
/// The normal estimation parameters are expressed in point-cloud-local
/// units and must be tuned to the density of the data; the defaults
/// suit clouds with a spacing around a few hundredths of a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Names of the SH DC coefficient properties in the input PLY.
    pub sh_fields: ShFieldNames,
    /// Neighborhood radius for normal estimation.
    pub normal_radius: f64,
    /// Neighbor cap for normal estimation and orientation.
    pub normal_max_neighbors: usize,
    /// Reconstruction strategy and its parameters.
    pub reconstruction: ReconstructionConfig,
    /// Where the mesh is written; the extension picks the writer.
    pub output_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sh_fields: ShFieldNames::default(),
            normal_radius: DEFAULT_NORMAL_RADIUS,
            normal_max_neighbors: DEFAULT_MAX_NEIGHBORS,
            reconstruction: ReconstructionConfig::default(),
            output_path: PathBuf::from("reconstructed.ply"),
        }
    }
}
