//! Run report and warnings

use thiserror::Error;

/// Non-fatal conditions surfaced to the caller instead of aborting the
/// run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    #[error("SH fields {fields:?} not present in input; fallback gray applied to all points")]
    MissingShAttributes { fields: [String; 3] },

    #[error("{count} non-finite mesh vertices; color transfer disabled, exporting uncolored")]
    NonFiniteMeshVertices { count: usize },
}

/// Aggregate outcome of one pipeline run.
///
/// Per-vertex transfer faults are counted here rather than raised: one
/// bad vertex must not invalidate an entire reconstruction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub points_loaded: usize,
    pub mesh_vertices: usize,
    pub mesh_triangles: usize,
    pub warnings: Vec<Warning>,
    /// False when transfer was disabled by a mesh warning.
    pub colors_transferred: bool,
    /// Vertices colored with the magenta sentinel (index query failed).
    pub query_failures: usize,
    /// Vertices colored with the green sentinel (index returned no hit).
    pub no_neighbor_vertices: usize,
    /// False when the mesh writer declined the output path.
    pub exported: bool,
}
