//! # Splatmesh Pipeline
//!
//! End-to-end conversion of a splat point cloud into a textured
//! triangle mesh: load, validate input, decode colors, estimate
//! normals, reconstruct, validate mesh, transfer colors, recompute
//! normals, export.
//!
//! Stages run synchronously and in order; each fully consumes its
//! input before the next begins. Every run owns its cloud and mesh
//! exclusively. Fatal conditions abort with a [`splatmesh_core::Error`]
//! identifying the stage; non-fatal conditions accumulate in the
//! [`RunReport`] returned with the mesh.

pub mod color;
pub mod config;
pub mod report;
pub mod transfer;
pub mod validate;

pub use color::{decode_colors, decode_rgb, FALLBACK_GRAY, SH_C0};
pub use config::PipelineConfig;
pub use report::{RunReport, Warning};
pub use transfer::{transfer_colors, TransferStats, NO_NEIGHBOR_COLOR, QUERY_FAILURE_COLOR};

use splatmesh_core::{ColoredCloud, Point3d, Result, TriangleMesh};
use splatmesh_io::{export_mesh, PlyLoader};
use splatmesh_reconstruction::{estimate_normals, reconstruct};
use std::path::Path;
use tracing::{debug, info, warn};

/// Mesh and report of one completed (possibly degraded) run.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub mesh: TriangleMesh,
    pub report: RunReport,
}

/// One-shot splat-to-mesh pipeline. Stateless across invocations aside
/// from the files it reads and writes.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline on one input file.
    pub fn run<P: AsRef<Path>>(&self, input: P) -> Result<PipelineOutcome> {
        let mut report = RunReport::default();

        let cloud = PlyLoader::load_splats(input, &self.config.sh_fields)?;
        report.points_loaded = cloud.len();
        validate::check_input_positions(&cloud)?;

        let (colored, color_warning) = decode_colors(&cloud, &self.config.sh_fields);
        if let Some(warning) = color_warning {
            warn!("{warning}");
            report.warnings.push(warning);
        }

        let positions = cloud.positions();
        info!(
            "estimating normals (radius={}, max_neighbors={})",
            self.config.normal_radius, self.config.normal_max_neighbors
        );
        let oriented = estimate_normals(
            &positions,
            self.config.normal_radius,
            self.config.normal_max_neighbors,
        )?;

        info!("reconstructing surface: {}", self.config.reconstruction.describe());
        let output = reconstruct(&oriented, &self.config.reconstruction)?;
        let mut mesh = output.mesh;
        report.mesh_vertices = mesh.vertex_count();
        report.mesh_triangles = mesh.face_count();
        info!(
            "reconstruction complete: {} vertices, {} triangles",
            report.mesh_vertices, report.mesh_triangles
        );

        log_bounds(&positions, &mesh);
        apply_colors(&mut mesh, &colored, &mut report)?;

        mesh.compute_vertex_normals();

        report.exported = export_mesh(&mesh, &self.config.output_path)?;
        if report.exported {
            info!("mesh written to {}", self.config.output_path.display());
        } else {
            warn!(
                "mesh writer declined output path {}",
                self.config.output_path.display()
            );
        }

        Ok(PipelineOutcome { mesh, report })
    }
}

/// Color stage: validate the mesh, then transfer colors. When the mesh
/// carries non-finite vertices, record the warning and leave the mesh
/// uncolored instead.
pub fn apply_colors(
    mesh: &mut TriangleMesh,
    cloud: &ColoredCloud,
    report: &mut RunReport,
) -> Result<()> {
    match validate::check_mesh(mesh)? {
        Some(warning) => {
            warn!("{warning}");
            report.warnings.push(warning);
        }
        None => {
            let stats = transfer_colors(mesh, cloud);
            report.colors_transferred = true;
            report.query_failures = stats.query_failures;
            report.no_neighbor_vertices = stats.no_neighbor_vertices;
            if stats.query_failures > 0 || stats.no_neighbor_vertices > 0 {
                warn!(
                    "color transfer degraded: {} query failures, {} vertices without neighbors",
                    stats.query_failures, stats.no_neighbor_vertices
                );
            }
        }
    }
    Ok(())
}

/// Log cloud vs mesh bounding boxes; a gross mismatch is the usual
/// sign of a reconstruction gone wrong before any color is copied.
fn log_bounds(positions: &[Point3d], mesh: &TriangleMesh) {
    if positions.is_empty() || mesh.vertices.is_empty() {
        return;
    }
    debug!(
        "cloud bounds {:?}, mesh bounds {:?}",
        bounds(positions),
        bounds(&mesh.vertices)
    );
}

fn bounds(points: &[Point3d]) -> ([f64; 3], [f64; 3]) {
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for p in points {
        for (axis, value) in [p.x, p.y, p.z].into_iter().enumerate() {
            min[axis] = min[axis].min(value);
            max[axis] = max[axis].max(value);
        }
    }
    (min, max)
}
