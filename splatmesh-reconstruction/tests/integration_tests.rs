//! Integration tests for splatmesh-reconstruction
//!
//! Exercises normal estimation feeding into both reconstruction
//! strategies through the shared `reconstruct` entry point.

use splatmesh_core::{Error, Point3d};
use splatmesh_reconstruction::*;

/// Flat grid of points in the z = 0 plane.
fn planar_positions(spacing: f64, side: usize) -> Vec<Point3d> {
    let mut points = Vec::new();
    for i in 0..side {
        for j in 0..side {
            points.push(Point3d::new(i as f64 * spacing, j as f64 * spacing, 0.0));
        }
    }
    points
}

/// Roughly uniform sphere sampling via a golden-ratio spiral.
fn sphere_positions(radius: f64, num_points: usize) -> Vec<Point3d> {
    let golden_ratio = (1.0 + 5.0_f64.sqrt()) / 2.0;
    (0..num_points)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / golden_ratio;
            let phi = (1.0 - 2.0 * (i as f64 + 0.5) / num_points as f64).acos();
            Point3d::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            )
        })
        .collect()
}

#[test]
fn test_normals_then_ball_pivoting_on_plane() {
    let positions = planar_positions(0.5, 4);
    let oriented = estimate_normals(&positions, 2.0, 8).unwrap();

    let config = ReconstructionConfig::BallPivoting(BallPivotingParams { radii: vec![1.0] });
    let output = reconstruct(&oriented, &config).unwrap();

    assert!(output.mesh.face_count() >= 2);
    assert!(output.densities.is_none());
    // Vertex set is the input point set, in order.
    assert_eq!(output.mesh.vertex_count(), positions.len());
    for (vertex, position) in output.mesh.vertices.iter().zip(&positions) {
        assert_eq!(vertex, position);
    }
}

#[test]
fn test_zero_triangle_reconstruction_is_an_error() {
    let positions = planar_positions(0.5, 4);
    let oriented = estimate_normals(&positions, 2.0, 8).unwrap();

    let config = ReconstructionConfig::BallPivoting(BallPivotingParams { radii: vec![0.001] });
    let result = reconstruct(&oriented, &config);
    assert!(matches!(
        result,
        Err(Error::ReconstructionFailure { .. })
    ));
}

#[test]
fn test_poisson_on_sphere() {
    let positions = sphere_positions(1.0, 300);
    let oriented = estimate_normals(&positions, 0.5, 10).unwrap();

    let config = ReconstructionConfig::Poisson(PoissonParams {
        depth: 5,
        ..PoissonParams::default()
    });

    // The external solver may decline sparse input; what matters here
    // is the contract, not the solver's appetite.
    match reconstruct(&oriented, &config) {
        Ok(output) => {
            assert!(!output.mesh.is_empty());
            let densities = output.densities.expect("poisson must report densities");
            assert_eq!(densities.len(), output.mesh.vertex_count());
            assert!(densities.iter().all(|d| d.is_finite() && *d >= 0.0));
        }
        Err(Error::ReconstructionFailure { params }) => {
            assert!(params.contains("depth=5"));
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_sphere_normals_point_outward_or_inward_consistently() {
    let positions = sphere_positions(1.0, 200);
    let oriented = estimate_normals(&positions, 0.5, 10).unwrap();

    // Tangent-plane propagation must settle on one global sign.
    let radial_agreement: Vec<f64> = oriented
        .iter()
        .map(|p| p.normal.dot(&p.position.coords.normalize()))
        .collect();
    let positive = radial_agreement.iter().filter(|d| **d > 0.0).count();
    assert!(positive == 0 || positive == oriented.len());
}
