//! SH DC coefficient to RGB decoding

use crate::report::Warning;
use splatmesh_core::{ColorData, ColoredCloud, ColoredPoint, SplatCloud, Vector3d};
use splatmesh_io::ShFieldNames;

/// Degree-0 real spherical-harmonic normalization constant,
/// `1 / (2 * sqrt(pi))`.
pub const SH_C0: f64 = 0.282_094_791_773_878_14;

/// Color applied when the input carries no SH data. A policy fallback,
/// not an error.
pub const FALLBACK_GRAY: [f64; 3] = [0.8, 0.8, 0.8];

/// Decode one SH DC coefficient triple into linear RGB.
///
/// Deterministic and clamped: every channel lands in `[0, 1]` no
/// matter how far the coefficients stray.
pub fn decode_rgb(sh_dc: &Vector3d) -> [f64; 3] {
    [
        decode_channel(sh_dc.x),
        decode_channel(sh_dc.y),
        decode_channel(sh_dc.z),
    ]
}

fn decode_channel(coefficient: f64) -> f64 {
    (0.5 + coefficient * SH_C0).clamp(0.0, 1.0)
}

/// Decode a whole cloud according to its color capability tag.
///
/// The tag was decided once at load time, so there is no per-point
/// presence decision here: a `Missing` cloud gets the fallback gray
/// everywhere and exactly one warning for the run.
pub fn decode_colors(
    cloud: &SplatCloud,
    sh_fields: &ShFieldNames,
) -> (ColoredCloud, Option<Warning>) {
    match cloud.color_data {
        ColorData::ShCoefficients => {
            let colored = cloud
                .points
                .iter()
                .map(|p| ColoredPoint {
                    position: p.position,
                    rgb: p.sh_dc.map_or(FALLBACK_GRAY, |sh| decode_rgb(&sh)),
                })
                .collect();
            (colored, None)
        }
        ColorData::Missing => {
            let colored = cloud
                .points
                .iter()
                .map(|p| ColoredPoint {
                    position: p.position,
                    rgb: FALLBACK_GRAY,
                })
                .collect();
            let warning = Warning::MissingShAttributes {
                fields: sh_fields.names().map(str::to_string),
            };
            (colored, Some(warning))
        }
    }
}
