//! PLY format support
//!
//! Splat clouds are read from PLY vertex elements with `x,y,z` plus
//! optionally three named spherical-harmonics DC coefficient fields.
//! The field names are configuration, not hard-coded identifiers:
//! trainers disagree on naming, `f_dc_0/f_dc_1/f_dc_2` is merely the
//! common default.

use crate::MeshWriter;
use ply_rs::parser::Parser;
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Ply, Property, PropertyDef, PropertyType, ScalarType,
};
use ply_rs::writer::Writer;
use serde::{Deserialize, Serialize};
use splatmesh_core::{
    ColorData, Error, Point3d, PointCloud, Result, SplatCloud, SplatPoint, TriangleMesh, Vector3d,
};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info, warn};

/// Names of the three spherical-harmonics DC coefficient properties in
/// the vertex element, in `(r, g, b)` channel order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShFieldNames {
    pub r: String,
    pub g: String,
    pub b: String,
}

impl Default for ShFieldNames {
    fn default() -> Self {
        Self {
            r: "f_dc_0".to_string(),
            g: "f_dc_1".to_string(),
            b: "f_dc_2".to_string(),
        }
    }
}

impl ShFieldNames {
    pub fn names(&self) -> [&str; 3] {
        [&self.r, &self.g, &self.b]
    }
}

pub struct PlyLoader;
pub struct PlyWriter;

impl PlyLoader {
    /// Read a splat cloud from a PLY file.
    ///
    /// Whether the cloud carries SH color data is decided exactly once,
    /// from the field set of the vertex records: if any configured
    /// field is absent, every point is loaded without coefficients and
    /// the cloud is tagged [`ColorData::Missing`]. Numeric ranges are
    /// not validated here.
    pub fn load_splats<P: AsRef<Path>>(path: P, sh_fields: &ShFieldNames) -> Result<SplatCloud> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        }
        debug!("loading splat PLY from {}", path.display());

        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let parser = Parser::<DefaultElement>::new();
        let ply = parser.read_ply(&mut reader).map_err(|e| {
            warn!("failed to parse PLY file {}: {e}", path.display());
            Error::Format(format!("unparseable PLY file: {e}"))
        })?;

        let vertices = ply
            .payload
            .get("vertex")
            .ok_or_else(|| Error::Format("PLY file has no vertex element".to_string()))?;

        // Global capability check: SH data is either fully present in a
        // file or fully absent, so one record decides for the cloud.
        let color_data = match vertices.first() {
            Some(first)
                if sh_fields
                    .names()
                    .iter()
                    .all(|name| first.get(*name).is_some()) =>
            {
                ColorData::ShCoefficients
            }
            _ => ColorData::Missing,
        };

        let mut points = PointCloud::with_capacity(vertices.len());
        for vertex in vertices {
            let x = property_f64(vertex, "x")?;
            let y = property_f64(vertex, "y")?;
            let z = property_f64(vertex, "z")?;

            let sh_dc = match color_data {
                ColorData::ShCoefficients => Some(Vector3d::new(
                    property_f64(vertex, &sh_fields.r)?,
                    property_f64(vertex, &sh_fields.g)?,
                    property_f64(vertex, &sh_fields.b)?,
                )),
                ColorData::Missing => None,
            };

            points.push(SplatPoint::new(Point3d::new(x, y, z), sh_dc));
        }

        info!(
            "loaded {} points from {} (sh data: {})",
            points.len(),
            path.display(),
            matches!(color_data, ColorData::ShCoefficients),
        );
        Ok(SplatCloud::new(points, color_data))
    }
}

impl MeshWriter for PlyWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let mut ply = Ply::<DefaultElement>::new();

        let mut vertex_element = ElementDef::new("vertex".to_string());
        vertex_element.count = mesh.vertices.len();
        for name in ["x", "y", "z"] {
            vertex_element.properties.add(PropertyDef::new(
                name.to_string(),
                PropertyType::Scalar(ScalarType::Double),
            ));
        }
        if mesh.normals.is_some() {
            for name in ["nx", "ny", "nz"] {
                vertex_element.properties.add(PropertyDef::new(
                    name.to_string(),
                    PropertyType::Scalar(ScalarType::Double),
                ));
            }
        }
        if mesh.colors.is_some() {
            for name in ["red", "green", "blue"] {
                vertex_element.properties.add(PropertyDef::new(
                    name.to_string(),
                    PropertyType::Scalar(ScalarType::UChar),
                ));
            }
        }
        ply.header.elements.add(vertex_element);

        let mut face_element = ElementDef::new("face".to_string());
        face_element.count = mesh.faces.len();
        face_element.properties.add(PropertyDef::new(
            "vertex_indices".to_string(),
            PropertyType::List(ScalarType::UChar, ScalarType::Int),
        ));
        ply.header.elements.add(face_element);

        let mut vertices = Vec::with_capacity(mesh.vertices.len());
        for (i, vertex) in mesh.vertices.iter().enumerate() {
            let mut record = DefaultElement::new();
            record.insert("x".to_string(), Property::Double(vertex.x));
            record.insert("y".to_string(), Property::Double(vertex.y));
            record.insert("z".to_string(), Property::Double(vertex.z));

            if let Some(normals) = &mesh.normals {
                record.insert("nx".to_string(), Property::Double(normals[i].x));
                record.insert("ny".to_string(), Property::Double(normals[i].y));
                record.insert("nz".to_string(), Property::Double(normals[i].z));
            }
            if let Some(colors) = &mesh.colors {
                let [r, g, b] = colors[i];
                record.insert("red".to_string(), Property::UChar(channel_to_u8(r)));
                record.insert("green".to_string(), Property::UChar(channel_to_u8(g)));
                record.insert("blue".to_string(), Property::UChar(channel_to_u8(b)));
            }
            vertices.push(record);
        }
        ply.payload.insert("vertex".to_string(), vertices);

        let mut faces = Vec::with_capacity(mesh.faces.len());
        for face in &mesh.faces {
            let mut record = DefaultElement::new();
            let indices = face.iter().map(|&idx| idx as i32).collect();
            record.insert("vertex_indices".to_string(), Property::ListInt(indices));
            faces.push(record);
        }
        ply.payload.insert("face".to_string(), faces);

        let writer_instance = Writer::new();
        writer_instance.write_ply(&mut writer, &mut ply)?;

        Ok(())
    }
}

/// Quantize a `[0, 1]` color channel to the 8-bit PLY convention.
fn channel_to_u8(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn property_f64(element: &DefaultElement, name: &str) -> Result<f64> {
    match element.get(name) {
        Some(Property::Float(val)) => Ok(*val as f64),
        Some(Property::Double(val)) => Ok(*val),
        Some(Property::Char(val)) => Ok(*val as f64),
        Some(Property::UChar(val)) => Ok(*val as f64),
        Some(Property::Short(val)) => Ok(*val as f64),
        Some(Property::UShort(val)) => Ok(*val as f64),
        Some(Property::Int(val)) => Ok(*val as f64),
        Some(Property::UInt(val)) => Ok(*val as f64),
        _ => Err(Error::Format(format!(
            "vertex property '{name}' missing or not numeric"
        ))),
    }
}
