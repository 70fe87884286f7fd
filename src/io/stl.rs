// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL facet reader and writer (binary on write, binary or ASCII on read)

use crate::geometry::{Facet, Polyhedron};
use anyhow::{Context, Result};
use nalgebra::{Point3, Vector3};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek};
use std::path::Path;
use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};

/// Read every facet of an STL file
pub fn read_stl(path: impl AsRef<Path>) -> Result<Vec<Facet>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open STL file: {:?}", path))?;
    let facets = read_stl_from(&mut BufReader::new(file))
        .with_context(|| format!("Failed to read STL file: {:?}", path))?;
    tracing::debug!(facets = facets.len(), path = %path.display(), "read STL");
    Ok(facets)
}

/// Read facets from any seekable STL stream
pub fn read_stl_from<R: Read + Seek>(reader: &mut R) -> Result<Vec<Facet>> {
    let stl = stl_io::read_stl(reader).context("Failed to parse STL data")?;

    let point = |index: usize| -> Result<Point3<f64>> {
        let v = stl
            .vertices
            .get(index)
            .with_context(|| format!("STL face references missing vertex {}", index))?;
        Ok(Point3::new(f64::from(v[0]), f64::from(v[1]), f64::from(v[2])))
    };

    stl.faces
        .iter()
        .map(|face| {
            let normal = Vector3::new(
                f64::from(face.normal[0]),
                f64::from(face.normal[1]),
                f64::from(face.normal[2]),
            );
            let [a, b, c] = face.vertices;
            Ok(Facet::new(normal, [point(a)?, point(b)?, point(c)?]))
        })
        .collect()
}

/// Write facets as binary STL
pub fn write_facets(path: impl AsRef<Path>, facets: &[Facet]) -> Result<()> {
    let path = path.as_ref();
    let triangles: Vec<StlTriangle> = facets
        .iter()
        .map(|facet| {
            let [v0, v1, v2] = facet.vertices;
            let n = facet.normal;
            StlTriangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    StlVertex::new([v0.x as f32, v0.y as f32, v0.z as f32]),
                    StlVertex::new([v1.x as f32, v1.y as f32, v1.z as f32]),
                    StlVertex::new([v2.x as f32, v2.y as f32, v2.z as f32]),
                ],
            }
        })
        .collect();

    let file = File::create(path).with_context(|| format!("Failed to create STL file: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    stl_io::write_stl(&mut writer, triangles.iter()).context("Failed to write STL file")?;
    Ok(())
}

/// Write the current (possibly transformed) surface of a polyhedron
pub fn write_stl(path: impl AsRef<Path>, poly: &Polyhedron) -> Result<()> {
    write_facets(path, &poly.to_facets())
}
