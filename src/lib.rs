// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Immersed-boundary geometry engine
//!
//! Turns triangle soups and analytical spheres into solids with adjacency,
//! integral properties and pseudonormals, moves them rigidly, and answers
//! the per-cell inside/outside and closest-point queries a structured-grid
//! flow solver needs to carve solids out of the fluid domain.

pub mod classify;
pub mod error;
pub mod geometry;
pub mod io;

pub use classify::{classify_points, PointClass};
pub use error::{GeometryError, Result};
pub use geometry::{
    compute_geometry_parameters, BoundingBox, CollapsedDimension, Facet, Polyhedron, Primitive,
    RigidTransform, Solid, SolidKind, SurfaceIntersection,
};
pub use io::{read_stl, write_stl, GeometryConfig};

/// Build a polyhedral solid from an STL file
pub fn load_stl_solid(
    path: impl AsRef<std::path::Path>,
    collapse: CollapsedDimension,
) -> anyhow::Result<Solid> {
    let facets = read_stl(path.as_ref())?;
    let solid = Solid::polyhedron(facets, collapse)?;
    Ok(solid)
}
