// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Raw facet (triangle soup) input

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A single triangle with its own normal, as stored by STL readers.
///
/// Vertices are duplicated across neighbouring facets; the topology
/// builder merges them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    pub normal: Vector3<f64>,
    pub vertices: [Point3<f64>; 3],
}

impl Facet {
    pub fn new(normal: Vector3<f64>, vertices: [Point3<f64>; 3]) -> Self {
        Self { normal, vertices }
    }

    /// Build a facet whose normal follows the counter-clockwise winding
    pub fn from_vertices(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        let normal = (v1 - v0).cross(&(v2 - v0));
        let norm = normal.norm();
        let normal = if norm > 0.0 { normal / norm } else { normal };
        Self::new(normal, [v0, v1, v2])
    }
}
