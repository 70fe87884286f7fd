// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Facet generators for closed reference solids

use super::Facet;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Closed triangulated primitives, outward winding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Cube { size: Vector3<f64>, center: bool },
    UvSphere { r: f64, segments: u32 },
    Icosphere { r: f64, subdivisions: u32 },
}

impl Primitive {
    pub fn cube(size: Vector3<f64>, center: bool) -> Self {
        Self::Cube { size, center }
    }

    pub fn uv_sphere(r: f64, segments: u32) -> Self {
        let segments = if segments >= 3 { segments } else { 32 };
        Self::UvSphere { r, segments }
    }

    pub fn icosphere(r: f64, subdivisions: u32) -> Self {
        Self::Icosphere { r, subdivisions }
    }

    pub fn to_facets(&self) -> Vec<Facet> {
        match self {
            Self::Cube { size, center } => generate_cube(*size, *center),
            Self::UvSphere { r, segments } => generate_uv_sphere(*r, *segments),
            Self::Icosphere { r, subdivisions } => generate_icosphere(*r, *subdivisions),
        }
    }
}

fn generate_cube(size: Vector3<f64>, center: bool) -> Vec<Facet> {
    let min = if center { -size / 2.0 } else { Vector3::zeros() };
    let max = min + size;

    // 8 corners of the cube
    let positions = [
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ];

    let faces: [[usize; 3]; 12] = [
        // z+
        [4, 5, 6],
        [4, 6, 7],
        // z-
        [1, 0, 3],
        [1, 3, 2],
        // x+
        [5, 1, 2],
        [5, 2, 6],
        // x-
        [0, 4, 7],
        [0, 7, 3],
        // y+
        [7, 6, 2],
        [7, 2, 3],
        // y-
        [0, 1, 5],
        [0, 5, 4],
    ];

    faces
        .iter()
        .map(|f| Facet::from_vertices(positions[f[0]], positions[f[1]], positions[f[2]]))
        .collect()
}

fn generate_uv_sphere(radius: f64, segments: u32) -> Vec<Facet> {
    let stacks = segments as usize;
    let slices = segments as usize;
    let point = |i: usize, j: usize| -> Point3<f64> {
        // Poles are emitted exactly so that the pole fans weld into one vertex
        if i == 0 {
            return Point3::new(0.0, 0.0, radius);
        }
        if i == stacks {
            return Point3::new(0.0, 0.0, -radius);
        }
        let phi = PI * i as f64 / stacks as f64;
        let theta = 2.0 * PI * (j % slices) as f64 / slices as f64;
        Point3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
        )
    };

    let mut facets = Vec::with_capacity(2 * stacks * slices);
    for i in 0..stacks {
        for j in 0..slices {
            let a = point(i, j);
            let b = point(i + 1, j);
            let c = point(i + 1, j + 1);
            let d = point(i, j + 1);
            if i != 0 {
                facets.push(Facet::from_vertices(a, b, d));
            }
            if i + 1 != stacks {
                facets.push(Facet::from_vertices(b, c, d));
            }
        }
    }
    facets
}

fn generate_icosphere(radius: f64, subdivisions: u32) -> Vec<Facet> {
    let t = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let seeds = [
        Vector3::new(-1.0, t, 0.0),
        Vector3::new(1.0, t, 0.0),
        Vector3::new(-1.0, -t, 0.0),
        Vector3::new(1.0, -t, 0.0),
        Vector3::new(0.0, -1.0, t),
        Vector3::new(0.0, 1.0, t),
        Vector3::new(0.0, -1.0, -t),
        Vector3::new(0.0, 1.0, -t),
        Vector3::new(t, 0.0, -1.0),
        Vector3::new(t, 0.0, 1.0),
        Vector3::new(-t, 0.0, -1.0),
        Vector3::new(-t, 0.0, 1.0),
    ];
    let faces: [[usize; 3]; 20] = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    let mut triangles: Vec<[Vector3<f64>; 3]> = faces
        .iter()
        .map(|f| [seeds[f[0]].normalize(), seeds[f[1]].normalize(), seeds[f[2]].normalize()])
        .collect();

    for _ in 0..subdivisions {
        let mut refined = Vec::with_capacity(triangles.len() * 4);
        for [a, b, c] in triangles {
            // Shared edges yield bit-identical midpoints, so neighbours weld.
            let ab = midpoint_on_sphere(&a, &b);
            let bc = midpoint_on_sphere(&b, &c);
            let ca = midpoint_on_sphere(&c, &a);
            refined.push([a, ab, ca]);
            refined.push([b, bc, ab]);
            refined.push([c, ca, bc]);
            refined.push([ab, bc, ca]);
        }
        triangles = refined;
    }

    triangles
        .iter()
        .map(|[a, b, c]| {
            Facet::from_vertices(
                Point3::from(a * radius),
                Point3::from(b * radius),
                Point3::from(c * radius),
            )
        })
        .collect()
}

fn midpoint_on_sphere(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    ((a + b) * 0.5).normalize()
}
