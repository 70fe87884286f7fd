// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Closest-point and inside/outside queries
//!
//! The inside test projects the query point onto the closest face and
//! compares the offset with the pseudonormal of the feature that was hit
//! (vertex, edge or face interior). A point on the surface counts as
//! inside.

use super::distance::point_triangle_distance;
use super::{Polyhedron, Solid, SolidKind};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Tolerance on barycentric coordinates when snapping a hit to a vertex or
/// an edge
pub const BARYCENTRIC_TOLERANCE: f64 = 1e-10;

fn near(value: f64, target: f64) -> bool {
    (value - target).abs() <= BARYCENTRIC_TOLERANCE
}

/// Nearest face of a polyhedron to a query point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosestFace {
    pub face: usize,
    pub barycentric: [f64; 3],
    pub distance_squared: f64,
}

/// Surface feature carrying the closest point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "feature", content = "id", rename_all = "snake_case")]
pub enum SurfaceFeature {
    Vertex(usize),
    Edge(usize),
    Face(usize),
    /// Smooth analytical surface
    Analytic,
}

/// Closest surface point with the normal used for classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceIntersection {
    pub point: Point3<f64>,
    pub normal: Vector3<f64>,
    pub feature: SurfaceFeature,
    pub distance_squared: f64,
}

impl SurfaceIntersection {
    /// Outside iff the offset from the surface leans along the normal
    pub fn contains(&self, query: &Point3<f64>) -> bool {
        (query - self.point).dot(&self.normal) <= 0.0
    }
}

impl Polyhedron {
    /// Closest face to `point`, through the face index when one is built.
    ///
    /// Ties resolve to the lowest face id either way.
    pub fn closest_face(&self, point: &Point3<f64>) -> Option<ClosestFace> {
        match &self.bvh {
            Some(bvh) => bvh.nearest(self, point).map(|nearest| ClosestFace {
                face: nearest.face,
                barycentric: nearest.projection.barycentric,
                distance_squared: nearest.projection.distance_squared,
            }),
            None => self.closest_face_linear(point),
        }
    }

    /// Closest face by scanning every face
    pub fn closest_face_linear(&self, point: &Point3<f64>) -> Option<ClosestFace> {
        let mut best: Option<ClosestFace> = None;
        for face in 0..self.faces.len() {
            let (v0, _, _, e01, e02) = self.triangle(face);
            let projection = point_triangle_distance(point, &v0, &e01, &e02);
            if best.map_or(true, |b| projection.distance_squared < b.distance_squared) {
                best = Some(ClosestFace {
                    face,
                    barycentric: projection.barycentric,
                    distance_squared: projection.distance_squared,
                });
            }
        }
        best
    }

    /// Project `point` onto `face` and pick the pseudonormal of the feature
    /// it lands on. `None` when `face` is out of range.
    pub fn locate_surface_intersection(
        &self,
        point: &Point3<f64>,
        face: usize,
    ) -> Option<SurfaceIntersection> {
        let [i0, i1, i2] = *self.faces.get(face)?;
        // Sides (v0,v1), (v1,v2), (v2,v0)
        let [edge01, edge12, edge20] = *self.face_edges.get(face)?;
        let (v0, v1, v2, e01, e02) = self.triangle(face);
        let projection = point_triangle_distance(point, &v0, &e01, &e02);
        let [w0, s, t] = projection.barycentric;

        let (point_on_surface, feature) = if near(s, 0.0) {
            if near(t, 0.0) {
                (v0, SurfaceFeature::Vertex(i0))
            } else if near(t, 1.0) {
                (v2, SurfaceFeature::Vertex(i2))
            } else {
                (v0 + e02 * t, SurfaceFeature::Edge(edge20))
            }
        } else if near(s, 1.0) {
            (v1, SurfaceFeature::Vertex(i1))
        } else if near(t, 0.0) {
            (v0 + e01 * s, SurfaceFeature::Edge(edge01))
        } else if near(w0, 0.0) {
            (projection.point(&v0, &e01, &e02), SurfaceFeature::Edge(edge12))
        } else {
            (projection.point(&v0, &e01, &e02), SurfaceFeature::Face(face))
        };

        let normal = match feature {
            SurfaceFeature::Vertex(v) => self.vertex_normals[v],
            SurfaceFeature::Edge(e) => self.edge_normals[e],
            SurfaceFeature::Face(f) => self.face_normals[f],
            SurfaceFeature::Analytic => Vector3::zeros(),
        };

        Some(SurfaceIntersection {
            point: point_on_surface,
            normal,
            feature,
            distance_squared: projection.distance_squared,
        })
    }

    /// Closest surface point over all faces
    pub fn closest_surface_point(&self, point: &Point3<f64>) -> Option<SurfaceIntersection> {
        self.closest_face(point)
            .and_then(|closest| self.locate_surface_intersection(point, closest.face))
    }

    /// Inside or on the surface
    pub fn is_point_inside(&self, point: &Point3<f64>) -> bool {
        self.closest_surface_point(point)
            .is_some_and(|hit| hit.contains(point))
    }
}

impl Solid {
    /// Closest surface point with its classification normal.
    ///
    /// Spheres in a collapsed configuration behave as cylinders along the
    /// collapsed axis.
    pub fn locate_surface_intersection(&self, point: &Point3<f64>) -> Option<SurfaceIntersection> {
        match &self.kind {
            SolidKind::Sphere => Some(self.sphere_intersection(point)),
            SolidKind::Polyhedron(poly) => poly.closest_surface_point(point),
        }
    }

    fn sphere_intersection(&self, point: &Point3<f64>) -> SurfaceIntersection {
        let mut offset = point - self.origin;
        if let Some(axis) = self.collapse.axis() {
            offset[axis] = 0.0;
        }
        let length = offset.norm();
        let normal = if length > 0.0 {
            offset / length
        } else {
            // Centre of the sphere: any direction is closest
            match self.collapse.axis() {
                Some(0) => Vector3::y(),
                _ => Vector3::x(),
            }
        };
        let gap = length - self.radius;
        SurfaceIntersection {
            point: point - offset + normal * self.radius,
            normal,
            feature: SurfaceFeature::Analytic,
            distance_squared: gap * gap,
        }
    }

    /// Inside or on the solid surface
    pub fn is_point_inside(&self, point: &Point3<f64>) -> bool {
        match &self.kind {
            SolidKind::Sphere => self.sphere_intersection(point).contains(point),
            SolidKind::Polyhedron(poly) => {
                if self.bounding_box.strictly_excludes(point) {
                    return false;
                }
                poly.is_point_inside(point)
            }
        }
    }
}
