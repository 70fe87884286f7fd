// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Rigid-body transforms of solids
//!
//! Vertices are moved about the pre-transform centroid in a fixed order:
//! centre, scale, rotate, then offset and recentre. The centroid itself only
//! follows the offset.

use super::{BoundingBox, Solid, SolidKind};
use crate::error::{GeometryError, Result};
use nalgebra::{Matrix3, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;

/// Scale, rotation angles (radians, about x, y and z) and offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidTransform {
    pub scale: Vector3<f64>,
    pub angles: Vector3<f64>,
    pub offset: Vector3<f64>,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    pub fn new(scale: Vector3<f64>, angles: Vector3<f64>, offset: Vector3<f64>) -> Self {
        Self {
            scale,
            angles,
            offset,
        }
    }

    pub fn identity() -> Self {
        Self::new(Vector3::repeat(1.0), Vector3::zeros(), Vector3::zeros())
    }

    pub fn rotation(angles: Vector3<f64>) -> Self {
        Self {
            angles,
            ..Self::identity()
        }
    }

    pub fn is_uniform_scale(&self) -> bool {
        self.scale.x == self.scale.y && self.scale.y == self.scale.z
    }

    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        rotation_matrix(&self.angles)
    }

    /// Move `point` about `pivot` with a precomputed rotation
    pub fn apply_to_point(
        &self,
        point: &Point3<f64>,
        pivot: &Point3<f64>,
        rotation: &Matrix3<f64>,
    ) -> Point3<f64> {
        let local = (point - pivot).component_mul(&self.scale);
        pivot + rotation * local + self.offset
    }
}

/// Closed-form rotation for the x, y, z angle triple
pub fn rotation_matrix(angles: &Vector3<f64>) -> Matrix3<f64> {
    let (sx, cx) = angles.x.sin_cos();
    let (sy, cy) = angles.y.sin_cos();
    let (sz, cz) = angles.z.sin_cos();
    Matrix3::new(
        cy * cz, cx * sz + sx * sy * cz, sx * sz - cx * sy * cz, //
        -cy * sz, cx * cz - sx * sy * sz, sx * cz + cx * sy * sz, //
        sy, -sx * cy, cx * cy,
    )
}

/// Express an inertia tensor in the rotated frame.
///
/// The tensor is sampled with the quadratic form `aᵀ I a` along the three
/// axes and the three bisectors, each pulled back through the inverse
/// rotation, and the symmetric tensor is rebuilt from those six values.
/// The result equals `R I Rᵀ`.
pub fn rotate_inertia(inertia: &Matrix3<f64>, rotation: &Matrix3<f64>) -> Matrix3<f64> {
    let h = FRAC_1_SQRT_2;
    // xx, yy, zz, xy, yz, zx
    let directions = [
        Vector3::x(),
        Vector3::y(),
        Vector3::z(),
        Vector3::new(h, h, 0.0),
        Vector3::new(0.0, h, h),
        Vector3::new(h, 0.0, h),
    ];
    let inverse = rotation.transpose();
    let p = directions.map(|direction| {
        let axis = inverse * direction;
        axis.dot(&(inertia * axis))
    });

    let xy = p[3] - 0.5 * (p[0] + p[1]);
    let yz = p[4] - 0.5 * (p[1] + p[2]);
    let zx = p[5] - 0.5 * (p[2] + p[0]);
    Matrix3::new(
        p[0], xy, zx, //
        xy, p[1], yz, //
        zx, yz, p[2],
    )
}

impl Solid {
    /// Apply `transform` in place.
    ///
    /// Normals are rotated but not renormalised, so an anisotropic scale
    /// leaves them only approximately unit. Area, volume and inertia are
    /// not rescaled; run the property pass afterwards when the scale is not
    /// one. The face index of a polyhedron is dropped.
    pub fn transform(&mut self, transform: &RigidTransform) -> Result<()> {
        let rotation = transform.rotation_matrix();
        let pivot = self.origin;

        match &mut self.kind {
            SolidKind::Sphere => {
                if !transform.is_uniform_scale() {
                    let s = transform.scale;
                    return Err(GeometryError::NonUniformScale {
                        x: s.x,
                        y: s.y,
                        z: s.z,
                    });
                }
                self.radius *= transform.scale.x.abs();
                self.bounding_box = BoundingBox::around(&(pivot + transform.offset), self.radius);
            }
            SolidKind::Polyhedron(poly) => {
                for vertex in &mut poly.vertices {
                    *vertex = transform.apply_to_point(vertex, &pivot, &rotation);
                }
                for normal in poly
                    .face_normals
                    .iter_mut()
                    .chain(poly.edge_normals.iter_mut())
                    .chain(poly.vertex_normals.iter_mut())
                {
                    *normal = rotation * *normal;
                }
                poly.invalidate_index();
                self.bounding_box = BoundingBox::from_points(&poly.vertices);
                self.radius = self.bounding_box.diagonal();
            }
        }

        self.inertia = rotate_inertia(&self.inertia, &rotation);
        self.origin += transform.offset;

        tracing::debug!(
            offset = ?transform.offset,
            angles = ?transform.angles,
            "transformed solid"
        );
        Ok(())
    }
}
