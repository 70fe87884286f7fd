// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - solid representation, properties, transforms and queries

mod bbox;
mod bvh;
mod distance;
mod facet;
mod polyhedron;
mod primitives;
mod properties;
mod query;
mod solid;
mod topology;
mod transform;

pub use bbox::BoundingBox;
pub use bvh::{BVHNode, FaceBvh};
pub use distance::{point_triangle_distance, TriangleProjection};
pub use facet::Facet;
pub use polyhedron::{Polyhedron, TriangleFrame};
pub use primitives::Primitive;
pub use properties::{polyhedron_properties, sphere_properties, CollapsedDimension, MassProperties};
pub use query::{ClosestFace, SurfaceFeature, SurfaceIntersection, BARYCENTRIC_TOLERANCE};
pub use solid::{compute_geometry_parameters, BodyState, Solid, SolidKind};
pub use topology::{approx_equal, Edge, TopologyBuilder, VERTEX_TOLERANCE};
pub use transform::{rotate_inertia, rotation_matrix, RigidTransform};
