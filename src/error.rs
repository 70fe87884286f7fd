// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for the geometry engine

use thiserror::Error;

/// Errors raised while building, measuring or transforming solids.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The facet list does not describe a closed 2-manifold surface.
    #[error(
        "malformed mesh: {open_edges} open edge(s), {non_manifold_edges} non-manifold edge(s), first at vertices ({}, {})",
        first.0,
        first.1
    )]
    MalformedMesh {
        open_edges: usize,
        non_manifold_edges: usize,
        first: (usize, usize),
    },

    #[error("mesh has no faces")]
    EmptyMesh,

    #[error("no edge joins vertices {a} and {b}")]
    EdgeNotFound { a: usize, b: usize },

    /// Analytical spheres only admit a uniform scale.
    #[error("non-uniform scale ({x}, {y}, {z}) cannot be applied to an analytical solid")]
    NonUniformScale { x: f64, y: f64, z: f64 },
}

/// Convenience alias for results using [`GeometryError`].
pub type Result<T> = std::result::Result<T, GeometryError>;
