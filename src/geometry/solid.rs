// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Immersed solids: analytical spheres and closed polyhedra

use super::properties::{polyhedron_properties, sphere_properties, CollapsedDimension, MassProperties};
use super::{BoundingBox, Facet, Polyhedron};
use crate::error::Result;
use nalgebra::{Matrix3, Point3, Vector3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Kinematic and physical state owned by the rigid-body integrator.
///
/// Carried with the solid and serialised with it, never computed here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyState {
    pub velocity: Vector3<f64>,
    pub force: Vector3<f64>,
    pub density: f64,
    pub temperature: f64,
    pub friction: f64,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            velocity: Vector3::zeros(),
            force: Vector3::zeros(),
            density: 1.0,
            temperature: 0.0,
            friction: 0.0,
        }
    }
}

/// Geometry behind a solid
#[derive(Debug, Clone)]
pub enum SolidKind {
    /// Sphere of radius [`Solid::radius`] around [`Solid::origin`]
    Sphere,
    Polyhedron(Box<Polyhedron>),
}

/// A body immersed in the flow domain
#[derive(Debug, Clone)]
pub struct Solid {
    /// Centroid
    pub origin: Point3<f64>,
    /// Sphere radius, or the characteristic radius of a polyhedron
    pub radius: f64,
    pub bounding_box: BoundingBox,
    pub area: f64,
    pub volume: f64,
    /// Volume-scaled inertia about the centroid
    pub inertia: Matrix3<f64>,
    pub collapse: CollapsedDimension,
    pub state: BodyState,
    pub kind: SolidKind,
}

impl Solid {
    /// Analytical sphere (a unit-thickness cylinder when `collapse` is set)
    pub fn sphere(origin: Point3<f64>, radius: f64, collapse: CollapsedDimension) -> Self {
        let props = sphere_properties(&origin, radius, collapse);
        Self::from_properties(props, collapse, SolidKind::Sphere)
    }

    /// Build topology, integrate properties and index the faces of a facet
    /// soup.
    pub fn polyhedron(facets: Vec<Facet>, collapse: CollapsedDimension) -> Result<Self> {
        let mut poly = Polyhedron::from_facets(facets)?;
        let props = polyhedron_properties(&mut poly, collapse);
        poly.build_index();
        Ok(Self::from_properties(props, collapse, SolidKind::Polyhedron(Box::new(poly))))
    }

    fn from_properties(props: MassProperties, collapse: CollapsedDimension, kind: SolidKind) -> Self {
        Self {
            origin: props.centroid,
            radius: props.radius,
            bounding_box: props.bounding_box,
            area: props.area,
            volume: props.volume,
            inertia: props.inertia,
            collapse,
            state: BodyState::default(),
            kind,
        }
    }

    fn apply(&mut self, props: MassProperties) {
        self.origin = props.centroid;
        self.radius = props.radius;
        self.bounding_box = props.bounding_box;
        self.area = props.area;
        self.volume = props.volume;
        self.inertia = props.inertia;
    }

    pub fn with_state(mut self, state: BodyState) -> Self {
        self.state = state;
        self
    }

    /// Recompute area, volume, centroid, inertia, box and normals, then
    /// rebuild the face index.
    pub fn compute_parameters(&mut self, collapse: CollapsedDimension) {
        self.collapse = collapse;
        let props = match &mut self.kind {
            SolidKind::Sphere => sphere_properties(&self.origin, self.radius, collapse),
            SolidKind::Polyhedron(poly) => {
                let props = polyhedron_properties(poly, collapse);
                poly.build_index();
                props
            }
        };
        self.apply(props);
    }

    pub fn is_sphere(&self) -> bool {
        matches!(self.kind, SolidKind::Sphere)
    }

    pub fn polyhedron_ref(&self) -> Option<&Polyhedron> {
        match &self.kind {
            SolidKind::Polyhedron(poly) => Some(poly),
            SolidKind::Sphere => None,
        }
    }

    /// Mass inertia, folding in the state density
    pub fn mass_inertia(&self) -> Matrix3<f64> {
        self.inertia * self.state.density
    }
}

/// Batch property pass, run after loading and after any transform.
pub fn compute_geometry_parameters(collapse: CollapsedDimension, solids: &mut [Solid]) {
    solids
        .par_iter_mut()
        .for_each(|solid| solid.compute_parameters(collapse));
    tracing::debug!(solids = solids.len(), ?collapse, "computed geometry parameters");
}
