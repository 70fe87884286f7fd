// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Indexed triangle mesh with face/edge adjacency and pseudonormals

use super::bvh::FaceBvh;
use super::topology::{Edge, TopologyBuilder};
use super::Facet;
use crate::error::{GeometryError, Result};
use ahash::AHashMap;
use nalgebra::{Point3, Vector3};

/// Vertices, sides and edge vectors of one face, as `(v0, v1, v2, e01, e02)`
pub type TriangleFrame = (Point3<f64>, Point3<f64>, Point3<f64>, Vector3<f64>, Vector3<f64>);

/// Closed triangulated surface.
///
/// Normals are zero until the property pass fills them
/// (see [`crate::geometry::polyhedron_properties`]).
#[derive(Debug, Clone)]
pub struct Polyhedron {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<[usize; 3]>,
    pub edges: Vec<Edge>,
    /// Edge ids of the sides (v0,v1), (v1,v2), (v2,v0) of every face
    pub face_edges: Vec<[usize; 3]>,
    pub face_normals: Vec<Vector3<f64>>,
    pub edge_normals: Vec<Vector3<f64>>,
    pub vertex_normals: Vec<Vector3<f64>>,
    edge_index: AHashMap<(usize, usize), usize>,
    pub(crate) bvh: Option<FaceBvh>,
}

impl Polyhedron {
    /// Weld a facet list into a closed polyhedron.
    ///
    /// Facets whose corners weld together are dropped with a warning. Fails
    /// with [`GeometryError::MalformedMesh`] when an edge is not shared by
    /// exactly two of the remaining faces.
    pub fn from_facets(facets: Vec<Facet>) -> Result<Self> {
        let mut builder = TopologyBuilder::with_capacity(facets.len());
        let mut collapsed = 0usize;
        for facet in &facets {
            let [v0, v1, v2] = facet.vertices;
            if builder.add_triangle(v0, v1, v2).is_none() {
                collapsed += 1;
            }
        }
        drop(facets);

        if collapsed > 0 {
            tracing::warn!(collapsed, "dropped facets whose corners weld together");
        }
        if builder.faces().is_empty() {
            return Err(GeometryError::EmptyMesh);
        }

        builder.validate()?;
        let face_edges = builder.face_edges()?;
        let (vertices, faces, edges) = builder.into_parts();

        tracing::debug!(
            vertices = vertices.len(),
            faces = faces.len(),
            edges = edges.len(),
            "built polyhedron topology"
        );

        Ok(Self::from_parts(vertices, faces, edges, face_edges))
    }

    fn from_parts(
        vertices: Vec<Point3<f64>>,
        faces: Vec<[usize; 3]>,
        edges: Vec<Edge>,
        face_edges: Vec<[usize; 3]>,
    ) -> Self {
        let edge_index = edges
            .iter()
            .enumerate()
            .map(|(i, edge)| {
                let [a, b] = edge.vertices;
                ((a.min(b), a.max(b)), i)
            })
            .collect();
        Self {
            face_normals: vec![Vector3::zeros(); faces.len()],
            edge_normals: vec![Vector3::zeros(); edges.len()],
            vertex_normals: vec![Vector3::zeros(); vertices.len()],
            vertices,
            faces,
            edges,
            face_edges,
            edge_index,
            bvh: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Undirected edge lookup
    pub fn find_edge(&self, a: usize, b: usize) -> Option<usize> {
        self.edge_index.get(&(a.min(b), a.max(b))).copied()
    }

    /// Corners of `face` and its edge vectors from vertex 0
    pub fn triangle(&self, face: usize) -> TriangleFrame {
        let [i0, i1, i2] = self.faces[face];
        let v0 = self.vertices[i0];
        let v1 = self.vertices[i1];
        let v2 = self.vertices[i2];
        (v0, v1, v2, v1 - v0, v2 - v0)
    }

    /// Re-emit the surface as triangle soup.
    pub fn to_facets(&self) -> Vec<Facet> {
        self.faces
            .iter()
            .zip(&self.face_normals)
            .map(|(&[a, b, c], normal)| {
                Facet::new(*normal, [self.vertices[a], self.vertices[b], self.vertices[c]])
            })
            .collect()
    }

    /// Build the face BVH used by closest-face queries.
    pub fn build_index(&mut self) {
        self.bvh = Some(FaceBvh::build(self));
    }

    /// Drop the face BVH; queries fall back to a linear scan.
    pub fn invalidate_index(&mut self) {
        self.bvh = None;
    }

    pub fn has_index(&self) -> bool {
        self.bvh.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{polyhedron_properties, CollapsedDimension, Primitive};
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_topology() {
        let facets = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), true).to_facets();
        let poly = Polyhedron::from_facets(facets).unwrap();
        assert_eq!(poly.vertex_count(), 8);
        assert_eq!(poly.face_count(), 12);
        assert_eq!(poly.edge_count(), 18);
        // Euler characteristic of a sphere-like surface
        let chi = poly.vertex_count() as i64 - poly.edge_count() as i64 + poly.face_count() as i64;
        assert_eq!(chi, 2);
        assert!(poly.edges.iter().all(|edge| edge.right.is_some()));
    }

    #[test]
    fn test_icosphere_welds_shared_vertices() {
        let facets = Primitive::icosphere(1.0, 2).to_facets();
        let poly = Polyhedron::from_facets(facets).unwrap();
        assert_eq!(poly.face_count(), 320);
        assert_eq!(poly.vertex_count(), 162);
        assert_eq!(poly.edge_count(), 480);
    }

    #[test]
    fn test_open_mesh_is_rejected() {
        let mut facets = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), true).to_facets();
        facets.pop();
        let err = Polyhedron::from_facets(facets).unwrap_err();
        assert!(matches!(err, GeometryError::MalformedMesh { open_edges: 3, .. }));
    }

    #[test]
    fn test_empty_facets_are_rejected() {
        assert_eq!(Polyhedron::from_facets(Vec::new()).unwrap_err(), GeometryError::EmptyMesh);
        let p = Point3::new(1.0, 2.0, 3.0);
        let point_like = vec![Facet::new(Vector3::zeros(), [p, p, p])];
        assert_eq!(Polyhedron::from_facets(point_like).unwrap_err(), GeometryError::EmptyMesh);
    }

    #[test]
    fn test_facets_with_welded_corners_are_dropped() {
        let mut facets = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), true).to_facets();
        let p = facets[0].vertices[0];
        let q = facets[0].vertices[1];
        facets.push(Facet::new(Vector3::zeros(), [p, p, q]));
        // Within welding tolerance of p
        facets.insert(3, Facet::new(Vector3::zeros(), [q, p + Vector3::new(1e-12, 0.0, 0.0), p]));

        let mut poly = Polyhedron::from_facets(facets).unwrap();
        assert_eq!(poly.face_count(), 12);
        assert_eq!(poly.vertex_count(), 8);
        assert_eq!(poly.edge_count(), 18);
        let props = polyhedron_properties(&mut poly, CollapsedDimension::None);
        assert_relative_eq!(props.volume, 1.0, epsilon = 1e-12);
        assert_relative_eq!(props.area, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_find_edge_matches_face_edges() {
        let facets = Primitive::cube(Vector3::new(2.0, 2.0, 2.0), false).to_facets();
        let poly = Polyhedron::from_facets(facets).unwrap();
        for (face, sides) in poly.faces.iter().zip(&poly.face_edges) {
            assert_eq!(poly.find_edge(face[0], face[1]), Some(sides[0]));
            assert_eq!(poly.find_edge(face[2], face[1]), Some(sides[1]));
            assert_eq!(poly.find_edge(face[0], face[2]), Some(sides[2]));
        }
        assert_eq!(poly.find_edge(0, 0), None);
    }
}
