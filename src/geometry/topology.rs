// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vertex welding and edge adjacency for facet soups
//!
//! Vertices are merged when every component agrees within a small
//! absolute/relative tolerance; the first inserted vertex keeps its id.
//! Edges are undirected and record the face that discovered them plus the
//! face that closed them.

use crate::error::{GeometryError, Result};
use ahash::AHashMap;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Component tolerance used when welding vertices
pub const VERTEX_TOLERANCE: f64 = 1e-10;

/// Initial side length of a welding grid cell
const WELD_CELL: f64 = 1e-6;

/// Undirected edge with its incident faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub vertices: [usize; 2],
    /// Face that first walked this edge
    pub left: usize,
    /// Face that walked it back; `None` on an open boundary
    pub right: Option<usize>,
}

impl Edge {
    pub fn connects(&self, a: usize, b: usize) -> bool {
        (self.vertices[0] == a && self.vertices[1] == b)
            || (self.vertices[0] == b && self.vertices[1] == a)
    }
}

/// Component-wise equality within [`VERTEX_TOLERANCE`], scaled by magnitude
/// once coordinates exceed one.
pub fn approx_equal(a: &Point3<f64>, b: &Point3<f64>) -> bool {
    (0..3).all(|axis| {
        let scale = 1.0_f64.max(a[axis].abs()).max(b[axis].abs());
        (a[axis] - b[axis]).abs() <= VERTEX_TOLERANCE * scale
    })
}

type CellKey = (i64, i64, i64);

fn cell_key(point: &Point3<f64>, cell: f64) -> CellKey {
    (
        (point.x / cell).floor() as i64,
        (point.y / cell).floor() as i64,
        (point.z / cell).floor() as i64,
    )
}

/// Largest per-component distance at which `point` can still weld
fn weld_reach(point: &Point3<f64>) -> f64 {
    VERTEX_TOLERANCE * 1.0_f64.max(point.coords.amax())
}

fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Incremental builder that turns triangle soup into indexed topology.
///
/// The welding grid cell doubles whenever a vertex arrives whose tolerance
/// reach would span more than half a cell, so neighbouring cells always
/// cover every candidate.
#[derive(Debug)]
pub struct TopologyBuilder {
    vertices: Vec<Point3<f64>>,
    faces: Vec<[usize; 3]>,
    edges: Vec<Edge>,
    cell: f64,
    grid: AHashMap<CellKey, Vec<usize>>,
    edge_index: AHashMap<(usize, usize), usize>,
    non_manifold: Vec<usize>,
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            edges: Vec::new(),
            cell: WELD_CELL,
            grid: AHashMap::new(),
            edge_index: AHashMap::new(),
            non_manifold: Vec::new(),
        }
    }
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(face_count / 2 + 3),
            faces: Vec::with_capacity(face_count),
            edges: Vec::with_capacity(face_count * 3 / 2 + 1),
            ..Self::default()
        }
    }

    /// Return the id of a vertex equal to `point`, inserting it if new.
    pub fn add_vertex(&mut self, point: Point3<f64>) -> usize {
        self.fit_cell(weld_reach(&point));
        if let Some(existing) = self.find_vertex(&point) {
            return existing;
        }
        let index = self.vertices.len();
        self.vertices.push(point);
        let key = self.cell_of(&point);
        self.grid.entry(key).or_default().push(index);
        index
    }

    /// Lowest vertex id equal to `point`, if any.
    pub fn find_vertex(&self, point: &Point3<f64>) -> Option<usize> {
        if 2.0 * weld_reach(point) > self.cell {
            // Grid not yet grown for this magnitude; neighbours are not enough.
            return self.vertices.iter().position(|v| approx_equal(v, point));
        }

        let (cx, cy, cz) = self.cell_of(point);
        let mut best: Option<usize> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &candidate in bucket {
                        if best.is_some_and(|b| b <= candidate) {
                            continue;
                        }
                        if approx_equal(&self.vertices[candidate], point) {
                            best = Some(candidate);
                        }
                    }
                }
            }
        }
        best
    }

    /// Current side length of a welding grid cell
    pub fn cell_size(&self) -> f64 {
        self.cell
    }

    fn cell_of(&self, point: &Point3<f64>) -> CellKey {
        cell_key(point, self.cell)
    }

    /// Grow the cell until it spans twice `reach`, rehashing every vertex.
    fn fit_cell(&mut self, reach: f64) {
        // Non-finite coordinates take the linear scan in `find_vertex`
        if !reach.is_finite() || 2.0 * reach <= self.cell {
            return;
        }
        while 2.0 * reach > self.cell {
            self.cell *= 2.0;
        }
        self.grid.clear();
        for (index, vertex) in self.vertices.iter().enumerate() {
            self.grid.entry(cell_key(vertex, self.cell)).or_default().push(index);
        }
        tracing::trace!(cell = self.cell, vertices = self.vertices.len(), "regrew welding grid");
    }

    /// Forget vertices from `len` on.
    fn truncate_vertices(&mut self, len: usize) {
        for index in len..self.vertices.len() {
            let key = self.cell_of(&self.vertices[index]);
            if let Some(bucket) = self.grid.get_mut(&key) {
                bucket.retain(|&candidate| candidate != index);
            }
        }
        self.vertices.truncate(len);
    }

    /// Record that `face` walks the edge `a`-`b`.
    pub fn add_edge(&mut self, a: usize, b: usize, face: usize) {
        let key = edge_key(a, b);
        if let Some(index) = self.edge_index.get(&key).copied() {
            if self.edges[index].right.is_some() {
                self.non_manifold.push(index);
            }
            self.edges[index].right = Some(face);
            return;
        }
        self.edge_index.insert(key, self.edges.len());
        self.edges.push(Edge {
            vertices: [a, b],
            left: face,
            right: None,
        });
    }

    /// Undirected lookup of the edge joining `a` and `b`.
    pub fn find_edge(&self, a: usize, b: usize) -> Option<usize> {
        self.edge_index.get(&edge_key(a, b)).copied()
    }

    /// Weld one triangle and register its three sides.
    ///
    /// Returns `None`, and keeps no vertex it introduced, when two corners
    /// weld to the same vertex.
    pub fn add_triangle(
        &mut self,
        v0: Point3<f64>,
        v1: Point3<f64>,
        v2: Point3<f64>,
    ) -> Option<usize> {
        let vertex_count = self.vertices.len();
        let ids = [self.add_vertex(v0), self.add_vertex(v1), self.add_vertex(v2)];
        if ids[0] == ids[1] || ids[1] == ids[2] || ids[2] == ids[0] {
            self.truncate_vertices(vertex_count);
            return None;
        }

        let face = self.faces.len();
        self.faces.push(ids);
        self.add_edge(ids[0], ids[1], face);
        self.add_edge(ids[1], ids[2], face);
        self.add_edge(ids[2], ids[0], face);
        Some(face)
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges that only one face has walked
    pub fn open_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|edge| edge.right.is_none())
    }

    /// Check that every edge is shared by exactly two faces.
    pub fn validate(&self) -> Result<()> {
        let open: Vec<&Edge> = self.open_edges().collect();
        if open.is_empty() && self.non_manifold.is_empty() {
            return Ok(());
        }
        let first = open
            .first()
            .map(|edge| edge.vertices)
            .or_else(|| self.non_manifold.first().map(|&i| self.edges[i].vertices))
            .unwrap_or([0, 0]);
        Err(GeometryError::MalformedMesh {
            open_edges: open.len(),
            non_manifold_edges: self.non_manifold.len(),
            first: (first[0], first[1]),
        })
    }

    /// Per-face edge ids, sides ordered (v0,v1), (v1,v2), (v2,v0).
    pub fn face_edges(&self) -> Result<Vec<[usize; 3]>> {
        self.faces
            .iter()
            .map(|&[a, b, c]| {
                let side = |p: usize, q: usize| {
                    self.find_edge(p, q)
                        .ok_or(GeometryError::EdgeNotFound { a: p, b: q })
                };
                Ok([side(a, b)?, side(b, c)?, side(c, a)?])
            })
            .collect()
    }

    /// Release the welded arrays.
    pub fn into_parts(self) -> (Vec<Point3<f64>>, Vec<[usize; 3]>, Vec<Edge>) {
        (self.vertices, self.faces, self.edges)
    }
}
