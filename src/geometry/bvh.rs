// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Bounding Volume Hierarchy (BVH) over polyhedron faces
//! Used to accelerate closest-face queries without changing their result

use super::distance::{point_triangle_distance, TriangleProjection};
use super::{BoundingBox, Polyhedron};
use nalgebra::Point3;

/// BVH node
#[derive(Debug, Clone)]
pub struct BVHNode {
    /// Bounding box of this node
    pub bbox: BoundingBox,
    /// Children (None for leaf)
    pub children: Option<Box<(BVHNode, BVHNode)>>,
    /// Face indices (only for leaf nodes)
    pub face_indices: Vec<usize>,
}

impl BVHNode {
    fn leaf(bbox: BoundingBox, face_indices: Vec<usize>) -> Self {
        Self {
            bbox,
            children: None,
            face_indices,
        }
    }

    fn internal(left: BVHNode, right: BVHNode) -> Self {
        Self {
            bbox: left.bbox.union(&right.bbox),
            children: Some(Box::new((left, right))),
            face_indices: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Best face found so far during a nearest query
#[derive(Debug, Clone, Copy)]
pub(crate) struct Nearest {
    pub face: usize,
    pub projection: TriangleProjection,
}

impl Nearest {
    /// Strictly closer, or equally close with a lower face id
    fn improves_on(&self, other: &Option<Nearest>) -> bool {
        match other {
            None => true,
            Some(best) => {
                let (d, best_d) = (self.projection.distance_squared, best.projection.distance_squared);
                d < best_d || (d == best_d && self.face < best.face)
            }
        }
    }
}

/// Bounding Volume Hierarchy for polyhedron faces
#[derive(Debug, Clone)]
pub struct FaceBvh {
    root: BVHNode,
}

impl FaceBvh {
    const MAX_DEPTH: usize = 32;
    const MIN_FACES: usize = 4;

    /// Build BVH from the faces of `poly`
    pub fn build(poly: &Polyhedron) -> Self {
        let faces: Vec<(usize, BoundingBox)> = poly
            .faces
            .iter()
            .enumerate()
            .map(|(index, face)| {
                let bbox = BoundingBox::from_points(face.iter().map(|&v| &poly.vertices[v]));
                (index, bbox)
            })
            .collect();

        if faces.is_empty() {
            return Self {
                root: BVHNode::leaf(BoundingBox::empty(), Vec::new()),
            };
        }

        Self {
            root: Self::build_recursive(faces, 0),
        }
    }

    fn build_recursive(mut faces: Vec<(usize, BoundingBox)>, depth: usize) -> BVHNode {
        let bbox = faces
            .iter()
            .fold(BoundingBox::empty(), |acc, (_, b)| acc.union(b));

        if faces.len() <= Self::MIN_FACES || depth >= Self::MAX_DEPTH {
            let indices = faces.iter().map(|(index, _)| *index).collect();
            return BVHNode::leaf(bbox, indices);
        }

        // Median split along the longest axis
        let axis = bbox.longest_axis();
        faces.sort_by(|(_, a), (_, b)| a.center()[axis].total_cmp(&b.center()[axis]));
        let right = faces.split_off(faces.len() / 2);

        BVHNode::internal(
            Self::build_recursive(faces, depth + 1),
            Self::build_recursive(right, depth + 1),
        )
    }

    /// Closest face to `point`; ties resolve to the lowest face id, as a
    /// linear scan would.
    pub(crate) fn nearest(&self, poly: &Polyhedron, point: &Point3<f64>) -> Option<Nearest> {
        let mut best = None;
        Self::nearest_recursive(&self.root, poly, point, &mut best);
        best
    }

    fn nearest_recursive(
        node: &BVHNode,
        poly: &Polyhedron,
        point: &Point3<f64>,
        best: &mut Option<Nearest>,
    ) {
        if let Some(current) = best {
            // Equal distance may still hide a lower face id
            if node.bbox.distance_squared(point) > current.projection.distance_squared {
                return;
            }
        }

        match &node.children {
            None => {
                for &face in &node.face_indices {
                    let (v0, _, _, e01, e02) = poly.triangle(face);
                    let candidate = Nearest {
                        face,
                        projection: point_triangle_distance(point, &v0, &e01, &e02),
                    };
                    if candidate.improves_on(best) {
                        *best = Some(candidate);
                    }
                }
            }
            Some(children) => {
                let (left, right) = (&children.0, &children.1);
                // Visit the nearer child first to tighten the bound early
                if left.bbox.distance_squared(point) <= right.bbox.distance_squared(point) {
                    Self::nearest_recursive(left, poly, point, best);
                    Self::nearest_recursive(right, poly, point, best);
                } else {
                    Self::nearest_recursive(right, poly, point, best);
                    Self::nearest_recursive(left, poly, point, best);
                }
            }
        }
    }

    pub fn root(&self) -> &BVHNode {
        &self.root
    }
}
