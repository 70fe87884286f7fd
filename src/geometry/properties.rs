// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Integral properties of solids
//!
//! Polyhedra are integrated over their surface with the divergence theorem
//! (Gelder, "Efficient computation of polygon area and polyhedron volume";
//! Eberly, "Polyhedral mass properties (revisited)"). Vertex normals are
//! angle-weighted pseudonormals (Bærentzen & Aanæs, "Signed distance
//! computation using the angle weighted pseudonormal").
//!
//! Inertia is volume-scaled: multiply by density for mass inertia.

use super::{BoundingBox, Polyhedron};
use nalgebra::{Matrix3, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Which space dimension, if any, the simulation has collapsed.
///
/// A collapsed run treats every solid as a unit-thickness extrusion along
/// the collapsed axis: `area` is the side area and `volume` the slab volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollapsedDimension {
    #[default]
    None,
    X,
    Y,
    Z,
}

impl CollapsedDimension {
    pub fn is_collapsed(self) -> bool {
        self != Self::None
    }

    pub fn axis(self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::X => Some(0),
            Self::Y => Some(1),
            Self::Z => Some(2),
        }
    }
}

impl std::str::FromStr for CollapsedDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            other => Err(format!("unknown collapsed dimension: {}", other)),
        }
    }
}

/// Result of a property pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub area: f64,
    pub volume: f64,
    pub centroid: Point3<f64>,
    /// Symmetric, about the centroid
    pub inertia: Matrix3<f64>,
    pub bounding_box: BoundingBox,
    /// Sphere radius, or the bounding-box diagonal of a polyhedron
    pub radius: f64,
}

/// Closed-form properties of an analytical sphere, or of a unit-thickness
/// cylinder when a dimension is collapsed.
pub fn sphere_properties(
    origin: &Point3<f64>,
    radius: f64,
    collapse: CollapsedDimension,
) -> MassProperties {
    let r2 = radius * radius;
    let (area, volume, factor) = if collapse.is_collapsed() {
        (2.0 * PI * radius, PI * r2, 0.5 * r2)
    } else {
        (4.0 * PI * r2, 4.0 * PI * r2 * radius / 3.0, 0.4 * r2)
    };

    MassProperties {
        area,
        volume,
        centroid: *origin,
        inertia: Matrix3::from_diagonal_element(factor * volume),
        bounding_box: BoundingBox::around(origin, radius),
        radius,
    }
}

/// Integrate a closed polyhedron and refresh its face, edge and vertex
/// normals in place.
pub fn polyhedron_properties(poly: &mut Polyhedron, collapse: CollapsedDimension) -> MassProperties {
    let mut area = 0.0;
    let mut volume = 0.0;
    let mut moment = Vector3::zeros();
    // xx, yy, zz, xy, yz, zx
    let mut second = [0.0_f64; 6];
    let mut degenerate = 0usize;

    poly.vertex_normals.iter_mut().for_each(|n| *n = Vector3::zeros());

    for face in 0..poly.faces.len() {
        let (v0, v1, v2, e01, e02) = poly.triangle(face);
        let normal = e01.cross(&e02);

        let mut f0 = [0.0; 3];
        let mut f1 = [0.0; 3];
        let mut f2 = [0.0; 3];
        let mut g0 = [0.0; 3];
        let mut g1 = [0.0; 3];
        let mut g2 = [0.0; 3];
        for s in 0..3 {
            let w0 = v0[s];
            let w1 = v1[s];
            let w2 = v2[s];
            let tmp0 = w0 + w1;
            f0[s] = tmp0 + w2;
            let tmp1 = w0 * w0;
            let tmp2 = tmp1 + w1 * tmp0;
            f1[s] = tmp2 + w2 * f0[s];
            f2[s] = w0 * tmp1 + w1 * tmp2 + w2 * f1[s];
            g0[s] = f1[s] + w0 * (f0[s] + w0);
            g1[s] = f1[s] + w1 * (f0[s] + w1);
            g2[s] = f1[s] + w2 * (f0[s] + w2);
        }

        let twice_area = normal.norm();
        area += twice_area;
        volume += normal.x * f0[0];
        moment.x += normal.x * f1[0];
        moment.y += normal.y * f1[1];
        moment.z += normal.z * f1[2];
        second[0] += normal.x * f2[0];
        second[1] += normal.y * f2[1];
        second[2] += normal.z * f2[2];
        second[3] += normal.x * (v0.y * g0[0] + v1.y * g1[0] + v2.y * g2[0]);
        second[4] += normal.y * (v0.z * g0[1] + v1.z * g1[1] + v2.z * g2[1]);
        second[5] += normal.z * (v0.x * g0[2] + v1.x * g1[2] + v2.x * g2[2]);

        if twice_area == 0.0 {
            degenerate += 1;
            poly.face_normals[face] = Vector3::zeros();
            continue;
        }
        let unit = normal / twice_area;

        // Interior angles by the law of cosines
        let e12 = v2 - v1;
        let l01 = e01.norm_squared();
        let l02 = e02.norm_squared();
        let l12 = e12.norm_squared();
        let angle0 = ((l01 + l02 - l12) / (2.0 * (l01 * l02).sqrt())).clamp(-1.0, 1.0).acos();
        let angle1 = ((l01 + l12 - l02) / (2.0 * (l01 * l12).sqrt())).clamp(-1.0, 1.0).acos();
        let angle2 = PI - angle0 - angle1;

        let [i0, i1, i2] = poly.faces[face];
        poly.vertex_normals[i0] += unit * angle0;
        poly.vertex_normals[i1] += unit * angle1;
        poly.vertex_normals[i2] += unit * angle2;
        poly.face_normals[face] = unit;
    }

    if degenerate > 0 {
        tracing::warn!(degenerate, "polyhedron has zero-area faces");
    }

    area *= 0.5;
    volume /= 6.0;
    moment /= 24.0;
    for value in &mut second[..3] {
        *value /= 60.0;
    }
    for value in &mut second[3..] {
        *value /= 120.0;
    }

    let centroid = if volume != 0.0 {
        Point3::from(moment / volume)
    } else {
        Point3::origin()
    };
    let o = centroid;

    // Shift from the integration origin to the centroid
    let ixx = second[1] + second[2] - volume * (o.y * o.y + o.z * o.z);
    let iyy = second[0] + second[2] - volume * (o.z * o.z + o.x * o.x);
    let izz = second[0] + second[1] - volume * (o.x * o.x + o.y * o.y);
    let ixy = -second[3] + volume * o.x * o.y;
    let iyz = -second[4] + volume * o.y * o.z;
    let izx = -second[5] + volume * o.z * o.x;
    let inertia = Matrix3::new(
        ixx, ixy, izx, //
        ixy, iyy, iyz, //
        izx, iyz, izz,
    );

    for normal in &mut poly.vertex_normals {
        if let Some(unit) = normal.try_normalize(0.0) {
            *normal = unit;
        }
    }
    for (edge, normal) in poly.edges.iter().zip(poly.edge_normals.iter_mut()) {
        let right = edge.right.map_or_else(Vector3::zeros, |f| poly.face_normals[f]);
        let sum = poly.face_normals[edge.left] + right;
        *normal = sum.try_normalize(0.0).unwrap_or(sum);
    }

    let bounding_box = BoundingBox::from_points(&poly.vertices);
    let area = if collapse.is_collapsed() {
        area - 2.0 * volume
    } else {
        area
    };

    tracing::debug!(area, volume, "integrated polyhedron properties");

    MassProperties {
        area,
        volume,
        centroid,
        inertia,
        bounding_box,
        radius: bounding_box.diagonal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Facet, Primitive};
    use approx::assert_relative_eq;

    fn cube(edge: f64, center: bool) -> Polyhedron {
        let facets = Primitive::cube(Vector3::repeat(edge), center).to_facets();
        Polyhedron::from_facets(facets).unwrap()
    }

    #[test]
    fn test_sphere_properties() {
        let props = sphere_properties(&Point3::new(1.0, 2.0, 3.0), 2.0, CollapsedDimension::None);
        assert_relative_eq!(props.area, 16.0 * PI, epsilon = 1e-12);
        assert_relative_eq!(props.volume, 32.0 * PI / 3.0, epsilon = 1e-12);
        assert_relative_eq!(props.inertia[(0, 0)], 0.4 * 4.0 * props.volume, epsilon = 1e-12);
        assert_eq!(props.inertia[(0, 1)], 0.0);
        assert_eq!(props.bounding_box.min, Point3::new(-1.0, 0.0, 1.0));
        assert_eq!(props.bounding_box.max, Point3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_collapsed_sphere_is_unit_cylinder() {
        let props = sphere_properties(&Point3::origin(), 2.0, CollapsedDimension::Z);
        assert_relative_eq!(props.area, 4.0 * PI, epsilon = 1e-12);
        assert_relative_eq!(props.volume, 4.0 * PI, epsilon = 1e-12);
        assert_relative_eq!(props.inertia[(2, 2)], 0.5 * 4.0 * 4.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_cube_properties() {
        let mut poly = cube(2.0, false);
        let props = polyhedron_properties(&mut poly, CollapsedDimension::None);
        assert_relative_eq!(props.area, 24.0, epsilon = 1e-12);
        assert_relative_eq!(props.volume, 8.0, epsilon = 1e-12);
        assert_relative_eq!(props.centroid, Point3::new(1.0, 1.0, 1.0), epsilon = 1e-12);

        // Solid cube about its centre: V * (a² + a²) / 12
        let expected = 8.0 * (4.0 + 4.0) / 12.0;
        for i in 0..3 {
            assert_relative_eq!(props.inertia[(i, i)], expected, epsilon = 1e-10);
            for j in 0..3 {
                if i != j {
                    assert_relative_eq!(props.inertia[(i, j)], 0.0, epsilon = 1e-10);
                }
            }
        }
        assert_relative_eq!(props.radius, 12.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_box_products_of_inertia_shift() {
        // An off-centre box still has a diagonal tensor about its centroid
        let facets: Vec<_> = Primitive::cube(Vector3::new(1.0, 2.0, 3.0), false)
            .to_facets()
            .into_iter()
            .map(|mut facet| {
                for v in &mut facet.vertices {
                    *v += Vector3::new(5.0, -3.0, 7.0);
                }
                facet
            })
            .collect();
        let mut poly = Polyhedron::from_facets(facets).unwrap();
        let props = polyhedron_properties(&mut poly, CollapsedDimension::None);
        assert_relative_eq!(props.volume, 6.0, epsilon = 1e-10);
        assert_relative_eq!(props.centroid, Point3::new(5.5, -2.0, 8.5), epsilon = 1e-10);
        assert_relative_eq!(props.inertia[(0, 0)], 6.0 * (4.0 + 9.0) / 12.0, epsilon = 1e-9);
        assert_relative_eq!(props.inertia[(1, 1)], 6.0 * (1.0 + 9.0) / 12.0, epsilon = 1e-9);
        assert_relative_eq!(props.inertia[(2, 2)], 6.0 * (1.0 + 4.0) / 12.0, epsilon = 1e-9);
        assert_relative_eq!(props.inertia[(0, 1)], 0.0, epsilon = 1e-9);
        assert_relative_eq!(props.inertia[(1, 2)], 0.0, epsilon = 1e-9);
        assert_relative_eq!(props.inertia[(0, 2)], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_collapsed_cube_reports_side_area() {
        let mut poly = cube(1.0, true);
        let props = polyhedron_properties(&mut poly, CollapsedDimension::Z);
        // Unit slab with a unit square section: perimeter 4
        assert_relative_eq!(props.area, 4.0, epsilon = 1e-12);
        assert_relative_eq!(props.volume, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cube_normals() {
        let mut poly = cube(1.0, true);
        polyhedron_properties(&mut poly, CollapsedDimension::None);
        for normal in &poly.face_normals {
            assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-12);
        }
        // Corner pseudonormals point along the diagonals
        for (v, n) in poly.vertices.iter().zip(&poly.vertex_normals) {
            let expected = v.coords.normalize();
            assert_relative_eq!(*n, expected, epsilon = 1e-12);
        }
        // Every edge normal bisects its two faces
        for (edge, n) in poly.edges.iter().zip(&poly.edge_normals) {
            let mid = (poly.vertices[edge.vertices[0]].coords + poly.vertices[edge.vertices[1]].coords) * 0.5;
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
            assert!(n.dot(&mid) > 0.0);
        }
    }

    /// Unit cube whose top face carries a T-junction at the midpoint of its
    /// front edge, closed by a zero-area sliver.
    fn cube_with_sliver() -> (Polyhedron, usize) {
        let mut facets: Vec<Facet> = Primitive::cube(Vector3::repeat(1.0), true)
            .to_facets()
            .into_iter()
            .filter(|facet| facet.vertices.iter().any(|v| v.z < 0.5))
            .collect();
        assert_eq!(facets.len(), 10);

        let a = Point3::new(-0.5, -0.5, 0.5);
        let b = Point3::new(0.5, -0.5, 0.5);
        let c = Point3::new(0.5, 0.5, 0.5);
        let d = Point3::new(-0.5, 0.5, 0.5);
        let m = Point3::new(0.0, -0.5, 0.5);
        facets.push(Facet::from_vertices(a, m, d));
        facets.push(Facet::from_vertices(m, c, d));
        facets.push(Facet::from_vertices(m, b, c));
        facets.push(Facet::from_vertices(b, m, a));
        let sliver = facets.len() - 1;

        (Polyhedron::from_facets(facets).unwrap(), sliver)
    }

    #[test]
    fn test_zero_area_face_keeps_normals_finite() {
        let (mut poly, sliver) = cube_with_sliver();
        assert_eq!(poly.face_count(), 14);
        let props = polyhedron_properties(&mut poly, CollapsedDimension::None);

        assert_relative_eq!(props.volume, 1.0, epsilon = 1e-12);
        assert_relative_eq!(props.area, 6.0, epsilon = 1e-12);
        assert_relative_eq!(props.centroid, Point3::origin(), epsilon = 1e-12);
        assert_eq!(poly.face_normals[sliver], Vector3::zeros());
        for normal in poly.vertex_normals.iter().chain(&poly.edge_normals) {
            assert!(normal.iter().all(|c| c.is_finite()));
            assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_area_face_classification_at_crease() {
        let (mut poly, _) = cube_with_sliver();
        polyhedron_properties(&mut poly, CollapsedDimension::None);
        assert!(!poly.is_point_inside(&Point3::new(0.0, -0.6, 0.6)));
        assert!(poly.is_point_inside(&Point3::new(0.0, -0.45, 0.45)));
        assert!(!poly.is_point_inside(&Point3::new(0.0, -0.5001, 0.5001)));
        assert!(poly.is_point_inside(&Point3::new(0.2, 0.1, 0.3)));
    }

    #[test]
    fn test_icosphere_converges_to_sphere() {
        let exact_area = 4.0 * PI;
        let exact_volume = 4.0 * PI / 3.0;
        let mut previous = f64::MAX;
        for level in 1..=4 {
            let facets = Primitive::icosphere(1.0, level).to_facets();
            let mut poly = Polyhedron::from_facets(facets).unwrap();
            let props = polyhedron_properties(&mut poly, CollapsedDimension::None);
            let error = ((props.area - exact_area) / exact_area).abs()
                + ((props.volume - exact_volume) / exact_volume).abs();
            assert!(error < previous, "refinement {} did not tighten: {}", level, error);
            previous = error;
            assert_relative_eq!(props.centroid, Point3::origin(), epsilon = 1e-12);
        }
        assert!(previous < 0.01);
    }

    #[test]
    fn test_collapsed_dimension_parsing() {
        assert_eq!("z".parse::<CollapsedDimension>().unwrap(), CollapsedDimension::Z);
        assert_eq!("None".parse::<CollapsedDimension>().unwrap(), CollapsedDimension::None);
        assert!("w".parse::<CollapsedDimension>().is_err());
        assert_eq!(CollapsedDimension::Y.axis(), Some(1));
    }
}
