// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Integral property verification tests

use approx::assert_relative_eq;
use ibgeom::geometry::{
    compute_geometry_parameters, sphere_properties, CollapsedDimension, Primitive, Solid,
};
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;

fn relative_error(value: f64, expected: f64) -> f64 {
    ((value - expected) / expected).abs()
}

#[test]
fn test_icosphere_approaches_analytical_sphere() {
    let radius = 2.5;
    let exact = sphere_properties(&Point3::origin(), radius, CollapsedDimension::None);

    let mut previous = (f64::MAX, f64::MAX);
    for subdivisions in 1..=4 {
        let facets = Primitive::icosphere(radius, subdivisions).to_facets();
        let solid = Solid::polyhedron(facets, CollapsedDimension::None).unwrap();
        let errors = (
            relative_error(solid.area, exact.area),
            relative_error(solid.volume, exact.volume),
        );
        println!(
            "icosphere({}): area error {:.2e}, volume error {:.2e}",
            subdivisions, errors.0, errors.1
        );
        assert!(errors.0 < previous.0);
        assert!(errors.1 < previous.1);
        // Inscribed: never larger than the sphere
        assert!(solid.volume < exact.volume);
        previous = errors;
    }
    assert!(previous.0 < 5e-3);
    assert!(previous.1 < 5e-3);
}

#[test]
fn test_uv_sphere_inertia_is_isotropic() {
    let facets = Primitive::uv_sphere(1.0, 48).to_facets();
    let solid = Solid::polyhedron(facets, CollapsedDimension::None).unwrap();
    let exact = 0.4 * solid.volume;
    for axis in 0..3 {
        assert_relative_eq!(solid.inertia[(axis, axis)], exact, max_relative = 0.02);
    }
    assert_relative_eq!(solid.origin, Point3::origin(), epsilon = 1e-9);
}

#[test]
fn test_offset_box_properties() {
    let facets = Primitive::cube(Vector3::new(2.0, 4.0, 6.0), false).to_facets();
    let solid = Solid::polyhedron(facets, CollapsedDimension::None).unwrap();
    assert_relative_eq!(solid.volume, 48.0, epsilon = 1e-10);
    assert_relative_eq!(solid.area, 2.0 * (8.0 + 12.0 + 24.0), epsilon = 1e-10);
    assert_relative_eq!(solid.origin, Point3::new(1.0, 2.0, 3.0), epsilon = 1e-12);
    assert_relative_eq!(solid.inertia[(0, 0)], 48.0 * (16.0 + 36.0) / 12.0, epsilon = 1e-9);
    assert_relative_eq!(solid.inertia[(1, 1)], 48.0 * (4.0 + 36.0) / 12.0, epsilon = 1e-9);
    assert_relative_eq!(solid.inertia[(2, 2)], 48.0 * (4.0 + 16.0) / 12.0, epsilon = 1e-9);
    assert_relative_eq!(solid.radius, (4.0_f64 + 16.0 + 36.0).sqrt(), epsilon = 1e-12);
}

#[test]
fn test_collapsed_configuration() {
    let facets = Primitive::cube(Vector3::new(3.0, 2.0, 1.0), true).to_facets();
    let mut solids = vec![
        Solid::sphere(Point3::origin(), 1.5, CollapsedDimension::None),
        Solid::polyhedron(facets, CollapsedDimension::None).unwrap(),
    ];
    compute_geometry_parameters(CollapsedDimension::Z, &mut solids);

    // Unit-thickness cylinder
    assert_relative_eq!(solids[0].area, 3.0 * PI, epsilon = 1e-12);
    assert_relative_eq!(solids[0].volume, 2.25 * PI, epsilon = 1e-12);
    assert_relative_eq!(solids[0].inertia[(0, 0)], 0.5 * 2.25 * solids[0].volume, epsilon = 1e-12);

    // Unit-thickness rectangle: side area is the perimeter
    assert_relative_eq!(solids[1].area, 10.0, epsilon = 1e-12);
    assert_relative_eq!(solids[1].volume, 6.0, epsilon = 1e-12);
}

#[test]
fn test_normals_are_outward_and_unit() {
    let facets = Primitive::icosphere(1.0, 2).to_facets();
    let solid = Solid::polyhedron(facets, CollapsedDimension::None).unwrap();
    let poly = solid.polyhedron_ref().unwrap();

    for (face, normal) in poly.face_normals.iter().enumerate() {
        let (v0, v1, v2, _, _) = poly.triangle(face);
        let centre = (v0.coords + v1.coords + v2.coords) / 3.0;
        assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-12);
        assert!(normal.dot(&centre) > 0.0);
    }
    for (vertex, normal) in poly.vertices.iter().zip(&poly.vertex_normals) {
        assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-12);
        // Close to radial on a fine sphere
        assert!(normal.dot(&vertex.coords.normalize()) > 0.99);
    }
    for normal in &poly.edge_normals {
        assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-12);
    }
}
