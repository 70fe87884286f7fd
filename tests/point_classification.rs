// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Inside/outside and closest-point query tests

use ibgeom::classify::{cell_centres, classify_points, PointClass};
use ibgeom::geometry::{
    BoundingBox, CollapsedDimension, Primitive, RigidTransform, Solid, SurfaceFeature,
};
use nalgebra::{Point3, Vector3};
use std::f64::consts::FRAC_PI_4;

fn unit_cube() -> Solid {
    let facets = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), true).to_facets();
    Solid::polyhedron(facets, CollapsedDimension::None).unwrap()
}

fn grid(half: f64, n: usize) -> Vec<Point3<f64>> {
    let domain = BoundingBox::new(Point3::new(-half, -half, -half), Point3::new(half, half, half));
    cell_centres(&domain, [n, n, n])
}

#[test]
fn test_unit_cube_reference_points() {
    let cube = unit_cube();
    assert!(cube.is_point_inside(&Point3::new(0.0, 0.0, 0.0)));
    assert!(!cube.is_point_inside(&Point3::new(2.0, 0.0, 0.0)));
    assert!(cube.is_point_inside(&Point3::new(0.5, 0.0, 0.0)));
}

#[test]
fn test_cube_grid_matches_box_test() {
    let cube = unit_cube();
    for p in grid(1.0, 17) {
        let expected = p.x.abs() <= 0.5 && p.y.abs() <= 0.5 && p.z.abs() <= 0.5;
        assert_eq!(cube.is_point_inside(&p), expected, "point {:?}", p);
    }
}

#[test]
fn test_mesh_sphere_agrees_with_analytical_sphere() {
    let facets = Primitive::icosphere(1.0, 3).to_facets();
    let mesh = Solid::polyhedron(facets, CollapsedDimension::None).unwrap();
    let sphere = Solid::sphere(Point3::origin(), 1.0, CollapsedDimension::None);

    let mut checked = 0;
    for p in grid(1.3, 15) {
        // Skip the band where the facets cut inside the true sphere
        if (p.coords.norm() - 1.0).abs() < 0.02 {
            continue;
        }
        assert_eq!(mesh.is_point_inside(&p), sphere.is_point_inside(&p), "point {:?}", p);
        checked += 1;
    }
    assert!(checked > 3000);
}

#[test]
fn test_linear_scan_and_index_agree() {
    let facets = Primitive::uv_sphere(1.0, 24).to_facets();
    let solid = Solid::polyhedron(facets, CollapsedDimension::None).unwrap();
    let indexed = solid.polyhedron_ref().unwrap();
    let mut linear = indexed.clone();
    linear.invalidate_index();

    for p in grid(1.5, 9) {
        assert_eq!(indexed.closest_face(&p), linear.closest_face(&p));
        assert_eq!(indexed.is_point_inside(&p), linear.is_point_inside(&p));
    }
}

#[test]
fn test_rotated_cube_classification() {
    let mut cube = unit_cube();
    cube.transform(&RigidTransform::rotation(Vector3::new(0.0, 0.0, FRAC_PI_4)))
        .unwrap();
    // Unindexed after the transform
    assert!(cube.is_point_inside(&Point3::new(0.6, 0.0, 0.0)));
    assert!(!cube.is_point_inside(&Point3::new(0.45, 0.45, 0.0)));

    cube.compute_parameters(CollapsedDimension::None);
    assert!(cube.is_point_inside(&Point3::new(0.6, 0.0, 0.0)));
    assert!(!cube.is_point_inside(&Point3::new(0.45, 0.45, 0.0)));
}

#[test]
fn test_surface_features_on_cube() {
    let cube = unit_cube();
    let poly = cube.polyhedron_ref().unwrap();

    let corner = cube.locate_surface_intersection(&Point3::new(1.0, 1.0, 1.0)).unwrap();
    assert!(matches!(corner.feature, SurfaceFeature::Vertex(_)));
    assert_eq!(corner.point, Point3::new(0.5, 0.5, 0.5));

    let side = cube.locate_surface_intersection(&Point3::new(0.2, 0.1, 3.0)).unwrap();
    match side.feature {
        SurfaceFeature::Face(face) => assert_eq!(side.normal, poly.face_normals[face]),
        other => panic!("expected a face hit, got {:?}", other),
    }
    assert!((side.normal - Vector3::z()).norm() < 1e-12);
    assert!((side.distance_squared - 2.5 * 2.5).abs() < 1e-12);
}

#[test]
fn test_batch_classification_of_two_solids() {
    let solids = vec![
        unit_cube(),
        Solid::sphere(Point3::new(0.0, 0.0, 0.0), 2.0, CollapsedDimension::None),
    ];
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(3.0, 0.0, 0.0),
    ];
    let classes = classify_points(&points, &solids);
    assert_eq!(
        classes,
        vec![PointClass::Solid(0), PointClass::Solid(1), PointClass::Fluid]
    );
}
