// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Batch fluid/solid classification of grid points
//!
//! Points are independent, so the batch runs on the rayon pool. Solids must
//! not be transformed while a batch is in flight, which the shared borrow
//! enforces.

use crate::geometry::{BoundingBox, Solid};
use nalgebra::Point3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Where a grid point lies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointClass {
    Fluid,
    /// Inside the solid with this index (the first one, if several overlap)
    Solid(usize),
}

/// Classify one point against every solid in order
pub fn classify_point(point: &Point3<f64>, solids: &[Solid]) -> PointClass {
    solids
        .iter()
        .position(|solid| solid.is_point_inside(point))
        .map_or(PointClass::Fluid, PointClass::Solid)
}

/// Classify many points in parallel; output order matches `points`
pub fn classify_points(points: &[Point3<f64>], solids: &[Solid]) -> Vec<PointClass> {
    let classes: Vec<PointClass> = points
        .par_iter()
        .map(|point| classify_point(point, solids))
        .collect();
    tracing::debug!(points = points.len(), solids = solids.len(), "classified points");
    classes
}

/// Point counts per class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub fluid: usize,
    /// Indexed like the solid slice
    pub solid: Vec<usize>,
}

impl ClassificationSummary {
    pub fn from_classes(classes: &[PointClass], solid_count: usize) -> Self {
        let mut summary = Self {
            fluid: 0,
            solid: vec![0; solid_count],
        };
        for class in classes {
            match *class {
                PointClass::Fluid => summary.fluid += 1,
                PointClass::Solid(index) => {
                    if let Some(count) = summary.solid.get_mut(index) {
                        *count += 1;
                    }
                }
            }
        }
        summary
    }
}

/// Cell centres of a uniform `nx × ny × nz` grid spanning `domain`
pub fn cell_centres(domain: &BoundingBox, resolution: [usize; 3]) -> Vec<Point3<f64>> {
    let size = domain.size();
    let step = [
        size.x / resolution[0].max(1) as f64,
        size.y / resolution[1].max(1) as f64,
        size.z / resolution[2].max(1) as f64,
    ];
    let mut points = Vec::with_capacity(resolution.iter().product());
    for k in 0..resolution[2] {
        for j in 0..resolution[1] {
            for i in 0..resolution[0] {
                points.push(Point3::new(
                    domain.min.x + (i as f64 + 0.5) * step[0],
                    domain.min.y + (j as f64 + 0.5) * step[1],
                    domain.min.z + (k as f64 + 0.5) * step[2],
                ));
            }
        }
    }
    points
}
