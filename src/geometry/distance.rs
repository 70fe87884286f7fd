// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Exact point-triangle distance
//!
//! The triangle is parameterised as `T(s, t) = v0 + s·e01 + t·e02`. The
//! unconstrained minimiser of `|T(s,t) - p|²` falls in one of seven regions
//! of the `(s, t)` plane; each region has its own closed-form clamp
//! (Eberly, "Distance between point and triangle in 3D").
//!
//! ```text
//!        t
//!   \ 2 |
//!    \  |
//!     \ |
//!   3  \|
//!       |\   1
//!       | \
//!       |0 \
//!  -----+---\------ s
//!   4   | 5  \  6
//! ```

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Closest point of a triangle to a query point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangleProjection {
    /// Squared distance, never negative
    pub distance_squared: f64,
    /// Weights of `v0`, `v1`, `v2`; they sum to one
    pub barycentric: [f64; 3],
}

impl TriangleProjection {
    fn new(s: f64, t: f64, distance_squared: f64) -> Self {
        Self {
            // Round-off can push the quadratic form slightly below zero
            distance_squared: distance_squared.max(0.0),
            barycentric: [1.0 - s - t, s, t],
        }
    }

    /// Parametric coordinate along `e01`
    pub fn s(&self) -> f64 {
        self.barycentric[1]
    }

    /// Parametric coordinate along `e02`
    pub fn t(&self) -> f64 {
        self.barycentric[2]
    }

    /// Point on the triangle `v0 + s·e01 + t·e02`
    pub fn point(&self, v0: &Point3<f64>, e01: &Vector3<f64>, e02: &Vector3<f64>) -> Point3<f64> {
        v0 + e01 * self.s() + e02 * self.t()
    }
}

/// Squared distance from `p` to the triangle `(v0, v0 + e01, v0 + e02)`.
pub fn point_triangle_distance(
    p: &Point3<f64>,
    v0: &Point3<f64>,
    e01: &Vector3<f64>,
    e02: &Vector3<f64>,
) -> TriangleProjection {
    let diff = v0 - p;
    let a = e01.dot(e01);
    let b = e01.dot(e02);
    let c = e02.dot(e02);
    let d = e01.dot(&diff);
    let e = e02.dot(&diff);
    let f = diff.dot(&diff);
    let det = a * c - b * b;

    if det <= f64::EPSILON * a * c || a == 0.0 || c == 0.0 {
        return degenerate_triangle_distance(p, v0, e01, e02);
    }

    let quadratic = |s: f64, t: f64| s * (a * s + b * t + 2.0 * d) + t * (b * s + c * t + 2.0 * e) + f;

    let mut s = b * e - c * d;
    let mut t = b * d - a * e;
    let dist;

    if s + t <= det {
        if s < 0.0 {
            if t < 0.0 {
                // region 4
                if d < 0.0 {
                    t = 0.0;
                    if -d >= a {
                        s = 1.0;
                        dist = a + 2.0 * d + f;
                    } else {
                        s = -d / a;
                        dist = d * s + f;
                    }
                } else {
                    s = 0.0;
                    (t, dist) = clamp_on_e02(c, e, f);
                }
            } else {
                // region 3
                s = 0.0;
                (t, dist) = clamp_on_e02(c, e, f);
            }
        } else if t < 0.0 {
            // region 5
            t = 0.0;
            (s, dist) = clamp_on_e01(a, d, f);
        } else {
            // region 0
            s /= det;
            t /= det;
            dist = quadratic(s, t);
        }
    } else if s < 0.0 {
        // region 2
        let tmp0 = b + d;
        let tmp1 = c + e;
        if tmp1 > tmp0 {
            let numer = tmp1 - tmp0;
            let denom = a - 2.0 * b + c;
            if numer >= denom {
                s = 1.0;
                t = 0.0;
                dist = a + 2.0 * d + f;
            } else {
                s = numer / denom;
                t = 1.0 - s;
                dist = quadratic(s, t);
            }
        } else {
            s = 0.0;
            if tmp1 <= 0.0 {
                t = 1.0;
                dist = c + 2.0 * e + f;
            } else {
                (t, dist) = clamp_on_e02(c, e, f);
            }
        }
    } else if t < 0.0 {
        // region 6
        let tmp0 = b + e;
        let tmp1 = a + d;
        if tmp1 > tmp0 {
            let numer = tmp1 - tmp0;
            let denom = a - 2.0 * b + c;
            if numer >= denom {
                t = 1.0;
                s = 0.0;
                dist = c + 2.0 * e + f;
            } else {
                t = numer / denom;
                s = 1.0 - t;
                dist = quadratic(s, t);
            }
        } else {
            t = 0.0;
            if tmp1 <= 0.0 {
                s = 1.0;
                dist = a + 2.0 * d + f;
            } else {
                (s, dist) = clamp_on_e01(a, d, f);
            }
        }
    } else {
        // region 1
        let numer = c + e - b - d;
        if numer <= 0.0 {
            s = 0.0;
            t = 1.0;
            dist = c + 2.0 * e + f;
        } else {
            let denom = a - 2.0 * b + c;
            if numer >= denom {
                s = 1.0;
                t = 0.0;
                dist = a + 2.0 * d + f;
            } else {
                s = numer / denom;
                t = 1.0 - s;
                dist = quadratic(s, t);
            }
        }
    }

    TriangleProjection::new(s, t, dist)
}

/// Minimise along the `s = 0` side, returning `(t, distance²)`.
fn clamp_on_e02(c: f64, e: f64, f: f64) -> (f64, f64) {
    if e >= 0.0 {
        (0.0, f)
    } else if -e >= c {
        (1.0, c + 2.0 * e + f)
    } else {
        let t = -e / c;
        (t, e * t + f)
    }
}

/// Minimise along the `t = 0` side, returning `(s, distance²)`.
fn clamp_on_e01(a: f64, d: f64, f: f64) -> (f64, f64) {
    if d >= 0.0 {
        (0.0, f)
    } else if -d >= a {
        (1.0, a + 2.0 * d + f)
    } else {
        let s = -d / a;
        (s, d * s + f)
    }
}

/// Collinear or collapsed triangles: best of the three sides.
fn degenerate_triangle_distance(
    p: &Point3<f64>,
    v0: &Point3<f64>,
    e01: &Vector3<f64>,
    e02: &Vector3<f64>,
) -> TriangleProjection {
    let v1 = v0 + e01;
    let v2 = v0 + e02;

    let (u01, d01) = closest_on_segment(p, v0, &v1);
    let (u02, d02) = closest_on_segment(p, v0, &v2);
    let (u12, d12) = closest_on_segment(p, &v1, &v2);

    // Ties keep the earlier side
    let mut best = TriangleProjection::new(u01, 0.0, d01);
    if d02 < best.distance_squared {
        best = TriangleProjection::new(0.0, u02, d02);
    }
    if d12 < best.distance_squared {
        best = TriangleProjection::new(1.0 - u12, u12, d12);
    }
    best
}

/// Parameter along `a -> b` of the closest point and its squared distance.
fn closest_on_segment(p: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> (f64, f64) {
    let ab = b - a;
    let len2 = ab.norm_squared();
    let u = if len2 > 0.0 {
        ((p - a).dot(&ab) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (u, (a + ab * u - p).norm_squared())
}
