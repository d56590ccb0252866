// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation strategies
//!
//! A strategy turns one [`Polygon`] into an ordered list of [`Triangle`]s,
//! carrying per-corner normals and texture coordinates along.

use nalgebra::{Point2, Vector3};
use tracing::warn;

use crate::mesh::{Polygon, Triangle, Vec3};

/// Splits polygons into triangles
pub trait TriangulationStrategy {
    fn triangulate(&self, polygon: &Polygon) -> Vec<Triangle>;
}

/// Fan triangulation around the first corner.
///
/// Emits `n - 2` triangles that all share corner 0. Only correct for convex
/// polygons; concave input yields overlapping triangles.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanTriangulation;

impl TriangulationStrategy for FanTriangulation {
    fn triangulate(&self, polygon: &Polygon) -> Vec<Triangle> {
        let mut remaining: Vec<usize> = (0..polygon.len()).collect();
        let mut triangles = Vec::with_capacity(polygon.len().saturating_sub(2));

        while remaining.len() >= 3 {
            triangles.push(polygon.triangle(remaining[0], remaining[1], remaining[2]));
            remaining.remove(1);
        }

        triangles
    }
}

/// Ear-clipping triangulation (earcutr) in the polygon's best-fit plane.
///
/// Handles concave polygons. Falls back to [`FanTriangulation`] when earcut
/// rejects the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarcutTriangulation;

impl TriangulationStrategy for EarcutTriangulation {
    fn triangulate(&self, polygon: &Polygon) -> Vec<Triangle> {
        let n = polygon.len();

        // FAST PATH: Triangle - no triangulation needed
        if n <= 3 {
            return FanTriangulation.triangulate(polygon);
        }

        let points: Vec<Vector3<f64>> = polygon.vertices().iter().map(|v| v.cast::<f64>()).collect();
        let normal = calculate_polygon_normal(&points);
        let projected = project_to_2d(&points, &normal);

        let mut flat = Vec::with_capacity(n * 2);
        for p in &projected {
            flat.push(p.x);
            flat.push(p.y);
        }

        match earcutr::earcut(&flat, &[], 2) {
            Ok(indices) if indices.len() == (n - 2) * 3 => indices
                .chunks_exact(3)
                .map(|tri| polygon.triangle(tri[0], tri[1], tri[2]))
                .collect(),
            Ok(indices) => {
                warn!(
                    corners = n,
                    triangles = indices.len() / 3,
                    "earcut produced an incomplete triangulation, falling back to fan"
                );
                FanTriangulation.triangulate(polygon)
            }
            Err(e) => {
                warn!(corners = n, error = ?e, "earcut failed, falling back to fan");
                FanTriangulation.triangulate(polygon)
            }
        }
    }
}

/// Calculate the normal of a polygon from its vertices
/// Optimized for triangles using a simple cross product
pub fn calculate_polygon_normal(points: &[Vector3<f64>]) -> Vector3<f64> {
    let n = points.len();

    if n < 3 {
        return Vector3::new(0.0, 0.0, 1.0);
    }

    // FAST PATH: Triangle - use simple cross product
    if n == 3 {
        let normal = (points[1] - points[0]).cross(&(points[2] - points[0]));
        return normal
            .try_normalize(1e-10)
            .unwrap_or_else(|| Vector3::new(0.0, 0.0, 1.0));
    }

    // Use Newell's method for robust normal calculation on complex polygons
    let mut normal = Vector3::<f64>::zeros();

    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];

        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    normal
        .try_normalize(1e-10)
        .unwrap_or_else(|| Vector3::new(0.0, 0.0, 1.0))
}

/// Project 3D points onto the plane through the first point with the given normal
pub fn project_to_2d(points: &[Vector3<f64>], normal: &Vector3<f64>) -> Vec<Point2<f64>> {
    let Some(origin) = points.first() else {
        return Vec::new();
    };

    // Find the axis least parallel to the normal for stable cross product
    let abs_x = normal.x.abs();
    let abs_y = normal.y.abs();
    let abs_z = normal.z.abs();

    let reference = if abs_x <= abs_y && abs_x <= abs_z {
        Vector3::new(1.0, 0.0, 0.0)
    } else if abs_y <= abs_z {
        Vector3::new(0.0, 1.0, 0.0)
    } else {
        Vector3::new(0.0, 0.0, 1.0)
    };

    let u_axis = normal.cross(&reference).normalize();
    let v_axis = normal.cross(&u_axis).normalize();

    points
        .iter()
        .map(|p| {
            let d = p - origin;
            Point2::new(d.dot(&u_axis), d.dot(&v_axis))
        })
        .collect()
}

/// Unit normal of a polygon in single precision
pub fn polygon_normal(polygon: &Polygon) -> Vec3 {
    let points: Vec<Vector3<f64>> = polygon.vertices().iter().map(|v| v.cast::<f64>()).collect();
    calculate_polygon_normal(&points).cast::<f32>()
}
