// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric queries over a [`MeshLayout`]
//!
//! Each query reads the triangle stream through a fan-triangulating
//! [`MeshLayoutReader`]; nothing is cached between calls.

use crate::mesh::{MeshLayout, Triangle, Vec3};
use crate::reader::MeshLayoutReader;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box around a set of points; the zero box at the origin when empty
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::new(Vec3::zeros(), Vec3::zeros());
        };

        let mut min = *first;
        let mut max = *first;
        for p in points {
            min = min.inf(p);
            max = max.sup(p);
        }
        Self { min, max }
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn contains(&self, point: &Vec3) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }

    /// Cube with the same center whose side is the longest extent of this box
    pub fn equalized(&self) -> Self {
        let half = self.size().max() * 0.5;
        let center = self.center();
        let half = Vec3::repeat(half);
        // Keep the original bounds exactly so rounding never shrinks the box
        Self {
            min: (center - half).inf(&self.min),
            max: (center + half).sup(&self.max),
        }
    }
}

/// Sum of triangle areas
pub fn calculate_surface_area(layout: &MeshLayout) -> f64 {
    MeshLayoutReader::new(layout)
        .triangles()
        .iter()
        .map(|t| t.area())
        .sum()
}

/// Signed enclosed volume via the divergence theorem.
///
/// Matches the real volume only for closed, consistently wound meshes;
/// inward winding gives a negative result.
pub fn calculate_volume(layout: &MeshLayout) -> f64 {
    MeshLayoutReader::new(layout)
        .triangles()
        .iter()
        .map(|t| t.signed_volume())
        .sum()
}

/// Half-space containment test.
///
/// The point is outside as soon as it lies strictly in front of any
/// triangle. Only correct for convex meshes with outward winding.
pub fn is_point_inside_mesh(point: Vec3, layout: &MeshLayout) -> bool {
    is_point_inside_triangles(&point, &MeshLayoutReader::new(layout).triangles())
}

/// [`is_point_inside_mesh`] over an already triangulated stream
pub(crate) fn is_point_inside_triangles(point: &Vec3, triangles: &[Triangle]) -> bool {
    triangles
        .iter()
        .all(|t| t.cross().dot(&(point - t.vertices[0])) <= 0.0)
}

/// Component-wise bounds of every vertex in the pool
pub fn find_bounding_box(layout: &MeshLayout) -> BoundingBox {
    BoundingBox::from_points(layout.vertices())
}

/// Cubic box enclosing [`find_bounding_box`]
pub fn eq_bounding_box(layout: &MeshLayout) -> BoundingBox {
    find_bounding_box(layout).equalized()
}

/// Summary of a mesh's geometric properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshProperties {
    pub surface_area: f64,
    pub volume: f64,
    pub bounding_box: BoundingBox,
    pub triangle_count: usize,
}

/// Compute area and volume concurrently, plus bounds and triangle count
pub fn measure(layout: &MeshLayout) -> MeshProperties {
    let ((surface_area, volume), triangle_count) = rayon::join(
        || {
            rayon::join(
                || calculate_surface_area(layout),
                || calculate_volume(layout),
            )
        },
        || MeshLayoutReader::new(layout).triangles().len(),
    );

    MeshProperties {
        surface_area,
        volume,
        bounding_box: find_bounding_box(layout),
        triangle_count,
    }
}
