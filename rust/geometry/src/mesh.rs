// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures
//!
//! The indexed model stores every attribute once in a pool and references it
//! from faces through parallel index arrays. [`Polygon`] and [`Triangle`] are
//! the denormalized geometric values handed in and out of the model.

use nalgebra::{Vector2, Vector3, Vector4};
use smallvec::SmallVec;

use crate::error::{Error, Result};

pub type Vec2 = Vector2<f32>;
pub type Vec3 = Vector3<f32>;
pub type Vec4 = Vector4<f32>;

/// Index arrays of a face; most faces are triangles or quads
pub type IndexList = SmallVec<[usize; 4]>;

/// Reserved index meaning "this corner has no value for this attribute".
///
/// It is never a valid pool position and never appears in resolved
/// [`Polygon`] or [`Triangle`] values.
pub const ABSENT: usize = usize::MAX;

/// Color seeded at index 0 of every new color pool (opaque black)
pub const DEFAULT_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Pool indices of one face corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triplet {
    pub vertex_index: usize,
    pub normal_index: usize,
    pub tex_coord_index: usize,
}

impl Triplet {
    #[inline]
    pub fn new(vertex_index: usize, normal_index: usize, tex_coord_index: usize) -> Self {
        Self {
            vertex_index,
            normal_index,
            tex_coord_index,
        }
    }

    /// Corner with a position only
    #[inline]
    pub fn vertex(vertex_index: usize) -> Self {
        Self::new(vertex_index, ABSENT, ABSENT)
    }
}

/// Triplets of one face, in corner order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripletFace {
    pub triplets: SmallVec<[Triplet; 4]>,
}

impl TripletFace {
    pub fn new(triplets: impl IntoIterator<Item = Triplet>) -> Self {
        Self {
            triplets: triplets.into_iter().collect(),
        }
    }
}

/// Polygon with optional per-corner normals and texture coordinates.
///
/// Each optional attribute is either absent or holds exactly one entry per
/// position.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec3>,
    normals: Option<Vec<Vec3>>,
    tex_coords: Option<Vec<Vec2>>,
}

impl Polygon {
    /// Create a polygon, checking attribute lengths against the positions
    pub fn new(
        vertices: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        tex_coords: Option<Vec<Vec2>>,
    ) -> Result<Self> {
        if let Some(normals) = &normals {
            check_length("normals", vertices.len(), normals.len())?;
        }
        if let Some(tex_coords) = &tex_coords {
            check_length("tex_coords", vertices.len(), tex_coords.len())?;
        }
        Ok(Self {
            vertices,
            normals,
            tex_coords,
        })
    }

    /// Polygon without normals or texture coordinates
    pub fn from_vertices(vertices: Vec<Vec3>) -> Self {
        Self {
            vertices,
            normals: None,
            tex_coords: None,
        }
    }

    /// Caller guarantees matching lengths
    pub(crate) fn from_parts_unchecked(
        vertices: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        tex_coords: Option<Vec<Vec2>>,
    ) -> Self {
        debug_assert!(normals.as_ref().map_or(true, |n| n.len() == vertices.len()));
        debug_assert!(tex_coords.as_ref().map_or(true, |t| t.len() == vertices.len()));
        Self {
            vertices,
            normals,
            tex_coords,
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[inline]
    pub fn normals(&self) -> Option<&[Vec3]> {
        self.normals.as_deref()
    }

    #[inline]
    pub fn tex_coords(&self) -> Option<&[Vec2]> {
        self.tex_coords.as_deref()
    }

    /// Number of corners
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Build the triangle spanned by three corners of this polygon
    pub fn triangle(&self, a: usize, b: usize, c: usize) -> Triangle {
        Triangle {
            vertices: [self.vertices[a], self.vertices[b], self.vertices[c]],
            normals: self.normals.as_ref().map(|n| [n[a], n[b], n[c]]),
            tex_coords: self.tex_coords.as_ref().map(|t| [t[a], t[b], t[c]]),
            normal: None,
        }
    }
}

impl From<Triangle> for Polygon {
    fn from(triangle: Triangle) -> Self {
        Self {
            vertices: triangle.vertices.to_vec(),
            normals: triangle.normals.map(|n| n.to_vec()),
            tex_coords: triangle.tex_coords.map(|t| t.to_vec()),
        }
    }
}

#[inline]
fn check_length(attribute: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::AttributeLength {
            attribute,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Triangle definition
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
    pub normals: Option<[Vec3; 3]>,
    pub tex_coords: Option<[Vec2; 3]>,
    /// Precomputed flat face normal
    pub normal: Option<Vec3>,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self {
            vertices: [v0, v1, v2],
            normals: None,
            tex_coords: None,
            normal: None,
        }
    }

    pub fn with_normals(mut self, normals: [Vec3; 3]) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_tex_coords(mut self, tex_coords: [Vec2; 3]) -> Self {
        self.tex_coords = Some(tex_coords);
        self
    }

    pub fn with_face_normal(mut self, normal: Vec3) -> Self {
        self.normal = Some(normal);
        self
    }

    /// Unnormalized normal `(v1 - v0) x (v2 - v0)`
    #[inline]
    pub fn cross(&self) -> Vec3 {
        let edge1 = self.vertices[1] - self.vertices[0];
        let edge2 = self.vertices[2] - self.vertices[0];
        edge1.cross(&edge2)
    }

    /// Unit normal from the winding; zero for degenerate triangles
    #[inline]
    pub fn computed_normal(&self) -> Vec3 {
        self.cross()
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros)
    }

    /// Stored face normal, or the computed one
    #[inline]
    pub fn face_normal(&self) -> Vec3 {
        self.normal.unwrap_or_else(|| self.computed_normal())
    }

    /// Calculate triangle area
    pub fn area(&self) -> f64 {
        let [v0, v1, v2] = self.vertices.map(|v| v.cast::<f64>());
        (v1 - v0).cross(&(v2 - v0)).norm() * 0.5
    }

    /// Signed volume of the tetrahedron formed with the origin
    pub fn signed_volume(&self) -> f64 {
        let [v0, v1, v2] = self.vertices.map(|v| v.cast::<f64>());
        let v321 = v2.x * v1.y * v0.z;
        let v231 = v1.x * v2.y * v0.z;
        let v312 = v2.x * v0.y * v1.z;
        let v132 = v0.x * v2.y * v1.z;
        let v213 = v1.x * v0.y * v2.z;
        let v123 = v0.x * v1.y * v2.z;
        (-v321 + v231 + v312 - v132 - v213 + v123) / 6.0
    }
}

/// Index arrays of one face.
///
/// The four arrays are parallel: entry `i` of each describes corner `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceLayout {
    vertex_indices: IndexList,
    normal_indices: IndexList,
    tex_coord_indices: IndexList,
    color_indices: IndexList,
}

impl FaceLayout {
    /// Create a face, checking that all index arrays have the same length
    pub fn new(
        vertex_indices: impl Into<IndexList>,
        normal_indices: impl Into<IndexList>,
        tex_coord_indices: impl Into<IndexList>,
        color_indices: impl Into<IndexList>,
    ) -> Result<Self> {
        let vertex_indices = vertex_indices.into();
        let normal_indices = normal_indices.into();
        let tex_coord_indices = tex_coord_indices.into();
        let color_indices = color_indices.into();

        let n = vertex_indices.len();
        check_length("normal_indices", n, normal_indices.len())?;
        check_length("tex_coord_indices", n, tex_coord_indices.len())?;
        check_length("color_indices", n, color_indices.len())?;

        Ok(Self {
            vertex_indices,
            normal_indices,
            tex_coord_indices,
            color_indices,
        })
    }

    /// Face over the given positions, every other attribute absent
    pub fn from_vertex_indices(vertex_indices: impl Into<IndexList>) -> Self {
        let vertex_indices = vertex_indices.into();
        let absent: IndexList = SmallVec::from_elem(ABSENT, vertex_indices.len());
        Self {
            vertex_indices,
            normal_indices: absent.clone(),
            tex_coord_indices: absent.clone(),
            color_indices: absent,
        }
    }

    /// Caller guarantees equal lengths
    pub(crate) fn from_parts_unchecked(
        vertex_indices: IndexList,
        normal_indices: IndexList,
        tex_coord_indices: IndexList,
        color_indices: IndexList,
    ) -> Self {
        debug_assert_eq!(vertex_indices.len(), normal_indices.len());
        debug_assert_eq!(vertex_indices.len(), tex_coord_indices.len());
        debug_assert_eq!(vertex_indices.len(), color_indices.len());
        Self {
            vertex_indices,
            normal_indices,
            tex_coord_indices,
            color_indices,
        }
    }

    /// Project triplets onto parallel arrays; color indices are absent
    pub(crate) fn from_triplets(triplets: &[Triplet]) -> Self {
        Self {
            vertex_indices: triplets.iter().map(|t| t.vertex_index).collect(),
            normal_indices: triplets.iter().map(|t| t.normal_index).collect(),
            tex_coord_indices: triplets.iter().map(|t| t.tex_coord_index).collect(),
            color_indices: SmallVec::from_elem(ABSENT, triplets.len()),
        }
    }

    #[inline]
    pub fn vertex_indices(&self) -> &[usize] {
        &self.vertex_indices
    }

    #[inline]
    pub fn normal_indices(&self) -> &[usize] {
        &self.normal_indices
    }

    #[inline]
    pub fn tex_coord_indices(&self) -> &[usize] {
        &self.tex_coord_indices
    }

    #[inline]
    pub fn color_indices(&self) -> &[usize] {
        &self.color_indices
    }

    /// Number of corners
    #[inline]
    pub fn len(&self) -> usize {
        self.vertex_indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_indices.is_empty()
    }

    /// Triplet of corner `i` (color dropped)
    #[inline]
    pub fn triplet(&self, i: usize) -> Triplet {
        Triplet::new(
            self.vertex_indices[i],
            self.normal_indices[i],
            self.tex_coord_indices[i],
        )
    }

    pub fn triplets(&self) -> impl Iterator<Item = Triplet> + '_ {
        (0..self.len()).map(move |i| self.triplet(i))
    }
}

/// Immutable indexed mesh.
///
/// Only [`MeshLayoutBuilder::build`](crate::MeshLayoutBuilder::build) creates
/// one, so every non-absent index is known to be inside its pool.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshLayout {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    colors: Vec<Vec4>,
    faces: Vec<FaceLayout>,
}

impl MeshLayout {
    pub(crate) fn from_validated(
        vertices: Vec<Vec3>,
        normals: Vec<Vec3>,
        tex_coords: Vec<Vec2>,
        colors: Vec<Vec4>,
        faces: Vec<FaceLayout>,
    ) -> Self {
        Self {
            vertices,
            normals,
            tex_coords,
            colors,
            faces,
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    #[inline]
    pub fn tex_coords(&self) -> &[Vec2] {
        &self.tex_coords
    }

    #[inline]
    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    #[inline]
    pub fn faces(&self) -> &[FaceLayout] {
        &self.faces
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True when there is nothing to draw
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polygon_length_invariant() {
        let vertices = vec![Vec3::zeros(), Vec3::x(), Vec3::y()];
        assert!(Polygon::new(vertices.clone(), Some(vec![Vec3::z(); 3]), None).is_ok());

        let err = Polygon::new(vertices.clone(), Some(vec![Vec3::z(); 2]), None).unwrap_err();
        assert_eq!(
            err,
            Error::AttributeLength {
                attribute: "normals",
                expected: 3,
                actual: 2
            }
        );
        assert!(Polygon::new(vertices, None, Some(vec![Vec2::zeros(); 4])).is_err());
    }

    #[test]
    fn test_face_layout_length_invariant() {
        assert!(FaceLayout::new(vec![0, 1, 2], vec![ABSENT; 3], vec![ABSENT; 3], vec![0; 3]).is_ok());
        assert!(FaceLayout::new(vec![0, 1, 2], vec![ABSENT; 2], vec![ABSENT; 3], vec![0; 3]).is_err());
        assert!(FaceLayout::new(vec![0, 1, 2], vec![ABSENT; 3], vec![ABSENT; 3], vec![0; 4]).is_err());
    }

    #[test]
    fn test_face_layout_from_vertex_indices() {
        let face = FaceLayout::from_vertex_indices(vec![3, 4, 5, 6]);
        assert_eq!(face.len(), 4);
        assert!(face.normal_indices().iter().all(|&i| i == ABSENT));
        assert!(face.color_indices().iter().all(|&i| i == ABSENT));
        assert_eq!(face.triplet(2), Triplet::vertex(5));
    }

    #[test]
    fn test_triangle_area_and_normal() {
        let triangle = Triangle::new(Vec3::zeros(), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(triangle.area(), 2.0);
        assert_eq!(triangle.computed_normal(), Vec3::z());

        let flipped = triangle.clone().with_face_normal(-Vec3::z());
        assert_eq!(flipped.face_normal(), -Vec3::z());
    }

    #[test]
    fn test_degenerate_triangle_normal_is_zero() {
        let triangle = Triangle::new(Vec3::zeros(), Vec3::x(), Vec3::x() * 2.0);
        assert_eq!(triangle.computed_normal(), Vec3::zeros());
        assert_eq!(triangle.area(), 0.0);
    }

    #[test]
    fn test_signed_volume_flips_with_winding() {
        let a = Triangle::new(Vec3::x(), Vec3::y(), Vec3::z());
        let b = Triangle::new(Vec3::x(), Vec3::z(), Vec3::y());
        assert_relative_eq!(a.signed_volume(), 1.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(b.signed_volume(), -1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_polygon_triangle_picks_attributes() {
        let polygon = Polygon::new(
            vec![Vec3::zeros(), Vec3::x(), Vec3::y(), Vec3::z()],
            None,
            Some(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)]),
        )
        .unwrap();
        let triangle = polygon.triangle(0, 2, 3);
        assert_eq!(triangle.vertices, [Vec3::zeros(), Vec3::y(), Vec3::z()]);
        assert!(triangle.normals.is_none());
        assert_eq!(triangle.tex_coords.unwrap()[1], Vec2::new(1.0, 1.0));
    }
}
