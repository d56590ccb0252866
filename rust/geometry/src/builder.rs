// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mutable accumulator for [`MeshLayout`]
//!
//! Nothing is checked while pushing. [`MeshLayoutBuilder::build`] is the
//! single integrity checkpoint: it either returns a layout whose every
//! non-absent index is in range, or an error.

use tracing::debug;

use crate::error::{Error, Pool, Result};
use crate::mesh::{
    FaceLayout, IndexList, MeshLayout, Polygon, Triangle, Triplet, TripletFace, Vec2, Vec3, Vec4,
    ABSENT, DEFAULT_COLOR,
};

/// Builder for an immutable [`MeshLayout`]
#[derive(Debug, Clone)]
pub struct MeshLayoutBuilder {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    colors: Vec<Vec4>,
    faces: Vec<FaceLayout>,
    triplets: Vec<Triplet>,
}

impl MeshLayoutBuilder {
    /// Create a builder whose color pool holds the default color at index 0
    pub fn new() -> Self {
        let mut builder = Self::unseeded();
        builder.colors.push(Vec4::from(DEFAULT_COLOR));
        builder
    }

    /// Create a builder with every pool empty, including colors.
    ///
    /// Used when copying the pools of an existing layout verbatim.
    pub fn unseeded() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            tex_coords: Vec::new(),
            colors: Vec::new(),
            faces: Vec::new(),
            triplets: Vec::new(),
        }
    }

    #[inline]
    pub fn push_vertex(&mut self, vertex: Vec3) {
        self.vertices.push(vertex);
    }

    #[inline]
    pub fn push_normal(&mut self, normal: Vec3) {
        self.normals.push(normal);
    }

    #[inline]
    pub fn push_tex_coord(&mut self, tex_coord: Vec2) {
        self.tex_coords.push(tex_coord);
    }

    #[inline]
    pub fn push_color(&mut self, color: Vec4) {
        self.colors.push(color);
    }

    pub fn push_vertices(&mut self, vertices: &[Vec3]) {
        self.vertices.extend_from_slice(vertices);
    }

    pub fn push_normals(&mut self, normals: &[Vec3]) {
        self.normals.extend_from_slice(normals);
    }

    pub fn push_tex_coords(&mut self, tex_coords: &[Vec2]) {
        self.tex_coords.extend_from_slice(tex_coords);
    }

    pub fn push_colors(&mut self, colors: &[Vec4]) {
        self.colors.extend_from_slice(colors);
    }

    /// Queue one corner for the next [`push_triplet_face`](Self::push_triplet_face)
    #[inline]
    pub fn push_triplet(&mut self, triplet: Triplet) {
        self.triplets.push(triplet);
    }

    /// Turn the queued triplets into a face and clear the queue
    pub fn push_triplet_face(&mut self) {
        self.faces.push(FaceLayout::from_triplets(&self.triplets));
        self.triplets.clear();
    }

    /// Push an explicit group of triplets as one face
    pub fn push_triplet_face_from(&mut self, face: &TripletFace) {
        self.faces.push(FaceLayout::from_triplets(&face.triplets));
    }

    pub fn push_face_layout(&mut self, face: FaceLayout) {
        self.faces.push(face);
    }

    pub fn push_face_layouts(&mut self, faces: impl IntoIterator<Item = FaceLayout>) {
        self.faces.extend(faces);
    }

    /// Append the polygon's data to the pools and add a face indexing it.
    ///
    /// Positions are always appended. Normals and texture coordinates are
    /// appended only when the polygon carries them; otherwise the matching
    /// face indices are all [`ABSENT`], as are the color indices.
    pub fn push_polygon(&mut self, polygon: &Polygon) {
        let n = polygon.len();

        let vertex_indices = sequential(self.vertices.len(), n);
        self.vertices.extend_from_slice(polygon.vertices());

        let normal_indices = match polygon.normals() {
            Some(normals) => {
                let indices = sequential(self.normals.len(), n);
                self.normals.extend_from_slice(normals);
                indices
            }
            None => absent(n),
        };

        let tex_coord_indices = match polygon.tex_coords() {
            Some(tex_coords) => {
                let indices = sequential(self.tex_coords.len(), n);
                self.tex_coords.extend_from_slice(tex_coords);
                indices
            }
            None => absent(n),
        };

        self.faces.push(FaceLayout::from_parts_unchecked(
            vertex_indices,
            normal_indices,
            tex_coord_indices,
            absent(n),
        ));
    }

    pub fn push_triangle(&mut self, triangle: Triangle) {
        self.push_polygon(&Polygon::from(triangle));
    }

    /// Validate every face against the current pools and freeze the layout
    pub fn build(self) -> Result<MeshLayout> {
        self.validate()?;

        debug!(
            vertices = self.vertices.len(),
            normals = self.normals.len(),
            tex_coords = self.tex_coords.len(),
            colors = self.colors.len(),
            faces = self.faces.len(),
            "built mesh layout"
        );

        Ok(MeshLayout::from_validated(
            self.vertices,
            self.normals,
            self.tex_coords,
            self.colors,
            self.faces,
        ))
    }

    fn validate(&self) -> Result<()> {
        for (face_index, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(Error::DegenerateFace {
                    face: face_index,
                    corners: face.len(),
                });
            }
            validate_indices(face_index, face.vertex_indices(), Pool::Vertex, self.vertices.len())?;
            validate_indices(face_index, face.normal_indices(), Pool::Normal, self.normals.len())?;
            validate_indices(face_index, face.tex_coord_indices(), Pool::TexCoord, self.tex_coords.len())?;
            validate_indices(face_index, face.color_indices(), Pool::Color, self.colors.len())?;
        }
        Ok(())
    }
}

impl Default for MeshLayoutBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn sequential(start: usize, n: usize) -> IndexList {
    (start..start + n).collect()
}

#[inline]
fn absent(n: usize) -> IndexList {
    IndexList::from_elem(ABSENT, n)
}

fn validate_indices(face: usize, indices: &[usize], pool: Pool, len: usize) -> Result<()> {
    for (corner, &index) in indices.iter().enumerate() {
        if index != ABSENT && index >= len {
            return Err(Error::Validation {
                pool,
                face,
                corner,
                index,
                len,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(Vec3::zeros(), Vec3::x(), Vec3::y())
    }

    #[test]
    fn test_new_builder_seeds_default_color() {
        let layout = MeshLayoutBuilder::new().build().unwrap();
        assert_eq!(layout.colors(), &[Vec4::new(0.0, 0.0, 0.0, 1.0)]);
        assert!(layout.vertices().is_empty());

        let layout = MeshLayoutBuilder::unseeded().build().unwrap();
        assert!(layout.colors().is_empty());
    }

    #[test]
    fn test_each_builder_seeds_independently() {
        let mut first = MeshLayoutBuilder::new();
        first.push_color(Vec4::new(1.0, 0.0, 0.0, 1.0));
        let second = MeshLayoutBuilder::new();
        assert_eq!(first.build().unwrap().colors().len(), 2);
        assert_eq!(second.build().unwrap().colors().len(), 1);
    }

    #[test]
    fn test_push_triplet_face_projects_and_clears() {
        let mut builder = MeshLayoutBuilder::new();
        builder.push_vertices(&[Vec3::zeros(), Vec3::x(), Vec3::y(), Vec3::z()]);
        builder.push_normal(Vec3::z());
        builder.push_triplet(Triplet::new(0, 0, ABSENT));
        builder.push_triplet(Triplet::new(1, 0, ABSENT));
        builder.push_triplet(Triplet::new(2, 0, ABSENT));
        builder.push_triplet_face();
        builder.push_triplet(Triplet::vertex(1));
        builder.push_triplet(Triplet::vertex(2));
        builder.push_triplet(Triplet::vertex(3));
        builder.push_triplet_face();

        let layout = builder.build().unwrap();
        assert_eq!(layout.face_count(), 2);
        let face = &layout.faces()[0];
        assert_eq!(face.vertex_indices(), &[0, 1, 2]);
        assert_eq!(face.normal_indices(), &[0, 0, 0]);
        assert_eq!(face.tex_coord_indices(), &[ABSENT; 3]);
        assert_eq!(face.color_indices(), &[ABSENT; 3]);
        assert_eq!(layout.faces()[1].vertex_indices(), &[1, 2, 3]);
    }

    #[test]
    fn test_push_triangle_without_attributes() {
        let mut builder = MeshLayoutBuilder::new();
        builder.push_triangle(unit_triangle());
        builder.push_triangle(unit_triangle());
        let layout = builder.build().unwrap();

        assert_eq!(layout.vertex_count(), 6);
        assert!(layout.normals().is_empty());
        assert_eq!(layout.faces()[1].vertex_indices(), &[3, 4, 5]);
        assert_eq!(layout.faces()[1].normal_indices(), &[ABSENT; 3]);
    }

    #[test]
    fn test_push_triangle_with_attributes() {
        let mut builder = MeshLayoutBuilder::new();
        builder.push_normal(Vec3::x());
        builder.push_triangle(
            unit_triangle()
                .with_normals([Vec3::z(); 3])
                .with_tex_coords([Vec2::zeros(), Vec2::x(), Vec2::y()]),
        );
        let layout = builder.build().unwrap();

        let face = &layout.faces()[0];
        assert_eq!(face.normal_indices(), &[1, 2, 3]);
        assert_eq!(face.tex_coord_indices(), &[0, 1, 2]);
        assert_eq!(layout.normals().len(), 4);
    }

    #[test]
    fn test_validation_rejects_out_of_range_in_every_pool() {
        let cases = [
            (Triplet::new(3, ABSENT, ABSENT), Pool::Vertex),
            (Triplet::new(0, 0, ABSENT), Pool::Normal),
            (Triplet::new(0, ABSENT, 5), Pool::TexCoord),
        ];
        for (bad, pool) in cases {
            let mut builder = MeshLayoutBuilder::new();
            builder.push_vertices(&[Vec3::zeros(), Vec3::x(), Vec3::y()]);
            builder.push_triplet(Triplet::vertex(0));
            builder.push_triplet(bad);
            builder.push_triplet(Triplet::vertex(2));
            builder.push_triplet_face();

            match builder.build() {
                Err(Error::Validation { pool: p, face, corner, .. }) => {
                    assert_eq!(p, pool);
                    assert_eq!(face, 0);
                    assert_eq!(corner, 1);
                }
                other => panic!("expected validation error, got {:?}", other),
            }
        }

        let mut builder = MeshLayoutBuilder::new();
        builder.push_vertices(&[Vec3::zeros(), Vec3::x(), Vec3::y()]);
        builder.push_face_layout(FaceLayout::new(vec![0, 1, 2], vec![ABSENT; 3], vec![ABSENT; 3], vec![0, 1, 0]).unwrap());
        let err = builder.build().unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(err, Error::Validation { pool: Pool::Color, index: 1, len: 1, .. }));
    }

    #[test]
    fn test_absent_never_fails_even_with_empty_pools() {
        let mut builder = MeshLayoutBuilder::unseeded();
        builder.push_face_layout(FaceLayout::from_vertex_indices(vec![ABSENT; 3]));
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_faces_need_three_corners() {
        let mut builder = MeshLayoutBuilder::new();
        builder.push_vertices(&[Vec3::zeros(), Vec3::x()]);
        builder.push_triplet(Triplet::vertex(0));
        builder.push_triplet(Triplet::vertex(1));
        builder.push_triplet_face();
        assert_eq!(
            builder.build().unwrap_err(),
            Error::DegenerateFace { face: 0, corners: 2 }
        );
    }

    #[test]
    fn test_pool_pushes_after_face_satisfy_validation() {
        // Validation runs against pool sizes at build time, not push time
        let mut builder = MeshLayoutBuilder::new();
        builder.push_triplet(Triplet::vertex(0));
        builder.push_triplet(Triplet::vertex(1));
        builder.push_triplet(Triplet::vertex(2));
        builder.push_triplet_face();
        builder.push_vertices(&[Vec3::zeros(), Vec3::x(), Vec3::y()]);
        assert!(builder.build().is_ok());
    }
}
