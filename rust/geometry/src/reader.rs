// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Denormalized views over a [`MeshLayout`]
//!
//! Every view is recomputed on each call. The layout is immutable, so two
//! calls always agree.

use crate::mesh::{MeshLayout, Polygon, Triangle, Triplet, TripletFace, Vec2, Vec3, ABSENT};
use crate::triangulation::{FanTriangulation, TriangulationStrategy};

/// Reads triplets, polygons and triangles out of a borrowed layout
#[derive(Debug, Clone, Copy)]
pub struct MeshLayoutReader<'a, S = FanTriangulation> {
    layout: &'a MeshLayout,
    strategy: S,
}

impl<'a> MeshLayoutReader<'a, FanTriangulation> {
    /// Reader using fan triangulation
    pub fn new(layout: &'a MeshLayout) -> Self {
        Self::with_strategy(layout, FanTriangulation)
    }
}

impl<'a, S: TriangulationStrategy> MeshLayoutReader<'a, S> {
    pub fn with_strategy(layout: &'a MeshLayout, strategy: S) -> Self {
        Self { layout, strategy }
    }

    #[inline]
    pub fn layout(&self) -> &'a MeshLayout {
        self.layout
    }

    #[inline]
    pub fn vertices(&self) -> &'a [Vec3] {
        self.layout.vertices()
    }

    #[inline]
    pub fn normals(&self) -> &'a [Vec3] {
        self.layout.normals()
    }

    #[inline]
    pub fn tex_coords(&self) -> &'a [Vec2] {
        self.layout.tex_coords()
    }

    /// Every corner of every face, in face then corner order
    pub fn triplets(&self) -> impl Iterator<Item = Triplet> + 'a {
        self.layout.faces().iter().flat_map(|face| face.triplets())
    }

    /// Corners grouped by face
    pub fn triplet_faces(&self) -> Vec<TripletFace> {
        self.layout
            .faces()
            .iter()
            .map(|face| TripletFace::new(face.triplets()))
            .collect()
    }

    /// Resolve every face against the pools.
    ///
    /// Corners without a position are dropped. Normals (or texture
    /// coordinates) are kept only when every remaining corner has one.
    pub fn polygons(&self) -> impl Iterator<Item = Polygon> + 'a {
        let layout = self.layout;
        layout.faces().iter().map(move |face| {
            let mut vertices = Vec::with_capacity(face.len());
            let mut normals = Vec::with_capacity(face.len());
            let mut tex_coords = Vec::with_capacity(face.len());

            for triplet in face.triplets() {
                if triplet.vertex_index == ABSENT {
                    continue;
                }
                vertices.push(layout.vertices()[triplet.vertex_index]);

                if triplet.normal_index != ABSENT {
                    normals.push(layout.normals()[triplet.normal_index]);
                }
                if triplet.tex_coord_index != ABSENT {
                    tex_coords.push(layout.tex_coords()[triplet.tex_coord_index]);
                }
            }

            let normals = (normals.len() == vertices.len()).then_some(normals);
            let tex_coords = (tex_coords.len() == vertices.len()).then_some(tex_coords);
            Polygon::from_parts_unchecked(vertices, normals, tex_coords)
        })
    }

    /// Triangulate every polygon, in face order
    pub fn triangles(&self) -> Vec<Triangle> {
        let mut triangles = Vec::with_capacity(self.layout.face_count() * 2);
        for polygon in self.polygons() {
            triangles.extend(self.strategy.triangulate(&polygon));
        }
        triangles
    }
}
