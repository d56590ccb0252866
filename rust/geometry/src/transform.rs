// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rigid and scale transforms of a whole layout
//!
//! The model matrix is `T * (Rx * Ry * Rz) * S`. Only positions are
//! transformed; normals are copied unchanged, so they are wrong after a
//! non-uniform scale.

use nalgebra::{Matrix4, Point3, Rotation3, Vector3};
use tracing::debug;

use crate::builder::MeshLayoutBuilder;
use crate::error::Result;
use crate::mesh::{MeshLayout, Vec3};

/// Translation, Euler rotation (radians) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    /// Rotation about X, Y and Z in radians
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::repeat(1.0),
        }
    }

    pub fn new(translation: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// `translate * (rotate_x * rotate_y * rotate_z) * scale`
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let translate = Matrix4::new_translation(&self.translation);
        let rotate_x = Rotation3::from_axis_angle(&Vector3::x_axis(), self.rotation.x).to_homogeneous();
        let rotate_y = Rotation3::from_axis_angle(&Vector3::y_axis(), self.rotation.y).to_homogeneous();
        let rotate_z = Rotation3::from_axis_angle(&Vector3::z_axis(), self.rotation.z).to_homogeneous();
        let scale = Matrix4::new_nonuniform_scaling(&self.scale);

        translate * (rotate_x * rotate_y * rotate_z) * scale
    }

    /// Transform a single position
    #[inline]
    pub fn apply_to_point(&self, point: &Vec3) -> Vec3 {
        self.model_matrix()
            .transform_point(&Point3::from(*point))
            .coords
    }
}

/// Build a new layout with every vertex transformed.
///
/// Normals, texture coordinates, colors and faces are copied unchanged.
pub fn apply_transforms_to_layout(layout: &MeshLayout, transform: &Transform) -> Result<MeshLayout> {
    let matrix = transform.model_matrix();

    let mut builder = MeshLayoutBuilder::unseeded();
    builder.push_normals(layout.normals());
    builder.push_tex_coords(layout.tex_coords());
    builder.push_colors(layout.colors());
    builder.push_face_layouts(layout.faces().iter().cloned());

    for vertex in layout.vertices() {
        builder.push_vertex(matrix.transform_point(&Point3::from(*vertex)).coords);
    }

    debug!(vertices = layout.vertex_count(), ?transform, "applied transform");
    builder.build()
}
