// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsed face-list to [`MeshLayout`]

use meshconv_core::ParsedMesh;
use tracing::debug;

use crate::builder::MeshLayoutBuilder;
use crate::error::Result;
use crate::mesh::{MeshLayout, Triplet, Vec2, Vec3, Vec4, ABSENT};

/// Convert a 1-based index (`0` = absent) to a pool position
#[inline]
fn to_pool_index(one_based: usize) -> usize {
    one_based.checked_sub(1).unwrap_or(ABSENT)
}

/// Build a layout from parsed face-list data.
///
/// Pools are copied in order; colors land after the builder's default
/// color. Each face goes through the triplet path, so its color indices are
/// absent. Out-of-range indices surface as validation errors from `build()`.
pub fn create_mesh_layout_from_obj(mesh: &ParsedMesh) -> Result<MeshLayout> {
    let mut builder = MeshLayoutBuilder::new();

    for v in &mesh.vertices {
        builder.push_vertex(Vec3::from(*v));
    }
    for vt in &mesh.tex_coords {
        builder.push_tex_coord(Vec2::from(*vt));
    }
    for vn in &mesh.normals {
        builder.push_normal(Vec3::from(*vn));
    }
    for c in &mesh.colors {
        builder.push_color(Vec4::from(*c));
    }

    for face in &mesh.faces {
        for t in &face.triplets {
            builder.push_triplet(Triplet::new(
                to_pool_index(t.v),
                to_pool_index(t.vn),
                to_pool_index(t.vt),
            ));
        }
        builder.push_triplet_face();
    }

    let layout = builder.build()?;
    debug!(
        vertices = layout.vertex_count(),
        faces = layout.face_count(),
        colors = layout.colors().len(),
        "imported face-list"
    );
    Ok(layout)
}
