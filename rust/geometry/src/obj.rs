// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face-list (Wavefront OBJ) text encoding
//!
//! Pools are written in order (`v`, `vt`, `vn`), then one `f` line per face
//! with 1-based indices. Faces are kept as polygons, not triangulated.

use std::fmt::Write as _;

use meshconv_core::{ByteOrder, BytesWriter, Representation};
use tracing::warn;

use crate::error::Result;
use crate::format::{MeshFormat, MeshWriter};
use crate::mesh::{MeshLayout, TripletFace, Vec2, Vec3, ABSENT};
use crate::reader::MeshLayoutReader;

/// Face-list text format
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjFormat;

impl MeshFormat for ObjFormat {
    fn representation(&self) -> Representation {
        Representation::Text
    }

    fn byte_order(&self) -> ByteOrder {
        ByteOrder::Native
    }

    fn write_header(&self, writer: &mut BytesWriter, reader: &MeshLayoutReader<'_>) -> Result<()> {
        let layout = reader.layout();
        writer.write_string(&format!(
            "# meshconv\n# vertices: {}, faces: {}\n",
            layout.vertex_count(),
            layout.face_count()
        ));
        Ok(())
    }

    fn write_body(&self, writer: &mut BytesWriter, reader: &MeshLayoutReader<'_>) -> Result<()> {
        self.write_vertices(writer, reader.vertices())?;
        self.write_tex_coords(writer, reader.tex_coords())?;
        self.write_normals(writer, reader.normals())?;
        self.write_triplet_faces(writer, &reader.triplet_faces())
    }

    fn write_vertex(&self, writer: &mut BytesWriter, vertex: &Vec3) -> Result<()> {
        writer.write_string(&format!("v {:.6} {:.6} {:.6}\n", vertex.x, vertex.y, vertex.z));
        Ok(())
    }

    fn write_tex_coord(&self, writer: &mut BytesWriter, tex_coord: &Vec2) -> Result<()> {
        writer.write_string(&format!("vt {:.6} {:.6}\n", tex_coord.x, tex_coord.y));
        Ok(())
    }

    fn write_normal(&self, writer: &mut BytesWriter, normal: &Vec3) -> Result<()> {
        writer.write_string(&format!("vn {:.6} {:.6} {:.6}\n", normal.x, normal.y, normal.z));
        Ok(())
    }

    /// Corners without a position cannot be expressed and are skipped.
    /// A face left with fewer than three corners is dropped.
    fn write_triplet_face(&self, writer: &mut BytesWriter, face: &TripletFace) -> Result<()> {
        let positioned = face.triplets.iter().filter(|t| t.vertex_index != ABSENT);
        let corners = positioned.clone().count();
        if corners < 3 {
            warn!(corners, "skipping face with fewer than 3 positioned corners");
            return Ok(());
        }

        let mut line = String::from("f");
        for triplet in positioned {
            let v = triplet.vertex_index + 1;
            // Writing into a String cannot fail
            let _ = match (triplet.tex_coord_index, triplet.normal_index) {
                (ABSENT, ABSENT) => write!(line, " {}", v),
                (vt, ABSENT) => write!(line, " {}/{}", v, vt + 1),
                (ABSENT, vn) => write!(line, " {}//{}", v, vn + 1),
                (vt, vn) => write!(line, " {}/{}/{}", v, vt + 1, vn + 1),
            };
        }
        line.push('\n');
        writer.write_string(&line);
        Ok(())
    }
}

/// Encode a layout as face-list text
pub fn write_obj(layout: &MeshLayout) -> Result<Vec<u8>> {
    MeshWriter::new(ObjFormat).write(layout)
}
