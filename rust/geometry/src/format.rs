// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh encoding driver
//!
//! A [`MeshFormat`] supplies leaf write operations; [`MeshWriter`] drives
//! them over a fan-triangulating reader. Every hook has a default, so a
//! format overrides only what it emits: per-element writes plus header and
//! footer. The list hooks loop over their element hook.

use meshconv_core::{ByteOrder, BytesWriter, Representation};
use tracing::debug;

use crate::error::Result;
use crate::mesh::{MeshLayout, Triangle, TripletFace, Vec2, Vec3};
use crate::reader::MeshLayoutReader;

/// Leaf operations of a concrete file format
pub trait MeshFormat {
    fn representation(&self) -> Representation;

    fn byte_order(&self) -> ByteOrder;

    fn write_header(&self, _writer: &mut BytesWriter, _reader: &MeshLayoutReader<'_>) -> Result<()> {
        Ok(())
    }

    /// Everything between header and footer; triangles by default
    fn write_body(&self, writer: &mut BytesWriter, reader: &MeshLayoutReader<'_>) -> Result<()> {
        self.write_triangles(writer, &reader.triangles())
    }

    fn write_footer(&self, _writer: &mut BytesWriter, _reader: &MeshLayoutReader<'_>) -> Result<()> {
        Ok(())
    }

    fn write_vertices(&self, writer: &mut BytesWriter, vertices: &[Vec3]) -> Result<()> {
        for vertex in vertices {
            self.write_vertex(writer, vertex)?;
        }
        Ok(())
    }

    fn write_vertex(&self, _writer: &mut BytesWriter, _vertex: &Vec3) -> Result<()> {
        Ok(())
    }

    fn write_normals(&self, writer: &mut BytesWriter, normals: &[Vec3]) -> Result<()> {
        for normal in normals {
            self.write_normal(writer, normal)?;
        }
        Ok(())
    }

    fn write_normal(&self, _writer: &mut BytesWriter, _normal: &Vec3) -> Result<()> {
        Ok(())
    }

    fn write_tex_coords(&self, writer: &mut BytesWriter, tex_coords: &[Vec2]) -> Result<()> {
        for tex_coord in tex_coords {
            self.write_tex_coord(writer, tex_coord)?;
        }
        Ok(())
    }

    fn write_tex_coord(&self, _writer: &mut BytesWriter, _tex_coord: &Vec2) -> Result<()> {
        Ok(())
    }

    fn write_triplet_faces(&self, writer: &mut BytesWriter, faces: &[TripletFace]) -> Result<()> {
        for face in faces {
            self.write_triplet_face(writer, face)?;
        }
        Ok(())
    }

    fn write_triplet_face(&self, _writer: &mut BytesWriter, _face: &TripletFace) -> Result<()> {
        Ok(())
    }

    fn write_triangles(&self, writer: &mut BytesWriter, triangles: &[Triangle]) -> Result<()> {
        for triangle in triangles {
            self.write_triangle(writer, triangle)?;
        }
        Ok(())
    }

    fn write_triangle(&self, _writer: &mut BytesWriter, _triangle: &Triangle) -> Result<()> {
        Ok(())
    }
}

/// Encodes layouts with a fixed format, reusing its buffer between calls
#[derive(Debug, Clone)]
pub struct MeshWriter<F> {
    format: F,
    writer: BytesWriter,
}

impl<F: MeshFormat> MeshWriter<F> {
    pub fn new(format: F) -> Self {
        let writer = BytesWriter::new(format.representation(), format.byte_order());
        Self { format, writer }
    }

    #[inline]
    pub fn format(&self) -> &F {
        &self.format
    }

    /// Encode `layout`; on failure the buffer is discarded
    pub fn write(&mut self, layout: &MeshLayout) -> Result<Vec<u8>> {
        let reader = MeshLayoutReader::new(layout);
        self.writer.clear();

        let result = self
            .format
            .write_header(&mut self.writer, &reader)
            .and_then(|_| self.format.write_body(&mut self.writer, &reader))
            .and_then(|_| self.format.write_footer(&mut self.writer, &reader));

        if let Err(e) = result {
            self.writer.clear();
            return Err(e);
        }

        debug!(bytes = self.writer.len(), faces = layout.face_count(), "encoded mesh");
        Ok(self.writer.take_bytes())
    }
}

/// Encode a layout with `format` in one call
pub fn write_mesh<F: MeshFormat>(format: F, layout: &MeshLayout) -> Result<Vec<u8>> {
    MeshWriter::new(format).write(layout)
}
