// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary STL encoding
//!
//! Layout, all little-endian:
//!
//! ```text
//! [u8; 80]  header, zero-filled
//! u32       triangle count
//! per triangle (50 bytes):
//!   [f32; 3]  face normal
//!   [f32; 3]  vertex 0, 1, 2
//!   u16       attribute byte count, always 0
//! ```

use meshconv_core::{ByteOrder, BytesWriter, Representation};

use crate::error::{Error, Result};
use crate::format::{MeshFormat, MeshWriter};
use crate::mesh::{MeshLayout, Triangle, Vec3};
use crate::reader::MeshLayoutReader;

/// Size of the fixed STL header
pub const STL_HEADER_LEN: usize = 80;

/// Encoded size of one triangle record
pub const STL_TRIANGLE_LEN: usize = 50;

/// Binary STL format
#[derive(Debug, Clone, Copy, Default)]
pub struct StlFormat;

impl StlFormat {
    /// Expected size of a file holding `triangles` triangles
    pub const fn encoded_len(triangles: usize) -> usize {
        STL_HEADER_LEN + 4 + triangles * STL_TRIANGLE_LEN
    }

    fn write_vec3(writer: &mut BytesWriter, v: &Vec3) -> Result<()> {
        writer.write_f32(v.x)?;
        writer.write_f32(v.y)?;
        writer.write_f32(v.z)?;
        Ok(())
    }
}

impl MeshFormat for StlFormat {
    fn representation(&self) -> Representation {
        Representation::Binary
    }

    fn byte_order(&self) -> ByteOrder {
        ByteOrder::LittleEndian
    }

    fn write_header(&self, writer: &mut BytesWriter, _reader: &MeshLayoutReader<'_>) -> Result<()> {
        writer.write_bytes(&[0u8; STL_HEADER_LEN]);
        Ok(())
    }

    fn write_body(&self, writer: &mut BytesWriter, reader: &MeshLayoutReader<'_>) -> Result<()> {
        let triangles = reader.triangles();
        let count =
            u32::try_from(triangles.len()).map_err(|_| Error::TooManyTriangles(triangles.len()))?;
        writer.write_u32(count)?;

        self.write_triangles(writer, &triangles)
    }

    fn write_triangle(&self, writer: &mut BytesWriter, triangle: &Triangle) -> Result<()> {
        Self::write_vec3(writer, &triangle.face_normal())?;
        for vertex in &triangle.vertices {
            Self::write_vec3(writer, vertex)?;
        }
        writer.write_u16(0)?;
        Ok(())
    }
}

/// Encode a layout as binary STL
pub fn write_stl(layout: &MeshLayout) -> Result<Vec<u8>> {
    MeshWriter::new(StlFormat).write(layout)
}
