// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use thiserror::Error;

/// Result type for mesh operations
pub type Result<T> = std::result::Result<T, Error>;

/// Attribute pool a face index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Vertex,
    Normal,
    TexCoord,
    Color,
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pool::Vertex => "vertex",
            Pool::Normal => "normal",
            Pool::TexCoord => "texture coordinate",
            Pool::Color => "color",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while building or encoding meshes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid {pool} index {index} at face {face}, corner {corner} (pool size {len})")]
    Validation {
        pool: Pool,
        face: usize,
        corner: usize,
        index: usize,
        len: usize,
    },

    #[error("Face {face} has {corners} corners, at least 3 are required")]
    DegenerateFace { face: usize, corners: usize },

    #[error("Attribute {attribute} has {actual} entries, expected {expected}")]
    AttributeLength {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{0} triangles do not fit a 32-bit count")]
    TooManyTriangles(usize),

    #[error("Core error: {0}")]
    Core(#[from] meshconv_core::Error),
}

impl Error {
    /// True for index and arity failures raised by the builder
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. } | Error::DegenerateFace { .. })
    }
}
