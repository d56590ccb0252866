// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # meshconv core
//!
//! Low-level building blocks shared by the mesh model and the codecs:
//!
//! - **Face-list parsing**: line-oriented [nom](https://docs.rs/nom) parser
//!   for Wavefront OBJ geometry statements, producing a [`ParsedMesh`] with
//!   1-based indices
//! - **Binary writing**: [`BytesWriter`], an append-only buffer whose numeric
//!   writes honor an explicit byte order regardless of the host
//!
//! ## Quick Start
//!
//! ```rust
//! use meshconv_core::{parse_obj, BytesWriter, ByteOrder, Representation};
//!
//! let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
//! assert_eq!(mesh.faces.len(), 1);
//!
//! let mut writer = BytesWriter::new(Representation::Binary, ByteOrder::BigEndian);
//! writer.write_i32(1).unwrap();
//! assert_eq!(writer.get_bytes(), &[0, 0, 0, 1]);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for parsed data

pub mod bytes;
pub mod error;
pub mod parser;

pub use bytes::{ByteOrder, BytesWriter, Representation};
pub use error::{Error, Result};
pub use parser::{parse_obj, parse_obj_bytes, ParsedFace, ParsedMesh, ParsedTriplet};
