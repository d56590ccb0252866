// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! meshconv Geometry
//!
//! Indexed mesh model with a validating builder, polygon triangulation,
//! geometric queries and transforms, and STL / face-list encoders.
//!
//! ```rust
//! use meshconv_geometry::{write_stl, MeshLayoutBuilder, Triangle, Vector3};
//!
//! let mut builder = MeshLayoutBuilder::new();
//! builder.push_triangle(Triangle::new(
//!     Vector3::new(0.0, 0.0, 0.0),
//!     Vector3::new(1.0, 0.0, 0.0),
//!     Vector3::new(0.0, 1.0, 0.0),
//! ));
//! let layout = builder.build().unwrap();
//! assert_eq!(write_stl(&layout).unwrap().len(), 84 + 50);
//! ```

pub mod builder;
pub mod calc;
pub mod error;
pub mod format;
pub mod import;
pub mod mesh;
pub mod obj;
pub mod reader;
pub mod stl;
pub mod transform;
pub mod triangulation;
pub mod voxel;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector2, Vector3, Vector4};

pub use builder::MeshLayoutBuilder;
pub use calc::{
    calculate_surface_area, calculate_volume, eq_bounding_box, find_bounding_box,
    is_point_inside_mesh, measure, BoundingBox, MeshProperties,
};
pub use error::{Error, Pool, Result};
pub use format::{write_mesh, MeshFormat, MeshWriter};
pub use import::create_mesh_layout_from_obj;
pub use mesh::{
    FaceLayout, IndexList, MeshLayout, Polygon, Triangle, Triplet, TripletFace, Vec2, Vec3, Vec4,
    ABSENT, DEFAULT_COLOR,
};
pub use obj::{write_obj, ObjFormat};
pub use reader::MeshLayoutReader;
pub use stl::{write_stl, StlFormat};
pub use transform::{apply_transforms_to_layout, Transform};
pub use triangulation::{EarcutTriangulation, FanTriangulation, TriangulationStrategy};
pub use voxel::{build_octree_from_mesh_layout, LeafFillness, OctreeNode};
