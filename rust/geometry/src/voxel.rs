// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Octree voxelization of a closed mesh
//!
//! The root covers the cubic bounding box of the layout. Nodes split
//! uniformly until `max_depth`; each leaf is `Fill` when its center passes
//! the half-space containment test. Eight leaf siblings with the same
//! fillness collapse back into their parent.

use rayon::prelude::*;
use tracing::debug;

use crate::calc::{eq_bounding_box, is_point_inside_triangles, BoundingBox};
use crate::mesh::{MeshLayout, Triangle, Vec3};
use crate::reader::MeshLayoutReader;

/// Classification of an octree leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafFillness {
    Fill,
    Empty,
}

/// One cell of the octree.
///
/// For an interior node, `fillness` is `Fill` when any child holds filled
/// space.
#[derive(Debug, Clone, PartialEq)]
pub struct OctreeNode {
    pub fillness: LeafFillness,
    pub bounds: BoundingBox,
    pub children: Option<Box<[OctreeNode; 8]>>,
}

impl OctreeNode {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            fillness: LeafFillness::Empty,
            bounds: BoundingBox::new(min, max),
            children: None,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Split into eight equal children, all `Empty`.
    ///
    /// Child `i` is offset by half the extent along X when bit 0 is set,
    /// along Z for bit 1 and along Y for bit 2: the lower Y layer comes
    /// first.
    pub fn divide(&mut self) {
        let half = self.bounds.size() * 0.5;
        let min = self.bounds.min;

        let children = std::array::from_fn(|i| {
            let offset = Vec3::new(
                if i & 1 != 0 { half.x } else { 0.0 },
                if i & 4 != 0 { half.y } else { 0.0 },
                if i & 2 != 0 { half.z } else { 0.0 },
            );
            let child_min = min + offset;
            OctreeNode::new(child_min, child_min + half)
        });

        self.children = Some(Box::new(children));
    }

    /// Number of leaves below (and including) this node
    pub fn leaf_count(&self) -> usize {
        match &self.children {
            Some(children) => children.iter().map(OctreeNode::leaf_count).sum(),
            None => 1,
        }
    }

    /// Total volume of `Fill` leaves
    pub fn filled_volume(&self) -> f64 {
        match &self.children {
            Some(children) => children.iter().map(OctreeNode::filled_volume).sum(),
            None if self.fillness == LeafFillness::Fill => {
                let size = self.bounds.size().cast::<f64>();
                size.x * size.y * size.z
            }
            None => 0.0,
        }
    }

    fn refine(&mut self, depth: usize, max_depth: usize, triangles: &[Triangle]) {
        if depth >= max_depth {
            self.fillness = classify(&self.bounds.center(), triangles);
            return;
        }

        self.divide();
        let Some(children) = self.children.as_mut() else {
            return;
        };
        children
            .as_mut_slice()
            .par_iter_mut()
            .for_each(|child| child.refine(depth + 1, max_depth, triangles));

        let first = children[0].fillness;
        if children.iter().all(|c| c.is_leaf() && c.fillness == first) {
            self.children = None;
            self.fillness = first;
        } else if children.iter().any(|c| c.fillness == LeafFillness::Fill) {
            self.fillness = LeafFillness::Fill;
        }
    }
}

#[inline]
fn classify(point: &Vec3, triangles: &[Triangle]) -> LeafFillness {
    if is_point_inside_triangles(point, triangles) {
        LeafFillness::Fill
    } else {
        LeafFillness::Empty
    }
}

/// Voxelize `layout` down to `max_depth` levels below the root.
///
/// A layout without triangles yields a single empty leaf.
pub fn build_octree_from_mesh_layout(layout: &MeshLayout, max_depth: usize) -> OctreeNode {
    let bounds = eq_bounding_box(layout);
    let mut root = OctreeNode::new(bounds.min, bounds.max);

    let triangles = MeshLayoutReader::new(layout).triangles();
    if triangles.is_empty() {
        return root;
    }

    root.refine(0, max_depth, &triangles);
    debug!(max_depth, leaves = root.leaf_count(), "built octree");
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MeshLayoutBuilder;
    use crate::mesh::Triplet;
    use approx::assert_relative_eq;

    /// Axis-aligned box with outward winding
    fn block(min: Vec3, max: Vec3) -> MeshLayout {
        let mut builder = MeshLayoutBuilder::new();
        builder.push_vertices(&[
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ]);
        for face in [[0, 3, 2, 1], [4, 5, 6, 7], [0, 1, 5, 4], [2, 3, 7, 6], [0, 4, 7, 3], [1, 2, 6, 5]] {
            for v in face {
                builder.push_triplet(Triplet::vertex(v));
            }
            builder.push_triplet_face();
        }
        builder.build().unwrap()
    }

    fn assert_bounds(node: &OctreeNode, min: [f32; 3], max: [f32; 3]) {
        assert_relative_eq!(node.bounds.min, Vec3::from(min), epsilon = 1e-6);
        assert_relative_eq!(node.bounds.max, Vec3::from(max), epsilon = 1e-6);
    }

    #[test]
    fn test_divide_unit_box() {
        let mut root = OctreeNode::new(Vec3::zeros(), Vec3::repeat(1.0));
        root.divide();
        let children = root.children.as_ref().unwrap();

        assert_bounds(&children[0], [0.0, 0.0, 0.0], [0.5, 0.5, 0.5]);
        assert_bounds(&children[1], [0.5, 0.0, 0.0], [1.0, 0.5, 0.5]);
        assert_bounds(&children[2], [0.0, 0.0, 0.5], [0.5, 0.5, 1.0]);
        assert_bounds(&children[3], [0.5, 0.0, 0.5], [1.0, 0.5, 1.0]);
        assert_bounds(&children[4], [0.0, 0.5, 0.0], [0.5, 1.0, 0.5]);
        assert_bounds(&children[5], [0.5, 0.5, 0.0], [1.0, 1.0, 0.5]);
        assert_bounds(&children[6], [0.0, 0.5, 0.5], [0.5, 1.0, 1.0]);
        assert_bounds(&children[7], [0.5, 0.5, 0.5], [1.0, 1.0, 1.0]);
        assert!(children.iter().all(|c| c.fillness == LeafFillness::Empty && c.is_leaf()));
    }

    #[test]
    fn test_divide_centered_box() {
        let mut root = OctreeNode::new(Vec3::repeat(-1.0), Vec3::repeat(1.0));
        root.divide();
        let children = root.children.as_ref().unwrap();

        assert_bounds(&children[0], [-1.0, -1.0, -1.0], [0.0, 0.0, 0.0]);
        assert_bounds(&children[3], [0.0, -1.0, 0.0], [1.0, 0.0, 1.0]);
        assert_bounds(&children[6], [-1.0, 0.0, 0.0], [0.0, 1.0, 1.0]);
        assert_bounds(&children[7], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_full_cube_collapses_to_root() {
        let octree = build_octree_from_mesh_layout(&block(Vec3::repeat(-1.0), Vec3::repeat(1.0)), 2);
        assert!(octree.is_leaf());
        assert_eq!(octree.fillness, LeafFillness::Fill);
        assert_relative_eq!(octree.filled_volume(), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_slab_volume_is_recovered() {
        // 2 x 1 x 1 slab inside a 2 x 2 x 2 root; leaf centers never touch a face
        let layout = block(Vec3::zeros(), Vec3::new(2.0, 1.0, 1.0));
        let octree = build_octree_from_mesh_layout(&layout, 2);

        assert!(!octree.is_leaf());
        assert_eq!(octree.fillness, LeafFillness::Fill);
        assert_relative_eq!(octree.filled_volume(), 2.0, epsilon = 1e-6);
        // Every depth-1 cell straddles a face, so nothing collapses
        assert_eq!(octree.leaf_count(), 64);
    }

    #[test]
    fn test_empty_layout_is_single_empty_leaf() {
        let layout = MeshLayoutBuilder::new().build().unwrap();
        let octree = build_octree_from_mesh_layout(&layout, 3);
        assert!(octree.is_leaf());
        assert_eq!(octree.fillness, LeafFillness::Empty);
    }

    #[test]
    fn test_depth_zero_classifies_root() {
        let octree = build_octree_from_mesh_layout(&block(Vec3::zeros(), Vec3::repeat(1.0)), 0);
        assert!(octree.is_leaf());
        assert_eq!(octree.fillness, LeafFillness::Fill);
    }
}
