use cgmath::Point3;

use crate::engine_state::voxels::block::{block_side::BlockSide, block_type::BlockType};

/// Represents a single quad face of a voxel in the mesh.
///
/// A face is defined by four corner points (lower-left, lower-right, upper-left,
/// upper-right) in chunk-local block coordinates. Corners are wound so that
/// `ll, lr, ur` is counter-clockwise when viewed from outside the block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub ll: Point3<u32>,
    pub lr: Point3<u32>,
    pub ul: Point3<u32>,
    pub ur: Point3<u32>,
    pub block_type: BlockType,
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face of the block at local `(x, y, z)` on the given side.
    pub fn new(x: u32, y: u32, z: u32, block_type: BlockType, block_side: BlockSide) -> Self {
        let (ll, lr, ul, ur) = match block_side {
            BlockSide::TOP => (
                Point3::new(x, y, z + 1),
                Point3::new(x + 1, y, z + 1),
                Point3::new(x, y + 1, z + 1),
                Point3::new(x + 1, y + 1, z + 1),
            ),
            BlockSide::BOTTOM => (
                Point3::new(x + 1, y, z),
                Point3::new(x, y, z),
                Point3::new(x + 1, y + 1, z),
                Point3::new(x, y + 1, z),
            ),
            BlockSide::EAST => (
                Point3::new(x + 1, y, z),
                Point3::new(x + 1, y + 1, z),
                Point3::new(x + 1, y, z + 1),
                Point3::new(x + 1, y + 1, z + 1),
            ),
            BlockSide::WEST => (
                Point3::new(x, y + 1, z),
                Point3::new(x, y, z),
                Point3::new(x, y + 1, z + 1),
                Point3::new(x, y, z + 1),
            ),
            BlockSide::NORTH => (
                Point3::new(x + 1, y + 1, z),
                Point3::new(x, y + 1, z),
                Point3::new(x + 1, y + 1, z + 1),
                Point3::new(x, y + 1, z + 1),
            ),
            BlockSide::SOUTH => (
                Point3::new(x, y, z),
                Point3::new(x + 1, y, z),
                Point3::new(x, y, z + 1),
                Point3::new(x + 1, y, z + 1),
            ),
        };

        Face {
            ll,
            lr,
            ul,
            ur,
            block_type,
            block_side,
        }
    }
}
