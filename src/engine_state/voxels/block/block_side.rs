//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the directions between
//! neighboring blocks and chunks. The world is Z-up: north is +Y, east is +X.

use cgmath::{Vector2, Vector3};

/// Represents the six possible faces of a voxel block.
///
/// The first four variants are the horizontal directions and double as indices
/// into a chunk's neighbor slots; chunks are never stacked vertically.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The north face (facing positive Y)
    NORTH = 0,

    /// The south face (facing negative Y)
    SOUTH = 1,

    /// The east face (facing positive X)
    EAST = 2,

    /// The west face (facing negative X)
    WEST = 3,

    /// The top face (facing positive Z)
    TOP = 4,

    /// The bottom face (facing negative Z)
    BOTTOM = 5,
}

impl BlockSide {
    /// The four sides that can cross into a neighboring chunk.
    pub const HORIZONTAL: [BlockSide; 4] = [
        BlockSide::NORTH,
        BlockSide::SOUTH,
        BlockSide::EAST,
        BlockSide::WEST,
    ];

    /// Returns an array containing all six block faces in a consistent order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::NORTH,
            BlockSide::SOUTH,
            BlockSide::EAST,
            BlockSide::WEST,
            BlockSide::TOP,
            BlockSide::BOTTOM,
        ]
    }

    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::NORTH => BlockSide::SOUTH,
            BlockSide::SOUTH => BlockSide::NORTH,
            BlockSide::EAST => BlockSide::WEST,
            BlockSide::WEST => BlockSide::EAST,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::BOTTOM => BlockSide::TOP,
        }
    }

    /// The unit step in block coordinates toward this side.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::NORTH => Vector3::new(0, 1, 0),
            BlockSide::SOUTH => Vector3::new(0, -1, 0),
            BlockSide::EAST => Vector3::new(1, 0, 0),
            BlockSide::WEST => Vector3::new(-1, 0, 0),
            BlockSide::TOP => Vector3::new(0, 0, 1),
            BlockSide::BOTTOM => Vector3::new(0, 0, -1),
        }
    }

    /// The outward face normal.
    pub fn normal(self) -> Vector3<f32> {
        self.offset().cast::<f32>().unwrap_or(Vector3::new(0.0, 0.0, 0.0))
    }

    /// The unit step in chunk coordinates toward this side, if it is horizontal.
    pub fn chunk_offset(self) -> Option<Vector2<i32>> {
        match self {
            BlockSide::NORTH => Some(Vector2::new(0, 1)),
            BlockSide::SOUTH => Some(Vector2::new(0, -1)),
            BlockSide::EAST => Some(Vector2::new(1, 0)),
            BlockSide::WEST => Some(Vector2::new(-1, 0)),
            BlockSide::TOP | BlockSide::BOTTOM => None,
        }
    }

    /// The horizontal side whose chunk offset equals `delta`, if any.
    pub fn from_chunk_offset(delta: Vector2<i32>) -> Option<BlockSide> {
        BlockSide::HORIZONTAL
            .into_iter()
            .find(|side| side.chunk_offset() == Some(delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_offsets_cancel() {
        for side in BlockSide::all() {
            assert_eq!(side.offset() + side.opposite().offset(), Vector3::new(0, 0, 0));
        }
    }

    #[test]
    fn only_horizontal_sides_cross_chunks() {
        for side in BlockSide::HORIZONTAL {
            let delta = side.chunk_offset().unwrap();
            assert_eq!(BlockSide::from_chunk_offset(delta), Some(side));
        }
        assert_eq!(BlockSide::TOP.chunk_offset(), None);
        assert_eq!(BlockSide::from_chunk_offset(Vector2::new(1, 1)), None);
    }
}
