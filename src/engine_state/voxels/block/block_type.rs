//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world and the
//! conversion from their compact stored form.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The set is fixed at compile time. `INVALID` is a sentinel used for blocks that
/// cannot be resolved (outside the world or in an inactive chunk) and for stored
/// values outside the known range.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Never solid, never opaque, never meshed.
    AIR = 0,

    /// The surface layer of generated terrain.
    GRASS = 1,

    /// The two layers directly beneath the surface.
    DIRT = 2,

    /// Everything below the dirt layers.
    STONE = 3,

    /// A light-emitting block.
    GLOWSTONE = 4,

    /// Sentinel for "no such block".
    INVALID = 255,
}

impl BlockType {
    /// Every real block type, in storage order.
    pub const ALL: [BlockType; 5] = [
        BlockType::AIR,
        BlockType::GRASS,
        BlockType::DIRT,
        BlockType::STONE,
        BlockType::GLOWSTONE,
    ];

    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// Unknown values resolve to `INVALID` instead of failing, so corrupted data
    /// can never take down meshing.
    pub fn from_raw(btype: BlockTypeSize) -> Self {
        BlockType::from_u8(btype).unwrap_or(BlockType::INVALID)
    }

    /// The compact stored form of this type.
    pub fn to_raw(self) -> BlockTypeSize {
        self as BlockTypeSize
    }
}
