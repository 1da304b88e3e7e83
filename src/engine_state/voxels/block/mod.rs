//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, the static block type
//! registry, and the per-voxel block data structure.

use block_type::BlockType;
use registry::BlockTypeRegistry;

pub mod block_side;
pub mod block_type;
pub mod registry;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage and serialization of block data.
pub type BlockTypeSize = u8;

/// The read-only block handed out for locators that do not name a block.
pub static INVALID_BLOCK: Block = Block {
    block_type: BlockType::INVALID as BlockTypeSize,
    light_dirty: false,
};

/// Represents a single voxel block in the world.
///
/// Blocks are stored by value in their chunk's flat array and hold no references;
/// every relationship between blocks is positional. Changing a block's type through
/// [`Block::set_type`] does not mark anything dirty: mutations go through the chunk
/// map so the owning chunk and its seam neighbors are repainted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    block_type: BlockTypeSize,
    /// Set while the block is waiting to be revisited by light propagation.
    light_dirty: bool,
}

impl Block {
    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
            light_dirty: false,
        }
    }

    /// Restores a block from its stored form. Unknown values read back as `INVALID`.
    pub fn from_raw(block_type: BlockTypeSize) -> Self {
        Block {
            block_type,
            light_dirty: false,
        }
    }

    pub fn get_type(&self) -> BlockType {
        BlockType::from_raw(self.block_type)
    }

    pub fn set_type(&mut self, block_type: BlockType) {
        self.block_type = block_type as BlockTypeSize;
    }

    pub fn raw_type(&self) -> BlockTypeSize {
        self.block_type
    }

    /// Whether this block hides the faces of its neighbors.
    pub fn is_opaque(&self, registry: &BlockTypeRegistry) -> bool {
        registry.get(self.get_type()).is_fully_opaque
    }

    pub fn is_light_dirty(&self) -> bool {
        self.light_dirty
    }

    pub fn set_light_dirty(&mut self, light_dirty: bool) {
        self.light_dirty = light_dirty;
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::new(BlockType::AIR)
    }
}
