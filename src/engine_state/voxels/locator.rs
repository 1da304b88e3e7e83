//! # Block Locator
//!
//! A [`BlockLocator`] names one block of the active world as a (chunk coordinate,
//! block index) pair. It is `Copy` and holds no borrow; every query resolves it
//! against the [`ChunkMap`] it is handed, so a locator whose chunk has since been
//! deactivated quietly reads as `INVALID` instead of dangling.
//!
//! Stepping along x or y uses the bit-packed index directly: the low bits of the
//! index are the local x and y, so "am I on the chunk edge?" is a mask test. Away
//! from the edge the index is nudged in place; on the edge the step crosses into the
//! linked neighbor with that axis' bits flipped (`W-1` becomes `0` and back). Steps
//! up and down never leave the chunk.

use std::collections::VecDeque;

use cgmath::{EuclideanSpace, Point3};

use super::block::{
    block_side::BlockSide, block_type::BlockType, registry::BlockTypeRegistry, Block,
    INVALID_BLOCK,
};
use super::chunk::{Chunk, ChunkCoordinate, ChunkMap};

/// A cursor naming one block in the active world, or `INVALID`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockLocator {
    chunk: Option<ChunkCoordinate>,
    index: usize,
}

impl BlockLocator {
    /// The locator that names no block.
    pub const INVALID: BlockLocator = BlockLocator {
        chunk: None,
        index: 0,
    };

    pub fn new(chunk: ChunkCoordinate, index: usize) -> Self {
        BlockLocator {
            chunk: Some(chunk),
            index,
        }
    }

    /// The locator for a local position in an active chunk, or `INVALID`.
    pub fn at_local(chunks: &ChunkMap, chunk: ChunkCoordinate, x: u32, y: u32, z: u32) -> Self {
        let layout = chunks.layout();
        if !chunks.contains(chunk)
            || x >= layout.width_x()
            || y >= layout.depth_y()
            || z >= layout.height_z()
        {
            return BlockLocator::INVALID;
        }
        BlockLocator::new(chunk, layout.encode(x, y, z))
    }

    pub fn is_valid(&self) -> bool {
        self.chunk.is_some()
    }

    pub fn chunk_coordinate(&self) -> Option<ChunkCoordinate> {
        self.chunk
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn resolve<'a>(&self, chunks: &'a ChunkMap) -> Option<&'a Chunk> {
        chunks.get(self.chunk?)
    }

    /// The named block, or a read-only `INVALID` block.
    pub fn get_block<'a>(&self, chunks: &'a ChunkMap) -> &'a Block {
        self.resolve(chunks)
            .and_then(|chunk| chunk.block(self.index))
            .unwrap_or(&INVALID_BLOCK)
    }

    pub fn get_type(&self, chunks: &ChunkMap) -> BlockType {
        self.get_block(chunks).get_type()
    }

    pub fn is_opaque(&self, chunks: &ChunkMap, registry: &BlockTypeRegistry) -> bool {
        self.get_block(chunks).is_opaque(registry)
    }

    /// World-space minimum corner of the block; the origin for `INVALID`.
    pub fn get_block_world_position(&self, chunks: &ChunkMap) -> Point3<f32> {
        self.resolve(chunks)
            .map(|chunk| chunk.block_world_position(self.index))
            .unwrap_or(Point3::origin())
    }

    /// Changes the block's type.
    ///
    /// The owning chunk marks itself dirty and, when the block sits on a chunk seam,
    /// the chunks across the seam are marked dirty as well. Returns false for
    /// `INVALID`.
    pub fn change_type_to(&self, chunks: &mut ChunkMap, block_type: BlockType) -> bool {
        let Some(coordinate) = self.chunk else {
            return false;
        };
        let changed = chunks
            .get_mut(coordinate)
            .is_some_and(|chunk| chunk.set_block_type(self.index, block_type));
        if changed {
            self.set_neighbor_block_chunks_dirty(chunks);
        }
        changed
    }

    pub fn set_light_dirty(&self, chunks: &mut ChunkMap, light_dirty: bool) {
        if let Some(block) = self
            .chunk
            .and_then(|coordinate| chunks.get_mut(coordinate))
            .and_then(|chunk| chunk.block_mut(self.index))
        {
            block.set_light_dirty(light_dirty);
        }
    }

    pub fn north(&self, chunks: &ChunkMap) -> BlockLocator {
        self.neighbor(BlockSide::NORTH, chunks)
    }

    pub fn south(&self, chunks: &ChunkMap) -> BlockLocator {
        self.neighbor(BlockSide::SOUTH, chunks)
    }

    pub fn east(&self, chunks: &ChunkMap) -> BlockLocator {
        self.neighbor(BlockSide::EAST, chunks)
    }

    pub fn west(&self, chunks: &ChunkMap) -> BlockLocator {
        self.neighbor(BlockSide::WEST, chunks)
    }

    pub fn up(&self, chunks: &ChunkMap) -> BlockLocator {
        self.neighbor(BlockSide::TOP, chunks)
    }

    pub fn down(&self, chunks: &ChunkMap) -> BlockLocator {
        self.neighbor(BlockSide::BOTTOM, chunks)
    }

    /// The adjacent block on the given side, or `INVALID` if it lies in an unlinked
    /// chunk or above/below the world.
    pub fn neighbor(&self, side: BlockSide, chunks: &ChunkMap) -> BlockLocator {
        let Some(chunk) = self.resolve(chunks) else {
            return BlockLocator::INVALID;
        };
        let coordinate = chunk.coordinate();
        let layout = chunk.layout();
        let index = self.index;
        let x_mask = layout.x_mask();
        let y_mask = layout.y_mask();

        match side {
            BlockSide::EAST if index & x_mask == x_mask => cross(chunk, side, index ^ x_mask),
            BlockSide::EAST => BlockLocator::new(coordinate, index + 1),
            BlockSide::WEST if index & x_mask == 0 => cross(chunk, side, index ^ x_mask),
            BlockSide::WEST => BlockLocator::new(coordinate, index - 1),
            BlockSide::NORTH if index & y_mask == y_mask => cross(chunk, side, index ^ y_mask),
            BlockSide::NORTH => BlockLocator::new(coordinate, index + layout.y_step()),
            BlockSide::SOUTH if index & y_mask == 0 => cross(chunk, side, index ^ y_mask),
            BlockSide::SOUTH => BlockLocator::new(coordinate, index - layout.y_step()),
            BlockSide::TOP if layout.is_top_layer(index) => BlockLocator::INVALID,
            BlockSide::TOP => BlockLocator::new(coordinate, index + layout.z_step()),
            BlockSide::BOTTOM if layout.is_bottom_layer(index) => BlockLocator::INVALID,
            BlockSide::BOTTOM => BlockLocator::new(coordinate, index - layout.z_step()),
        }
    }

    /// Marks the chunks across any seam this block touches as dirty, so a change on
    /// the boundary repaints both sides.
    pub fn set_neighbor_block_chunks_dirty(&self, chunks: &mut ChunkMap) {
        for side in BlockSide::HORIZONTAL {
            let neighbor = self.neighbor(side, chunks);
            if let Some(coordinate) = neighbor.chunk {
                if neighbor.chunk != self.chunk {
                    chunks.mark_dirty(coordinate);
                }
            }
        }
    }

    /// Seeds a breadth-first light propagation pass from this block.
    ///
    /// Each of the six neighbors that is not already light-dirty becomes light-dirty,
    /// dirties its chunk, and is appended to `queue`.
    pub fn mark_neighbors_dirty_for_lighting(
        &self,
        chunks: &mut ChunkMap,
        queue: &mut VecDeque<BlockLocator>,
    ) {
        for side in BlockSide::all() {
            let neighbor = self.neighbor(side, chunks);
            let Some(chunk) = neighbor.chunk.and_then(|coordinate| chunks.get_mut(coordinate))
            else {
                continue;
            };
            let Some(block) = chunk.block_mut(neighbor.index) else {
                continue;
            };
            if block.is_light_dirty() {
                continue;
            }
            block.set_light_dirty(true);
            chunk.mark_dirty();
            queue.push_back(neighbor);
        }
    }
}

fn cross(chunk: &Chunk, side: BlockSide, index: usize) -> BlockLocator {
    match chunk.neighbor(side) {
        Some(neighbor) => BlockLocator::new(neighbor, index),
        None => BlockLocator::INVALID,
    }
}
