//! # Chunk Creation Module
//!
//! Chunks are filled in block-index order (X fastest, then Y, then Z), which is the
//! order the bit-packed index enumerates them in. The `ChunkCreationIterator` keeps
//! track of the local position while blocks are pushed so generators only decide
//! *what* goes next, never *where* it lands.

use cgmath::Point2;

use crate::config::TerrainSettings;
use crate::engine_state::voxels::block::{block_type::BlockType, Block};
use crate::engine_state::voxels::terrain_noise::Noise2D;

use super::{Chunk, ChunkCoordinate, ChunkLayout};

/// Number of dirt layers directly beneath the grass surface.
pub const DIRT_DEPTH: u32 = 2;

/// A builder that fills a chunk's flat block array in index order.
pub struct ChunkCreationIterator {
    coordinate: ChunkCoordinate,
    layout: ChunkLayout,
    blocks: Vec<Block>,
    local_x: u32,
    local_y: u32,
    local_z: u32,
}

impl ChunkCreationIterator {
    pub fn new(coordinate: ChunkCoordinate, layout: ChunkLayout) -> Self {
        ChunkCreationIterator {
            coordinate,
            layout,
            blocks: Vec::with_capacity(layout.volume()),
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    /// The local (x, y, z) the next pushed block will occupy.
    pub fn next_position(&self) -> (u32, u32, u32) {
        (self.local_x, self.local_y, self.local_z)
    }

    pub fn is_full(&self) -> bool {
        self.blocks.len() == self.layout.volume()
    }

    /// Adds a block at the current position and advances the position.
    ///
    /// Pushing past the end of the chunk is ignored.
    pub fn push_block_type(&mut self, block_type: BlockType) {
        self.push_block(Block::new(block_type));
    }

    pub fn push_block(&mut self, block: Block) {
        if self.is_full() {
            return;
        }
        self.blocks.push(block);

        self.local_x += 1;
        if self.local_x == self.layout.width_x() {
            self.local_x = 0;
            self.local_y += 1;
            if self.local_y == self.layout.depth_y() {
                self.local_y = 0;
                self.local_z += 1;
            }
        }
    }

    /// Finalizes the chunk. Any positions never pushed are filled with air.
    ///
    /// The returned chunk is dirty and has no neighbors or mesh yet.
    pub fn return_chunk(mut self) -> Chunk {
        self.blocks.resize(self.layout.volume(), Block::default());
        Chunk::from_blocks(self.coordinate, self.layout, self.blocks)
    }
}

/// Fills a chunk with noise-shaped terrain.
///
/// Each column's surface height is `sea_level + noise * amplitude`, clamped to the
/// chunk. The surface block is grass, the [`DIRT_DEPTH`] blocks below it are dirt,
/// everything further down is stone and everything above is air.
pub fn generate_terrain(
    coordinate: ChunkCoordinate,
    layout: ChunkLayout,
    noise: &dyn Noise2D,
    terrain: &TerrainSettings,
) -> Chunk {
    let origin = layout.chunk_origin(coordinate);
    let max_height = layout.height_z() as f32 - 1.0;

    let mut surface_heights = Vec::with_capacity((layout.width_x() * layout.depth_y()) as usize);
    for y in 0..layout.depth_y() {
        for x in 0..layout.width_x() {
            let column = Point2::new(origin.x + x as f32, origin.y + y as f32);
            let sample = noise.noise_2d(column.x, column.y, terrain.frequency, terrain.octaves);
            let height = (terrain.sea_level as f32 + sample * terrain.amplitude)
                .round()
                .clamp(0.0, max_height);
            surface_heights.push(height as u32);
        }
    }

    let mut cci = ChunkCreationIterator::new(coordinate, layout);
    for z in 0..layout.height_z() {
        for surface in surface_heights.iter().copied() {
            cci.push_block_type(column_block_type(z, surface));
        }
    }

    cci.return_chunk()
}

/// The block type at height `z` in a column whose grass surface is at `surface`.
pub fn column_block_type(z: u32, surface: u32) -> BlockType {
    if z > surface {
        BlockType::AIR
    } else if z == surface {
        BlockType::GRASS
    } else if z + DIRT_DEPTH >= surface {
        BlockType::DIRT
    } else {
        BlockType::STONE
    }
}
