//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size column of blocks on the
//! horizontal chunk grid, together with its neighbor links, dirty flag and cached mesh.
//!
//! ## Block Addressing
//!
//! Blocks live in one flat array. A local position packs into a single index as
//!
//! ```text
//! index = x | (y << bits_x) | (z << (bits_x + bits_y))
//! ```
//!
//! which only works because chunk width and depth are powers of two. The low bits of
//! an index are then exactly the local x and y, so a step along either axis is a mask
//! test plus an increment. [`ChunkLayout`] owns this arithmetic; nothing else should
//! hand-roll it.
//!
//! ## Neighbor Links
//!
//! A chunk records the coordinates of its four horizontal neighbors while they are
//! active. Links are keys into the [`ChunkMap`], never references, so a link can go
//! stale but never dangle.

use cgmath::{EuclideanSpace, Matrix4, Point2, Point3, Vector2};
use serde::{Deserialize, Serialize};

use super::block::{block_side::BlockSide, block_type::BlockType, Block};
use crate::engine_state::rendering::{meshing::mesh::ChunkMesh, RenderBackend};
use crate::error::{ConfigError, StorageError};

pub mod chunk_creation;
mod chunk_map;

pub use chunk_map::ChunkMap;

/// A chunk's position on the horizontal grid, in chunks.
pub type ChunkCoordinate = Point2<i32>;

/// An axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub mins: Point3<f32>,
    pub maxs: Point3<f32>,
}

impl Aabb {
    pub fn contains(&self, point: Point3<f32>) -> bool {
        (self.mins.x..self.maxs.x).contains(&point.x)
            && (self.mins.y..self.maxs.y).contains(&point.y)
            && (self.mins.z..self.maxs.z).contains(&point.z)
    }
}

/// Most blocks a single chunk may hold.
pub const MAX_CHUNK_VOLUME: u64 = 1 << 24;

/// Chunk dimensions and the bit-packing they imply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
    width_x: u32,
    depth_y: u32,
    height_z: u32,
    bits_x: u32,
    bits_y: u32,
}

impl ChunkLayout {
    /// # Errors
    /// Width and depth must be non-zero powers of two, height must be non-zero and
    /// the volume may not exceed [`MAX_CHUNK_VOLUME`].
    pub fn new(width_x: u32, depth_y: u32, height_z: u32) -> Result<Self, ConfigError> {
        if !width_x.is_power_of_two() {
            return Err(ConfigError::NonPowerOfTwo {
                axis: "width",
                value: width_x,
            });
        }
        if !depth_y.is_power_of_two() {
            return Err(ConfigError::NonPowerOfTwo {
                axis: "depth",
                value: depth_y,
            });
        }
        if height_z == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        let volume = width_x as u64 * depth_y as u64 * height_z as u64;
        if volume > MAX_CHUNK_VOLUME {
            return Err(ConfigError::ChunkTooLarge {
                width: width_x,
                depth: depth_y,
                height: height_z,
                max: MAX_CHUNK_VOLUME,
            });
        }

        Ok(ChunkLayout {
            width_x,
            depth_y,
            height_z,
            bits_x: width_x.trailing_zeros(),
            bits_y: depth_y.trailing_zeros(),
        })
    }

    pub fn width_x(&self) -> u32 {
        self.width_x
    }

    pub fn depth_y(&self) -> u32 {
        self.depth_y
    }

    pub fn height_z(&self) -> u32 {
        self.height_z
    }

    /// Number of blocks in one chunk.
    pub fn volume(&self) -> usize {
        (self.width_x * self.depth_y * self.height_z) as usize
    }

    /// Index bits holding the local x coordinate.
    pub fn x_mask(&self) -> usize {
        (1 << self.bits_x) - 1
    }

    /// Index bits holding the local y coordinate.
    pub fn y_mask(&self) -> usize {
        ((1 << self.bits_y) - 1) << self.bits_x
    }

    /// Index distance between vertically adjacent blocks.
    pub fn z_step(&self) -> usize {
        1 << (self.bits_x + self.bits_y)
    }

    /// Index distance between blocks adjacent along y.
    pub fn y_step(&self) -> usize {
        1 << self.bits_x
    }

    pub fn encode(&self, x: u32, y: u32, z: u32) -> usize {
        debug_assert!(x < self.width_x && y < self.depth_y && z < self.height_z);
        (x as usize) | ((y as usize) << self.bits_x) | ((z as usize) << (self.bits_x + self.bits_y))
    }

    pub fn decode(&self, index: usize) -> Point3<u32> {
        Point3::new(
            (index & self.x_mask()) as u32,
            ((index & self.y_mask()) >> self.bits_x) as u32,
            (index >> (self.bits_x + self.bits_y)) as u32,
        )
    }

    pub fn is_top_layer(&self, index: usize) -> bool {
        index >= (self.height_z as usize - 1) * self.z_step()
    }

    pub fn is_bottom_layer(&self, index: usize) -> bool {
        index < self.z_step()
    }

    /// World-space position of a chunk's minimum corner.
    pub fn chunk_origin(&self, coordinate: ChunkCoordinate) -> Point3<f32> {
        Point3::new(
            (coordinate.x as i64 * self.width_x as i64) as f32,
            (coordinate.y as i64 * self.depth_y as i64) as f32,
            0.0,
        )
    }

    pub fn chunk_bounds(&self, coordinate: ChunkCoordinate) -> Aabb {
        let mins = self.chunk_origin(coordinate);
        Aabb {
            mins,
            maxs: Point3::new(
                mins.x + self.width_x as f32,
                mins.y + self.depth_y as f32,
                self.height_z as f32,
            ),
        }
    }

    /// The chunk whose column contains a world position, ignoring height.
    pub fn chunk_containing(&self, position: Point3<f32>) -> ChunkCoordinate {
        Point2::new(
            (position.x / self.width_x as f32).floor() as i32,
            (position.y / self.depth_y as f32).floor() as i32,
        )
    }
}

/// A fixed-size grid of blocks on the horizontal chunk grid.
#[derive(Debug)]
pub struct Chunk {
    coordinate: ChunkCoordinate,
    layout: ChunkLayout,
    bounds: Aabb,
    blocks: Vec<Block>,
    /// Active neighbors, indexed by horizontal `BlockSide`.
    neighbors: [Option<ChunkCoordinate>; 4],
    /// Set while `mesh` may not match the blocks or the neighbor seams.
    dirty: bool,
    /// Set once a block changes after generation or restore.
    needs_saving: bool,
    mesh: Option<ChunkMesh>,
}

impl Chunk {
    pub(crate) fn from_blocks(
        coordinate: ChunkCoordinate,
        layout: ChunkLayout,
        blocks: Vec<Block>,
    ) -> Self {
        Chunk {
            coordinate,
            layout,
            bounds: layout.chunk_bounds(coordinate),
            blocks,
            neighbors: [None; 4],
            dirty: true,
            needs_saving: false,
            mesh: None,
        }
    }

    /// Creates a chunk filled with air.
    pub fn empty(coordinate: ChunkCoordinate, layout: ChunkLayout) -> Self {
        Self::from_blocks(coordinate, layout, vec![Block::default(); layout.volume()])
    }

    /// Restores a chunk from storage.
    ///
    /// # Errors
    /// Fails if the saved block count does not match the layout.
    pub fn from_saved(saved: &SavedChunk, layout: ChunkLayout) -> Result<Self, StorageError> {
        if saved.blocks.len() != layout.volume() {
            return Err(StorageError::BlockCountMismatch {
                expected: layout.volume(),
                found: saved.blocks.len(),
            });
        }
        let blocks = saved.blocks.iter().copied().map(Block::from_raw).collect();
        Ok(Self::from_blocks(saved.coordinate(), layout, blocks))
    }

    pub fn to_saved(&self) -> SavedChunk {
        SavedChunk {
            coordinate: [self.coordinate.x, self.coordinate.y],
            blocks: self.blocks.iter().map(Block::raw_type).collect(),
        }
    }

    pub fn coordinate(&self) -> ChunkCoordinate {
        self.coordinate
    }

    pub fn layout(&self) -> ChunkLayout {
        self.layout
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub(crate) fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    /// World-space minimum corner of the block at `index`.
    pub fn block_world_position(&self, index: usize) -> Point3<f32> {
        let local = self.layout.decode(index);
        Point3::new(
            self.bounds.mins.x + local.x as f32,
            self.bounds.mins.y + local.y as f32,
            self.bounds.mins.z + local.z as f32,
        )
    }

    /// Changes a block's type and marks the chunk dirty and in need of saving.
    ///
    /// Returns false if the index is out of range. Seam neighbors are not touched
    /// here; `BlockLocator::change_type_to` handles them.
    pub fn set_block_type(&mut self, index: usize, block_type: BlockType) -> bool {
        match self.blocks.get_mut(index) {
            Some(block) => {
                block.set_type(block_type);
                self.dirty = true;
                self.needs_saving = true;
                true
            }
            None => false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn needs_saving(&self) -> bool {
        self.needs_saving
    }

    pub fn mark_needs_saving(&mut self) {
        self.needs_saving = true;
    }

    pub fn clear_needs_saving(&mut self) {
        self.needs_saving = false;
    }

    pub fn neighbor(&self, side: BlockSide) -> Option<ChunkCoordinate> {
        side.chunk_offset()?;
        self.neighbors[side as usize]
    }

    /// Links or unlinks the neighbor at `other_coordinate`.
    ///
    /// Coordinates that are not one of the four cardinal neighbors are ignored. The
    /// chunk only becomes dirty if the slot actually changes, since a new or removed
    /// neighbor changes face visibility along the shared seam.
    pub fn set_neighbor_at_coordinate(
        &mut self,
        other: Option<ChunkCoordinate>,
        other_coordinate: ChunkCoordinate,
    ) -> bool {
        let delta: Vector2<i32> = other_coordinate - self.coordinate;
        let Some(side) = BlockSide::from_chunk_offset(delta) else {
            return false;
        };

        let slot = &mut self.neighbors[side as usize];
        if *slot == other {
            return false;
        }
        *slot = other;
        self.dirty = true;
        true
    }

    /// Whether all four horizontal neighbors are linked. Meshing waits for this.
    pub fn has_all_neighbors(&self) -> bool {
        self.neighbors.iter().all(Option::is_some)
    }

    pub fn linked_neighbors(&self) -> impl Iterator<Item = ChunkCoordinate> + '_ {
        self.neighbors.iter().flatten().copied()
    }

    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    /// Replaces the cached mesh and clears the dirty flag.
    pub(crate) fn install_mesh(&mut self, mesh: ChunkMesh) {
        self.mesh = Some(mesh);
        self.dirty = false;
    }

    /// Draws the cached mesh, if one has been built. Returns whether anything was drawn.
    pub fn render(&self, backend: &mut dyn RenderBackend) -> bool {
        match &self.mesh {
            Some(mesh) => {
                backend.draw_mesh(mesh, Matrix4::from_translation(self.bounds.mins.to_vec()));
                true
            }
            None => false,
        }
    }
}

/// The persisted form of a chunk's blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedChunk {
    coordinate: [i32; 2],
    blocks: Vec<u8>,
}

impl SavedChunk {
    pub fn coordinate(&self) -> ChunkCoordinate {
        Point2::new(self.coordinate[0], self.coordinate[1])
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(json)?)
    }
}
