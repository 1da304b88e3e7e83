//! # Block Type Registry
//!
//! A fixed table mapping every [`BlockType`] to its static appearance and physical
//! metadata. The registry is built once at startup with [`BlockTypeRegistry::load`]
//! and handed to the world; nothing about it changes at runtime.

use crate::error::ConfigError;

use super::block_side::BlockSide;
use super::block_type::BlockType;

/// Atlas tiles for each block type, indexed by `BlockType` as a `usize`.
///
/// The inner array holds the tile index for the [top, side, bottom] faces.
static BLOCK_TYPE_TO_ATLAS_TILES: [[u32; 3]; 5] = [
    [0, 0, 0], // AIR (never meshed)
    [1, 2, 3], // GRASS (top: grass, side: grass over dirt, bottom: dirt)
    [3, 3, 3], // DIRT
    [4, 4, 4], // STONE
    [5, 5, 5], // GLOWSTONE
];

/// The grid of equally sized tiles that make up the block texture atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    pub tiles_per_row: u32,
    pub tiles_per_column: u32,
}

impl Default for AtlasLayout {
    fn default() -> Self {
        AtlasLayout {
            tiles_per_row: 4,
            tiles_per_column: 2,
        }
    }
}

impl AtlasLayout {
    /// The normalized texture region covered by a tile.
    pub fn region(&self, tile: u32) -> TextureRegion {
        let column = tile % self.tiles_per_row;
        let row = tile / self.tiles_per_row;
        let tile_width = 1.0 / self.tiles_per_row as f32;
        let tile_height = 1.0 / self.tiles_per_column as f32;
        TextureRegion {
            u0: column as f32 * tile_width,
            v0: row as f32 * tile_height,
            u1: (column + 1) as f32 * tile_width,
            v1: (row + 1) as f32 * tile_height,
        }
    }

    fn tile_count(&self) -> u32 {
        self.tiles_per_row * self.tiles_per_column
    }
}

/// A rectangle of the texture atlas in normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextureRegion {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

/// Static metadata for one block type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlockTypeInfo {
    pub is_solid: bool,
    /// Fully opaque blocks hide the faces of their neighbors and block light.
    pub is_fully_opaque: bool,
    /// Light emitted by the block, 0..=15.
    pub indoor_light_level: u8,
    pub top: TextureRegion,
    pub side: TextureRegion,
    pub bottom: TextureRegion,
}

impl BlockTypeInfo {
    /// The texture region used for the given face.
    pub fn region_for(&self, side: BlockSide) -> TextureRegion {
        match side {
            BlockSide::TOP => self.top,
            BlockSide::BOTTOM => self.bottom,
            _ => self.side,
        }
    }
}

/// Maps every block type to its [`BlockTypeInfo`].
#[derive(Debug, Clone)]
pub struct BlockTypeRegistry {
    entries: [BlockTypeInfo; 5],
    /// Returned for `INVALID`: not solid, not opaque, emits nothing.
    fallback: BlockTypeInfo,
}

impl BlockTypeRegistry {
    /// Builds the registry against the given texture atlas.
    ///
    /// # Errors
    /// Fails if the atlas does not contain every tile the block table refers to.
    pub fn load(atlas: AtlasLayout) -> Result<Self, ConfigError> {
        let required = BLOCK_TYPE_TO_ATLAS_TILES
            .iter()
            .flatten()
            .copied()
            .max()
            .unwrap_or(0)
            + 1;
        if atlas.tile_count() < required {
            return Err(ConfigError::AtlasTooSmall {
                available: atlas.tile_count(),
                required,
            });
        }

        let entries = BlockType::ALL.map(|block_type| {
            let [top, side, bottom] = BLOCK_TYPE_TO_ATLAS_TILES[block_type as usize];
            let (is_solid, is_fully_opaque, indoor_light_level) = match block_type {
                BlockType::AIR | BlockType::INVALID => (false, false, 0),
                BlockType::GLOWSTONE => (true, true, 15),
                BlockType::GRASS | BlockType::DIRT | BlockType::STONE => (true, true, 0),
            };
            BlockTypeInfo {
                is_solid,
                is_fully_opaque,
                indoor_light_level,
                top: atlas.region(top),
                side: atlas.region(side),
                bottom: atlas.region(bottom),
            }
        });

        Ok(BlockTypeRegistry {
            entries,
            fallback: BlockTypeInfo::default(),
        })
    }

    /// Looks up a block type. Never fails: `INVALID` resolves to a safe default.
    pub fn get(&self, block_type: BlockType) -> &BlockTypeInfo {
        self.entries
            .get(block_type as usize)
            .unwrap_or(&self.fallback)
    }

    /// Whether faces of this type are ever emitted by the mesher.
    pub fn is_meshed(&self, block_type: BlockType) -> bool {
        block_type != BlockType::AIR && block_type != BlockType::INVALID
    }
}
