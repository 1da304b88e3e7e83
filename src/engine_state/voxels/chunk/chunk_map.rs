use std::collections::HashMap;

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use crate::engine_state::rendering::meshing::mesh::ChunkMesh;
use crate::engine_state::voxels::block::{block_side::BlockSide, registry::BlockTypeRegistry};
use crate::engine_state::voxels::locator::BlockLocator;

use super::{Chunk, ChunkCoordinate, ChunkLayout};

/// The set of active chunks, keyed by chunk coordinate.
///
/// This map is the sole owner of every active chunk. Neighbor links and block
/// locators hold coordinates into it, so every link is a lookup that simply fails
/// once the chunk is gone.
#[derive(Debug)]
pub struct ChunkMap {
    layout: ChunkLayout,
    chunks: HashMap<ChunkCoordinate, Chunk>,
}

impl ChunkMap {
    pub fn new(layout: ChunkLayout) -> Self {
        ChunkMap {
            layout,
            chunks: HashMap::new(),
        }
    }

    pub fn layout(&self) -> ChunkLayout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn contains(&self, coordinate: ChunkCoordinate) -> bool {
        self.chunks.contains_key(&coordinate)
    }

    pub fn get(&self, coordinate: ChunkCoordinate) -> Option<&Chunk> {
        self.chunks.get(&coordinate)
    }

    pub fn get_mut(&mut self, coordinate: ChunkCoordinate) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coordinate)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Chunk> {
        self.chunks.values_mut()
    }

    pub fn coordinates(&self) -> impl Iterator<Item = ChunkCoordinate> + '_ {
        self.chunks.keys().copied()
    }

    pub fn mark_dirty(&mut self, coordinate: ChunkCoordinate) {
        if let Some(chunk) = self.chunks.get_mut(&coordinate) {
            chunk.mark_dirty();
        }
    }

    /// Adds a chunk and links it with every active cardinal neighbor, in both
    /// directions. A chunk already at the same coordinate is unlinked and returned.
    pub fn insert_and_link(&mut self, mut chunk: Chunk) -> Option<Chunk> {
        let coordinate = chunk.coordinate();
        let replaced = self.remove_and_unlink(coordinate);

        for side in BlockSide::HORIZONTAL {
            let Some(offset) = side.chunk_offset() else {
                continue;
            };
            let other = coordinate + offset;
            if let Some(neighbor) = self.chunks.get_mut(&other) {
                neighbor.set_neighbor_at_coordinate(Some(coordinate), coordinate);
                chunk.set_neighbor_at_coordinate(Some(other), other);
            }
        }

        self.chunks.insert(coordinate, chunk);
        replaced
    }

    /// Removes a chunk after clearing the matching slot of each neighbor it was
    /// linked to. Those neighbors become dirty again.
    pub fn remove_and_unlink(&mut self, coordinate: ChunkCoordinate) -> Option<Chunk> {
        let chunk = self.chunks.remove(&coordinate)?;
        for other in chunk.linked_neighbors() {
            if let Some(neighbor) = self.chunks.get_mut(&other) {
                neighbor.set_neighbor_at_coordinate(None, coordinate);
            }
        }
        Some(chunk)
    }

    /// Rebuilds a dirty chunk's mesh against the current neighbor seams.
    ///
    /// Clean or missing chunks are left alone and report false.
    pub fn rebuild_mesh(&mut self, coordinate: ChunkCoordinate, registry: &BlockTypeRegistry) -> bool {
        let start = Instant::now();
        let mesh = match self.chunks.get(&coordinate) {
            Some(chunk) if chunk.is_dirty() => ChunkMesh::build(chunk, self, registry),
            _ => return false,
        };
        let quads = mesh.quad_count();

        if let Some(chunk) = self.chunks.get_mut(&coordinate) {
            chunk.install_mesh(mesh);
        }
        debug!(
            "Rebuilt mesh for chunk ({}, {}): {} quads in {:?}",
            coordinate.x,
            coordinate.y,
            quads,
            start.elapsed()
        );
        true
    }

    /// Resolves a world position to the block containing it.
    ///
    /// Positions outside the fixed height, in inactive chunks, or not finite
    /// resolve to `BlockLocator::INVALID`.
    pub fn locator_at(&self, position: Point3<f32>) -> BlockLocator {
        let finite = position.x.is_finite() && position.y.is_finite() && position.z.is_finite();
        if !finite || position.z < 0.0 || position.z >= self.layout.height_z() as f32 {
            return BlockLocator::INVALID;
        }

        let coordinate = self.layout.chunk_containing(position);
        if !self.contains(coordinate) {
            return BlockLocator::INVALID;
        }

        let origin = self.layout.chunk_origin(coordinate);
        let local = |value: f32, extent: u32| {
            (value.floor() as i64).clamp(0, extent as i64 - 1) as u32
        };
        let x = local(position.x - origin.x, self.layout.width_x());
        let y = local(position.y - origin.y, self.layout.depth_y());
        let z = local(position.z, self.layout.height_z());

        BlockLocator::new(coordinate, self.layout.encode(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point2;

    use super::*;
    use crate::engine_state::voxels::block::{block_type::BlockType, registry::AtlasLayout};

    fn layout() -> ChunkLayout {
        ChunkLayout::new(4, 4, 4).unwrap()
    }

    fn map_with(coordinates: &[(i32, i32)]) -> ChunkMap {
        let mut chunks = ChunkMap::new(layout());
        for &(x, y) in coordinates {
            chunks.insert_and_link(Chunk::empty(Point2::new(x, y), layout()));
        }
        chunks
    }

    #[test]
    fn insert_links_both_directions() {
        let chunks = map_with(&[(0, 0), (1, 0), (0, -1), (5, 5)]);
        let origin = chunks.get(Point2::new(0, 0)).unwrap();
        assert_eq!(origin.neighbor(BlockSide::EAST), Some(Point2::new(1, 0)));
        assert_eq!(origin.neighbor(BlockSide::SOUTH), Some(Point2::new(0, -1)));
        assert_eq!(origin.neighbor(BlockSide::WEST), None);

        let east = chunks.get(Point2::new(1, 0)).unwrap();
        assert_eq!(east.neighbor(BlockSide::WEST), Some(Point2::new(0, 0)));
        assert_eq!(chunks.get(Point2::new(5, 5)).unwrap().linked_neighbors().count(), 0);
    }

    #[test]
    fn remove_clears_neighbor_slots_and_dirties_them() {
        let registry = BlockTypeRegistry::load(AtlasLayout::default()).unwrap();
        let mut chunks = map_with(&[(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)]);
        for coordinate in chunks.coordinates().collect::<Vec<_>>() {
            chunks.rebuild_mesh(coordinate, &registry);
        }
        assert!(chunks.iter().all(|chunk| !chunk.is_dirty()));

        let removed = chunks.remove_and_unlink(Point2::new(0, 0)).unwrap();
        assert_eq!(removed.linked_neighbors().count(), 4);
        for chunk in chunks.iter() {
            assert_eq!(chunk.linked_neighbors().count(), 0);
            assert!(chunk.is_dirty());
        }
    }

    #[test]
    fn rebuild_skips_clean_chunks() {
        let registry = BlockTypeRegistry::load(AtlasLayout::default()).unwrap();
        let mut chunks = map_with(&[(0, 0)]);
        assert!(chunks.rebuild_mesh(Point2::new(0, 0), &registry));
        assert!(!chunks.rebuild_mesh(Point2::new(0, 0), &registry));
        assert!(!chunks.rebuild_mesh(Point2::new(9, 9), &registry));
        assert!(chunks.get(Point2::new(0, 0)).unwrap().mesh().is_some());
    }

    #[test]
    fn locator_at_resolves_world_positions() {
        let mut chunks = map_with(&[(0, 0), (-1, 0)]);
        let locator = chunks.locator_at(Point3::new(-0.5, 2.5, 3.2));
        assert_eq!(locator.chunk_coordinate(), Some(Point2::new(-1, 0)));
        assert_eq!(locator.index(), layout().encode(3, 2, 3));

        locator.change_type_to(&mut chunks, BlockType::STONE);
        assert_eq!(
            chunks.locator_at(Point3::new(-0.1, 2.9, 3.9)).get_block(&chunks).get_type(),
            BlockType::STONE
        );
    }

    #[test]
    fn locator_at_rejects_out_of_range_positions() {
        let chunks = map_with(&[(0, 0)]);
        assert!(!chunks.locator_at(Point3::new(1.0, 1.0, -0.1)).is_valid());
        assert!(!chunks.locator_at(Point3::new(1.0, 1.0, 4.0)).is_valid());
        assert!(!chunks.locator_at(Point3::new(4.5, 1.0, 1.0)).is_valid());
        assert!(!chunks.locator_at(Point3::new(f32::NAN, 1.0, 1.0)).is_valid());
    }
}
