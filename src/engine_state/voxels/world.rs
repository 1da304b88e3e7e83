//! # World Module
//!
//! This module provides the `World` struct, which keeps a disk of chunks active
//! around a moving focus point on an infinite horizontal grid.
//!
//! ## Streaming
//!
//! Every call to [`World::update`] does a bounded amount of work:
//!
//! 1. activate the nearest missing chunk inside the activation radius,
//! 2. deactivate the farthest chunk beyond the deactivation radius,
//! 3. rebuild the mesh of the nearest dirty chunk whose four neighbors are active.
//!
//! "Nearest" always means the first match in the activation priority list, the
//! offsets of the activation disk sorted by squared distance from the origin, so
//! chunks close to the viewer are generated, linked and meshed before far ones.
//!
//! A chunk is only meshed once all four of its neighbors are linked, so a seam is
//! never meshed against a neighbor that does not exist yet. Chunks on the edge of
//! the activation disk therefore stay unmeshed.
//!
//! ## Persistence
//!
//! Chunks that were edited are saved to the [`ChunkStore`] when they leave the
//! deactivation radius and restored from it when they come back. Loading takes the
//! chunk out of the store, so a restored chunk is saved again on its way out even
//! if nobody touched it in the meantime. Untouched chunks are regenerated from noise.

use std::collections::VecDeque;
use std::fmt;

use cgmath::{Point3, Vector2, Vector3};
use log::{debug, info, warn};

use crate::config::{TerrainSettings, WorldConfig};
use crate::engine_state::rendering::RenderBackend;
use crate::error::ConfigError;

use super::block::block_type::BlockType;
use super::block::registry::BlockTypeRegistry;
use super::chunk::chunk_creation::generate_terrain;
use super::chunk::{Chunk, ChunkCoordinate, ChunkLayout, ChunkMap};
use super::locator::BlockLocator;
use super::raycast::{self, RaycastResult};
use super::storage::{ChunkStore, MemoryChunkStore};
use super::terrain_noise::Noise2D;

/// What one call to [`World::update`] changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameWork {
    pub activated: Option<ChunkCoordinate>,
    pub deactivated: Option<ChunkCoordinate>,
    pub rebuilt: Option<ChunkCoordinate>,
}

impl FrameWork {
    /// True when the frame neither activated, deactivated nor rebuilt anything.
    pub fn is_idle(&self) -> bool {
        self.activated.is_none() && self.deactivated.is_none() && self.rebuilt.is_none()
    }
}

/// A snapshot of the active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldStats {
    pub active: usize,
    /// Chunks whose mesh matches their blocks and seams.
    pub clean: usize,
    pub dirty: usize,
    /// Chunks missing at least one neighbor link.
    pub unlinked: usize,
    pub focus_chunk: ChunkCoordinate,
}

impl fmt::Display for WorldStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} active ({} clean, {} dirty, {} unlinked) around chunk ({}, {})",
            self.active,
            self.clean,
            self.dirty,
            self.unlinked,
            self.focus_chunk.x,
            self.focus_chunk.y
        )
    }
}

/// The streaming voxel world.
///
/// Owns every active chunk through a [`ChunkMap`]. Neighbor links and
/// [`BlockLocator`]s are chunk coordinates into that map, so dropping a chunk can
/// never leave a dangling link behind.
pub struct World {
    config: WorldConfig,
    layout: ChunkLayout,
    terrain: TerrainSettings,
    registry: BlockTypeRegistry,
    noise: Box<dyn Noise2D>,
    store: Box<dyn ChunkStore>,
    chunks: ChunkMap,
    /// Offsets of the activation disk, nearest first.
    activation_priority: Vec<Vector2<i32>>,
    focus_chunk: ChunkCoordinate,
    light_queue: VecDeque<BlockLocator>,
    last_raycast: Option<RaycastResult>,
}

impl World {
    /// Creates an empty world that saves edited chunks in memory.
    ///
    /// # Errors
    /// Fails if `config` does not validate.
    pub fn new(
        config: WorldConfig,
        registry: BlockTypeRegistry,
        noise: Box<dyn Noise2D>,
    ) -> Result<Self, ConfigError> {
        let capacity = config.store_capacity()?;
        Self::with_store(config, registry, noise, Box::new(MemoryChunkStore::new(capacity)))
    }

    /// Creates an empty world backed by a caller-provided chunk store.
    ///
    /// # Errors
    /// Fails if `config` does not validate.
    pub fn with_store(
        config: WorldConfig,
        registry: BlockTypeRegistry,
        noise: Box<dyn Noise2D>,
        store: Box<dyn ChunkStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let layout = config.chunk_layout()?;
        let activation_priority = activation_priority(config.activation_radius);

        info!(
            "Created world: {}x{}x{} chunks, activation radius {} ({} chunks), deactivation radius {}",
            layout.width_x(),
            layout.depth_y(),
            layout.height_z(),
            config.activation_radius,
            activation_priority.len(),
            config.deactivation_radius
        );

        Ok(World {
            terrain: config.terrain(),
            config,
            layout,
            registry,
            noise,
            store,
            chunks: ChunkMap::new(layout),
            activation_priority,
            focus_chunk: ChunkCoordinate::new(0, 0),
            light_queue: VecDeque::new(),
            last_raycast: None,
        })
    }

    /// Advances streaming by one frame around `focus`.
    pub fn update(&mut self, focus: Point3<f32>) -> FrameWork {
        self.focus_chunk = self.layout.chunk_containing(focus);

        FrameWork {
            activated: self.activate_chunk_nearest_to_focus(),
            deactivated: self.deactivate_farthest_chunk(),
            rebuilt: self.rebuild_nearest_dirty_chunk(),
        }
    }

    /// Activates the first missing chunk in priority order, if any.
    fn activate_chunk_nearest_to_focus(&mut self) -> Option<ChunkCoordinate> {
        let coordinate = self
            .activation_priority
            .iter()
            .map(|offset| self.focus_chunk + *offset)
            .find(|coordinate| !self.chunks.contains(*coordinate))?;

        let chunk = self.load_or_generate(coordinate);
        self.chunks.insert_and_link(chunk);
        debug!("Activated chunk ({}, {})", coordinate.x, coordinate.y);
        Some(coordinate)
    }

    fn load_or_generate(&mut self, coordinate: ChunkCoordinate) -> Chunk {
        if let Some(saved) = self.store.load(coordinate) {
            match Chunk::from_saved(&saved, self.layout) {
                Ok(mut chunk) => {
                    // The store gave up its copy, so this chunk is the only one left.
                    chunk.mark_needs_saving();
                    debug!("Restored chunk ({}, {}) from storage", coordinate.x, coordinate.y);
                    return chunk;
                }
                Err(err) => warn!(
                    "Discarding saved chunk ({}, {}): {}",
                    coordinate.x, coordinate.y, err
                ),
            }
        }
        generate_terrain(coordinate, self.layout, self.noise.as_ref(), &self.terrain)
    }

    /// Deactivates the active chunk farthest beyond the deactivation radius, if any.
    fn deactivate_farthest_chunk(&mut self) -> Option<ChunkCoordinate> {
        let limit = squared(self.config.deactivation_radius);
        let focus = self.focus_chunk;

        let coordinate = self
            .chunks
            .coordinates()
            .map(|coordinate| (distance_squared(coordinate, focus), coordinate))
            .filter(|(distance, _)| *distance > limit)
            .max_by_key(|(distance, coordinate)| (*distance, coordinate.x, coordinate.y))
            .map(|(_, coordinate)| coordinate)?;

        let chunk = self.chunks.remove_and_unlink(coordinate)?;
        if chunk.needs_saving() {
            self.store.save(chunk.to_saved());
            debug!("Saved chunk ({}, {})", coordinate.x, coordinate.y);
        }
        self.light_queue
            .retain(|locator| locator.chunk_coordinate() != Some(coordinate));
        debug!("Deactivated chunk ({}, {})", coordinate.x, coordinate.y);
        Some(coordinate)
    }

    /// Rebuilds the first dirty, fully linked chunk in priority order, if any.
    fn rebuild_nearest_dirty_chunk(&mut self) -> Option<ChunkCoordinate> {
        let coordinate = self
            .activation_priority
            .iter()
            .map(|offset| self.focus_chunk + *offset)
            .find(|coordinate| {
                self.chunks
                    .get(*coordinate)
                    .is_some_and(|chunk| chunk.has_all_neighbors() && chunk.is_dirty())
            })?;

        self.chunks
            .rebuild_mesh(coordinate, &self.registry)
            .then_some(coordinate)
    }

    /// Casts a ray through the active chunks and remembers the result.
    ///
    /// `direction` should be normalized; the impact fraction is relative to
    /// `max_distance`.
    pub fn raycast(
        &mut self,
        start: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> RaycastResult {
        let result = raycast::raycast(
            &self.chunks,
            start,
            direction,
            max_distance,
            self.config.raycast_step_fraction,
        );
        self.last_raycast = Some(result);
        result
    }

    /// The result of the most recent raycast.
    pub fn last_raycast(&self) -> Option<RaycastResult> {
        self.last_raycast
    }

    /// Resolves a world position to a block locator.
    pub fn locator_at(&self, position: Point3<f32>) -> BlockLocator {
        self.chunks.locator_at(position)
    }

    /// Changes a block and records every consequence of the change.
    ///
    /// The owning chunk becomes dirty and in need of saving, chunks across a touched
    /// seam become dirty, and the block plus its neighbors are queued for lighting.
    /// Returns false for `INVALID` locators.
    pub fn change_block_type(&mut self, locator: BlockLocator, block_type: BlockType) -> bool {
        if !locator.change_type_to(&mut self.chunks, block_type) {
            return false;
        }
        locator.set_light_dirty(&mut self.chunks, true);
        locator.mark_neighbors_dirty_for_lighting(&mut self.chunks, &mut self.light_queue);
        true
    }

    /// Hands the queued light work to a propagation pass.
    pub fn take_light_queue(&mut self) -> VecDeque<BlockLocator> {
        std::mem::take(&mut self.light_queue)
    }

    /// Saves every active chunk that has unsaved edits.
    ///
    /// Returns how many chunks were saved.
    pub fn flush(&mut self) -> usize {
        let mut saved = 0;
        for chunk in self.chunks.iter_mut() {
            if chunk.needs_saving() {
                self.store.save(chunk.to_saved());
                chunk.clear_needs_saving();
                saved += 1;
            }
        }
        if saved > 0 {
            info!("Flushed {} chunks to storage", saved);
        }
        saved
    }

    /// Draws every active chunk that has a mesh. Returns the number of draw calls.
    pub fn render(&self, backend: &mut dyn RenderBackend) -> usize {
        self.chunks
            .iter()
            .filter(|chunk| chunk.render(backend))
            .count()
    }

    pub fn stats(&self) -> WorldStats {
        let mut stats = WorldStats {
            active: 0,
            clean: 0,
            dirty: 0,
            unlinked: 0,
            focus_chunk: self.focus_chunk,
        };
        for chunk in self.chunks.iter() {
            stats.active += 1;
            if chunk.is_dirty() {
                stats.dirty += 1;
            } else {
                stats.clean += 1;
            }
            if !chunk.has_all_neighbors() {
                stats.unlinked += 1;
            }
        }
        stats
    }

    pub fn chunks(&self) -> &ChunkMap {
        &self.chunks
    }

    pub fn registry(&self) -> &BlockTypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn focus_chunk(&self) -> ChunkCoordinate {
        self.focus_chunk
    }

    pub fn activation_priority(&self) -> &[Vector2<i32>] {
        &self.activation_priority
    }
}

/// Every chunk offset within `radius` of the origin, sorted nearest first.
///
/// Ties are broken by x then y so the order is deterministic.
fn activation_priority(radius: u32) -> Vec<Vector2<i32>> {
    let r = radius as i32;
    let limit = squared(radius);

    let mut offsets: Vec<Vector2<i32>> = (-r..=r)
        .flat_map(|x| (-r..=r).map(move |y| Vector2::new(x, y)))
        .filter(|offset| offset_squared(*offset) <= limit)
        .collect();
    offsets.sort_by_key(|offset| (offset_squared(*offset), offset.x, offset.y));
    offsets
}

fn squared(radius: u32) -> i64 {
    let radius = radius as i64;
    radius * radius
}

fn offset_squared(offset: Vector2<i32>) -> i64 {
    let x = offset.x as i64;
    let y = offset.y as i64;
    x * x + y * y
}

fn distance_squared(a: ChunkCoordinate, b: ChunkCoordinate) -> i64 {
    offset_squared(a - b)
}

#[cfg(test)]
mod tests {
    use cgmath::Point2;

    use super::*;
    use crate::engine_state::rendering::MeshStatistics;
    use crate::engine_state::voxels::block::registry::AtlasLayout;
    use crate::engine_state::voxels::terrain_noise::ConstantNoise;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn small_config() -> WorldConfig {
        WorldConfig {
            chunk_width_x: 4,
            chunk_depth_y: 4,
            chunk_height_z: 16,
            activation_radius: 2,
            deactivation_radius: 3,
            sea_level: 10,
            ..WorldConfig::default()
        }
    }

    fn flat_world(config: WorldConfig) -> World {
        init_logger();
        let registry = BlockTypeRegistry::load(AtlasLayout::default()).unwrap();
        World::new(config, registry, Box::new(ConstantNoise(0.0))).unwrap()
    }

    fn settle(world: &mut World, focus: Point3<f32>) {
        for _ in 0..200 {
            if world.update(focus).is_idle() {
                return;
            }
        }
        panic!("world did not settle");
    }

    #[test]
    fn priority_list_is_the_sorted_disk() {
        let offsets = activation_priority(2);
        assert_eq!(offsets.len(), 13);
        assert_eq!(offsets[0], Vector2::new(0, 0));
        assert!(offsets
            .windows(2)
            .all(|pair| offset_squared(pair[0]) <= offset_squared(pair[1])));
        assert!(!offsets.contains(&Vector2::new(2, 1)));
    }

    #[test]
    fn misconfigured_world_fails_fast() {
        let registry = BlockTypeRegistry::load(AtlasLayout::default()).unwrap();
        let config = WorldConfig {
            chunk_width_x: 12,
            ..small_config()
        };
        let result = World::new(config, registry, Box::new(ConstantNoise(0.0)));
        assert!(matches!(result, Err(ConfigError::NonPowerOfTwo { .. })));
    }

    #[test]
    fn zero_store_capacity_is_rejected() {
        let registry = BlockTypeRegistry::load(AtlasLayout::default()).unwrap();
        let config = WorldConfig {
            saved_chunk_capacity: 0,
            ..small_config()
        };
        let result = World::new(config, registry, Box::new(ConstantNoise(0.0)));
        assert!(matches!(result, Err(ConfigError::ZeroStoreCapacity)));
    }

    #[test]
    fn first_update_activates_focus_chunk() {
        let mut world = flat_world(small_config());
        let work = world.update(Point3::new(1.0, 1.0, 12.0));
        assert_eq!(work.activated, Some(Point2::new(0, 0)));
        assert_eq!(work.deactivated, None);
        assert_eq!(work.rebuilt, None);
        assert_eq!(world.chunks().len(), 1);
    }

    #[test]
    fn settled_world_meshes_interior_chunks() {
        let mut world = flat_world(small_config());
        settle(&mut world, Point3::new(1.0, 1.0, 12.0));

        let stats = world.stats();
        assert_eq!(stats.active, 13);
        // The center and its four cardinal neighbors are the only fully linked chunks.
        assert_eq!(stats.clean, 5);
        assert_eq!(stats.unlinked, 8);

        let mut backend = MeshStatistics::default();
        assert_eq!(world.render(&mut backend), 5);
        assert_eq!(backend.draw_calls, 5);
    }

    #[test]
    fn moving_focus_streams_chunks_out() {
        let mut world = flat_world(small_config());
        settle(&mut world, Point3::new(1.0, 1.0, 12.0));

        let far = Point3::new(40.0, 1.0, 12.0);
        settle(&mut world, far);

        assert_eq!(world.focus_chunk(), Point2::new(10, 0));
        assert!(!world.chunks().contains(Point2::new(0, 0)));
        assert_eq!(world.chunks().len(), 13);
    }

    #[test]
    fn edited_chunks_survive_deactivation() {
        let mut world = flat_world(small_config());
        settle(&mut world, Point3::new(1.0, 1.0, 12.0));

        let locator = world.locator_at(Point3::new(1.5, 1.5, 10.5));
        assert_eq!(locator.get_type(world.chunks()), BlockType::GRASS);
        assert!(world.change_block_type(locator, BlockType::GLOWSTONE));

        settle(&mut world, Point3::new(60.0, 1.0, 12.0));
        assert!(!world.chunks().contains(Point2::new(0, 0)));

        settle(&mut world, Point3::new(1.0, 1.0, 12.0));
        let restored = world.locator_at(Point3::new(1.5, 1.5, 10.5));
        assert_eq!(restored.get_type(world.chunks()), BlockType::GLOWSTONE);
    }

    #[test]
    fn change_block_type_seeds_light_queue() {
        let mut world = flat_world(small_config());
        settle(&mut world, Point3::new(1.0, 1.0, 12.0));

        let locator = world.locator_at(Point3::new(1.5, 1.5, 10.5));
        assert!(world.change_block_type(locator, BlockType::AIR));

        assert!(locator.get_block(world.chunks()).is_light_dirty());
        assert!(world.chunks().get(Point2::new(0, 0)).unwrap().is_dirty());
        let queue = world.take_light_queue();
        assert_eq!(queue.len(), 6);
        assert!(world.take_light_queue().is_empty());

        assert!(!world.change_block_type(BlockLocator::INVALID, BlockType::STONE));
    }

    #[test]
    fn flush_saves_only_edited_chunks() {
        let mut world = flat_world(small_config());
        settle(&mut world, Point3::new(1.0, 1.0, 12.0));
        assert_eq!(world.flush(), 0);

        let locator = world.locator_at(Point3::new(1.5, 1.5, 10.5));
        world.change_block_type(locator, BlockType::STONE);
        assert_eq!(world.flush(), 1);
        assert_eq!(world.flush(), 0);
    }

    #[test]
    fn raycast_is_remembered() {
        let mut world = flat_world(small_config());
        settle(&mut world, Point3::new(1.0, 1.0, 12.0));
        assert_eq!(world.last_raycast(), None);

        let result = world.raycast(Point3::new(0.5, 0.5, 15.0), Vector3::new(0.0, 0.0, -1.0), 20.0);
        assert!(result.did_impact);
        assert_eq!(world.last_raycast(), Some(result));
    }

    #[test]
    fn stats_display_mentions_focus() {
        let mut world = flat_world(small_config());
        world.update(Point3::new(5.0, -1.0, 12.0));
        let stats = world.stats();
        assert_eq!((stats.active, stats.dirty, stats.unlinked), (1, 1, 1));
        let text = stats.to_string();
        assert!(text.contains("1 active"));
        assert!(text.contains("(1, -1)"));
    }
}
