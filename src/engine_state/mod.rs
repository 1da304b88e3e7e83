//! # Engine State Module
//!
//! The per-frame driver of the streaming world.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the world and the camera and runs one frame at a time
//! * `camera_state` - The first-person camera that supplies the focus and look direction
//! * `rendering` - Mesh building and the render back end interface
//! * `voxels` - Blocks, chunks, block locators and the world itself
//!
//! ## Frame Order
//!
//! 1. The world streams around the camera position
//! 2. The block under the crosshair is picked with a raycast along the view vector
//! 3. Every meshed chunk is handed to the render back end

use cgmath::Point3;
use log::debug;

use camera_state::Camera;
use rendering::RenderBackend;
use voxels::{
    block::block_type::BlockType,
    raycast::RaycastResult,
    world::{FrameWork, World},
};

pub mod camera_state;
pub mod rendering;
pub mod voxels;

/// Default reach for block picking, in blocks.
pub const DEFAULT_PICK_DISTANCE: f32 = 8.0;

/// The main state container for the engine
///
/// # Examples
///
/// ```no_run
/// use cgmath::{Deg, Point3};
/// use streaming_voxel_world::config::WorldConfig;
/// use streaming_voxel_world::engine_state::{camera_state::Camera, EngineState};
/// use streaming_voxel_world::engine_state::rendering::MeshStatistics;
/// use streaming_voxel_world::engine_state::voxels::{
///     block::registry::{AtlasLayout, BlockTypeRegistry},
///     terrain_noise::FbmNoise,
///     world::World,
/// };
///
/// let registry = BlockTypeRegistry::load(AtlasLayout::default()).unwrap();
/// let world = World::new(WorldConfig::default(), registry, Box::new(FbmNoise::new(0))).unwrap();
/// let camera = Camera::new(Point3::new(0.0, 0.0, 90.0), Deg(0.0), Deg(-45.0));
/// let mut engine_state = EngineState::new(world, camera);
/// let mut backend = MeshStatistics::default();
///
/// // Main loop
/// loop {
///     engine_state.process_frame(&mut backend);
///     backend.reset();
/// }
/// ```
pub struct EngineState {
    /// The voxel world containing all chunk data
    world: World,
    /// Camera supplying the focus point and view direction
    pub camera: Camera,
    /// How far ahead of the camera blocks can be picked
    pub pick_distance: f32,
    /// The block picked during the last frame
    picked: Option<RaycastResult>,
}

impl EngineState {
    pub fn new(world: World, camera: Camera) -> Self {
        Self {
            world,
            camera,
            pick_distance: DEFAULT_PICK_DISTANCE,
            picked: None,
        }
    }

    /// Runs one frame: stream, pick, render.
    pub fn process_frame(&mut self, backend: &mut dyn RenderBackend) -> FrameWork {
        let focus = self.camera.position;
        let work = self.world.update(focus);

        let hit = self
            .world
            .raycast(focus, self.camera.get_view_vec(), self.pick_distance);
        self.picked = hit.did_impact.then_some(hit);

        self.world.render(backend);
        work
    }

    /// The block under the crosshair as of the last frame.
    pub fn picked(&self) -> Option<RaycastResult> {
        self.picked
    }

    /// Turns the picked block into air. Returns whether anything changed.
    pub fn dig(&mut self) -> bool {
        let Some(hit) = self.picked.take() else {
            return false;
        };
        let changed = self.world.change_block_type(hit.impacted_block, BlockType::AIR);
        if changed {
            debug!("Dug block at {:?}", self.world_position(hit));
        }
        changed
    }

    /// Places a block in front of the picked face. Returns whether anything changed.
    ///
    /// Nothing is placed when the camera itself is inside the picked block, or when
    /// the cell in front of the face is not air.
    pub fn place(&mut self, block_type: BlockType) -> bool {
        let Some(hit) = self.picked.take() else {
            return false;
        };
        let target = hit.previous_block;
        if !target.is_valid() || target.get_type(self.world.chunks()) != BlockType::AIR {
            return false;
        }
        self.world.change_block_type(target, block_type)
    }

    fn world_position(&self, hit: RaycastResult) -> Point3<f32> {
        hit.impacted_block
            .get_block_world_position(self.world.chunks())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
