#![allow(dead_code)]

use cgmath::Point3;
use streaming_voxel_world::config::WorldConfig;
use streaming_voxel_world::engine_state::voxels::{
    block::registry::{AtlasLayout, BlockTypeRegistry},
    terrain_noise::{ConstantNoise, Noise2D},
    world::World,
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn registry() -> BlockTypeRegistry {
    BlockTypeRegistry::load(AtlasLayout::default()).unwrap()
}

/// Small chunks, a radius-3 activation disk and a surface at z = 10.
pub fn small_config() -> WorldConfig {
    WorldConfig {
        chunk_width_x: 4,
        chunk_depth_y: 4,
        chunk_height_z: 16,
        activation_radius: 3,
        deactivation_radius: 5,
        sea_level: 10,
        terrain_amplitude: 3.0,
        noise_frequency: 0.1,
        ..WorldConfig::default()
    }
}

pub fn world_with(config: WorldConfig, noise: impl Noise2D + 'static) -> World {
    init_logger();
    World::new(config, registry(), Box::new(noise)).unwrap()
}

pub fn flat_world() -> World {
    world_with(small_config(), ConstantNoise(0.0))
}

/// Updates until a frame does no work.
pub fn settle(world: &mut World, focus: Point3<f32>) -> usize {
    for frame in 1..=1_000 {
        if world.update(focus).is_idle() {
            return frame;
        }
    }
    panic!("world did not settle around {:?}", focus);
}
