#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Streaming Voxel World
//!
//! An infinite-in-XY voxel world that streams fixed-height chunks in and out
//! around a moving focus point.
//!
//! ## Key Modules
//!
//! * `config` - World configuration loaded from JSON, validated at startup
//! * `engine_state` - The frame driver, camera, chunk meshing and the voxel world itself
//! * `error` - Configuration and storage errors
//!
//! ## Architecture
//!
//! Each frame the world does at most three pieces of work: activate the nearest
//! missing chunk, deactivate the farthest stale one and rebuild the nearest dirty
//! mesh. Chunks reference their neighbors by coordinate, and blocks are addressed
//! through copyable locators that step across chunk seams.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     if let Err(err) = streaming_voxel_world::run() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```

use cgmath::{Deg, Point3};
use log::info;
use web_time::Instant;

use config::WorldConfig;
use engine_state::{
    camera_state::Camera,
    rendering::MeshStatistics,
    voxels::{
        block::{
            block_type::BlockType,
            registry::{AtlasLayout, BlockTypeRegistry},
        },
        terrain_noise::FbmNoise,
        world::World,
    },
    EngineState,
};
use error::ConfigError;

pub mod config;
pub mod engine_state;
pub mod error;

/// Frames simulated by the headless demo.
const DEMO_FRAMES: usize = 2_000;

/// How often the demo logs world statistics.
const STATS_INTERVAL: usize = 250;

/// Runs a headless walk through a generated world.
///
/// The first command-line argument, if present, is a JSON configuration file.
/// Logging is controlled through `RUST_LOG`.
///
/// # Errors
/// Fails if the configuration cannot be read or does not validate.
pub fn run() -> Result<(), ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let start = Instant::now();

    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::from_path(path)?,
        None => WorldConfig::default(),
    };
    let registry = BlockTypeRegistry::load(AtlasLayout::default())?;
    let noise = Box::new(FbmNoise::new(config.noise_seed));
    info!("Generating terrain with noise seed {}", noise.seed());
    let eye_height = (config.sea_level as f32 + config.terrain_amplitude + 4.0)
        .min(config.chunk_height_z as f32 - 1.0);

    let world = World::new(config, registry, noise)?;
    let camera = Camera::new(Point3::new(0.5, 0.5, eye_height), Deg(0.0), Deg(-35.0));
    let mut engine_state = EngineState::new(world, camera);
    let mut backend = MeshStatistics::default();
    let mut rng = fastrand::Rng::with_seed(engine_state.world().config().noise_seed as u64);

    info!("Initialized world in {:?}", start.elapsed());

    for frame in 1..=DEMO_FRAMES {
        backend.reset();
        engine_state.process_frame(&mut backend);

        engine_state.camera.turn(Deg(rng.f32() * 6.0 - 3.0), Deg(0.0));
        engine_state.camera.walk(0.25);

        match rng.u8(0..40) {
            0 => {
                engine_state.dig();
            }
            1 => {
                engine_state.place(BlockType::GLOWSTONE);
            }
            _ => {}
        }
        engine_state.world_mut().take_light_queue();

        if frame % STATS_INTERVAL == 0 {
            info!(
                "Frame {}: {}; drew {} chunks, {} quads",
                frame,
                engine_state.world().stats(),
                backend.draw_calls,
                backend.quads
            );
        }
    }

    let saved = engine_state.world_mut().flush();
    info!(
        "Finished {} frames in {:?}, flushed {} chunks",
        DEMO_FRAMES,
        start.elapsed(),
        saved
    );
    Ok(())
}
