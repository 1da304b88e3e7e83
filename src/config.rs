//! # World Configuration
//!
//! Startup configuration for the streaming world. Every field has a default, so a
//! configuration file only needs to name the values it overrides:
//!
//! ```json
//! { "activation_radius": 4, "deactivation_radius": 6, "noise_seed": 7 }
//! ```
//!
//! A configuration is only usable once [`WorldConfig::validate`] has accepted it;
//! `World::new` validates before doing any other work, so a misconfigured world
//! fails fast instead of producing seam artifacts at runtime.

use std::num::NonZeroUsize;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::chunk::ChunkLayout;
use crate::error::ConfigError;

/// Largest activation or deactivation radius, in chunks.
pub const MAX_RADIUS: u32 = 1024;

/// Chunk dimensions, streaming radii, terrain shaping and raycast settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Blocks along X per chunk. Must be a power of two.
    pub chunk_width_x: u32,
    /// Blocks along Y per chunk. Must be a power of two.
    pub chunk_depth_y: u32,
    /// Blocks along Z per chunk. The world is never chunked vertically.
    pub chunk_height_z: u32,
    /// Chunks within this distance (in chunk units) of the focus are activated.
    pub activation_radius: u32,
    /// Chunks beyond this distance (in chunk units) of the focus are deactivated.
    pub deactivation_radius: u32,
    /// Surface height produced by a noise sample of zero.
    pub sea_level: u32,
    /// Surface height change produced by a noise sample of one.
    pub terrain_amplitude: f32,
    pub noise_frequency: f32,
    pub noise_octaves: u32,
    pub noise_seed: u32,
    /// Raycast sampling step as a fraction of the ray length.
    pub raycast_step_fraction: f32,
    /// How many modified chunks the in-memory store keeps after deactivation.
    pub saved_chunk_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_width_x: 16,
            chunk_depth_y: 16,
            chunk_height_z: 128,
            activation_radius: 6,
            deactivation_radius: 8,
            sea_level: 64,
            terrain_amplitude: 16.0,
            noise_frequency: 0.01,
            noise_octaves: 4,
            noise_seed: 0,
            raycast_step_fraction: 0.01,
            saved_chunk_capacity: 256,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        info!("Loaded world configuration from {}", path.display());
        Ok(config)
    }

    /// Checks every startup invariant of the world.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chunk_layout()?;

        for (name, radius) in [
            ("activation", self.activation_radius),
            ("deactivation", self.deactivation_radius),
        ] {
            if radius > MAX_RADIUS {
                return Err(ConfigError::RadiusTooLarge {
                    name,
                    radius,
                    max: MAX_RADIUS,
                });
            }
        }
        if self.deactivation_radius <= self.activation_radius {
            return Err(ConfigError::RadiiMisordered {
                activation: self.activation_radius,
                deactivation: self.deactivation_radius,
            });
        }
        if self.sea_level >= self.chunk_height_z {
            return Err(ConfigError::SeaLevelOutOfRange {
                sea_level: self.sea_level,
                height: self.chunk_height_z,
            });
        }
        if self.noise_octaves == 0 {
            return Err(ConfigError::ZeroOctaves);
        }
        if !(self.raycast_step_fraction > 0.0 && self.raycast_step_fraction <= 1.0) {
            return Err(ConfigError::InvalidStepFraction(self.raycast_step_fraction));
        }
        self.store_capacity()?;

        Ok(())
    }

    /// Capacity of the in-memory chunk store.
    pub fn store_capacity(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.saved_chunk_capacity).ok_or(ConfigError::ZeroStoreCapacity)
    }

    /// The bit-packing layout implied by the chunk dimensions.
    pub fn chunk_layout(&self) -> Result<ChunkLayout, ConfigError> {
        ChunkLayout::new(self.chunk_width_x, self.chunk_depth_y, self.chunk_height_z)
    }

    /// The terrain shaping parameters handed to chunk generation.
    pub fn terrain(&self) -> TerrainSettings {
        TerrainSettings {
            sea_level: self.sea_level,
            amplitude: self.terrain_amplitude,
            frequency: self.noise_frequency,
            octaves: self.noise_octaves,
        }
    }
}

/// Parameters that turn a noise sample into a column surface height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainSettings {
    pub sea_level: u32,
    pub amplitude: f32,
    pub frequency: f32,
    pub octaves: u32,
}
