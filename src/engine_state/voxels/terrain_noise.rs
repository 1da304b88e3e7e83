//! # Terrain Noise
//!
//! Chunk generation samples a pure 2D noise function once per block column. The
//! [`Noise2D`] trait is the seam: [`FbmNoise`] provides fractal Perlin noise for
//! real worlds and [`ConstantNoise`] produces perfectly flat terrain.

use std::cell::RefCell;
use std::collections::HashMap;

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// A pure, deterministic 2D noise source returning values in [-1, 1].
pub trait Noise2D {
    fn noise_2d(&self, x: f32, y: f32, frequency: f32, octaves: u32) -> f32;
}

/// Fractal Brownian motion over Perlin noise.
///
/// One fractal source is kept per (octaves, frequency) pair, since building one
/// seeds a permutation table per octave.
pub struct FbmNoise {
    seed: u32,
    sources: RefCell<HashMap<(u32, u32), Fbm<Perlin>>>,
}

impl FbmNoise {
    pub fn new(seed: u32) -> Self {
        FbmNoise {
            seed,
            sources: RefCell::new(HashMap::new()),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Noise2D for FbmNoise {
    fn noise_2d(&self, x: f32, y: f32, frequency: f32, octaves: u32) -> f32 {
        let mut sources = self.sources.borrow_mut();
        let source = sources
            .entry((octaves, frequency.to_bits()))
            .or_insert_with(|| {
                Fbm::<Perlin>::new(self.seed)
                    .set_octaves(octaves.max(1) as usize)
                    .set_frequency(frequency as f64)
            });
        (source.get([x as f64, y as f64]) as f32).clamp(-1.0, 1.0)
    }
}

/// Returns the same value everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantNoise(pub f32);

impl Noise2D for ConstantNoise {
    fn noise_2d(&self, _x: f32, _y: f32, _frequency: f32, _octaves: u32) -> f32 {
        self.0.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fbm_is_deterministic_for_a_seed() {
        let a = FbmNoise::new(7);
        let b = FbmNoise::new(7);
        for i in 0..32 {
            let x = i as f32 * 3.7;
            let y = i as f32 * -1.3;
            assert_eq!(a.noise_2d(x, y, 0.01, 4), b.noise_2d(x, y, 0.01, 4));
        }
    }

    #[test]
    fn fbm_stays_in_range() {
        let noise = FbmNoise::new(3);
        for i in 0..256 {
            let value = noise.noise_2d(i as f32 * 17.3, i as f32 * 5.1, 0.05, 6);
            assert!((-1.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn constant_noise_is_clamped() {
        assert_eq!(ConstantNoise(3.0).noise_2d(1.0, 2.0, 0.1, 1), 1.0);
        assert_eq!(ConstantNoise(-0.25).noise_2d(9.0, 9.0, 0.1, 1), -0.25);
    }
}
