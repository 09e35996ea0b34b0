//! # Noise Module
//!
//! Procedural fractal noise used for the grain layer of the effect.
//!
//! ## Algorithm
//! Fractional Brownian motion over hash-based value noise: each octave samples a
//! smoothly interpolated lattice of hashed values, doubling the frequency and
//! halving the amplitude of the previous one. Lattice periods are rounded to whole
//! cells of the tile so the rasterized texture repeats without seams.
//!
//! The output is a pure function of the parameters, which is what allows
//! [`crate::runtime::EffectRuntime`] to generate one texture and share it.

use crate::types::canonical_bits;

/// Fractal noise parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FractalNoise {
    pub base_frequency_x: f32,
    pub base_frequency_y: f32,
    pub octaves: u32,
    pub seed: f32,
}

impl FractalNoise {
    /// The grain used by the effect builder.
    pub const DEFAULT: FractalNoise = FractalNoise {
        base_frequency_x: 0.45,
        base_frequency_y: 0.45,
        octaves: 4,
        seed: 2.0,
    };

    pub fn new(base_frequency_x: f32, base_frequency_y: f32, octaves: u32, seed: f32) -> Self {
        Self {
            base_frequency_x,
            base_frequency_y,
            octaves,
            seed,
        }
    }

    /// Samples the noise at pixel `(x, y)` of a tile `tile_size` pixels wide.
    /// Returns a value in `[0, 1]`.
    pub fn sample(&self, x: f32, y: f32, tile_size: u32) -> f32 {
        let seed = canonical_bits(self.seed);
        let tile = tile_size.max(1) as f32;
        let mut amplitude = 0.5;
        let mut multiplier = 1.0;
        let mut total = 0.0;
        let mut norm = 0.0;
        for octave in 0..self.octaves.max(1) {
            let period_x = (tile * self.base_frequency_x * multiplier).round().max(1.0);
            let period_y = (tile * self.base_frequency_y * multiplier).round().max(1.0);
            let fx = x * period_x / tile;
            let fy = y * period_y / tile;
            let v = value_noise(
                fx,
                fy,
                period_x as i32,
                period_y as i32,
                seed.wrapping_add(octave.wrapping_mul(0x9E37_79B9)),
            );
            total += v * amplitude;
            norm += amplitude;
            amplitude *= 0.5;
            multiplier *= 2.0;
        }
        (total / norm).clamp(0.0, 1.0)
    }
}

impl Default for FractalNoise {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn value_noise(x: f32, y: f32, period_x: i32, period_y: i32, seed: u32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = smooth(x - x0);
    let ty = smooth(y - y0);
    let ix = x0 as i32;
    let iy = y0 as i32;

    let corner = |dx: i32, dy: i32| {
        lattice(
            (ix + dx).rem_euclid(period_x),
            (iy + dy).rem_euclid(period_y),
            seed,
        )
    };

    let top = lerp(corner(0, 0), corner(1, 0), tx);
    let bottom = lerp(corner(0, 1), corner(1, 1), tx);
    lerp(top, bottom, ty)
}

fn smooth(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hashes a lattice coordinate to `[0, 1)`.
fn lattice(x: i32, y: i32, seed: u32) -> f32 {
    let mut h = (x as u32).wrapping_mul(0x27d4_eb2d) ^ (y as u32).wrapping_mul(0x1656_67b1) ^ seed;
    h ^= h >> 15;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    (h >> 8) as f32 / (1u32 << 24) as f32
}

/// A rasterized, seamlessly repeating square tile of noise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoiseTexture {
    size: u32,
    /// RGBA8, premultiplied, opaque grayscale.
    pixels: Vec<u8>,
}

impl NoiseTexture {
    /// Edge length of the default texture in pixels.
    pub const DEFAULT_SIZE: u32 = 128;

    pub fn generate(noise: &FractalNoise, size: u32) -> Self {
        let size = size.max(1);
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let v = (noise.sample(x as f32, y as f32, size) * 255.0).round() as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Self { size, pixels }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn row_bytes(&self) -> usize {
        self.size as usize * 4
    }
}

impl Default for NoiseTexture {
    fn default() -> Self {
        Self::generate(&FractalNoise::DEFAULT, Self::DEFAULT_SIZE)
    }
}
