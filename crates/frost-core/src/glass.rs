use crate::types::{hash_f32, Color};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Refraction parameters for the liquid-glass look.
///
/// The glass surface is a rounded rectangle covering the content; light bends
/// along the surface normal in a band `depth` pixels wide inside the edge.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidGlass {
    /// Displacement strength relative to `depth` (0 disables refraction).
    pub refraction: f32,
    /// Width of the refracting edge band, in pixels.
    pub depth: f32,
    pub corner_radius: f32,
    /// Rim highlight strength (0.0 - 1.0).
    pub specular: f32,
    pub tint: Color,
}

impl Default for LiquidGlass {
    fn default() -> Self {
        Self {
            refraction: 0.25,
            depth: 24.0,
            corner_radius: 24.0,
            specular: 0.4,
            tint: Color::TRANSPARENT,
        }
    }
}

impl LiquidGlass {
    pub fn scaled(&self, factor: f32) -> LiquidGlass {
        LiquidGlass {
            depth: self.depth * factor,
            corner_radius: self.corner_radius * factor,
            ..*self
        }
    }
}

impl Eq for LiquidGlass {}

impl Hash for LiquidGlass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f32(self.refraction, state);
        hash_f32(self.depth, state);
        hash_f32(self.corner_radius, state);
        hash_f32(self.specular, state);
        self.tint.hash(state);
    }
}
