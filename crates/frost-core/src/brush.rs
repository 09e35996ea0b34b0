use crate::types::{hash_f32, hash_vec2, Color, TileMode};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A color stop in a gradient (offset 0.0 to 1.0).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

impl Eq for GradientStop {}

impl Hash for GradientStop {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f32(self.offset, state);
        self.color.hash(state);
    }
}

/// A paint source used for brush tints, masks and progressive descriptors.
///
/// Coordinates are pixels in the local space of the effect area. Brushes are
/// plain values: two brushes with equal fields produce the same cache key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Brush {
    Solid {
        color: Color,
    },
    LinearGradient {
        start: Vec2,
        end: Vec2,
        stops: Vec<GradientStop>,
        #[serde(default)]
        tile_mode: TileMode,
    },
    RadialGradient {
        center: Vec2,
        radius: f32,
        stops: Vec<GradientStop>,
        #[serde(default)]
        tile_mode: TileMode,
    },
}

impl Brush {
    pub fn solid(color: Color) -> Self {
        Brush::Solid { color }
    }

    /// Linear gradient with evenly distributed colors.
    pub fn linear(start: Vec2, end: Vec2, colors: &[Color]) -> Self {
        Brush::LinearGradient {
            start,
            end,
            stops: even_stops(colors),
            tile_mode: TileMode::Clamp,
        }
    }

    /// Linear gradient with explicit stops.
    pub fn linear_with_stops(start: Vec2, end: Vec2, stops: Vec<GradientStop>) -> Self {
        Brush::LinearGradient {
            start,
            end,
            stops,
            tile_mode: TileMode::Clamp,
        }
    }

    /// Top-to-bottom gradient spanning `height` pixels.
    pub fn vertical_gradient(colors: &[Color], height: f32) -> Self {
        Brush::linear(Vec2::ZERO, Vec2::new(0.0, height), colors)
    }

    pub fn radial(center: Vec2, radius: f32, colors: &[Color]) -> Self {
        Brush::RadialGradient {
            center,
            radius,
            stops: even_stops(colors),
            tile_mode: TileMode::Clamp,
        }
    }

    /// Multiplies all geometry by `factor`, for drawing into downsampled layers.
    pub fn scaled(&self, factor: f32) -> Brush {
        match self {
            Brush::Solid { .. } => self.clone(),
            Brush::LinearGradient {
                start,
                end,
                stops,
                tile_mode,
            } => Brush::LinearGradient {
                start: *start * factor,
                end: *end * factor,
                stops: stops.clone(),
                tile_mode: *tile_mode,
            },
            Brush::RadialGradient {
                center,
                radius,
                stops,
                tile_mode,
            } => Brush::RadialGradient {
                center: *center * factor,
                radius: radius * factor,
                stops: stops.clone(),
                tile_mode: *tile_mode,
            },
        }
    }

    /// Returns the brush with every color's alpha multiplied by `factor`.
    pub fn with_alpha_modulated(&self, factor: f32) -> Brush {
        if factor == 1.0 {
            return self.clone();
        }
        let modulate = |stops: &[GradientStop]| -> Vec<GradientStop> {
            stops
                .iter()
                .map(|s| GradientStop::new(s.offset, s.color.modulate_alpha(factor)))
                .collect()
        };
        match self {
            Brush::Solid { color } => Brush::solid(color.modulate_alpha(factor)),
            Brush::LinearGradient {
                start,
                end,
                stops,
                tile_mode,
            } => Brush::LinearGradient {
                start: *start,
                end: *end,
                stops: modulate(stops),
                tile_mode: *tile_mode,
            },
            Brush::RadialGradient {
                center,
                radius,
                stops,
                tile_mode,
            } => Brush::RadialGradient {
                center: *center,
                radius: *radius,
                stops: modulate(stops),
                tile_mode: *tile_mode,
            },
        }
    }

    /// Gradient stops, or a single stop for solid brushes.
    pub fn stops(&self) -> Vec<GradientStop> {
        match self {
            Brush::Solid { color } => vec![GradientStop::new(0.0, *color)],
            Brush::LinearGradient { stops, .. } | Brush::RadialGradient { stops, .. } => {
                stops.clone()
            }
        }
    }
}

fn even_stops(colors: &[Color]) -> Vec<GradientStop> {
    let last = colors.len().saturating_sub(1).max(1) as f32;
    colors
        .iter()
        .enumerate()
        .map(|(i, c)| GradientStop::new(i as f32 / last, *c))
        .collect()
}

impl Eq for Brush {}

impl Hash for Brush {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Brush::Solid { color } => color.hash(state),
            Brush::LinearGradient {
                start,
                end,
                stops,
                tile_mode,
            } => {
                hash_vec2(*start, state);
                hash_vec2(*end, state);
                stops.hash(state);
                tile_mode.hash(state);
            }
            Brush::RadialGradient {
                center,
                radius,
                stops,
                tile_mode,
            } => {
                hash_vec2(*center, state);
                hash_f32(*radius, state);
                stops.hash(state);
                tile_mode.hash(state);
            }
        }
    }
}
