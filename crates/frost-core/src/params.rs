use crate::brush::Brush;
use crate::glass::LiquidGlass;
use crate::progressive::Progressive;
use crate::tint::Tint;
use crate::types::{hash_f32, hash_vec2, Rect, TileMode};
use glam::Vec2;
use std::hash::{Hash, Hasher};

/// Everything that determines one built filter chain.
///
/// This is the cache key of [`crate::cache::EffectCache`]: two params produce
/// the same entry iff every field is equal by value.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderEffectParams {
    /// Blur radius in device-independent units.
    pub blur_radius: f32,
    /// Grain opacity (0.0 - 1.0).
    pub noise_factor: f32,
    /// Input downsampling factor applied before blurring.
    pub scale: f32,
    /// Pixels per device-independent unit.
    pub density: f32,
    /// Size of the captured content, in pixels.
    pub content_size: Vec2,
    /// Position of the captured rect within the content source, in pixels.
    pub content_offset: Vec2,
    /// Composited in order, later tints over earlier ones.
    pub tints: Vec<Tint>,
    /// Multiplier applied to every tint's opacity.
    pub tint_alpha_modulate: f32,
    pub mask: Option<Brush>,
    /// Second mask multiplied with `mask`, used by progressive bands.
    pub band_mask: Option<Brush>,
    pub progressive: Option<Progressive>,
    pub blur_tile_mode: TileMode,
    pub liquid_glass: Option<LiquidGlass>,
}

impl Default for RenderEffectParams {
    fn default() -> Self {
        Self {
            blur_radius: 0.0,
            noise_factor: 0.0,
            scale: 1.0,
            density: 1.0,
            content_size: Vec2::ZERO,
            content_offset: Vec2::ZERO,
            tints: Vec::new(),
            tint_alpha_modulate: 1.0,
            mask: None,
            band_mask: None,
            progressive: None,
            blur_tile_mode: TileMode::Clamp,
            liquid_glass: None,
        }
    }
}

impl RenderEffectParams {
    /// The blur radius in pixels of the downsampled layer.
    pub fn scaled_blur_radius(&self) -> f32 {
        self.blur_radius * self.density * self.scale
    }

    /// The captured rect in content-source coordinates.
    pub fn content_rect(&self) -> Rect {
        Rect::new(self.content_offset, self.content_size)
    }

    /// Size of the layer the content is recorded into.
    pub fn layer_size(&self) -> Vec2 {
        (self.content_size * self.scale).ceil()
    }

    pub fn has_tints(&self) -> bool {
        self.tints.iter().any(Tint::is_specified)
    }

    /// True when no stage would alter the content.
    pub fn is_passthrough(&self) -> bool {
        self.blur_radius <= 0.0
            && self.noise_factor <= 0.0
            && !self.has_tints()
            && self.mask.is_none()
            && self.band_mask.is_none()
            && self.progressive.is_none()
            && self.liquid_glass.is_none()
    }
}

impl Eq for RenderEffectParams {}

impl Hash for RenderEffectParams {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f32(self.blur_radius, state);
        hash_f32(self.noise_factor, state);
        hash_f32(self.scale, state);
        hash_f32(self.density, state);
        hash_vec2(self.content_size, state);
        hash_vec2(self.content_offset, state);
        self.tints.hash(state);
        hash_f32(self.tint_alpha_modulate, state);
        self.mask.hash(state);
        self.band_mask.hash(state);
        self.progressive.hash(state);
        self.blur_tile_mode.hash(state);
        self.liquid_glass.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(p: &RenderEffectParams) -> u64 {
        let mut h = DefaultHasher::new();
        p.hash(&mut h);
        h.finish()
    }

    #[test]
    fn equal_values_hash_equally() {
        let a = RenderEffectParams {
            blur_radius: 8.0,
            tints: vec![Tint::color(Color::new(1.0, 0.0, 0.0, 0.5))],
            mask: Some(Brush::vertical_gradient(&[Color::BLACK, Color::TRANSPARENT], 40.0)),
            ..Default::default()
        };
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn signed_zero_is_one_key() {
        let a = RenderEffectParams {
            blur_radius: 0.0,
            ..Default::default()
        };
        let b = RenderEffectParams {
            blur_radius: -0.0,
            ..Default::default()
        };
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn passthrough_requires_every_stage_off() {
        assert!(RenderEffectParams::default().is_passthrough());
        let with_unspecified_tint = RenderEffectParams {
            tints: vec![Tint::Unspecified],
            ..Default::default()
        };
        assert!(with_unspecified_tint.is_passthrough());
        let with_noise = RenderEffectParams {
            noise_factor: 0.1,
            ..Default::default()
        };
        assert!(!with_noise.is_passthrough());
    }
}
