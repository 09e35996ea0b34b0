//! # Style Module
//!
//! The declarative configuration surface: a [`BlurStyle`] as authored by the
//! host (usually JSON), and its conversion into [`RenderEffectParams`].

use crate::brush::Brush;
use crate::error::EffectError;
use crate::glass::LiquidGlass;
use crate::params::RenderEffectParams;
use crate::progressive::Progressive;
use crate::tint::Tint;
use crate::types::{Color, TileMode};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How the blur samples outside the captured area.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeTreatment {
    /// Edge pixels are replicated; the result keeps hard edges.
    #[default]
    Clamp,
    /// Outside is transparent; the blur bleeds into it.
    Unbounded,
}

impl EdgeTreatment {
    pub fn tile_mode(&self) -> TileMode {
        match self {
            EdgeTreatment::Clamp => TileMode::Clamp,
            EdgeTreatment::Unbounded => TileMode::Decal,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BlurStyle {
    /// Blur radius in device-independent units.
    pub blur_radius: f32,
    pub noise_factor: f32,
    pub tints: Vec<Tint>,
    /// Drawn by the scrim when real blur is unavailable.
    pub fallback_tint: Tint,
    /// Filled behind the content before the effect is drawn.
    pub background_color: Color,
    pub mask: Option<Brush>,
    pub progressive: Option<Progressive>,
    pub blur_enabled: bool,
    pub input_scale: f32,
    pub blurred_edge_treatment: EdgeTreatment,
    pub alpha: f32,
    pub liquid_glass: Option<LiquidGlass>,
}

impl Default for BlurStyle {
    fn default() -> Self {
        Self {
            blur_radius: 20.0,
            noise_factor: 0.15,
            tints: Vec::new(),
            fallback_tint: Tint::Unspecified,
            background_color: Color::TRANSPARENT,
            mask: None,
            progressive: None,
            blur_enabled: true,
            input_scale: 1.0,
            blurred_edge_treatment: EdgeTreatment::Clamp,
            alpha: 1.0,
            liquid_glass: None,
        }
    }
}

impl BlurStyle {
    /// Parses and validates a style.
    pub fn from_json(json: &str) -> Result<Self, EffectError> {
        let style: BlurStyle = serde_json::from_str(json)?;
        style.validate()?;
        Ok(style)
    }

    pub fn validate(&self) -> Result<(), EffectError> {
        if !self.blur_radius.is_finite() || self.blur_radius < 0.0 {
            return Err(invalid(format!(
                "blur_radius must be a finite value >= 0, got {}",
                self.blur_radius
            )));
        }
        if !(0.0..=1.0).contains(&self.noise_factor) {
            return Err(invalid(format!(
                "noise_factor must be within [0, 1], got {}",
                self.noise_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(invalid(format!(
                "alpha must be within [0, 1], got {}",
                self.alpha
            )));
        }
        if !self.input_scale.is_finite() || self.input_scale <= 0.0 {
            return Err(invalid(format!(
                "input_scale must be a finite value > 0, got {}",
                self.input_scale
            )));
        }
        Ok(())
    }

    /// Derives the builder parameters for content of `content_size` pixels at
    /// `content_offset` within the content source.
    pub fn to_params(
        &self,
        content_size: Vec2,
        content_offset: Vec2,
        density: f32,
    ) -> RenderEffectParams {
        RenderEffectParams {
            blur_radius: self.blur_radius,
            noise_factor: self.noise_factor,
            scale: self.input_scale,
            density,
            content_size,
            content_offset,
            tints: self.tints.clone(),
            tint_alpha_modulate: 1.0,
            mask: self.mask.clone(),
            band_mask: None,
            progressive: self.progressive.clone(),
            blur_tile_mode: self.blurred_edge_treatment.tile_mode(),
            liquid_glass: self.liquid_glass,
        }
    }

    /// Tints drawn by the scrim: the fallback tint when set, otherwise the
    /// regular tint list.
    pub fn scrim_tints(&self) -> Vec<Tint> {
        if self.fallback_tint.is_specified() {
            vec![self.fallback_tint.clone()]
        } else {
            self.tints
                .iter()
                .filter(|t| t.is_specified())
                .cloned()
                .collect()
        }
    }
}

fn invalid(message: String) -> EffectError {
    EffectError::InvalidStyle(message)
}
