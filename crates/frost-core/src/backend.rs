//! # Backend Module
//!
//! The filter primitive layer: the capability set every native graphics
//! backend implements.
//!
//! ## Conventions
//! - `None` filter inputs mean "the source content" (the recorded layer).
//! - Crop rects are in the pixel space of the recorded (downsampled) layer.
//! - [`FilterBackend::chain`] applies `first`, then feeds its output to `then`
//!   as the source. Backends must keep this order.
//! - Filters and shaders are immutable handles; cloning is cheap and shares the
//!   underlying graph.

use crate::blend::BlendMode;
use crate::brush::Brush;
use crate::error::EffectError;
use crate::glass::LiquidGlass;
use crate::noise::NoiseTexture;
use crate::progressive::{Easing, LinearAxis};
use crate::tint::ColorFilter;
use crate::types::{Rect, TileMode};
use glam::Vec2;

/// Spatial intensity profile evaluated by runtime shaders.
#[derive(Clone, Debug, PartialEq)]
pub enum IntensityGradient {
    Linear(LinearAxis),
    Radial {
        center: Vec2,
        radius: f32,
        center_intensity: f32,
        edge_intensity: f32,
        easing: Easing,
    },
    /// Intensity read from the alpha of a brush sampled at each pixel.
    Brush(Brush),
}

impl IntensityGradient {
    pub fn scaled(&self, factor: f32) -> IntensityGradient {
        match *self {
            IntensityGradient::Linear(axis) => IntensityGradient::Linear(LinearAxis {
                start: axis.start * factor,
                end: axis.end * factor,
                ..axis
            }),
            IntensityGradient::Radial {
                center,
                radius,
                center_intensity,
                edge_intensity,
                easing,
            } => IntensityGradient::Radial {
                center: center * factor,
                radius: radius * factor,
                center_intensity,
                edge_intensity,
                easing,
            },
            IntensityGradient::Brush(ref brush) => IntensityGradient::Brush(brush.scaled(factor)),
        }
    }
}

/// Runtime-compiled shaders the builder can ask for.
#[derive(Clone, Debug, PartialEq)]
pub enum RuntimeShader {
    /// One pass of a separable gaussian whose radius is scaled per pixel.
    ProgressiveBlur {
        radius: f32,
        direction: Vec2,
        gradient: IntensityGradient,
    },
    /// Edge refraction over a rounded rect covering `size`.
    LiquidGlass { glass: LiquidGlass, size: Vec2 },
}

/// Constructors for shader-backed image filters on one native backend.
pub trait FilterBackend {
    type Filter: Clone;
    type Shader: Clone;

    fn name(&self) -> &'static str;

    fn supports_runtime_shaders(&self) -> bool;

    /// Largest blur radius, in pixels, the backend accepts.
    fn max_blur_radius(&self) -> f32;

    /// Gaussian blur. `Ok(None)` when both radii are <= 0.
    fn blur(
        &self,
        radius_x: f32,
        radius_y: f32,
        tile_mode: TileMode,
        input: Option<Self::Filter>,
        crop: Option<Rect>,
    ) -> Result<Option<Self::Filter>, EffectError>;

    fn color_filter(
        &self,
        filter: &ColorFilter,
        input: Option<Self::Filter>,
        crop: Option<Rect>,
    ) -> Result<Self::Filter, EffectError>;

    /// Composites `foreground` (source) onto `background` (destination).
    fn blend(
        &self,
        mode: BlendMode,
        background: Option<Self::Filter>,
        foreground: Option<Self::Filter>,
        crop: Option<Rect>,
    ) -> Result<Self::Filter, EffectError>;

    fn offset(
        &self,
        dx: f32,
        dy: f32,
        input: Option<Self::Filter>,
        crop: Option<Rect>,
    ) -> Result<Self::Filter, EffectError>;

    /// Fills the output with `shader`, ignoring the source content.
    fn shader(&self, shader: &Self::Shader, crop: Option<Rect>)
        -> Result<Self::Filter, EffectError>;

    /// `first` runs on the source, `then` runs on `first`'s output.
    fn chain(&self, first: Self::Filter, then: Self::Filter) -> Result<Self::Filter, EffectError>;

    /// `Ok(None)` when the backend has no runtime shader support.
    fn runtime_shader(
        &self,
        shader: &RuntimeShader,
        input: Option<Self::Filter>,
    ) -> Result<Option<Self::Filter>, EffectError>;

    fn brush_shader(&self, brush: &Brush) -> Result<Self::Shader, EffectError>;

    /// A repeat-tiled shader of `noise`, restricted to `mask` when given.
    fn noise_shader(
        &self,
        noise: &NoiseTexture,
        mask: Option<&Brush>,
    ) -> Result<Self::Shader, EffectError>;
}

/// Validates a blur radius against the backend limit.
pub fn check_blur_radius(radius: f32, max: f32) -> Result<(), EffectError> {
    if !radius.is_finite() || radius > max {
        return Err(EffectError::UnsupportedRadius { radius });
    }
    Ok(())
}
