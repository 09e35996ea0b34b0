//! # Builder Module
//!
//! Composes one filter chain from [`RenderEffectParams`].
//!
//! ## Stage order
//! 1. Blur (uniform, or the two-pass progressive runtime shader).
//! 2. Liquid-glass refraction, when configured and supported.
//! 3. Tints, in list order.
//! 4. Noise grain.
//! 5. Mask (only without a progressive descriptor), then the band mask of a
//!    progressive layer.
//!
//! Linear progressive blur without runtime shaders (or with `prefer_performance`)
//! is not representable as one filter; the builder reports
//! [`BuiltEffect::MultiLayer`] and the caller draws bands instead.

use crate::backend::{check_blur_radius, FilterBackend, IntensityGradient, RuntimeShader};
use crate::blend::BlendMode;
use crate::brush::Brush;
use crate::error::EffectError;
use crate::noise::NoiseTexture;
use crate::params::RenderEffectParams;
use crate::progressive::Progressive;
use crate::tint::{ColorFilter, Tint};
use crate::types::TileMode;
use glam::Vec2;
use tracing::{debug, instrument, warn};

/// Result of building a render effect.
#[derive(Clone, Debug, PartialEq)]
pub enum BuiltEffect<F> {
    /// Every stage is a no-op: draw the content unmodified.
    Passthrough,
    Filter(F),
    /// Needs the multi-layer progressive renderer.
    MultiLayer,
}

impl<F> BuiltEffect<F> {
    pub fn filter(&self) -> Option<&F> {
        match self {
            BuiltEffect::Filter(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, BuiltEffect::Passthrough)
    }

    pub fn is_multi_layer(&self) -> bool {
        matches!(self, BuiltEffect::MultiLayer)
    }
}

/// How a progressive descriptor is realized on a given backend.
#[derive(Clone, Debug, PartialEq)]
enum ProgressiveRoute {
    Uniform,
    Runtime(IntensityGradient),
    MultiLayer,
    /// Uniform chain masked by the intensity brush.
    Masked(Brush),
}

fn route_progressive<B: FilterBackend>(backend: &B, params: &RenderEffectParams) -> ProgressiveRoute {
    let Some(progressive) = &params.progressive else {
        return ProgressiveRoute::Uniform;
    };
    let size = params.content_size;
    let runtime = backend.supports_runtime_shaders();
    match progressive {
        Progressive::LinearGradient { .. } => match progressive.linear_axis(size) {
            Some(axis) if runtime && !progressive.prefers_performance() => {
                ProgressiveRoute::Runtime(IntensityGradient::Linear(axis).scaled(params.scale))
            }
            _ => ProgressiveRoute::MultiLayer,
        },
        Progressive::RadialGradient {
            easing,
            center,
            center_intensity,
            radius,
            radius_intensity,
        } if runtime => ProgressiveRoute::Runtime(
            IntensityGradient::Radial {
                center: center.unwrap_or(size * 0.5),
                radius: radius.unwrap_or(size.min_element() * 0.5),
                center_intensity: center_intensity.clamp(0.0, 1.0),
                edge_intensity: radius_intensity.clamp(0.0, 1.0),
                easing: *easing,
            }
            .scaled(params.scale),
        ),
        Progressive::Brush { brush } if runtime => {
            ProgressiveRoute::Runtime(IntensityGradient::Brush(brush.clone()).scaled(params.scale))
        }
        Progressive::RadialGradient { .. } | Progressive::Brush { .. } => {
            ProgressiveRoute::Masked(progressive.intensity_brush(size))
        }
    }
}

/// Builds the filter chain for `params`.
///
/// `UnsupportedRadius` from the blur stage is returned as-is so the caller can
/// fall back to a cheaper rendering mode.
#[instrument(level = "debug", skip_all, fields(backend = backend.name(), radius = params.blur_radius))]
pub fn build_render_effect<B: FilterBackend>(
    backend: &B,
    params: &RenderEffectParams,
    noise: &NoiseTexture,
) -> Result<BuiltEffect<B::Filter>, EffectError> {
    if params.is_passthrough() {
        return Ok(BuiltEffect::Passthrough);
    }

    let route = route_progressive(backend, params);
    if route == ProgressiveRoute::MultiLayer {
        debug!("linear progressive blur routed to multi-layer renderer");
        return Ok(BuiltEffect::MultiLayer);
    }

    let scale = params.scale;
    let radius = params.scaled_blur_radius();

    let mut current = match &route {
        ProgressiveRoute::Runtime(gradient) => {
            progressive_blur(backend, radius, gradient, params.blur_tile_mode)?
        }
        _ => backend.blur(radius, radius, params.blur_tile_mode, None, None)?,
    };

    if let Some(glass) = &params.liquid_glass {
        let shader = RuntimeShader::LiquidGlass {
            glass: glass.scaled(scale),
            size: params.layer_size(),
        };
        match backend.runtime_shader(&shader, current.clone())? {
            Some(refracted) => current = Some(refracted),
            None => debug!("runtime shaders unavailable, skipping liquid glass stage"),
        }
    }

    // Tints and grain follow the mask, or the progressive intensity when the
    // blur itself varies.
    let layer_mask = match (&params.mask, &route) {
        (Some(mask), _) => Some(mask.scaled(scale)),
        (None, ProgressiveRoute::Runtime(_)) => params
            .progressive
            .as_ref()
            .map(|p| p.intensity_brush(params.content_size).scaled(scale)),
        _ => None,
    };

    for tint in params.tints.iter().filter(|t| t.is_specified()) {
        let tint = tint.modulated(params.tint_alpha_modulate);
        if tint.alpha() <= 0.0 {
            continue;
        }
        current = apply_tint(backend, &tint, current, layer_mask.as_ref(), scale)?;
    }

    if params.noise_factor > 0.0 {
        let shader = backend.noise_shader(noise, layer_mask.as_ref())?;
        let grain = backend.shader(&shader, None)?;
        let grain = backend.color_filter(
            &ColorFilter::alpha_scale(params.noise_factor.min(1.0)),
            Some(grain),
            None,
        )?;
        current = Some(backend.blend(BlendMode::SrcAtop, current, Some(grain), None)?);
    }

    let final_mask = match route {
        ProgressiveRoute::Uniform => params.mask.as_ref().map(|m| m.scaled(scale)),
        ProgressiveRoute::Masked(intensity) => Some(intensity.scaled(scale)),
        ProgressiveRoute::Runtime(_) | ProgressiveRoute::MultiLayer => None,
    };
    let band_mask = params.band_mask.as_ref().map(|m| m.scaled(scale));
    for mask in final_mask.iter().chain(band_mask.iter()) {
        let mask = backend.shader(&backend.brush_shader(mask)?, None)?;
        current = Some(backend.blend(BlendMode::DstIn, current, Some(mask), None)?);
    }

    Ok(current.map_or(BuiltEffect::Passthrough, BuiltEffect::Filter))
}

fn progressive_blur<B: FilterBackend>(
    backend: &B,
    radius: f32,
    gradient: &IntensityGradient,
    tile_mode: TileMode,
) -> Result<Option<B::Filter>, EffectError> {
    if radius <= 0.0 {
        return Ok(None);
    }
    check_blur_radius(radius, backend.max_blur_radius())?;

    let pass = |direction: Vec2, input: Option<B::Filter>| {
        backend.runtime_shader(
            &RuntimeShader::ProgressiveBlur {
                radius,
                direction,
                gradient: gradient.clone(),
            },
            input,
        )
    };
    match pass(Vec2::X, None)? {
        Some(horizontal) => pass(Vec2::Y, Some(horizontal)),
        None => {
            warn!("progressive blur shader unavailable, using uniform blur");
            backend.blur(radius, radius, tile_mode, None, None)
        }
    }
}

fn apply_tint<B: FilterBackend>(
    backend: &B,
    tint: &Tint,
    input: Option<B::Filter>,
    mask: Option<&Brush>,
    scale: f32,
) -> Result<Option<B::Filter>, EffectError> {
    let (tinted, filter) = match tint {
        Tint::Unspecified => return Ok(input),
        Tint::Color {
            color,
            blend_mode,
            color_filter,
        } => {
            let blend = ColorFilter::Blend {
                color: *color,
                mode: *blend_mode,
            };
            match mask {
                None => (backend.color_filter(&blend, input, None)?, color_filter),
                Some(mask) => {
                    let layer = backend.color_filter(&blend, input.clone(), None)?;
                    let layer = restrict(backend, layer, mask)?;
                    (
                        backend.blend(BlendMode::SrcOver, input, Some(layer), None)?,
                        color_filter,
                    )
                }
            }
        }
        Tint::Brush {
            brush,
            alpha,
            blend_mode,
            color_filter,
        } => {
            let paint = brush.with_alpha_modulated(*alpha).scaled(scale);
            let mut layer = backend.shader(&backend.brush_shader(&paint)?, None)?;
            if let Some(mask) = mask {
                layer = restrict(backend, layer, mask)?;
            }
            (
                backend.blend(*blend_mode, input, Some(layer), None)?,
                color_filter,
            )
        }
    };
    match filter {
        Some(cf) => backend.color_filter(cf, Some(tinted), None).map(Some),
        None => Ok(Some(tinted)),
    }
}

/// Keeps `layer` only where `mask` is opaque.
fn restrict<B: FilterBackend>(
    backend: &B,
    layer: B::Filter,
    mask: &Brush,
) -> Result<B::Filter, EffectError> {
    let mask = backend.shader(&backend.brush_shader(mask)?, None)?;
    backend.blend(BlendMode::DstIn, Some(layer), Some(mask), None)
}
