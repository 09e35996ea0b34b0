//! # Progressive Layers
//!
//! Linear progressive blur drawn as a stack of uniformly blurred bands, for
//! backends (or styles) that cannot vary the blur radius inside one filter.
//!
//! The gradient is split into `N` bands of increasing intensity. Band `i` is
//! blurred with `blur_radius * intensity_i` and masked by a gradient that fades in
//! over its slice of the axis and stays opaque toward the strong end, so every
//! band draws over the weaker ones below it. The first band has no band mask.
//! The user mask applies to every band.
//!
//! All bands are built before any of them draws: a band the backend rejects
//! leaves the canvas untouched.

use crate::backend::FilterBackend;
use crate::brush::{Brush, GradientStop};
use crate::builder::BuiltEffect;
use crate::context::{with_scoped_layer, DrawScope, PlatformContext};
use crate::error::EffectError;
use crate::params::RenderEffectParams;
use crate::runtime::EffectRuntime;
use crate::types::{Color, TileMode};
use tracing::{debug, trace};

pub const MIN_BANDS: usize = 3;
pub const MAX_BANDS: usize = 8;
/// Blur radius, in device-independent units, covered by one band.
const DP_PER_BAND: f32 = 4.0;

/// Number of bands used for a blur radius in device-independent units.
pub fn band_count(blur_radius: f32) -> usize {
    let n = (blur_radius / DP_PER_BAND).ceil();
    if n.is_finite() && n > 0.0 {
        (n as usize).clamp(MIN_BANDS, MAX_BANDS)
    } else {
        MIN_BANDS
    }
}

/// Splits a linear progressive effect into per-band params, weakest first.
///
/// Returns an empty list when `params` has no linear progressive descriptor.
pub fn progressive_bands(params: &RenderEffectParams) -> Vec<RenderEffectParams> {
    let Some(axis) = params
        .progressive
        .as_ref()
        .and_then(|p| p.linear_axis(params.content_size))
    else {
        return Vec::new();
    };
    let axis = if axis.start_intensity > axis.end_intensity {
        axis.reversed()
    } else {
        axis
    };

    let n = band_count(params.blur_radius);
    (0..n)
        .map(|i| {
            let from = i as f32 / n as f32;
            let to = (i + 1) as f32 / n as f32;
            let intensity = axis.intensity_at(to);
            let band_mask = (i > 0).then(|| Brush::LinearGradient {
                start: axis.point_at(from),
                end: axis.point_at(to),
                stops: vec![
                    GradientStop::new(0.0, Color::TRANSPARENT),
                    GradientStop::new(1.0, Color::BLACK),
                ],
                tile_mode: TileMode::Clamp,
            });
            RenderEffectParams {
                blur_radius: params.blur_radius * intensity,
                tint_alpha_modulate: params.tint_alpha_modulate * intensity,
                band_mask,
                progressive: None,
                ..params.clone()
            }
        })
        .collect()
}

/// One band with its filter chain built.
#[derive(Clone, Debug)]
pub struct ProgressiveLayer<F> {
    pub params: RenderEffectParams,
    /// `None` draws the band's content unfiltered.
    pub filter: Option<F>,
}

/// Builds every band of `params` through the runtime cache.
pub fn build_progressive_layers<B: FilterBackend>(
    runtime: &EffectRuntime<B>,
    params: &RenderEffectParams,
) -> Result<Vec<ProgressiveLayer<B::Filter>>, EffectError> {
    progressive_bands(params)
        .into_iter()
        .map(|band| {
            let filter = match runtime.get_or_build(&band)? {
                BuiltEffect::Filter(filter) => Some(filter),
                BuiltEffect::Passthrough => None,
                BuiltEffect::MultiLayer => {
                    return Err(EffectError::backend(
                        "progressive layers",
                        "band resolved to another multi-layer effect",
                    ))
                }
            };
            Ok(ProgressiveLayer {
                params: band,
                filter,
            })
        })
        .collect()
}

/// Draws built bands, weakest first. Each band holds a scoped layer only
/// while it records and draws.
pub fn draw_progressive_layers<F, P, S>(
    ctx: &mut P,
    scope: &mut S,
    layers: &[ProgressiveLayer<F>],
    alpha: f32,
) -> Result<(), EffectError>
where
    P: PlatformContext,
    S: DrawScope<P::Layer, F>,
{
    debug!(bands = layers.len(), "drawing progressive layers");
    for (i, band) in layers.iter().enumerate() {
        trace!(band = i, radius = band.params.blur_radius, "drawing band");
        with_scoped_layer(ctx, |layer| {
            scope.record_layer(layer, band.params.content_rect(), band.params.scale)?;
            scope.draw_layer(layer, band.filter.as_ref(), alpha)
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progressive::Progressive;
    use glam::Vec2;

    fn progressive(radius: f32, start: f32, end: f32) -> RenderEffectParams {
        RenderEffectParams {
            blur_radius: radius,
            content_size: Vec2::new(100.0, 200.0),
            progressive: Some(Progressive::vertical(start, end)),
            ..Default::default()
        }
    }

    #[test]
    fn band_count_is_clamped() {
        assert_eq!(band_count(0.0), MIN_BANDS);
        assert_eq!(band_count(4.0), MIN_BANDS);
        assert_eq!(band_count(20.0), 5);
        assert_eq!(band_count(200.0), MAX_BANDS);
    }

    #[test]
    fn bands_increase_in_intensity() {
        let bands = progressive_bands(&progressive(24.0, 1.0, 0.0));
        assert_eq!(bands.len(), 6);
        let radii: Vec<f32> = bands.iter().map(|b| b.blur_radius).collect();
        assert!(radii.windows(2).all(|w| w[0] <= w[1]), "{radii:?}");
        assert_eq!(*radii.last().unwrap(), 24.0);
        assert!(bands.iter().all(|b| b.progressive.is_none()));
    }

    #[test]
    fn only_first_band_has_no_band_mask() {
        let bands = progressive_bands(&progressive(12.0, 0.0, 1.0));
        assert!(bands[0].band_mask.is_none());
        assert!(bands[1..].iter().all(|b| b.band_mask.is_some()));
        assert!(bands.iter().all(|b| b.mask.is_none()));
    }

    #[test]
    fn user_mask_applies_to_every_band() {
        let mask = Brush::vertical_gradient(&[Color::BLACK, Color::TRANSPARENT], 200.0);
        let mut params = progressive(20.0, 0.0, 1.0);
        params.mask = Some(mask.clone());
        let bands = progressive_bands(&params);
        assert_eq!(bands.len(), 5);
        assert!(bands.iter().all(|b| b.mask.as_ref() == Some(&mask)));
    }

    #[test]
    fn tint_opacity_follows_band_intensity() {
        let mut params = progressive(12.0, 0.0, 1.0);
        params.tint_alpha_modulate = 0.5;
        let bands = progressive_bands(&params);
        let last = bands.last().unwrap();
        assert_eq!(last.tint_alpha_modulate, 0.5);
        assert!((bands[0].tint_alpha_modulate - 0.5 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn non_linear_descriptors_have_no_bands() {
        let params = RenderEffectParams {
            blur_radius: 10.0,
            progressive: Some(Progressive::Brush {
                brush: Brush::solid(Color::BLACK),
            }),
            ..Default::default()
        };
        assert!(progressive_bands(&params).is_empty());
    }
}
