//! Progressive (spatially varying) blur descriptors.
//!
//! A progressive descriptor maps each point of the effect area to an intensity in
//! `[0, 1]` that scales the blur radius and tint opacity at that point.

use crate::brush::{Brush, GradientStop};
use crate::types::{hash_f32, hash_vec2, Color};
use glam::Vec2;
use keyframe::EasingFunction;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Easing applied along a progressive gradient.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl EasingFunction for Easing {
    fn y(&self, x: f64) -> f64 {
        match self {
            Easing::Linear => keyframe::functions::Linear.y(x),
            Easing::EaseIn => keyframe::functions::EaseIn.y(x),
            Easing::EaseOut => keyframe::functions::EaseOut.y(x),
            Easing::EaseInOut => keyframe::functions::EaseInOut.y(x),
        }
    }
}

impl Easing {
    /// Evaluates the easing curve at `x` (clamped to 0.0 - 1.0).
    pub fn eval(&self, x: f32) -> f32 {
        self.y(x.clamp(0.0, 1.0) as f64) as f32
    }

    /// Selector passed to runtime shaders, which re-implement the curves.
    pub fn shader_index(&self) -> f32 {
        match self {
            Easing::Linear => 0.0,
            Easing::EaseIn => 1.0,
            Easing::EaseOut => 2.0,
            Easing::EaseInOut => 3.0,
        }
    }
}

fn zero() -> f32 {
    0.0
}

fn one() -> f32 {
    1.0
}

/// Describes how blur intensity varies across the effect area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Progressive {
    /// Intensity interpolated from `start` to `end`. Unset points resolve to the
    /// top and bottom edges of the content.
    LinearGradient {
        #[serde(default)]
        easing: Easing,
        #[serde(default)]
        start: Option<Vec2>,
        #[serde(default = "zero")]
        start_intensity: f32,
        #[serde(default)]
        end: Option<Vec2>,
        #[serde(default = "one")]
        end_intensity: f32,
        /// Routes to the multi-layer renderer even when runtime shaders exist.
        #[serde(default)]
        prefer_performance: bool,
    },
    /// Intensity interpolated from `center` outwards to `radius`. Unset values
    /// resolve to the content center and half its smaller side.
    RadialGradient {
        #[serde(default)]
        easing: Easing,
        #[serde(default)]
        center: Option<Vec2>,
        #[serde(default = "one")]
        center_intensity: f32,
        #[serde(default)]
        radius: Option<f32>,
        #[serde(default = "zero")]
        radius_intensity: f32,
    },
    /// Intensity read from the brush alpha.
    Brush { brush: Brush },
}

/// A linear gradient with its end points resolved against a content size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearAxis {
    pub start: Vec2,
    pub end: Vec2,
    pub start_intensity: f32,
    pub end_intensity: f32,
    pub easing: Easing,
}

impl LinearAxis {
    /// Resolves unset end points against `size`: the axis runs from the top
    /// edge to the bottom edge by default. Intensities are clamped to 0..=1.
    fn resolve(
        easing: Easing,
        (start, start_intensity): (Option<Vec2>, f32),
        (end, end_intensity): (Option<Vec2>, f32),
        size: Vec2,
    ) -> LinearAxis {
        LinearAxis {
            start: start.unwrap_or(Vec2::ZERO),
            end: end.unwrap_or(Vec2::new(0.0, size.y)),
            start_intensity: start_intensity.clamp(0.0, 1.0),
            end_intensity: end_intensity.clamp(0.0, 1.0),
            easing,
        }
    }

    /// Intensity at gradient fraction `t`.
    pub fn intensity_at(&self, t: f32) -> f32 {
        let e = self.easing.eval(t);
        self.start_intensity + (self.end_intensity - self.start_intensity) * e
    }

    /// Point on the axis at fraction `t`.
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.start.lerp(self.end, t)
    }

    /// The same gradient running in the opposite direction.
    pub fn reversed(&self) -> LinearAxis {
        LinearAxis {
            start: self.end,
            end: self.start,
            start_intensity: self.end_intensity,
            end_intensity: self.start_intensity,
            easing: match self.easing {
                Easing::EaseIn => Easing::EaseOut,
                Easing::EaseOut => Easing::EaseIn,
                other => other,
            },
        }
    }
}

/// Number of stops used when rasterizing an eased gradient into a brush.
const INTENSITY_BRUSH_STOPS: usize = 9;

impl Progressive {
    pub fn vertical(start_intensity: f32, end_intensity: f32) -> Self {
        Progressive::LinearGradient {
            easing: Easing::Linear,
            start: None,
            start_intensity,
            end: None,
            end_intensity,
            prefer_performance: false,
        }
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, Progressive::LinearGradient { .. })
    }

    pub fn prefers_performance(&self) -> bool {
        matches!(
            self,
            Progressive::LinearGradient {
                prefer_performance: true,
                ..
            }
        )
    }

    /// Resolves the linear axis, or `None` for non-linear descriptors.
    pub fn linear_axis(&self, size: Vec2) -> Option<LinearAxis> {
        match self {
            Progressive::LinearGradient {
                easing,
                start,
                start_intensity,
                end,
                end_intensity,
                ..
            } => Some(LinearAxis::resolve(
                *easing,
                (*start, *start_intensity),
                (*end, *end_intensity),
                size,
            )),
            Progressive::RadialGradient { .. } | Progressive::Brush { .. } => None,
        }
    }

    /// A brush whose alpha at each point is the intensity there.
    pub fn intensity_brush(&self, size: Vec2) -> Brush {
        match self {
            Progressive::LinearGradient {
                easing,
                start,
                start_intensity,
                end,
                end_intensity,
                ..
            } => {
                let axis = LinearAxis::resolve(
                    *easing,
                    (*start, *start_intensity),
                    (*end, *end_intensity),
                    size,
                );
                Brush::linear_with_stops(axis.start, axis.end, eased_stops(|t| axis.intensity_at(t)))
            }
            Progressive::RadialGradient {
                easing,
                center,
                center_intensity,
                radius,
                radius_intensity,
            } => {
                let center = center.unwrap_or(size * 0.5);
                let radius = radius.unwrap_or(size.min_element() * 0.5);
                let (from, to) = (center_intensity.clamp(0.0, 1.0), radius_intensity.clamp(0.0, 1.0));
                Brush::RadialGradient {
                    center,
                    radius,
                    stops: eased_stops(|t| from + (to - from) * easing.eval(t)),
                    tile_mode: Default::default(),
                }
            }
            Progressive::Brush { brush } => brush.clone(),
        }
    }
}

fn eased_stops(intensity: impl Fn(f32) -> f32) -> Vec<GradientStop> {
    (0..INTENSITY_BRUSH_STOPS)
        .map(|i| {
            let t = i as f32 / (INTENSITY_BRUSH_STOPS - 1) as f32;
            GradientStop::new(t, Color::BLACK.with_alpha(intensity(t).clamp(0.0, 1.0)))
        })
        .collect()
}

fn hash_opt_vec2<H: Hasher>(v: &Option<Vec2>, state: &mut H) {
    v.is_some().hash(state);
    if let Some(v) = v {
        hash_vec2(*v, state);
    }
}

impl Eq for Progressive {}

impl Hash for Progressive {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Progressive::LinearGradient {
                easing,
                start,
                start_intensity,
                end,
                end_intensity,
                prefer_performance,
            } => {
                easing.hash(state);
                hash_opt_vec2(start, state);
                hash_f32(*start_intensity, state);
                hash_opt_vec2(end, state);
                hash_f32(*end_intensity, state);
                prefer_performance.hash(state);
            }
            Progressive::RadialGradient {
                easing,
                center,
                center_intensity,
                radius,
                radius_intensity,
            } => {
                easing.hash(state);
                hash_opt_vec2(center, state);
                hash_f32(*center_intensity, state);
                radius.map(crate::types::canonical_bits).hash(state);
                hash_f32(*radius_intensity, state);
            }
            Progressive::Brush { brush } => brush.hash(state),
        }
    }
}
