use crate::blend::BlendMode;
use crate::brush::Brush;
use crate::types::{hash_f32, Color};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A per-pixel color transform attached to a tint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColorFilter {
    /// Blends a constant color (source) over the input (destination).
    Blend { color: Color, mode: BlendMode },
    /// Row-major 4x5 matrix on unpremultiplied RGBA, offsets in the 0..1 range.
    Matrix { values: [f32; 20] },
}

impl ColorFilter {
    #[rustfmt::skip]
    pub const IDENTITY: [f32; 20] = [
        1.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 1.0, 0.0,
    ];

    /// Scales only the alpha channel.
    pub fn alpha_scale(factor: f32) -> Self {
        let mut values = Self::IDENTITY;
        values[18] = factor;
        ColorFilter::Matrix { values }
    }

    /// Saturation adjustment (0 = grayscale, 1 = unchanged).
    pub fn saturation(s: f32) -> Self {
        let (lr, lg, lb) = (0.2126 * (1.0 - s), 0.7152 * (1.0 - s), 0.0722 * (1.0 - s));
        #[rustfmt::skip]
        let values = [
            lr + s, lg,     lb,     0.0, 0.0,
            lr,     lg + s, lb,     0.0, 0.0,
            lr,     lg,     lb + s, 0.0, 0.0,
            0.0,    0.0,    0.0,    1.0, 0.0,
        ];
        ColorFilter::Matrix { values }
    }
}

impl Eq for ColorFilter {}

impl Hash for ColorFilter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ColorFilter::Blend { color, mode } => {
                color.hash(state);
                mode.hash(state);
            }
            ColorFilter::Matrix { values } => {
                for v in values {
                    hash_f32(*v, state);
                }
            }
        }
    }
}

/// A tint layered over the blurred content.
///
/// `Unspecified` is the default so that style fields can always hold a tint;
/// builders skip it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tint {
    #[default]
    Unspecified,
    Color {
        color: Color,
        #[serde(default)]
        blend_mode: BlendMode,
        #[serde(default)]
        color_filter: Option<ColorFilter>,
    },
    Brush {
        brush: Brush,
        #[serde(default = "full_alpha")]
        alpha: f32,
        #[serde(default)]
        blend_mode: BlendMode,
        #[serde(default)]
        color_filter: Option<ColorFilter>,
    },
}

fn full_alpha() -> f32 {
    1.0
}

impl Tint {
    pub fn color(color: Color) -> Self {
        Tint::Color {
            color,
            blend_mode: BlendMode::SrcOver,
            color_filter: None,
        }
    }

    pub fn color_with_mode(color: Color, blend_mode: BlendMode) -> Self {
        Tint::Color {
            color,
            blend_mode,
            color_filter: None,
        }
    }

    pub fn brush(brush: Brush) -> Self {
        Tint::Brush {
            brush,
            alpha: 1.0,
            blend_mode: BlendMode::SrcOver,
            color_filter: None,
        }
    }

    pub fn is_specified(&self) -> bool {
        !matches!(self, Tint::Unspecified)
    }

    pub fn alpha(&self) -> f32 {
        match self {
            Tint::Unspecified => 0.0,
            Tint::Color { color, .. } => color.a,
            Tint::Brush { alpha, .. } => *alpha,
        }
    }

    pub fn blend_mode(&self) -> BlendMode {
        match self {
            Tint::Unspecified => BlendMode::SrcOver,
            Tint::Color { blend_mode, .. } | Tint::Brush { blend_mode, .. } => *blend_mode,
        }
    }

    /// Returns the tint with its opacity multiplied by `factor`.
    pub fn modulated(&self, factor: f32) -> Tint {
        match self {
            Tint::Unspecified => Tint::Unspecified,
            Tint::Color {
                color,
                blend_mode,
                color_filter,
            } => Tint::Color {
                color: color.modulate_alpha(factor),
                blend_mode: *blend_mode,
                color_filter: color_filter.clone(),
            },
            Tint::Brush {
                brush,
                alpha,
                blend_mode,
                color_filter,
            } => Tint::Brush {
                brush: brush.clone(),
                alpha: (alpha * factor).clamp(0.0, 1.0),
                blend_mode: *blend_mode,
                color_filter: color_filter.clone(),
            },
        }
    }
}

impl Eq for Tint {}

impl Hash for Tint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Tint::Unspecified => {}
            Tint::Color {
                color,
                blend_mode,
                color_filter,
            } => {
                color.hash(state);
                blend_mode.hash(state);
                color_filter.hash(state);
            }
            Tint::Brush {
                brush,
                alpha,
                blend_mode,
                color_filter,
            } => {
                brush.hash(state);
                hash_f32(*alpha, state);
                blend_mode.hash(state);
                color_filter.hash(state);
            }
        }
    }
}
