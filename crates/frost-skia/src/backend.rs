//! Skia implementation of [`FilterBackend`].
//!
//! Filters are `skia_safe::ImageFilter` graphs. A `None` input is Skia's own
//! convention for "the source image", so chains map onto `image_filters`
//! without translation.

use crate::blend::to_skia;
use crate::shaders::{INPUT_CHILD, INTENSITY_CHILD, LIQUID_GLASS, PROGRESSIVE_BLUR};
use frost_core::backend::check_blur_radius;
use frost_core::types::radius_to_sigma;
use frost_core::{
    BlendMode, Brush, Color, ColorFilter, Easing, EffectError, FilterBackend, GradientStop,
    IntensityGradient, NoiseTexture, Rect, RuntimeShader, TileMode,
};
use glam::Vec2;
use skia_safe::color_filters::{self, Clamp};
use skia_safe::image_filters::{self, CropRect};
use skia_safe::runtime_effect::RuntimeShaderBuilder;
use skia_safe::{
    gradient_shader, images, shaders, AlphaType, ColorType, Data, Image, ImageFilter, ImageInfo,
    Point, RuntimeEffect, SamplingOptions, Shader,
};
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::{debug, error};

/// Largest blur radius, in pixels, accepted by default.
pub const DEFAULT_MAX_BLUR_RADIUS: f32 = 500.0;

pub struct SkiaBackend {
    runtime_shaders: bool,
    max_blur_radius: f32,
    effects: RefCell<HashMap<&'static str, RuntimeEffect>>,
    noise: RefCell<Option<Image>>,
}

impl SkiaBackend {
    pub fn new() -> Self {
        Self {
            runtime_shaders: true,
            max_blur_radius: DEFAULT_MAX_BLUR_RADIUS,
            effects: RefCell::new(HashMap::new()),
            noise: RefCell::new(None),
        }
    }

    /// A backend that reports no runtime shader support, as on devices whose
    /// GPU cannot run SkSL.
    pub fn without_runtime_shaders() -> Self {
        Self {
            runtime_shaders: false,
            ..Self::new()
        }
    }

    pub fn with_max_blur_radius(mut self, max_blur_radius: f32) -> Self {
        self.max_blur_radius = max_blur_radius;
        self
    }

    /// Compiles `sksl` on first use and reuses the effect afterwards.
    fn effect(&self, key: &'static str, sksl: &str) -> Result<RuntimeEffect, EffectError> {
        if let Some(effect) = self.effects.borrow().get(key) {
            return Ok(effect.clone());
        }
        let effect = RuntimeEffect::make_for_shader(sksl, None).map_err(|e| {
            error!(shader = key, "Shader compilation error: {}", e);
            EffectError::backend("runtime_shader", e)
        })?;
        debug!(shader = key, "compiled runtime shader");
        self.effects.borrow_mut().insert(key, effect.clone());
        Ok(effect)
    }

    fn noise_image(&self, noise: &NoiseTexture) -> Result<Image, EffectError> {
        if let Some(image) = self.noise.borrow().as_ref() {
            if image.width() == noise.size() as i32 {
                return Ok(image.clone());
            }
        }
        let side = noise.size() as i32;
        let info = ImageInfo::new((side, side), ColorType::RGBA8888, AlphaType::Premul, None);
        let image = images::raster_from_data(&info, Data::new_copy(noise.pixels()), noise.row_bytes())
            .ok_or_else(|| EffectError::backend("noise", "cannot upload noise texture"))?;
        debug!(size = noise.size(), "uploaded noise texture");
        *self.noise.borrow_mut() = Some(image.clone());
        Ok(image)
    }
}

impl Default for SkiaBackend {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn to_sk_color(color: Color) -> skia_safe::Color {
    let [r, g, b, a] = color.to_rgba8();
    skia_safe::Color::from_argb(a, r, g, b)
}

pub(crate) fn to_sk_rect(rect: Rect) -> skia_safe::Rect {
    skia_safe::Rect::from_xywh(rect.left(), rect.top(), rect.width(), rect.height())
}

fn to_sk_point(p: Vec2) -> Point {
    Point::new(p.x, p.y)
}

pub fn to_sk_tile_mode(mode: TileMode) -> skia_safe::TileMode {
    match mode {
        TileMode::Clamp => skia_safe::TileMode::Clamp,
        TileMode::Repeat => skia_safe::TileMode::Repeat,
        TileMode::Mirror => skia_safe::TileMode::Mirror,
        TileMode::Decal => skia_safe::TileMode::Decal,
    }
}

fn crop_rect(crop: Option<Rect>) -> CropRect {
    match crop {
        Some(rect) => CropRect::from(to_sk_rect(rect)),
        None => CropRect::NO_CROP_RECT,
    }
}

fn built(stage: &'static str, filter: Option<ImageFilter>) -> Result<ImageFilter, EffectError> {
    filter.ok_or_else(|| EffectError::backend(stage, "skia returned no filter"))
}

fn set_uniform(
    builder: &mut RuntimeShaderBuilder,
    name: &str,
    values: &[f32],
) -> Result<(), EffectError> {
    builder
        .set_uniform_float(name, values)
        .map_err(|e| EffectError::backend("runtime_shader", format!("{name}: {e:?}")))
}

/// A gradient's colors and positions, or its final color when it cannot be
/// drawn as a gradient.
fn gradient_parts(stops: &[GradientStop]) -> Result<(Vec<skia_safe::Color>, Vec<f32>), Color> {
    if stops.len() < 2 {
        return Err(stops.last().map_or(Color::TRANSPARENT, |s| s.color));
    }
    let colors = stops.iter().map(|s| to_sk_color(s.color)).collect();
    let positions = stops.iter().map(|s| s.offset.clamp(0.0, 1.0)).collect();
    Ok((colors, positions))
}

/// Converts a brush into a Skia shader in the brush's local pixel space.
pub fn brush_to_shader(brush: &Brush) -> Result<Shader, EffectError> {
    let shader = match brush {
        Brush::Solid { color } => Some(shaders::color(to_sk_color(*color))),
        Brush::LinearGradient {
            start,
            end,
            stops,
            tile_mode,
        } => match gradient_parts(stops) {
            Ok(_) if start == end => {
                let last = stops.last().map_or(Color::TRANSPARENT, |s| s.color);
                Some(shaders::color(to_sk_color(last)))
            }
            Ok((colors, positions)) => gradient_shader::linear(
                (to_sk_point(*start), to_sk_point(*end)),
                colors.as_slice(),
                Some(positions.as_slice()),
                to_sk_tile_mode(*tile_mode),
                None,
                None,
            ),
            Err(color) => Some(shaders::color(to_sk_color(color))),
        },
        Brush::RadialGradient {
            center,
            radius,
            stops,
            tile_mode,
        } => match gradient_parts(stops) {
            Ok((colors, positions)) if *radius > 0.0 => gradient_shader::radial(
                to_sk_point(*center),
                *radius,
                colors.as_slice(),
                Some(positions.as_slice()),
                to_sk_tile_mode(*tile_mode),
                None,
                None,
            ),
            _ => {
                let last = stops.last().map_or(Color::TRANSPARENT, |s| s.color);
                Some(shaders::color(to_sk_color(last)))
            }
        },
    };
    shader.ok_or_else(|| EffectError::backend("brush", "skia rejected gradient"))
}

impl FilterBackend for SkiaBackend {
    type Filter = ImageFilter;
    type Shader = Shader;

    fn name(&self) -> &'static str {
        "skia"
    }

    fn supports_runtime_shaders(&self) -> bool {
        self.runtime_shaders
    }

    fn max_blur_radius(&self) -> f32 {
        self.max_blur_radius
    }

    fn blur(
        &self,
        radius_x: f32,
        radius_y: f32,
        tile_mode: TileMode,
        input: Option<ImageFilter>,
        crop: Option<Rect>,
    ) -> Result<Option<ImageFilter>, EffectError> {
        if radius_x <= 0.0 && radius_y <= 0.0 {
            return Ok(None);
        }
        let radius = radius_x.max(radius_y);
        check_blur_radius(radius, self.max_blur_radius)?;
        let sigma = (radius_to_sigma(radius_x), radius_to_sigma(radius_y));
        image_filters::blur(sigma, to_sk_tile_mode(tile_mode), input, crop_rect(crop))
            .map(Some)
            .ok_or(EffectError::UnsupportedRadius { radius })
    }

    fn color_filter(
        &self,
        filter: &ColorFilter,
        input: Option<ImageFilter>,
        crop: Option<Rect>,
    ) -> Result<ImageFilter, EffectError> {
        let cf = match filter {
            ColorFilter::Blend { color, mode } => {
                color_filters::blend(to_sk_color(*color), to_skia(*mode))
                    .ok_or_else(|| EffectError::backend("color_filter", "invalid blend filter"))?
            }
            ColorFilter::Matrix { values } => color_filters::matrix_row_major(values, Clamp::Yes),
        };
        built(
            "color_filter",
            image_filters::color_filter(cf, input, crop_rect(crop)),
        )
    }

    fn blend(
        &self,
        mode: BlendMode,
        background: Option<ImageFilter>,
        foreground: Option<ImageFilter>,
        crop: Option<Rect>,
    ) -> Result<ImageFilter, EffectError> {
        built(
            "blend",
            image_filters::blend(to_skia(mode), background, foreground, crop_rect(crop)),
        )
    }

    fn offset(
        &self,
        dx: f32,
        dy: f32,
        input: Option<ImageFilter>,
        crop: Option<Rect>,
    ) -> Result<ImageFilter, EffectError> {
        built(
            "offset",
            image_filters::offset((dx, dy), input, crop_rect(crop)),
        )
    }

    fn shader(&self, shader: &Shader, crop: Option<Rect>) -> Result<ImageFilter, EffectError> {
        built(
            "shader",
            image_filters::shader(shader.clone(), crop_rect(crop)),
        )
    }

    fn chain(&self, first: ImageFilter, then: ImageFilter) -> Result<ImageFilter, EffectError> {
        built("chain", image_filters::compose(then, first))
    }

    fn runtime_shader(
        &self,
        shader: &RuntimeShader,
        input: Option<ImageFilter>,
    ) -> Result<Option<ImageFilter>, EffectError> {
        if !self.runtime_shaders {
            return Ok(None);
        }
        let builder = match shader {
            RuntimeShader::ProgressiveBlur {
                radius,
                direction,
                gradient,
            } => {
                let mut builder =
                    RuntimeShaderBuilder::new(self.effect("progressive_blur", PROGRESSIVE_BLUR)?);
                let (kind, from, to, start, end, easing) = match gradient {
                    IntensityGradient::Linear(axis) => (
                        0.0,
                        axis.start,
                        axis.end,
                        axis.start_intensity,
                        axis.end_intensity,
                        axis.easing,
                    ),
                    IntensityGradient::Radial {
                        center,
                        radius,
                        center_intensity,
                        edge_intensity,
                        easing,
                    } => (
                        1.0,
                        *center,
                        Vec2::new(*radius, 0.0),
                        *center_intensity,
                        *edge_intensity,
                        *easing,
                    ),
                    IntensityGradient::Brush(_) => {
                        (2.0, Vec2::ZERO, Vec2::ZERO, 0.0, 1.0, Easing::Linear)
                    }
                };
                // Every declared child must be bound, even when the gradient
                // is analytic.
                let intensity = match gradient {
                    IntensityGradient::Brush(brush) => brush_to_shader(brush)?,
                    _ => shaders::color(skia_safe::Color::BLACK),
                };
                builder
                    .set_child_shader(INTENSITY_CHILD, intensity)
                    .map_err(|e| {
                        EffectError::backend("runtime_shader", format!("{INTENSITY_CHILD}: {e:?}"))
                    })?;
                set_uniform(&mut builder, "u_sigma", &[radius_to_sigma(*radius)])?;
                set_uniform(&mut builder, "u_direction", &[direction.x, direction.y])?;
                set_uniform(&mut builder, "u_kind", &[kind])?;
                set_uniform(&mut builder, "u_from", &[from.x, from.y])?;
                set_uniform(&mut builder, "u_to", &[to.x, to.y])?;
                set_uniform(&mut builder, "u_start", &[start])?;
                set_uniform(&mut builder, "u_end", &[end])?;
                set_uniform(&mut builder, "u_easing", &[easing.shader_index()])?;
                builder
            }
            RuntimeShader::LiquidGlass { glass, size } => {
                let mut builder =
                    RuntimeShaderBuilder::new(self.effect("liquid_glass", LIQUID_GLASS)?);
                let tint = glass.tint;
                set_uniform(&mut builder, "u_size", &[size.x, size.y])?;
                set_uniform(&mut builder, "u_corner_radius", &[glass.corner_radius])?;
                set_uniform(&mut builder, "u_depth", &[glass.depth])?;
                set_uniform(&mut builder, "u_refraction", &[glass.refraction])?;
                set_uniform(&mut builder, "u_specular", &[glass.specular])?;
                set_uniform(&mut builder, "u_tint", &[tint.r, tint.g, tint.b, tint.a])?;
                builder
            }
        };
        let filter = image_filters::runtime_shader(&builder, INPUT_CHILD, input);
        built("runtime_shader", filter).map(Some)
    }

    fn brush_shader(&self, brush: &Brush) -> Result<Shader, EffectError> {
        brush_to_shader(brush)
    }

    fn noise_shader(
        &self,
        noise: &NoiseTexture,
        mask: Option<&Brush>,
    ) -> Result<Shader, EffectError> {
        let grain = self
            .noise_image(noise)?
            .to_shader(
                (skia_safe::TileMode::Repeat, skia_safe::TileMode::Repeat),
                SamplingOptions::default(),
                None,
            )
            .ok_or_else(|| EffectError::backend("noise", "cannot create noise shader"))?;
        match mask {
            Some(mask) => Ok(shaders::blend(
                skia_safe::BlendMode::DstIn,
                grain,
                brush_to_shader(mask)?,
            )),
            None => Ok(grain),
        }
    }
}
