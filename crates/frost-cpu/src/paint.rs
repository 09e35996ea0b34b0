use crate::blend::spread_mode;
use frost_core::{Brush, Color, EffectError};
use tiny_skia::{
    FillRule, GradientStop, LinearGradient, Mask, MaskType, Paint, Pixmap, Point, RadialGradient,
    Shader, Transform,
};

pub fn to_color(color: Color) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_rgba8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

fn gradient_stops(brush: &Brush) -> Vec<GradientStop> {
    brush
        .stops()
        .iter()
        .map(|s| GradientStop::new(s.offset, to_color(s.color)))
        .collect()
}

/// A shader for `brush`, positioned by `transform`.
///
/// Degenerate gradients (coincident points, zero radius) fall back to the
/// color of their last stop.
pub fn brush_shader(brush: &Brush, transform: Transform) -> Shader<'static> {
    let last_color = || {
        brush
            .stops()
            .last()
            .map(|s| to_color(s.color))
            .unwrap_or(tiny_skia::Color::TRANSPARENT)
    };
    let shader = match brush {
        Brush::Solid { color } => return Shader::SolidColor(to_color(*color)),
        Brush::LinearGradient {
            start,
            end,
            tile_mode,
            ..
        } => LinearGradient::new(
            Point::from_xy(start.x, start.y),
            Point::from_xy(end.x, end.y),
            gradient_stops(brush),
            spread_mode(*tile_mode),
            transform,
        ),
        Brush::RadialGradient {
            center,
            radius,
            tile_mode,
            ..
        } => RadialGradient::new(
            Point::from_xy(center.x, center.y),
            Point::from_xy(center.x, center.y),
            *radius,
            gradient_stops(brush),
            spread_mode(*tile_mode),
            transform,
        ),
    };
    shader.unwrap_or_else(|| Shader::SolidColor(last_color()))
}

pub fn brush_paint(brush: &Brush, transform: Transform) -> Paint<'static> {
    Paint {
        shader: brush_shader(brush, transform),
        anti_alias: false,
        ..Paint::default()
    }
}

/// Rasterizes `brush` over a `width` x `height` area and uses its alpha as a mask.
pub fn brush_mask(
    brush: &Brush,
    width: u32,
    height: u32,
    transform: Transform,
) -> Result<Mask, EffectError> {
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| EffectError::backend("mask", format!("invalid size {width}x{height}")))?;
    let rect = full_rect(width, height)?;
    pixmap.fill_rect(rect, &brush_paint(brush, transform), Transform::identity(), None);
    Ok(Mask::from_pixmap(pixmap.as_ref(), MaskType::Alpha))
}

pub fn full_rect(width: u32, height: u32) -> Result<tiny_skia::Rect, EffectError> {
    tiny_skia::Rect::from_xywh(0.0, 0.0, width as f32, height as f32)
        .ok_or_else(|| EffectError::backend("raster", format!("invalid size {width}x{height}")))
}

/// Keeps only the pixels of `pixmap` inside `crop`.
pub fn apply_crop(pixmap: &mut Pixmap, crop: frost_core::Rect) -> Result<(), EffectError> {
    let mut mask = Mask::new(pixmap.width(), pixmap.height())
        .ok_or_else(|| EffectError::backend("crop", "invalid mask size"))?;
    if let Some(rect) = tiny_skia::Rect::from_xywh(crop.left(), crop.top(), crop.width(), crop.height()) {
        let path = tiny_skia::PathBuilder::from_rect(rect);
        mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
    }
    mask.invert();
    let clear = Paint {
        blend_mode: tiny_skia::BlendMode::Clear,
        ..Paint::default()
    };
    let rect = full_rect(pixmap.width(), pixmap.height())?;
    pixmap.fill_rect(rect, &clear, Transform::identity(), Some(&mask));
    Ok(())
}
