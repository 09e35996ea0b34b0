//! Rasterizes a [`FilterNode`] graph against a source layer.
//!
//! Every node produces a pixmap the size of the source. `None` inputs read the
//! source itself.

use crate::blend::to_tiny_skia;
use crate::blur::blur_rgba8_premul;
use crate::graph::{CpuFilter, CpuShader, FilterNode};
use crate::paint::{apply_crop, brush_mask, brush_paint, full_rect, to_color};
use frost_core::{ColorFilter, EffectError, Rect};
use tiny_skia::{
    ColorU8, FilterQuality, Paint, Pattern, Pixmap, PixmapPaint, PremultipliedColorU8, SpreadMode,
    Transform,
};

/// Evaluates `filter` with `source` as the content.
pub fn evaluate(filter: &FilterNode, source: &Pixmap) -> Result<Pixmap, EffectError> {
    match filter {
        FilterNode::Blur {
            sigma_x,
            sigma_y,
            tile_mode,
            input,
            crop,
            ..
        } => {
            let mut out = input_or_source(input, source)?;
            let (w, h) = (out.width(), out.height());
            blur_rgba8_premul(out.data_mut(), w, h, *sigma_x, *sigma_y, *tile_mode);
            cropped(out, crop)
        }
        FilterNode::ColorFilter {
            filter,
            input,
            crop,
        } => {
            let mut out = input_or_source(input, source)?;
            apply_color_filter(&mut out, filter)?;
            cropped(out, crop)
        }
        FilterNode::Blend {
            mode,
            background,
            foreground,
            crop,
        } => {
            let mut out = input_or_source(background, source)?;
            let top = input_or_source(foreground, source)?;
            let paint = PixmapPaint {
                blend_mode: to_tiny_skia(*mode),
                ..PixmapPaint::default()
            };
            out.draw_pixmap(0, 0, top.as_ref(), &paint, Transform::identity(), None);
            cropped(out, crop)
        }
        FilterNode::Offset {
            dx,
            dy,
            input,
            crop,
        } => {
            let moved = input_or_source(input, source)?;
            let mut out = blank(source)?;
            out.draw_pixmap(
                0,
                0,
                moved.as_ref(),
                &PixmapPaint::default(),
                Transform::from_translate(*dx, *dy),
                None,
            );
            cropped(out, crop)
        }
        FilterNode::Shader { shader, crop } => {
            let mut out = blank(source)?;
            fill_shader(&mut out, shader)?;
            cropped(out, crop)
        }
        FilterNode::Chain { first, then } => {
            let intermediate = evaluate(first, source)?;
            evaluate(then, &intermediate)
        }
    }
}

fn input_or_source(input: &Option<CpuFilter>, source: &Pixmap) -> Result<Pixmap, EffectError> {
    match input {
        Some(node) => evaluate(node, source),
        None => Ok(source.clone()),
    }
}

fn blank(source: &Pixmap) -> Result<Pixmap, EffectError> {
    Pixmap::new(source.width(), source.height())
        .ok_or_else(|| EffectError::backend("raster", "empty source layer"))
}

fn cropped(mut pixmap: Pixmap, crop: &Option<Rect>) -> Result<Pixmap, EffectError> {
    if let Some(crop) = crop {
        apply_crop(&mut pixmap, *crop)?;
    }
    Ok(pixmap)
}

fn apply_color_filter(pixmap: &mut Pixmap, filter: &ColorFilter) -> Result<(), EffectError> {
    match filter {
        ColorFilter::Blend { color, mode } => {
            let mut paint = Paint::default();
            paint.set_color(to_color(*color));
            paint.blend_mode = to_tiny_skia(*mode);
            let rect = full_rect(pixmap.width(), pixmap.height())?;
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
        ColorFilter::Matrix { values } => {
            for px in pixmap.pixels_mut() {
                *px = apply_matrix(*px, values);
            }
        }
    }
    Ok(())
}

/// Applies a row-major 4x5 matrix on unpremultiplied components.
fn apply_matrix(px: PremultipliedColorU8, m: &[f32; 20]) -> PremultipliedColorU8 {
    let c = px.demultiply();
    let v = [
        c.red() as f32 / 255.0,
        c.green() as f32 / 255.0,
        c.blue() as f32 / 255.0,
        c.alpha() as f32 / 255.0,
    ];
    let row = |r: usize| {
        let o = r * 5;
        let x = m[o] * v[0] + m[o + 1] * v[1] + m[o + 2] * v[2] + m[o + 3] * v[3] + m[o + 4];
        (x.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    ColorU8::from_rgba(row(0), row(1), row(2), row(3)).premultiply()
}

fn fill_shader(out: &mut Pixmap, shader: &CpuShader) -> Result<(), EffectError> {
    let rect = full_rect(out.width(), out.height())?;
    match shader {
        CpuShader::Brush(brush) => {
            out.fill_rect(rect, &brush_paint(brush, Transform::identity()), Transform::identity(), None);
        }
        CpuShader::Noise { texture, mask } => {
            let paint = Paint {
                shader: Pattern::new(
                    Pixmap::as_ref(texture),
                    SpreadMode::Repeat,
                    FilterQuality::Nearest,
                    1.0,
                    Transform::identity(),
                ),
                ..Paint::default()
            };
            let mask = match mask {
                Some(brush) => Some(brush_mask(
                    brush,
                    out.width(),
                    out.height(),
                    Transform::identity(),
                )?),
                None => None,
            };
            out.fill_rect(rect, &paint, Transform::identity(), mask.as_ref());
        }
    }
    Ok(())
}
