//! Raster-surface implementations of the host interfaces.

use crate::backend::{brush_to_shader, to_sk_rect};
use frost_core::{Brush, Capabilities, DrawScope, EffectError, PlatformContext, Rect};
use skia_safe::canvas::SaveLayerRec;
use skia_safe::{surfaces, BlendMode, Canvas, Image, ImageFilter, Paint};
use tracing::trace;

/// A recorded content layer.
#[derive(Debug, Default)]
pub struct SkiaLayer {
    image: Option<Image>,
    area: Rect,
    scale: f32,
}

impl SkiaLayer {
    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn area(&self) -> Rect {
        self.area
    }
}

/// Hands out [`SkiaLayer`]s and tracks how many are alive.
#[derive(Debug)]
pub struct SkiaPlatform {
    capabilities: Capabilities,
    live_layers: usize,
    peak_layers: usize,
}

impl SkiaPlatform {
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::FULL)
    }

    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            live_layers: 0,
            peak_layers: 0,
        }
    }

    pub fn set_capabilities(&mut self, capabilities: Capabilities) {
        self.capabilities = capabilities;
    }

    pub fn live_layers(&self) -> usize {
        self.live_layers
    }

    pub fn peak_layers(&self) -> usize {
        self.peak_layers
    }
}

impl Default for SkiaPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformContext for SkiaPlatform {
    type Layer = SkiaLayer;

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn create_layer(&mut self) -> Result<SkiaLayer, EffectError> {
        self.live_layers += 1;
        self.peak_layers = self.peak_layers.max(self.live_layers);
        Ok(SkiaLayer::default())
    }

    fn release_layer(&mut self, layer: SkiaLayer) {
        self.live_layers = self.live_layers.saturating_sub(1);
        drop(layer);
    }
}

/// Draws effects onto `canvas`, reading the covered content from `content`.
///
/// `content` is a snapshot of everything behind the effect, in canvas
/// coordinates.
pub struct SkiaDrawScope<'a> {
    canvas: &'a Canvas,
    content: &'a Image,
    density: f32,
}

impl<'a> SkiaDrawScope<'a> {
    pub fn new(canvas: &'a Canvas, content: &'a Image, density: f32) -> Self {
        Self {
            canvas,
            content,
            density,
        }
    }
}

impl DrawScope<SkiaLayer, ImageFilter> for SkiaDrawScope<'_> {
    fn density(&self) -> f32 {
        self.density
    }

    fn record_layer(
        &mut self,
        layer: &mut SkiaLayer,
        area: Rect,
        scale: f32,
    ) -> Result<(), EffectError> {
        let size = (area.size * scale).ceil();
        let mut surface = surfaces::raster_n32_premul((size.x as i32, size.y as i32))
            .ok_or_else(|| {
                EffectError::LayerAllocation(format!("cannot record {}x{} layer", size.x, size.y))
            })?;
        let canvas = surface.canvas();
        canvas.scale((scale, scale));
        canvas.translate((-area.left(), -area.top()));
        canvas.draw_image(self.content, (0, 0), None);
        trace!(width = size.x, height = size.y, "recorded layer");
        *layer = SkiaLayer {
            image: Some(surface.image_snapshot()),
            area,
            scale,
        };
        Ok(())
    }

    fn draw_layer(
        &mut self,
        layer: &SkiaLayer,
        filter: Option<&ImageFilter>,
        alpha: f32,
    ) -> Result<(), EffectError> {
        let Some(image) = layer.image.as_ref() else {
            return Err(EffectError::backend("draw", "layer was never recorded"));
        };
        let mut paint = Paint::default();
        paint.set_alpha_f(alpha.clamp(0.0, 1.0));
        if let Some(filter) = filter {
            paint.set_image_filter(filter.clone());
        }

        let canvas = self.canvas;
        canvas.save();
        canvas.clip_rect(to_sk_rect(layer.area), None, None);
        canvas.translate((layer.area.left(), layer.area.top()));
        canvas.scale((1.0 / layer.scale, 1.0 / layer.scale));
        canvas.draw_image(image, (0, 0), Some(&paint));
        canvas.restore();
        Ok(())
    }

    fn fill(
        &mut self,
        brush: &Brush,
        mask: Option<&Brush>,
        area: Rect,
        alpha: f32,
    ) -> Result<(), EffectError> {
        let mut paint = Paint::default();
        paint.set_shader(brush_to_shader(&brush.with_alpha_modulated(alpha))?);
        let mask = mask.map(brush_to_shader).transpose()?;
        let local = skia_safe::Rect::from_wh(area.width(), area.height());

        let canvas = self.canvas;
        canvas.save();
        canvas.translate((area.left(), area.top()));
        match mask {
            None => {
                canvas.draw_rect(local, &paint);
            }
            Some(mask) => {
                canvas.save_layer(&SaveLayerRec::default().bounds(&local));
                canvas.draw_rect(local, &paint);
                let mut mask_paint = Paint::default();
                mask_paint.set_shader(mask);
                mask_paint.set_blend_mode(BlendMode::DstIn);
                canvas.draw_rect(local, &mask_paint);
                canvas.restore();
            }
        }
        canvas.restore();
        Ok(())
    }
}
