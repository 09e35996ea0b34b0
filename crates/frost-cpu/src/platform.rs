//! Pixmap-backed implementations of the host interfaces.

use crate::eval::evaluate;
use crate::graph::CpuFilter;
use crate::paint::{brush_mask, brush_paint, full_rect};
use frost_core::{Brush, Capabilities, DrawScope, EffectError, PlatformContext, Rect};
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

/// A recorded content layer: pixels plus where they came from.
#[derive(Debug, Default)]
pub struct CpuLayer {
    pixmap: Option<Pixmap>,
    area: Rect,
    scale: f32,
}

impl CpuLayer {
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    pub fn area(&self) -> Rect {
        self.area
    }
}

/// Hands out [`CpuLayer`]s and counts how many are alive.
#[derive(Debug)]
pub struct CpuPlatform {
    capabilities: Capabilities,
    live_layers: usize,
    peak_layers: usize,
    created_layers: usize,
}

impl CpuPlatform {
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::BLUR_ONLY)
    }

    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            live_layers: 0,
            peak_layers: 0,
            created_layers: 0,
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

    pub fn created_layers(&self) -> usize {
        self.created_layers
    }
}

impl Default for CpuPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformContext for CpuPlatform {
    type Layer = CpuLayer;

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn create_layer(&mut self) -> Result<CpuLayer, EffectError> {
        self.live_layers += 1;
        self.created_layers += 1;
        self.peak_layers = self.peak_layers.max(self.live_layers);
        Ok(CpuLayer::default())
    }

    fn release_layer(&mut self, layer: CpuLayer) {
        self.live_layers = self.live_layers.saturating_sub(1);
        drop(layer);
    }
}

/// Draws effects into `target`, reading covered content from `content`.
///
/// Both pixmaps share one coordinate space.
pub struct CpuDrawScope<'a> {
    content: &'a Pixmap,
    target: &'a mut Pixmap,
    density: f32,
}

impl<'a> CpuDrawScope<'a> {
    pub fn new(content: &'a Pixmap, target: &'a mut Pixmap, density: f32) -> Self {
        Self {
            content,
            target,
            density,
        }
    }
}

impl DrawScope<CpuLayer, CpuFilter> for CpuDrawScope<'_> {
    fn density(&self) -> f32 {
        self.density
    }

    fn record_layer(
        &mut self,
        layer: &mut CpuLayer,
        area: Rect,
        scale: f32,
    ) -> Result<(), EffectError> {
        let size = (area.size * scale).ceil();
        let mut pixmap = Pixmap::new(size.x as u32, size.y as u32).ok_or_else(|| {
            EffectError::LayerAllocation(format!("cannot record {}x{} layer", size.x, size.y))
        })?;
        let transform =
            Transform::from_translate(-area.left(), -area.top()).post_scale(scale, scale);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        pixmap.draw_pixmap(0, 0, self.content.as_ref(), &paint, transform, None);
        *layer = CpuLayer {
            pixmap: Some(pixmap),
            area,
            scale,
        };
        Ok(())
    }

    fn draw_layer(
        &mut self,
        layer: &CpuLayer,
        filter: Option<&CpuFilter>,
        alpha: f32,
    ) -> Result<(), EffectError> {
        let Some(recorded) = layer.pixmap.as_ref() else {
            return Err(EffectError::backend("draw", "layer was never recorded"));
        };
        let filtered;
        let pixels = match filter {
            Some(filter) => {
                filtered = evaluate(filter, recorded)?;
                &filtered
            }
            None => recorded,
        };
        let transform = Transform::from_scale(1.0 / layer.scale, 1.0 / layer.scale)
            .post_translate(layer.area.left(), layer.area.top());
        let paint = PixmapPaint {
            opacity: alpha.clamp(0.0, 1.0),
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.target
            .draw_pixmap(0, 0, pixels.as_ref(), &paint, transform, None);
        Ok(())
    }

    fn fill(
        &mut self,
        brush: &Brush,
        mask: Option<&Brush>,
        area: Rect,
        alpha: f32,
    ) -> Result<(), EffectError> {
        let local = Transform::from_translate(area.left(), area.top());
        let paint = brush_paint(&brush.with_alpha_modulated(alpha), local);
        let mask = match mask {
            Some(mask) => Some(brush_mask(
                mask,
                self.target.width(),
                self.target.height(),
                local,
            )?),
            None => None,
        };
        let Some(rect) =
            tiny_skia::Rect::from_xywh(area.left(), area.top(), area.width(), area.height())
        else {
            return Ok(());
        };
        self.target
            .fill_rect(rect, &paint, Transform::identity(), mask.as_ref());
        Ok(())
    }
}

/// Fills the whole of `pixmap` with `brush`.
pub fn fill_pixmap(pixmap: &mut Pixmap, brush: &Brush) -> Result<(), EffectError> {
    let rect = full_rect(pixmap.width(), pixmap.height())?;
    pixmap.fill_rect(rect, &brush_paint(brush, Transform::identity()), Transform::identity(), None);
    Ok(())
}
