//! Interfaces to the host: the platform context and the draw scope.
//!
//! The core never implements these; `frost-skia` and `frost-cpu` provide
//! implementations for their backends.

use crate::brush::Brush;
use crate::error::EffectError;
use crate::types::Rect;

/// What the current platform / device can do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Real blur is available (otherwise effects draw a scrim).
    pub blur: bool,
    pub runtime_shaders: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        blur: false,
        runtime_shaders: false,
    };
    pub const BLUR_ONLY: Capabilities = Capabilities {
        blur: true,
        runtime_shaders: false,
    };
    pub const FULL: Capabilities = Capabilities {
        blur: true,
        runtime_shaders: true,
    };
}

/// Capability queries and the graphics-layer allocator of the host.
pub trait PlatformContext {
    type Layer;

    fn capabilities(&self) -> Capabilities;

    fn create_layer(&mut self) -> Result<Self::Layer, EffectError>;

    fn release_layer(&mut self, layer: Self::Layer);
}

/// The draw callback's view of the content being covered by the effect.
pub trait DrawScope<L, F> {
    /// Pixels per device-independent unit.
    fn density(&self) -> f32;

    /// Records `area` of the content source into `layer`, downsampled by `scale`.
    fn record_layer(&mut self, layer: &mut L, area: Rect, scale: f32) -> Result<(), EffectError>;

    /// Draws a recorded layer back at its area, upscaled, through `filter`.
    fn draw_layer(&mut self, layer: &L, filter: Option<&F>, alpha: f32)
        -> Result<(), EffectError>;

    /// Fills `area` with `brush`, kept only where `mask` is opaque. Brush and
    /// mask coordinates are local to `area`.
    fn fill(
        &mut self,
        brush: &Brush,
        mask: Option<&Brush>,
        area: Rect,
        alpha: f32,
    ) -> Result<(), EffectError>;
}

struct ReleaseOnDrop<'c, P: PlatformContext> {
    ctx: &'c mut P,
    layer: Option<P::Layer>,
}

impl<P: PlatformContext> Drop for ReleaseOnDrop<'_, P> {
    fn drop(&mut self) {
        if let Some(layer) = self.layer.take() {
            self.ctx.release_layer(layer);
        }
    }
}

/// Acquires a layer for the duration of `f` and releases it afterwards, on the
/// error path and during unwinding too.
pub fn with_scoped_layer<P, R>(
    ctx: &mut P,
    f: impl FnOnce(&mut P::Layer) -> Result<R, EffectError>,
) -> Result<R, EffectError>
where
    P: PlatformContext,
{
    let layer = ctx.create_layer()?;
    let mut guard = ReleaseOnDrop {
        ctx,
        layer: Some(layer),
    };
    match guard.layer.as_mut() {
        Some(layer) => f(layer),
        None => Err(EffectError::LayerAllocation("scoped layer missing".into())),
    }
}
