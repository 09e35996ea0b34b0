use crate::graph::{CpuFilter, CpuShader, FilterNode};
use frost_core::backend::check_blur_radius;
use frost_core::types::radius_to_sigma;
use frost_core::{
    BlendMode, Brush, ColorFilter, EffectError, FilterBackend, NoiseTexture, Rect, RuntimeShader,
    TileMode,
};
use std::cell::RefCell;
use std::rc::Rc;
use tiny_skia::{IntSize, Pixmap};
use tracing::debug;

/// Largest blur radius, in pixels, accepted by default.
pub const DEFAULT_MAX_BLUR_RADIUS: f32 = 250.0;

/// Software backend building an inspectable [`FilterNode`] graph, rasterized
/// with tiny-skia by [`crate::evaluate`].
///
/// There is no runtime shader support: progressive linear blur goes through the
/// multi-layer renderer and liquid glass is skipped.
pub struct CpuBackend {
    max_blur_radius: f32,
    noise: RefCell<Option<Rc<Pixmap>>>,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self::with_max_blur_radius(DEFAULT_MAX_BLUR_RADIUS)
    }

    pub fn with_max_blur_radius(max_blur_radius: f32) -> Self {
        Self {
            max_blur_radius,
            noise: RefCell::new(None),
        }
    }

    /// Uploads the grain texture once; later calls share the pixmap.
    fn noise_pixmap(&self, noise: &NoiseTexture) -> Result<Rc<Pixmap>, EffectError> {
        if let Some(pixmap) = self.noise.borrow().as_ref() {
            if pixmap.width() == noise.size() {
                return Ok(pixmap.clone());
            }
        }
        let size = IntSize::from_wh(noise.size(), noise.size())
            .ok_or_else(|| EffectError::backend("noise", "empty noise texture"))?;
        let pixmap = Pixmap::from_vec(noise.pixels().to_vec(), size)
            .ok_or_else(|| EffectError::backend("noise", "noise texture size mismatch"))?;
        debug!(size = noise.size(), "uploaded noise texture");
        let pixmap = Rc::new(pixmap);
        *self.noise.borrow_mut() = Some(pixmap.clone());
        Ok(pixmap)
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterBackend for CpuBackend {
    type Filter = CpuFilter;
    type Shader = CpuShader;

    fn name(&self) -> &'static str {
        "tiny-skia"
    }

    fn supports_runtime_shaders(&self) -> bool {
        false
    }

    fn max_blur_radius(&self) -> f32 {
        self.max_blur_radius
    }

    fn blur(
        &self,
        radius_x: f32,
        radius_y: f32,
        tile_mode: TileMode,
        input: Option<CpuFilter>,
        crop: Option<Rect>,
    ) -> Result<Option<CpuFilter>, EffectError> {
        if radius_x <= 0.0 && radius_y <= 0.0 {
            return Ok(None);
        }
        check_blur_radius(radius_x.max(radius_y), self.max_blur_radius)?;
        Ok(Some(Rc::new(FilterNode::Blur {
            radius_x,
            radius_y,
            sigma_x: radius_to_sigma(radius_x),
            sigma_y: radius_to_sigma(radius_y),
            tile_mode,
            input,
            crop,
        })))
    }

    fn color_filter(
        &self,
        filter: &ColorFilter,
        input: Option<CpuFilter>,
        crop: Option<Rect>,
    ) -> Result<CpuFilter, EffectError> {
        Ok(Rc::new(FilterNode::ColorFilter {
            filter: filter.clone(),
            input,
            crop,
        }))
    }

    fn blend(
        &self,
        mode: BlendMode,
        background: Option<CpuFilter>,
        foreground: Option<CpuFilter>,
        crop: Option<Rect>,
    ) -> Result<CpuFilter, EffectError> {
        Ok(Rc::new(FilterNode::Blend {
            mode,
            background,
            foreground,
            crop,
        }))
    }

    fn offset(
        &self,
        dx: f32,
        dy: f32,
        input: Option<CpuFilter>,
        crop: Option<Rect>,
    ) -> Result<CpuFilter, EffectError> {
        Ok(Rc::new(FilterNode::Offset {
            dx,
            dy,
            input,
            crop,
        }))
    }

    fn shader(&self, shader: &CpuShader, crop: Option<Rect>) -> Result<CpuFilter, EffectError> {
        Ok(Rc::new(FilterNode::Shader {
            shader: shader.clone(),
            crop,
        }))
    }

    fn chain(&self, first: CpuFilter, then: CpuFilter) -> Result<CpuFilter, EffectError> {
        Ok(Rc::new(FilterNode::Chain { first, then }))
    }

    fn runtime_shader(
        &self,
        _shader: &RuntimeShader,
        _input: Option<CpuFilter>,
    ) -> Result<Option<CpuFilter>, EffectError> {
        Ok(None)
    }

    fn brush_shader(&self, brush: &Brush) -> Result<CpuShader, EffectError> {
        Ok(CpuShader::Brush(brush.clone()))
    }

    fn noise_shader(
        &self,
        noise: &NoiseTexture,
        mask: Option<&Brush>,
    ) -> Result<CpuShader, EffectError> {
        Ok(CpuShader::Noise {
            texture: self.noise_pixmap(noise)?,
            mask: mask.cloned(),
        })
    }
}
