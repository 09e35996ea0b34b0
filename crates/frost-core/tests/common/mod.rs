//! Recording test doubles for the backend and host interfaces.

#![allow(dead_code)]

use frost_core::backend::check_blur_radius;
use frost_core::{
    BlendMode, Brush, Capabilities, ColorFilter, DrawScope, EffectError, FilterBackend,
    NoiseTexture, PlatformContext, Rect, RuntimeShader, TileMode,
};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

#[derive(Debug, PartialEq)]
pub enum Op {
    Blur { radius_x: f32, radius_y: f32, tile_mode: TileMode },
    ColorFilter(ColorFilter),
    Blend(BlendMode),
    Offset(f32, f32),
    Shader(MockShader),
    Chain,
    Runtime(&'static str),
}

#[derive(Debug, PartialEq)]
pub struct Node {
    pub op: Op,
    pub inputs: Vec<Rc<Node>>,
}

pub type Filter = Rc<Node>;

#[derive(Clone, Debug, PartialEq)]
pub enum MockShader {
    Brush(Brush),
    Noise { masked: bool },
}

/// Builds an inspectable graph instead of native filters.
pub struct MockBackend {
    pub runtime_shaders: bool,
    pub max_radius: f32,
    /// Every runtime shader requested, in order.
    pub requested: RefCell<Vec<RuntimeShader>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            runtime_shaders: false,
            max_radius: 256.0,
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn with_max_radius(max_radius: f32) -> Self {
        Self {
            max_radius,
            ..Self::new()
        }
    }

    pub fn with_runtime_shaders() -> Self {
        Self {
            runtime_shaders: true,
            ..Self::new()
        }
    }
}

fn node(op: Op, inputs: impl IntoIterator<Item = Option<Filter>>) -> Filter {
    Rc::new(Node {
        op,
        inputs: inputs.into_iter().flatten().collect(),
    })
}

impl FilterBackend for MockBackend {
    type Filter = Filter;
    type Shader = MockShader;

    fn name(&self) -> &'static str {
        "mock"
    }

    fn supports_runtime_shaders(&self) -> bool {
        self.runtime_shaders
    }

    fn max_blur_radius(&self) -> f32 {
        self.max_radius
    }

    fn blur(
        &self,
        radius_x: f32,
        radius_y: f32,
        tile_mode: TileMode,
        input: Option<Filter>,
        _crop: Option<Rect>,
    ) -> Result<Option<Filter>, EffectError> {
        if radius_x <= 0.0 && radius_y <= 0.0 {
            return Ok(None);
        }
        check_blur_radius(radius_x.max(radius_y), self.max_radius)?;
        Ok(Some(node(
            Op::Blur {
                radius_x,
                radius_y,
                tile_mode,
            },
            [input],
        )))
    }

    fn color_filter(
        &self,
        filter: &ColorFilter,
        input: Option<Filter>,
        _crop: Option<Rect>,
    ) -> Result<Filter, EffectError> {
        Ok(node(Op::ColorFilter(filter.clone()), [input]))
    }

    fn blend(
        &self,
        mode: BlendMode,
        background: Option<Filter>,
        foreground: Option<Filter>,
        _crop: Option<Rect>,
    ) -> Result<Filter, EffectError> {
        Ok(node(Op::Blend(mode), [background, foreground]))
    }

    fn offset(
        &self,
        dx: f32,
        dy: f32,
        input: Option<Filter>,
        _crop: Option<Rect>,
    ) -> Result<Filter, EffectError> {
        Ok(node(Op::Offset(dx, dy), [input]))
    }

    fn shader(&self, shader: &MockShader, _crop: Option<Rect>) -> Result<Filter, EffectError> {
        Ok(node(Op::Shader(shader.clone()), []))
    }

    fn chain(&self, first: Filter, then: Filter) -> Result<Filter, EffectError> {
        Ok(node(Op::Chain, [Some(first), Some(then)]))
    }

    fn runtime_shader(
        &self,
        shader: &RuntimeShader,
        input: Option<Filter>,
    ) -> Result<Option<Filter>, EffectError> {
        if !self.runtime_shaders {
            return Ok(None);
        }
        self.requested.borrow_mut().push(shader.clone());
        let name = match shader {
            RuntimeShader::ProgressiveBlur { .. } => "progressive_blur",
            RuntimeShader::LiquidGlass { .. } => "liquid_glass",
        };
        Ok(Some(node(Op::Runtime(name), [input])))
    }

    fn brush_shader(&self, brush: &Brush) -> Result<MockShader, EffectError> {
        Ok(MockShader::Brush(brush.clone()))
    }

    fn noise_shader(
        &self,
        _noise: &NoiseTexture,
        mask: Option<&Brush>,
    ) -> Result<MockShader, EffectError> {
        Ok(MockShader::Noise {
            masked: mask.is_some(),
        })
    }
}

/// Counts nodes in the graph below (and including) `root` matching `pred`.
pub fn count(root: &Filter, pred: &dyn Fn(&Op) -> bool) -> usize {
    let own = usize::from(pred(&root.op));
    own + root.inputs.iter().map(|i| count(i, pred)).sum::<usize>()
}

pub fn count_blurs(root: &Filter) -> usize {
    count(root, &|op| matches!(op, Op::Blur { .. }))
}

pub fn count_color_filters(root: &Filter) -> usize {
    count(root, &|op| matches!(op, Op::ColorFilter(_)))
}

pub fn count_masks(root: &Filter) -> usize {
    count(root, &|op| matches!(op, Op::Blend(BlendMode::DstIn)))
}

pub fn count_runtime(root: &Filter, name: &str) -> usize {
    count(root, &|op| matches!(op, Op::Runtime(n) if *n == name))
}

/// Hands out numbered layers and records every release.
pub struct MockPlatform {
    pub caps: Capabilities,
    pub created: u32,
    pub live: BTreeSet<u32>,
    pub released: Vec<u32>,
    pub peak_live: usize,
}

impl MockPlatform {
    pub fn new(caps: Capabilities) -> Self {
        Self {
            caps,
            created: 0,
            live: BTreeSet::new(),
            released: Vec::new(),
            peak_live: 0,
        }
    }
}

impl PlatformContext for MockPlatform {
    type Layer = u32;

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn create_layer(&mut self) -> Result<u32, EffectError> {
        self.created += 1;
        let id = self.created;
        self.live.insert(id);
        self.peak_live = self.peak_live.max(self.live.len());
        Ok(id)
    }

    fn release_layer(&mut self, layer: u32) {
        assert!(self.live.remove(&layer), "layer {layer} released twice");
        self.released.push(layer);
    }
}

#[derive(Debug, PartialEq)]
pub enum Call {
    Record { layer: u32, area: Rect, scale: f32 },
    Draw { layer: u32, filtered: bool, alpha: f32 },
    Fill { brush: Brush, masked: bool, alpha: f32 },
}

pub struct MockScope {
    pub density: f32,
    pub calls: Vec<Call>,
    pub filters: Vec<Filter>,
}

impl MockScope {
    pub fn new(density: f32) -> Self {
        Self {
            density,
            calls: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn records(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Record { .. }))
            .count()
    }

    pub fn fills(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Fill { .. }))
            .count()
    }
}

impl DrawScope<u32, Filter> for MockScope {
    fn density(&self) -> f32 {
        self.density
    }

    fn record_layer(&mut self, layer: &mut u32, area: Rect, scale: f32) -> Result<(), EffectError> {
        self.calls.push(Call::Record {
            layer: *layer,
            area,
            scale,
        });
        Ok(())
    }

    fn draw_layer(
        &mut self,
        layer: &u32,
        filter: Option<&Filter>,
        alpha: f32,
    ) -> Result<(), EffectError> {
        if let Some(filter) = filter {
            self.filters.push(filter.clone());
        }
        self.calls.push(Call::Draw {
            layer: *layer,
            filtered: filter.is_some(),
            alpha,
        });
        Ok(())
    }

    fn fill(
        &mut self,
        brush: &Brush,
        mask: Option<&Brush>,
        _area: Rect,
        alpha: f32,
    ) -> Result<(), EffectError> {
        self.calls.push(Call::Fill {
            brush: brush.clone(),
            masked: mask.is_some(),
            alpha,
        });
        Ok(())
    }
}
