//! # Effect Module
//!
//! The per-node visual effect: picks a rendering strategy from the style and the
//! platform capabilities, and draws through the matching delegate.
//!
//! ## States
//! - `NoEffect`: not attached; draws nothing.
//! - `FullBlur`: real blur through one retained content layer.
//! - `DegradedScrim`: background color and tints only, no blur.
//! - `LiquidGlass`: blur plus refraction, one scoped layer per draw.
//!
//! The state is re-evaluated on attach, enable toggles, style changes and
//! capability changes. Switching state releases the previous delegate's layer
//! through the platform context exactly once.
//!
//! Hosts must call [`VisualEffect::detach`] before dropping an attached effect;
//! a retained layer cannot be released without the platform context.

use crate::backend::FilterBackend;
use crate::brush::Brush;
use crate::builder::BuiltEffect;
use crate::context::{with_scoped_layer, Capabilities, DrawScope, PlatformContext};
use crate::error::EffectError;
use crate::layers::{build_progressive_layers, draw_progressive_layers};
use crate::params::RenderEffectParams;
use crate::runtime::EffectRuntime;
use crate::style::BlurStyle;
use crate::tint::Tint;
use crate::types::Rect;
use tracing::{info, warn};

/// Rendering strategy currently installed on a [`VisualEffect`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EffectState {
    NoEffect,
    FullBlur,
    DegradedScrim,
    LiquidGlass,
}

enum Delegate<L> {
    NoEffect,
    /// The content layer is created on first draw and kept across frames.
    FullBlur { layer: Option<L> },
    DegradedScrim,
    LiquidGlass,
}

impl<L> Delegate<L> {
    fn for_state(state: EffectState) -> Self {
        match state {
            EffectState::NoEffect => Delegate::NoEffect,
            EffectState::FullBlur => Delegate::FullBlur { layer: None },
            EffectState::DegradedScrim => Delegate::DegradedScrim,
            EffectState::LiquidGlass => Delegate::LiquidGlass,
        }
    }

    fn state(&self) -> EffectState {
        match self {
            Delegate::NoEffect => EffectState::NoEffect,
            Delegate::FullBlur { .. } => EffectState::FullBlur,
            Delegate::DegradedScrim => EffectState::DegradedScrim,
            Delegate::LiquidGlass => EffectState::LiquidGlass,
        }
    }

    fn release<P: PlatformContext<Layer = L>>(self, ctx: &mut P) {
        if let Delegate::FullBlur { layer: Some(layer) } = self {
            ctx.release_layer(layer);
        }
    }
}

pub struct VisualEffect<L> {
    style: BlurStyle,
    attached: bool,
    enabled: bool,
    blur_failed: bool,
    delegate: Delegate<L>,
}

impl<L> VisualEffect<L> {
    pub fn new(style: BlurStyle) -> Self {
        Self {
            style,
            attached: false,
            enabled: true,
            blur_failed: false,
            delegate: Delegate::NoEffect,
        }
    }

    pub fn state(&self) -> EffectState {
        self.delegate.state()
    }

    pub fn style(&self) -> &BlurStyle {
        &self.style
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// True once a draw failed with an unsupported blur radius. Cleared by a
    /// style change.
    pub fn blur_failed(&self) -> bool {
        self.blur_failed
    }

    /// The state the effect should be in for `caps`.
    pub fn select_state(&self, caps: Capabilities) -> EffectState {
        if !self.attached {
            EffectState::NoEffect
        } else if !self.enabled || !self.style.blur_enabled || self.blur_failed {
            EffectState::DegradedScrim
        } else if self.style.liquid_glass.is_some() && caps.blur && caps.runtime_shaders {
            EffectState::LiquidGlass
        } else if caps.blur {
            EffectState::FullBlur
        } else {
            EffectState::DegradedScrim
        }
    }

    pub fn attach<P: PlatformContext<Layer = L>>(&mut self, ctx: &mut P) {
        self.attached = true;
        self.reevaluate(ctx);
    }

    /// Releases the delegate's resources and returns to `NoEffect`.
    pub fn detach<P: PlatformContext<Layer = L>>(&mut self, ctx: &mut P) {
        self.attached = false;
        self.reevaluate(ctx);
    }

    pub fn set_enabled<P: PlatformContext<Layer = L>>(&mut self, enabled: bool, ctx: &mut P) {
        self.enabled = enabled;
        self.reevaluate(ctx);
    }

    pub fn set_style<P: PlatformContext<Layer = L>>(&mut self, style: BlurStyle, ctx: &mut P) {
        if style != self.style {
            self.style = style;
            self.blur_failed = false;
        }
        self.reevaluate(ctx);
    }

    /// Re-runs state selection after the platform's capabilities changed.
    pub fn capabilities_changed<P: PlatformContext<Layer = L>>(&mut self, ctx: &mut P) {
        self.reevaluate(ctx);
    }

    fn reevaluate<P: PlatformContext<Layer = L>>(&mut self, ctx: &mut P) {
        let target = self.select_state(ctx.capabilities());
        let current = self.state();
        if target == current {
            return;
        }
        info!(from = ?current, to = ?target, "visual effect transition");
        let previous = std::mem::replace(&mut self.delegate, Delegate::for_state(target));
        previous.release(ctx);
    }

    /// Derives the builder params for content at `area`.
    pub fn params(&self, area: Rect, density: f32) -> RenderEffectParams {
        self.style.to_params(area.size, area.origin, density)
    }

    /// Draws the effect over `area` of the content source.
    ///
    /// An unsupported blur radius is not an error: the effect switches to
    /// `DegradedScrim` and draws the scrim for this frame instead.
    pub fn draw<B, P, S>(
        &mut self,
        runtime: &EffectRuntime<B>,
        ctx: &mut P,
        scope: &mut S,
        area: Rect,
    ) -> Result<(), EffectError>
    where
        B: FilterBackend,
        P: PlatformContext<Layer = L>,
        S: DrawScope<L, B::Filter>,
    {
        if area.is_empty() {
            return Ok(());
        }
        match self.state() {
            EffectState::NoEffect => Ok(()),
            EffectState::DegradedScrim => self.draw_scrim::<B::Filter, S>(scope, area),
            EffectState::FullBlur | EffectState::LiquidGlass => {
                match self.draw_blurred(runtime, ctx, scope, area) {
                    Err(EffectError::UnsupportedRadius { radius }) => {
                        warn!(radius, "blur radius unsupported, falling back to scrim");
                        self.blur_failed = true;
                        self.reevaluate(ctx);
                        self.draw_scrim::<B::Filter, S>(scope, area)
                    }
                    other => other,
                }
            }
        }
    }

    fn draw_blurred<B, P, S>(
        &mut self,
        runtime: &EffectRuntime<B>,
        ctx: &mut P,
        scope: &mut S,
        area: Rect,
    ) -> Result<(), EffectError>
    where
        B: FilterBackend,
        P: PlatformContext<Layer = L>,
        S: DrawScope<L, B::Filter>,
    {
        let params = self.params(area, scope.density());
        let effect = runtime.get_or_build(&params)?;
        let alpha = self.style.alpha;

        // Every filter is built before the first fill so a rejected radius
        // leaves nothing on the canvas.
        let filter = match &effect {
            BuiltEffect::MultiLayer => {
                let layers = build_progressive_layers(runtime, &params)?;
                self.fill_background::<B::Filter, S>(scope, area)?;
                return draw_progressive_layers(ctx, scope, &layers, alpha);
            }
            BuiltEffect::Filter(filter) => Some(filter),
            BuiltEffect::Passthrough => None,
        };
        self.fill_background::<B::Filter, S>(scope, area)?;

        match &mut self.delegate {
            Delegate::FullBlur { layer: retained } => {
                if retained.is_none() {
                    *retained = Some(ctx.create_layer()?);
                }
                let Some(layer) = retained.as_mut() else {
                    return Err(EffectError::LayerAllocation("retained layer missing".into()));
                };
                scope.record_layer(layer, area, params.scale)?;
                scope.draw_layer(layer, filter, alpha)
            }
            _ => with_scoped_layer(ctx, |layer| {
                scope.record_layer(layer, area, params.scale)?;
                scope.draw_layer(layer, filter, alpha)
            }),
        }
    }

    fn fill_background<F, S: DrawScope<L, F>>(
        &self,
        scope: &mut S,
        area: Rect,
    ) -> Result<(), EffectError> {
        let background = self.style.background_color;
        if background.is_transparent() {
            return Ok(());
        }
        scope.fill(&Brush::solid(background), None, area, 1.0)
    }

    /// Background color plus the scrim tints, restricted by the mask or the
    /// progressive intensity.
    fn draw_scrim<F, S: DrawScope<L, F>>(
        &self,
        scope: &mut S,
        area: Rect,
    ) -> Result<(), EffectError> {
        self.fill_background::<F, S>(scope, area)?;

        let mask = match (&self.style.mask, &self.style.progressive) {
            (Some(mask), _) => Some(mask.clone()),
            (None, Some(progressive)) => Some(progressive.intensity_brush(area.size)),
            (None, None) => None,
        };
        for tint in self.style.scrim_tints() {
            let brush = match &tint {
                Tint::Unspecified => continue,
                Tint::Color { color, .. } => Brush::solid(*color),
                Tint::Brush { brush, alpha, .. } => brush.with_alpha_modulated(*alpha),
            };
            scope.fill(&brush, mask.as_ref(), area, self.style.alpha)?;
        }
        Ok(())
    }
}
