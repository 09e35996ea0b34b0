//! # Frost Core
//!
//! `frost-core` is the backend-agnostic half of Frost, a real-time frosted-glass
//! effect layer for declarative UI hosts.
//!
//! Given a declarative [`BlurStyle`] it derives [`RenderEffectParams`], builds a
//! native filter chain through a [`FilterBackend`] (blur, liquid-glass
//! refraction, tints, noise, mask), caches chains by parameter identity and
//! draws them through host-provided layers.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use frost_core::{BlurStyle, EffectRuntime, VisualEffect};
//!
//! let runtime = EffectRuntime::new(backend);
//! let mut effect = VisualEffect::new(BlurStyle::from_json(r#"{"blur_radius": 16}"#)?);
//! effect.attach(&mut platform);
//! // Once per frame:
//! effect.draw(&runtime, &mut platform, &mut scope, area)?;
//! effect.detach(&mut platform);
//! ```

/// Filter primitive interface implemented by native backends.
pub mod backend;

/// Abstract blend modes.
pub mod blend;

/// Paint sources for tints, masks and progressive descriptors.
pub mod brush;

/// Composition of one filter chain from effect parameters.
pub mod builder;

/// Bounded LRU cache of built filter chains.
pub mod cache;

/// Host interfaces: platform context and draw scope.
pub mod context;

/// Per-node state machine selecting the rendering strategy.
pub mod effect;

pub mod error;

/// Liquid-glass refraction parameters.
pub mod glass;

/// Multi-layer renderer for linear progressive blur.
pub mod layers;

/// Fractal grain texture.
pub mod noise;

pub mod params;

/// Progressive (spatially varying) blur descriptors.
pub mod progressive;

/// Process-scoped backend, cache and noise texture.
pub mod runtime;

/// Declarative style configuration.
pub mod style;

pub mod tint;

/// Shared data structures used across the pipeline.
pub mod types;

pub use backend::{FilterBackend, IntensityGradient, RuntimeShader};
pub use blend::BlendMode;
pub use brush::{Brush, GradientStop};
pub use builder::{build_render_effect, BuiltEffect};
pub use cache::{EffectCache, DEFAULT_CACHE_CAPACITY};
pub use context::{with_scoped_layer, Capabilities, DrawScope, PlatformContext};
pub use effect::{EffectState, VisualEffect};
pub use error::EffectError;
pub use glass::LiquidGlass;
pub use noise::{FractalNoise, NoiseTexture};
pub use params::RenderEffectParams;
pub use progressive::{Easing, LinearAxis, Progressive};
pub use runtime::EffectRuntime;
pub use style::{BlurStyle, EdgeTreatment};
pub use tint::{ColorFilter, Tint};
pub use types::{Color, Rect, TileMode};
