//! # Frost Skia
//!
//! Skia backend for Frost.
//!
//! [`SkiaBackend`] turns built chains into `skia_safe::ImageFilter` graphs and
//! compiles the progressive-blur and liquid-glass SkSL shaders on first use.
//! [`SkiaPlatform`] and [`SkiaDrawScope`] implement the host interfaces over
//! raster surfaces, so effects can be drawn onto any Skia canvas.

pub mod backend;
pub mod blend;
pub mod platform;
pub mod shaders;

pub use backend::{brush_to_shader, to_sk_tile_mode, SkiaBackend, DEFAULT_MAX_BLUR_RADIUS};
pub use blend::{from_skia, to_skia};
pub use platform::{SkiaDrawScope, SkiaLayer, SkiaPlatform};
