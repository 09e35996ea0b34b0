//! # Frost CPU
//!
//! Software rendering backend for Frost built on [tiny-skia](https://crates.io/crates/tiny-skia).
//!
//! [`CpuBackend`] builds filter chains as a plain [`FilterNode`] graph that tests
//! can inspect, and [`evaluate`] rasterizes that graph against a recorded layer.
//! [`CpuPlatform`] and [`CpuDrawScope`] implement the host interfaces over
//! pixmaps.

pub mod backend;
pub mod blend;
mod blur;
pub mod eval;
pub mod graph;
mod paint;
pub mod platform;

pub use backend::{CpuBackend, DEFAULT_MAX_BLUR_RADIUS};
pub use blend::{from_tiny_skia, to_tiny_skia};
pub use eval::evaluate;
pub use graph::{CpuFilter, CpuShader, FilterNode};
pub use platform::{fill_pixmap, CpuDrawScope, CpuLayer, CpuPlatform};
