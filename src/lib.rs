//! # Frost
//!
//! Real-time frosted-glass and progressive blur effects for UI hosts.
//!
//! This crate re-exports [`frost_core`] and picks the native backend at
//! compile time:
//!
//! - `skia` (default): [`PlatformBackend`] is `frost_skia::SkiaBackend`.
//! - `cpu`: [`PlatformBackend`] is `frost_cpu::CpuBackend` (when `skia` is off).
//!
//! ```rust,ignore
//! let runtime = frost::runtime();
//! let mut effect = frost::VisualEffect::new(frost::BlurStyle::from_json(json)?);
//! effect.attach(&mut platform);
//! effect.draw(&runtime, &mut platform, &mut scope, area)?;
//! ```

pub use frost_core::*;

#[cfg(feature = "cpu")]
pub use frost_cpu as cpu;
#[cfg(feature = "skia")]
pub use frost_skia as skia;

#[cfg(feature = "skia")]
pub type PlatformBackend = frost_skia::SkiaBackend;

#[cfg(all(feature = "cpu", not(feature = "skia")))]
pub type PlatformBackend = frost_cpu::CpuBackend;

/// Builds the effect runtime for the compiled-in backend.
#[cfg(any(feature = "skia", feature = "cpu"))]
pub fn runtime() -> EffectRuntime<PlatformBackend> {
    let backend = PlatformBackend::default();
    tracing::debug!(backend = backend.name(), "created effect runtime");
    EffectRuntime::new(backend)
}
