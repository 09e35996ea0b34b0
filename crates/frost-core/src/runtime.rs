//! # Runtime Module
//!
//! Process-scoped state owned by the host's composition root: the backend, the
//! render-effect cache and the shared noise texture.
//!
//! ## Threading
//! Everything here runs synchronously on the thread driving a frame's draw
//! callbacks. `EffectRuntime` uses interior mutability without locking and is
//! therefore `!Sync`; issuing draws for the same runtime from several threads is
//! unsupported.

use crate::backend::FilterBackend;
use crate::builder::{build_render_effect, BuiltEffect};
use crate::cache::{EffectCache, DEFAULT_CACHE_CAPACITY};
use crate::error::EffectError;
use crate::noise::NoiseTexture;
use crate::params::RenderEffectParams;
use std::cell::{OnceCell, RefCell};

pub struct EffectRuntime<B: FilterBackend> {
    backend: B,
    cache: RefCell<EffectCache<B::Filter>>,
    noise: OnceCell<NoiseTexture>,
}

impl<B: FilterBackend> EffectRuntime<B> {
    pub fn new(backend: B) -> Self {
        Self::with_capacity(backend, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(backend: B, capacity: usize) -> Self {
        Self {
            backend,
            cache: RefCell::new(EffectCache::new(capacity)),
            noise: OnceCell::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The default grain texture, generated on first use.
    pub fn noise(&self) -> &NoiseTexture {
        self.noise.get_or_init(NoiseTexture::default)
    }

    /// Returns the cached chain for `params`, building it on a miss.
    ///
    /// Equal params return clones of the same handle, so repeated frames with
    /// unchanged styles reuse one filter.
    pub fn get_or_build(
        &self,
        params: &RenderEffectParams,
    ) -> Result<BuiltEffect<B::Filter>, EffectError> {
        let mut cache = self.cache.borrow_mut();
        cache.get_or_try_insert_with(params, || {
            build_render_effect(&self.backend, params, self.noise())
        })
    }

    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Drops all cached chains (used between tests or on teardown).
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}
