use crate::builder::BuiltEffect;
use crate::error::EffectError;
use crate::params::RenderEffectParams;
use lru::LruCache;
use std::num::NonZeroUsize;
use tracing::{debug, trace};

/// Default number of built chains kept alive.
pub const DEFAULT_CACHE_CAPACITY: usize = 10;

/// Bounded LRU map from effect parameters to built filter chains.
///
/// Entries are never invalidated explicitly: a changed parameter is a
/// different key, and stale keys age out. Not synchronized; see
/// [`crate::runtime::EffectRuntime`] for the threading contract.
pub struct EffectCache<F> {
    entries: LruCache<RenderEffectParams, BuiltEffect<F>>,
}

impl<F: Clone> EffectCache<F> {
    /// Creates a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Looks `key` up, marking it most recently used.
    pub fn get(&mut self, key: &RenderEffectParams) -> Option<&BuiltEffect<F>> {
        self.entries.get(key)
    }

    /// Checks for `key` without touching recency.
    pub fn contains(&self, key: &RenderEffectParams) -> bool {
        self.entries.contains(key)
    }

    /// Inserts `value`, evicting the least recently used entry when full.
    pub fn put(&mut self, key: RenderEffectParams, value: BuiltEffect<F>) {
        if let Some((evicted, _)) = self.entries.push(key, value) {
            trace!(radius = evicted.blur_radius, "evicted render effect");
        }
    }

    /// Returns the cached value for `key`, building and inserting it on a miss.
    /// Failed builds are not cached.
    pub fn get_or_try_insert_with(
        &mut self,
        key: &RenderEffectParams,
        build: impl FnOnce() -> Result<BuiltEffect<F>, EffectError>,
    ) -> Result<BuiltEffect<F>, EffectError> {
        if let Some(hit) = self.entries.get(key) {
            trace!("render effect cache hit");
            return Ok(hit.clone());
        }
        debug!(len = self.entries.len(), "render effect cache miss");
        let built = build()?;
        self.entries.put(key.clone(), built.clone());
        Ok(built)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<F: Clone> Default for EffectCache<F> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
