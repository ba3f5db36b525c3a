//! Encoder Cache
//!
//! Building an encoder walks the whole BMP, so encoders requested by block
//! names are kept in an LRU keyed by the sorted, canonical block names.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, OnceLock};

use lru::LruCache;

use super::HtmlEncoder;
use crate::filter::{blocks, CodePointFilter};

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(32) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Reasons an encoder could not be produced
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The name matches no block in the catalog
    #[error("unknown Unicode block: {0}")]
    UnknownBlock(String),
    /// Another thread panicked while holding the cache lock
    #[error("encoder cache mutex poisoned")]
    Poisoned,
}

/// LRU of encoders keyed by canonical block names
pub struct EncoderCache {
    inner: Mutex<LruCache<Vec<&'static str>, Arc<HtmlEncoder>>>,
}

impl EncoderCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        EncoderCache {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Process-wide cache used by the NIF layer
    pub fn global() -> &'static EncoderCache {
        static CACHE: OnceLock<EncoderCache> = OnceLock::new();
        CACHE.get_or_init(|| EncoderCache::new(DEFAULT_CAPACITY))
    }

    /// Encoder allowing the union of the named blocks.
    ///
    /// Names are matched loosely ("basic_latin" finds "BasicLatin"); order
    /// and duplicates do not change the cache key.
    ///
    /// # Errors
    ///
    /// Fails on the first name that matches no block, or if the lock is poisoned.
    pub fn get_or_build<S: AsRef<str>>(&self, names: &[S]) -> Result<Arc<HtmlEncoder>, CacheError> {
        let mut key = Vec::with_capacity(names.len());
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let (canonical, block) =
                blocks::lookup(name).ok_or_else(|| CacheError::UnknownBlock(name.to_string()))?;
            key.push(canonical);
            selected.push(block);
        }
        key.sort_unstable();
        key.dedup();

        let mut cache = self.inner.lock().map_err(|_| CacheError::Poisoned)?;
        if let Some(encoder) = cache.get(&key) {
            return Ok(Arc::clone(encoder));
        }

        tracing::debug!(blocks = ?key, "encoder cache miss");
        let encoder = Arc::new(HtmlEncoder::with_filter(CodePointFilter::with_blocks(&selected)));
        cache.put(key, Arc::clone(&encoder));
        Ok(encoder)
    }

    #[cfg(test)]
    fn len(&self) -> Result<usize, CacheError> {
        self.inner
            .lock()
            .map(|cache| cache.len())
            .map_err(|_| CacheError::Poisoned)
    }
}
