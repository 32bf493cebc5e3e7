//! Generated URL caching
//!
//! [`CachingResolver`] wraps any [`UrlResolver`] and remembers generated
//! hrefs with an LRU eviction policy. Each request gets fresh node copies
//! (and with them empty per-node href caches), so sharing one caching
//! resolver across requests avoids regenerating the same links.

use crate::error::Result;
use crate::{trace_log, QueryParams, RouteContext, RouteParams, UrlResolver, UrlTarget};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Everything the generated URL depends on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct UrlCacheKey {
    route: Option<String>,
    params: RouteParams,
    query: QueryParams,
    fragment: Option<String>,
    context: Option<RouteContext>,
}

impl UrlCacheKey {
    fn new(target: &UrlTarget<'_>, context: Option<&RouteContext>) -> Self {
        Self {
            route: target.route.map(str::to_string),
            params: target.params.clone(),
            query: target.query.clone(),
            fragment: target.fragment.map(str::to_string),
            context: context.cloned(),
        }
    }
}

/// Cache performance statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub invalidations: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
struct CacheState {
    entries: LruCache<UrlCacheKey, String>,
    stats: CacheStats,
}

/// Memoizing wrapper around a [`UrlResolver`]
///
/// Only successful generations are cached; errors are returned every time.
///
/// Default capacity: 1000 entries.
#[derive(Debug)]
pub struct CachingResolver<R> {
    inner: R,
    state: Mutex<CacheState>,
}

impl<R: UrlResolver> CachingResolver<R> {
    const DEFAULT_CAPACITY: usize = 1000;

    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, Self::DEFAULT_CAPACITY)
    }

    /// A capacity of zero is raised to one.
    pub fn with_capacity(inner: R, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            state: Mutex::new(CacheState {
                entries: LruCache::new(cap),
                stats: CacheStats::default(),
            }),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Drop every cached URL, e.g. after the route table changed
    pub fn clear(&self) {
        trace_log!("Clearing URL cache");
        let mut state = self.lock();
        state.entries.clear();
        state.stats.invalidations += 1;
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats.clone()
    }

    pub fn reset_stats(&self) {
        self.lock().stats = CacheStats::default();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().entries.cap().get()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: UrlResolver> UrlResolver for CachingResolver<R> {
    fn generate(&self, target: &UrlTarget<'_>, context: Option<&RouteContext>) -> Result<String> {
        let key = UrlCacheKey::new(target, context);

        {
            let mut state = self.lock();
            if let Some(url) = state.entries.get(&key).cloned() {
                state.stats.hits += 1;
                trace_log!("URL cache hit for route {:?}", target.route);
                return Ok(url);
            }
            state.stats.misses += 1;
            trace_log!("URL cache miss for route {:?}", target.route);
        }

        // Generate outside the lock; the inner resolver may be slow.
        let url = self.inner.generate(target, context)?;
        self.lock().entries.push(key, url.clone());
        Ok(url)
    }
}
