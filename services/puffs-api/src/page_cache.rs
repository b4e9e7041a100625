//! In-memory cache for statically built place pages.
//!
//! Each entry carries its own revalidation window: normal pages are kept
//! for the configured revalidation interval, degraded pages for a much
//! shorter one so the next build can recover quickly.
//!
//! ## Eviction Strategy
//! - Entry-count LRU eviction when the capacity is exceeded
//! - TTL-based expiration on read (lazy)

use lru::LruCache;
use puffs_common::PageResult;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// A cached page and its revalidation window.
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub result: PageResult,
    pub revalidate: Duration,
}

struct CacheEntry {
    page: CachedPage,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() >= self.page.revalidate
    }
}

/// Statistics for the page cache.
#[derive(Default)]
pub struct PageCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub evictions: AtomicU64,
    pub expired: AtomicU64,
}

impl PageCacheStats {
    /// Cache hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

/// LRU cache of rendered place pages keyed by lower-cased place name.
pub struct PageCache {
    cache: Mutex<LruCache<String, CacheEntry>>,
    stats: PageCacheStats,
}

impl PageCache {
    /// Create a cache holding at most `max_entries` pages (minimum 1).
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        tracing::info!(max_entries = capacity.get(), "PageCache initialized");

        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            stats: PageCacheStats::default(),
        }
    }

    fn key(name: &str) -> String {
        name.to_lowercase()
    }

    /// Get a page if present and still within its revalidation window.
    pub async fn get(&self, name: &str) -> Option<CachedPage> {
        let key = Self::key(name);
        let mut cache = self.cache.lock().await;

        let expired = match cache.get(&key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("puffs_page_cache_hits_total").increment(1);
                return Some(entry.page.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            cache.pop(&key);
            self.stats.expired.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(place = %name, "Cached page due for revalidation");
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("puffs_page_cache_misses_total").increment(1);
        None
    }

    /// Store a page with its revalidation window.
    pub async fn put(&self, name: &str, result: PageResult, revalidate: Duration) {
        let key = Self::key(name);
        let entry = CacheEntry {
            page: CachedPage { result, revalidate },
            inserted_at: Instant::now(),
        };

        let mut cache = self.cache.lock().await;
        if let Some((evicted_key, _)) = cache.push(key.clone(), entry) {
            // push returns the replaced entry under the same key, or the evicted LRU entry
            if evicted_key != key {
                self.stats.evictions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(evicted = %evicted_key, "PageCache evicted entry");
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn stats(&self) -> &PageCacheStats {
        &self.stats
    }
}
