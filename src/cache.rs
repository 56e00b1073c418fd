//! In-memory cache for search-provider hits.
//!
//! Caches raw provider hits keyed by the (lowercased query, result bound)
//! pair so that repeated terms — common across refinement rounds — do not
//! re-scrape the provider. Uses [`moka`] for async-friendly caching with
//! configurable TTL and automatic eviction.

use std::sync::OnceLock;
use std::time::Duration;

use moka::future::Cache;

use crate::types::SearchHit;

/// Maximum number of cached hit lists.
const MAX_CACHE_ENTRIES: u64 = 100;

/// Global process-wide search cache.
///
/// Lazily initialised on first access. TTL is set when first created
/// and cannot be changed after initialisation.
static CACHE: OnceLock<Cache<CacheKey, Vec<SearchHit>>> = OnceLock::new();

/// Composite cache key: normalised query plus the result bound, so the
/// same term with a different bound is a different entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    query: String,
    max_results: usize,
}

impl CacheKey {
    /// Build a deterministic cache key. The query is lowercased and
    /// trimmed.
    pub fn new(query: &str, max_results: usize) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            max_results,
        }
    }
}

fn get_or_init_cache(ttl_seconds: u64) -> &'static Cache<CacheKey, Vec<SearchHit>> {
    CACHE.get_or_init(|| {
        Cache::builder()
            .max_capacity(MAX_CACHE_ENTRIES)
            .time_to_live(Duration::from_secs(ttl_seconds))
            .build()
    })
}

/// Look up cached hits for the given key. Returns `None` on miss or when
/// caching is disabled (`ttl_seconds == 0`).
pub async fn get(key: &CacheKey, ttl_seconds: u64) -> Option<Vec<SearchHit>> {
    if ttl_seconds == 0 {
        return None;
    }
    get_or_init_cache(ttl_seconds).get(key).await
}

/// Insert provider hits into the cache. No-op when caching is disabled.
pub async fn insert(key: CacheKey, hits: Vec<SearchHit>, ttl_seconds: u64) {
    if ttl_seconds == 0 {
        return;
    }
    get_or_init_cache(ttl_seconds).insert(key, hits).await;
}
