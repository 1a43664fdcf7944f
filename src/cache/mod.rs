//! In-process caching layer.
//!
//! Three stores with different guarantees:
//!  - [`CacheManager`]: plain TTL map with substring invalidation
//!  - [`SmartCacheManager`]: TTL policy by data type, LRU-bounded,
//!    background-swept
//!  - [`SubmissionCache`]: two-tier (memory + SQLite side tables) cache
//!    for submission statistics and rankings
//!
//! Call sites use the explicit cache-aside helpers here rather than
//! wrapping functions: `get_or_compute` for reads, the invalidation
//! helpers after writes.

pub mod entry;
pub mod keys;
pub mod manager;
pub mod metrics;
pub mod smart;
pub mod submissions;

pub use entry::{CacheEntry, TtlValue};
pub use manager::{cache_cleanup_task, run_cache_cleanup, CacheManager};
pub use metrics::{CacheMetrics, CacheStats};
pub use smart::{ttl_for, SmartCacheManager, SmartCacheStats};
pub use submissions::SubmissionCache;

use crate::core::config::CacheSettings;
use crate::core::error::BotResult;
use crate::logger::{self, LogTag};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Name fragment shared by the persistence layer's own key family.
/// Writes that touch attachment data also flush those keys.
const DATABASE_KEY_FRAGMENT: &str = "Database";

/// Handles to the process-wide stores. Constructed once at startup and
/// passed to whoever needs caching; nothing here is a global.
#[derive(Clone)]
pub struct CacheService {
    basic: Arc<CacheManager>,
    smart: Arc<SmartCacheManager>,
}

impl CacheService {
    pub fn new(settings: &CacheSettings) -> Self {
        Self {
            basic: Arc::new(CacheManager::new()),
            smart: Arc::new(SmartCacheManager::with_capacity(settings.smart_capacity)),
        }
    }

    pub fn basic(&self) -> &Arc<CacheManager> {
        &self.basic
    }

    pub fn smart(&self) -> &Arc<SmartCacheManager> {
        &self.smart
    }

    /// Spawn the sweep loops for both stores. The handles are returned
    /// so the host can abort them on shutdown.
    pub fn spawn_background_tasks(&self) -> Vec<tokio::task::JoinHandle<()>> {
        let cleanup = tokio::spawn(run_cache_cleanup(Arc::clone(&self.basic)));
        let sweeper = self.smart.spawn_default_sweeper();
        logger::info(LogTag::Cache, "Background cache maintenance started");
        vec![cleanup, sweeper]
    }
}

/// Cache-aside read against the basic store: return the cached value if
/// present, otherwise run `compute`, cache its result (empty and zero
/// values included) and return it. Compute errors pass through and
/// nothing is cached.
pub fn get_or_compute<T, F>(
    cache: &CacheManager,
    key: &str,
    ttl: impl Into<TtlValue>,
    compute: F,
) -> BotResult<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> BotResult<T>,
{
    if let Some(value) = cache.get::<T>(key) {
        return Ok(value);
    }

    let value = compute()?;
    cache.set(key, &value, ttl);
    Ok(value)
}

/// Cache-aside read against the smart store. The key is derived from
/// the operation name and its parts, so every call site naming the same
/// operation with the same parts shares one entry. `ttl` of None means
/// the policy TTL for `data_type`.
pub fn smart_get_or_compute<T, F>(
    smart: &SmartCacheManager,
    func: &str,
    parts: &[&str],
    data_type: &str,
    ttl: Option<Duration>,
    compute: F,
) -> BotResult<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> BotResult<T>,
{
    let key = keys::make_key(func, parts, Some(data_type));
    if let Some(value) = smart.get::<T>(&key) {
        return Ok(value);
    }

    let value = compute()?;
    smart.set(&key, &value, data_type, ttl);
    Ok(value)
}

/// Flush the given key patterns after a write, but only when the write
/// succeeded. Patterns naming attachment data also flush the
/// persistence layer's key family.
pub fn invalidate_after_write(cache: &CacheManager, patterns: &[&str], succeeded: bool) {
    if !succeeded {
        return;
    }

    for pattern in patterns {
        cache.invalidate_pattern(pattern);
    }

    if patterns.iter().any(|p| p.contains("attachments")) {
        cache.invalidate_pattern(DATABASE_KEY_FRAGMENT);
    }
}

/// Smart-store counterpart of [`invalidate_after_write`]: after a
/// successful write, flush every smart entry whose key or data type
/// matches one of the patterns.
pub fn smart_invalidate_after_write(
    smart: &SmartCacheManager,
    patterns: &[&str],
    succeeded: bool,
) {
    if !succeeded {
        return;
    }

    for pattern in patterns {
        smart.invalidate_pattern(pattern);
    }
}

/// Flush everything a changed attachment can influence: the listing and
/// ranking key families plus the per-weapon family, then the category
/// counters.
pub fn invalidate_attachment_caches(cache: &CacheManager, category: &str, weapon: &str) {
    let weapon_pattern = format!("_{}_{}", category, weapon);
    let patterns = [
        "get_all_attachments",
        "get_weapon_attachments",
        "get_top_attachments",
        "category_counts",
        weapon_pattern.as_str(),
    ];

    invalidate_after_write(cache, &patterns, true);
    cache.delete("category_counts");

    logger::debug(
        LogTag::Cache,
        &format!("Attachment caches invalidated for {}/{}", category, weapon),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::BotError;
    use std::cell::Cell;

    #[test]
    fn get_or_compute_runs_compute_once() {
        let cache = CacheManager::new();
        let calls = Cell::new(0u32);

        for _ in 0..3 {
            let value = get_or_compute(&cache, "weapons:smg", 60u64, || {
                calls.set(calls.get() + 1);
                Ok(vec!["QQ9".to_string(), "RUS-79U".to_string()])
            })
            .unwrap();
            assert_eq!(value.len(), 2);
        }

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn fixed_key_is_shared_across_argument_variants() {
        let cache = CacheManager::new();
        let calls = Cell::new(0u32);

        // Different menus requesting the counts all name the same key,
        // so the computation collapses to one cache line
        for _menu in ["main", "admin", "browse"] {
            let _counts: Vec<u32> = get_or_compute(&cache, "category_counts", 300u64, || {
                calls.set(calls.get() + 1);
                Ok(vec![3, 1, 4])
            })
            .unwrap();
        }

        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn get_or_compute_caches_empty_results() {
        let cache = CacheManager::new();
        let calls = Cell::new(0u32);

        for _ in 0..2 {
            let value: Vec<String> = get_or_compute(&cache, "weapons:none", 60u64, || {
                calls.set(calls.get() + 1);
                Ok(Vec::new())
            })
            .unwrap();
            assert!(value.is_empty());
        }

        // The empty result was cached, not treated as a miss
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn get_or_compute_propagates_errors_without_caching() {
        let cache = CacheManager::new();

        let result: BotResult<u32> = get_or_compute(&cache, "failing", 60u64, || {
            Err(BotError::Cache("backend down".to_string()))
        });
        assert!(result.is_err());
        assert!(cache.is_empty());

        // A later successful compute fills the entry normally
        let value = get_or_compute(&cache, "failing", 60u64, || Ok(7u32)).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn smart_helper_shares_entries_across_call_sites() {
        let smart = SmartCacheManager::new();
        let calls = Cell::new(0u32);
        let mut compute = || {
            calls.set(calls.get() + 1);
            Ok("cached".to_string())
        };

        // Two distinct call sites naming the same operation and parts
        let a: String =
            smart_get_or_compute(&smart, "get_guides", &["smg", "QQ9"], "guides", None, &mut compute)
                .unwrap();
        let b: String =
            smart_get_or_compute(&smart, "get_guides", &["smg", "QQ9"], "guides", None, &mut compute)
                .unwrap();

        assert_eq!(a, b);
        assert_eq!(calls.get(), 1);
        assert_eq!(smart.len(), 1);
    }

    #[test]
    fn write_invalidation_is_conditional_on_success() {
        let cache = CacheManager::new();
        cache.set("get_weapon_attachments:QQ9", &1u32, 60u64);

        invalidate_after_write(&cache, &["get_weapon_attachments"], false);
        assert_eq!(cache.len(), 1);

        invalidate_after_write(&cache, &["get_weapon_attachments"], true);
        assert!(cache.is_empty());
    }

    #[test]
    fn smart_write_invalidation_matches_data_types() {
        let smart = SmartCacheManager::new();
        smart.set("k1", &1u32, "top_attachments", None);
        smart.set("k2", &2u32, "weapon_list", None);
        smart.set("top_attachments_extra", &3u32, "default", None);

        // Failed writes leave the store untouched
        smart_invalidate_after_write(&smart, &["top_attachments"], false);
        assert_eq!(smart.len(), 3);

        // Matches by stored data type and by key fragment
        smart_invalidate_after_write(&smart, &["top_attachments"], true);
        assert_eq!(smart.get::<u32>("k1"), None);
        assert_eq!(smart.get::<u32>("top_attachments_extra"), None);
        assert_eq!(smart.get::<u32>("k2"), Some(2));
    }

    #[test]
    fn attachment_patterns_also_flush_database_keys() {
        let cache = CacheManager::new();
        cache.set("get_all_attachments:smg", &1u32, 60u64);
        cache.set("Database:get_top_attachments", &2u32, 60u64);
        cache.set("unrelated", &3u32, 60u64);

        invalidate_after_write(&cache, &["get_all_attachments"], true);

        assert_eq!(cache.get::<u32>("get_all_attachments:smg"), None);
        assert_eq!(cache.get::<u32>("Database:get_top_attachments"), None);
        assert_eq!(cache.get::<u32>("unrelated"), Some(3));
    }

    #[test]
    fn attachment_invalidation_covers_all_families() {
        let cache = CacheManager::new();
        cache.set("get_all_attachments:all", &1u32, 60u64);
        cache.set("get_weapon_attachments:QQ9", &2u32, 60u64);
        cache.set("get_top_attachments:smg:QQ9:mp", &3u32, 60u64);
        cache.set("category_counts", &4u32, 60u64);
        cache.set("stats_smg_QQ9", &5u32, 60u64);
        cache.set("stats_smg_PP19", &6u32, 60u64);

        invalidate_attachment_caches(&cache, "smg", "QQ9");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get::<u32>("stats_smg_PP19"), Some(6));
    }
}
