//! Basic TTL cache store.
//!
//! A mapping of string keys to JSON-serialized values with per-entry
//! expiry and substring-based invalidation. Suited to data that changes
//! rarely, is expensive to read, and is the same for every user
//! (weapon lists, category counts). One lock serializes all operations;
//! simplicity beats throughput at the access rates this bot sees.

use crate::cache::entry::{CacheEntry, TtlValue};
use crate::cache::metrics::{CacheMetrics, CacheStats};
use crate::core::constants::SWEEP_INTERVAL_SECS;
use crate::logger::{self, LogTag};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub struct CacheManager {
    entries: Mutex<HashMap<String, CacheEntry>>,
    metrics: Mutex<CacheMetrics>,
}

impl CacheManager {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            metrics: Mutex::new(CacheMetrics::default()),
        }
    }

    /// Get a value if present and not expired. Expired entries are
    /// removed on the spot and counted as evictions.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().unwrap();

        if let Some(entry) = entries.get(key) {
            if !entry.is_expired() {
                self.metrics.lock().unwrap().record_hit();
                logger::debug(LogTag::Cache, &format!("Cache HIT: {}", key));
                match serde_json::from_str(entry.value()) {
                    Ok(value) => return Some(value),
                    Err(e) => {
                        logger::warning(
                            LogTag::Cache,
                            &format!("Dropping undecodable cache entry {}: {}", key, e),
                        );
                        entries.remove(key);
                        return None;
                    }
                }
            }
            entries.remove(key);
            self.metrics.lock().unwrap().record_eviction();
        }

        self.metrics.lock().unwrap().record_miss();
        logger::debug(LogTag::Cache, &format!("Cache MISS: {}", key));
        None
    }

    /// Insert or overwrite. The TTL may arrive numeric or textual and is
    /// coerced to whole seconds before the expiry is computed.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: impl Into<TtlValue>) {
        let ttl_secs = ttl.into().into_secs();
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                logger::warning(LogTag::Cache, &format!("Cache SET skipped for {}: {}", key, e));
                return;
            }
        };

        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), CacheEntry::new(json, ttl_secs));
        self.metrics.lock().unwrap().record_set();
        logger::debug(LogTag::Cache, &format!("Cache SET: {} (TTL={}s)", key, ttl_secs));
    }

    /// Remove a key; absent keys are not an error
    pub fn delete(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(key).is_some() {
            logger::debug(LogTag::Cache, &format!("Cache DELETE: {}", key));
        }
    }

    /// Remove every key containing `pattern` anywhere. Deliberately
    /// loose so callers can target families of keys sharing a fragment.
    pub fn invalidate_pattern(&self, pattern: &str) {
        let mut entries = self.entries.lock().unwrap();
        let keys_to_delete: Vec<String> = entries
            .keys()
            .filter(|k| k.contains(pattern))
            .cloned()
            .collect();

        for key in &keys_to_delete {
            entries.remove(key);
        }

        if !keys_to_delete.is_empty() {
            logger::info(
                LogTag::Cache,
                &format!(
                    "Cache INVALIDATE: {} keys with pattern '{}'",
                    keys_to_delete.len(),
                    pattern
                ),
            );
        }
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap();
        let count = entries.len();
        entries.clear();
        logger::info(LogTag::Cache, &format!("Cache CLEAR: {} entries removed", count));
    }

    /// Sweep all currently-expired entries. Driven by the host through
    /// `cache_cleanup_task`, not self-scheduled.
    pub fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            entries.remove(key);
        }

        if !expired.is_empty() {
            logger::debug(
                LogTag::Cache,
                &format!("Cache CLEANUP: {} expired entries removed", expired.len()),
            );
        }
        expired.len()
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().unwrap().len();
        let metrics = self.metrics.lock().unwrap();
        CacheStats::from_metrics(&metrics, entries)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Periodic sweep of the basic store, meant to be spawned once at
/// startup. Runs until the task is aborted.
pub async fn cache_cleanup_task(cache: Arc<CacheManager>, interval: Duration) {
    loop {
        tokio::time::sleep(interval).await;
        cache.cleanup_expired();
    }
}

/// Cleanup task with the standard 60-second interval
pub async fn run_cache_cleanup(cache: Arc<CacheManager>) {
    cache_cleanup_task(cache, Duration::from_secs(SWEEP_INTERVAL_SECS)).await;
}
