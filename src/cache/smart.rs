//! Smart cache store.
//!
//! Extends the basic TTL idea with a per-data-type TTL policy, a hard
//! entry bound with LRU eviction, and a background sweeper so memory
//! stays bounded even for keys that are never read again.

use crate::cache::keys::make_key;
use crate::cache::metrics::CacheMetrics;
use crate::core::constants::{
    GAME_MODES, MAX_CACHE_SIZE, SWEEP_INTERVAL_SECS, WARM_WEAPONS_PER_CATEGORY, WEAPON_CATEGORIES,
};
use crate::database::Database;
use crate::logger::{self, LogTag};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// TTL policy by semantic data type. Static data lives long, real-time
/// data barely at all.
pub fn ttl_for(data_type: &str) -> Duration {
    let secs = match data_type {
        // Static data - long TTL
        "categories" => 3_600,
        "weapon_list" => 1_800,
        "guides" => 1_800,

        // Semi-dynamic data - medium TTL
        "attachments" => 300,
        "top_attachments" => 600,
        "season_top" => 900,

        // Dynamic data - short TTL
        "user_data" => 60,
        "search_results" => 120,
        "statistics" => 300,

        // Real-time data - very short TTL
        "pending_count" => 30,
        "online_users" => 15,

        _ => 300,
    };
    Duration::from_secs(secs)
}

/// First few characters of a key for log lines. Keys are usually hex
/// digests, but arbitrary strings are accepted, so truncation has to
/// respect char boundaries.
fn key_prefix(key: &str) -> &str {
    match key.char_indices().nth(8) {
        Some((idx, _)) => &key[..idx],
        None => key,
    }
}

struct SmartEntry {
    value: String,
    expires_at: Instant,
    data_type: String,
    #[allow(dead_code)]
    created_at: Instant,
}

struct SmartInner {
    entries: HashMap<String, SmartEntry>,
    /// LRU order: front is the next eviction candidate
    order: VecDeque<String>,
    metrics: CacheMetrics,
    /// Recomputed on every get, as a percentage
    hit_rate: f64,
}

impl SmartInner {
    fn touch(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.push_back(key.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.order.retain(|k| k != key);
    }

    fn update_hit_rate(&mut self) {
        self.hit_rate = self.metrics.hit_rate();
    }
}

/// Snapshot of the smart store's counters
#[derive(Debug, Clone)]
pub struct SmartCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub evictions: u64,
    pub hit_rate: f64,
    pub entries: usize,
}

pub struct SmartCacheManager {
    inner: Mutex<SmartInner>,
    capacity: usize,
}

impl SmartCacheManager {
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHE_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(SmartInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
                metrics: CacheMetrics::default(),
                hit_rate: 0.0,
            }),
            capacity,
        }
    }

    /// Get a value; a hit moves the entry to the most-recently-used end
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        enum Lookup {
            Hit(String),
            Expired,
            Absent,
        }

        let mut inner = self.inner.lock().unwrap();
        let now = Instant::now();

        let lookup = match inner.entries.get(key) {
            Some(entry) if now < entry.expires_at => Lookup::Hit(entry.value.clone()),
            Some(_) => Lookup::Expired,
            None => Lookup::Absent,
        };

        match lookup {
            Lookup::Hit(json) => {
                inner.touch(key);
                inner.metrics.record_hit();
                inner.update_hit_rate();
                drop(inner);
                logger::debug(LogTag::SmartCache, &format!("Cache HIT: {}...", key_prefix(key)));
                match serde_json::from_str(&json) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        logger::warning(
                            LogTag::SmartCache,
                            &format!("Dropping undecodable entry {}: {}", key, e),
                        );
                        self.delete(key);
                        None
                    }
                }
            }
            Lookup::Expired => {
                inner.remove(key);
                inner.metrics.record_eviction();
                inner.metrics.record_miss();
                inner.update_hit_rate();
                None
            }
            Lookup::Absent => {
                inner.metrics.record_miss();
                inner.update_hit_rate();
                logger::debug(LogTag::SmartCache, &format!("Cache MISS: {}...", key_prefix(key)));
                None
            }
        }
    }

    /// Insert with the policy TTL for `data_type` unless an explicit TTL
    /// is given. Inserting a new key at capacity evicts the LRU entry;
    /// overwriting an existing key never does.
    pub fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        data_type: &str,
        ttl: Option<Duration>,
    ) {
        let ttl = ttl.unwrap_or_else(|| ttl_for(data_type));
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                logger::warning(LogTag::SmartCache, &format!("Cache SET skipped for {}: {}", key, e));
                return;
            }
        };

        let mut inner = self.inner.lock().unwrap();

        if !inner.entries.contains_key(key) && inner.entries.len() >= self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
                inner.metrics.record_eviction();
                logger::debug(LogTag::SmartCache, "Cache full, evicted oldest entry");
            }
        }

        let now = Instant::now();
        inner.entries.insert(
            key.to_string(),
            SmartEntry {
                value: json,
                expires_at: now + ttl,
                data_type: data_type.to_string(),
                created_at: now,
            },
        );
        inner.touch(key);
        inner.metrics.record_set();
        drop(inner);

        logger::debug(
            LogTag::SmartCache,
            &format!("Cache SET: {}... (type={}, TTL={}s)", key_prefix(key), data_type, ttl.as_secs()),
        );
    }

    pub fn delete(&self, key: &str) {
        let mut inner = self.inner.lock().unwrap();
        if inner.entries.contains_key(key) {
            inner.remove(key);
        }
    }

    /// Invalidate every entry whose key or data type contains `pattern`
    pub fn invalidate_pattern(&self, pattern: &str) {
        let mut inner = self.inner.lock().unwrap();
        let keys_to_delete: Vec<String> = inner
            .entries
            .iter()
            .filter(|(key, entry)| entry.data_type.contains(pattern) || key.contains(pattern))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &keys_to_delete {
            inner.remove(key);
        }

        if !keys_to_delete.is_empty() {
            logger::info(
                LogTag::SmartCache,
                &format!("Cache INVALIDATE: {} keys with pattern '{}'", keys_to_delete.len(), pattern),
            );
        }
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        let count = inner.entries.len();
        inner.entries.clear();
        inner.order.clear();
        logger::info(LogTag::SmartCache, &format!("Cache CLEAR: {} entries removed", count));
    }

    /// Remove all expired entries regardless of access patterns
    pub fn cleanup_expired(&self) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let now = Instant::now();
        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| now >= entry.expires_at)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            inner.remove(key);
            inner.metrics.record_eviction();
        }

        if !expired.is_empty() {
            logger::debug(
                LogTag::SmartCache,
                &format!("Cache CLEANUP: {} expired entries removed", expired.len()),
            );
        }
        expired.len()
    }

    pub fn stats(&self) -> SmartCacheStats {
        let inner = self.inner.lock().unwrap();
        SmartCacheStats {
            hits: inner.metrics.hits,
            misses: inner.metrics.misses,
            sets: inner.metrics.sets,
            evictions: inner.metrics.evictions,
            hit_rate: inner.hit_rate,
            entries: inner.entries.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spawn the background sweep loop. The loop logs per iteration and
    /// never aborts on its own.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                cache.cleanup_expired();
            }
        })
    }

    /// Sweeper with the standard 60-second interval
    pub fn spawn_default_sweeper(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.spawn_sweeper(Duration::from_secs(SWEEP_INTERVAL_SECS))
    }

    /// Pre-populate weapon lists for every category and top attachments
    /// for the first few weapons in each. Failures are logged and never
    /// abort startup.
    pub fn warm_cache(&self, db: &Database) {
        logger::info(LogTag::SmartCache, "Starting cache warming...");

        for category in WEAPON_CATEGORIES {
            let weapons = match db.get_weapons_in_category(category) {
                Ok(weapons) => weapons,
                Err(e) => {
                    logger::warning(
                        LogTag::SmartCache,
                        &format!("Cache warming skipped for {}: {}", category, e),
                    );
                    continue;
                }
            };

            let key = make_key("get_weapons_in_category", &[category], Some("weapon_list"));
            self.set(&key, &weapons, "weapon_list", None);

            for weapon in weapons.iter().take(WARM_WEAPONS_PER_CATEGORY) {
                for mode in GAME_MODES {
                    match db.get_top_attachments(category, weapon, mode) {
                        Ok(attachments) => {
                            let key = make_key(
                                "get_top_attachments",
                                &[category, weapon, mode],
                                Some("top_attachments"),
                            );
                            self.set(&key, &attachments, "top_attachments", None);
                        }
                        Err(e) => {
                            logger::warning(
                                LogTag::SmartCache,
                                &format!("Cache warming error for {}/{}: {}", weapon, mode, e),
                            );
                        }
                    }
                }
            }
        }

        logger::info(
            LogTag::SmartCache,
            &format!("Cache warming completed. {} entries pre-loaded", self.len()),
        );
    }
}

impl Default for SmartCacheManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn policy_table_ttls() {
        assert_eq!(ttl_for("categories"), Duration::from_secs(3_600));
        assert_eq!(ttl_for("online_users"), Duration::from_secs(15));
        assert_eq!(ttl_for("pending_count"), Duration::from_secs(30));
        assert_eq!(ttl_for("something_else"), Duration::from_secs(300));
    }

    #[test]
    fn lru_bound_holds() {
        let cache = SmartCacheManager::with_capacity(3);
        cache.set("k1", &1u32, "default", None);
        cache.set("k2", &2u32, "default", None);
        cache.set("k3", &3u32, "default", None);
        cache.set("k4", &4u32, "default", None);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn least_recently_touched_is_evicted() {
        let cache = SmartCacheManager::with_capacity(2);
        cache.set("k1", &1u32, "default", None);
        cache.set("k2", &2u32, "default", None);

        // Touch k1 so k2 becomes the LRU entry
        assert_eq!(cache.get::<u32>("k1"), Some(1));

        cache.set("k3", &3u32, "default", None);
        assert_eq!(cache.get::<u32>("k2"), None);
        assert_eq!(cache.get::<u32>("k1"), Some(1));
        assert_eq!(cache.get::<u32>("k3"), Some(3));
    }

    #[test]
    fn overwrite_does_not_evict() {
        let cache = SmartCacheManager::with_capacity(2);
        cache.set("k1", &1u32, "default", None);
        cache.set("k2", &2u32, "default", None);
        cache.set("k1", &10u32, "default", None);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.get::<u32>("k1"), Some(10));
        assert_eq!(cache.get::<u32>("k2"), Some(2));
    }

    #[test]
    fn explicit_ttl_beats_policy() {
        let cache = SmartCacheManager::new();
        cache.set("fleeting", &1u32, "categories", Some(Duration::from_millis(30)));

        assert_eq!(cache.get::<u32>("fleeting"), Some(1));
        thread::sleep(Duration::from_millis(60));
        assert_eq!(cache.get::<u32>("fleeting"), None);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn invalidate_matches_key_or_data_type() {
        let cache = SmartCacheManager::new();
        cache.set("abc123", &1u32, "weapon_list", None);
        cache.set("weapon_key", &2u32, "default", None);
        cache.set("other", &3u32, "statistics", None);

        cache.invalidate_pattern("weapon");

        assert_eq!(cache.get::<u32>("abc123"), None);
        assert_eq!(cache.get::<u32>("weapon_key"), None);
        assert_eq!(cache.get::<u32>("other"), Some(3));
    }

    #[test]
    fn hit_rate_recomputed_per_get() {
        let cache = SmartCacheManager::new();
        cache.set("k", &1u32, "default", None);

        cache.get::<u32>("k");
        cache.get::<u32>("missing");
        let stats = cache.stats();
        assert!((stats.hit_rate - 50.0).abs() < 1e-9);

        cache.get::<u32>("k");
        let stats = cache.stats();
        assert!((stats.hit_rate - (2.0 / 3.0) * 100.0).abs() < 1e-9);
    }

    #[test]
    fn cleanup_removes_expired_untouched_keys() {
        let cache = SmartCacheManager::new();
        cache.set("short", &1u32, "default", Some(Duration::from_millis(10)));
        cache.set("long", &2u32, "default", None);

        thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.cleanup_expired(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn key_prefix_respects_char_boundaries() {
        assert_eq!(key_prefix("abcdef1234567890"), "abcdef12");
        assert_eq!(key_prefix("short"), "short");
        // Byte 8 falls inside a multi-byte char; truncation stays on
        // the char boundary instead of panicking
        assert_eq!(key_prefix("abcdefg日本語"), "abcdefg日");
    }

    #[test]
    fn non_ascii_keys_do_not_panic() {
        let cache = SmartCacheManager::new();
        cache.set("天気データ", &1u32, "default", None);
        assert_eq!(cache.get::<u32>("天気データ"), Some(1));
        assert_eq!(cache.get::<u32>("不明なキー不明なキー"), None);
    }

    #[test]
    fn warm_cache_populates_weapon_lists() {
        let db = Database::open_in_memory().unwrap();
        db.init_schema().unwrap();
        db.add_weapon("smg", "QQ9", 0).unwrap();
        db.add_weapon("smg", "RUS-79U", 1).unwrap();
        db.add_curated_attachment("smg", "QQ9", "mp", "OWC Laser", 12).unwrap();

        let cache = SmartCacheManager::new();
        cache.warm_cache(&db);

        let key = make_key("get_weapons_in_category", &["smg"], Some("weapon_list"));
        let weapons: Option<Vec<String>> = cache.get(&key);
        assert_eq!(weapons, Some(vec!["QQ9".to_string(), "RUS-79U".to_string()]));
        assert!(cache.len() > 1);
    }

    #[test]
    fn warm_cache_survives_missing_schema() {
        let db = Database::open_in_memory().unwrap();
        let cache = SmartCacheManager::new();
        // No schema: every query fails, warming logs and moves on
        cache.warm_cache(&db);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn sweeper_runs_in_background() {
        let cache = Arc::new(SmartCacheManager::new());
        cache.set("short", &1u32, "default", Some(Duration::from_millis(10)));

        let handle = cache.spawn_sweeper(Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(cache.is_empty());
        handle.abort();
    }
}
