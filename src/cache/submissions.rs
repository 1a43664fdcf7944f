//! Two-tier cache for user-submitted attachment statistics.
//!
//! Read order: memory tier, then the persisted side tables (constrained
//! to rows fresher than the persisted window), then a live aggregation
//! query. Live results write through to the persisted tier best-effort
//! and always land in the memory tier. Database failures never reach
//! the caller; reads degrade to None/empty/zero and log instead.

use crate::cache::keys::make_key;
use crate::core::config::CacheSettings;
use crate::core::constants::{COUNT_WINDOW_SECS, MAX_LIST_LIMIT, STATS_ROLLBACK_SECS};
use crate::database::{Database, SubmissionStats, TopUser, TopWeapon, UserRecord};
use crate::logger::{self, LogTag};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum CachedPayload {
    Stats(SubmissionStats),
    Weapons(Vec<TopWeapon>),
    Users(Vec<TopUser>),
    UserBatch(HashMap<i64, UserRecord>),
    Count(i64),
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    payload: CachedPayload,
    stored_at: DateTime<Utc>,
}

pub struct SubmissionCache {
    db: Database,
    ttl_secs: i64,
    persisted_window_secs: i64,
    memory: Mutex<HashMap<String, MemoryEntry>>,
}

impl SubmissionCache {
    pub fn new(db: Database, ttl_secs: i64) -> Self {
        Self::with_persisted_window(db, ttl_secs, crate::core::constants::PERSISTED_WINDOW_SECS)
    }

    pub fn with_persisted_window(db: Database, ttl_secs: i64, persisted_window_secs: i64) -> Self {
        Self {
            db,
            ttl_secs,
            persisted_window_secs,
            memory: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_settings(db: Database, settings: &CacheSettings) -> Self {
        Self::with_persisted_window(
            db,
            settings.submission_ttl_secs as i64,
            settings.persisted_window_secs,
        )
    }

    fn memory_get(&self, key: &str, window_secs: i64) -> Option<CachedPayload> {
        let memory = self.memory.lock().unwrap();
        let entry = memory.get(key)?;
        if entry.stored_at > Utc::now() - Duration::seconds(window_secs) {
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    fn memory_set(&self, key: &str, payload: CachedPayload) {
        let mut memory = self.memory.lock().unwrap();
        memory.insert(
            key.to_string(),
            MemoryEntry { payload, stored_at: Utc::now() },
        );
    }

    /// Aggregate submission statistics. None when the backing store is
    /// unusable; the failure is logged, never raised.
    pub fn get_stats(&self, force_refresh: bool) -> Option<SubmissionStats> {
        if !force_refresh {
            if let Some(CachedPayload::Stats(stats)) = self.memory_get("stats", self.ttl_secs) {
                logger::debug(LogTag::Submissions, "Stats retrieved from memory cache");
                return Some(stats);
            }

            match self.db.read_stats_row(self.persisted_window_secs) {
                Ok(Some(stats)) => {
                    self.memory_set("stats", CachedPayload::Stats(stats.clone()));
                    logger::debug(LogTag::Submissions, "Stats retrieved from database cache");
                    return Some(stats);
                }
                Ok(None) => {}
                Err(e) => {
                    logger::debug(
                        LogTag::Submissions,
                        &format!("Skipping DB cache for stats (will compute fresh): {}", e),
                    );
                }
            }
        }

        logger::info(LogTag::Submissions, "Calculating fresh stats");
        let started = std::time::Instant::now();
        match self.db.compute_submission_stats() {
            Ok(Some(mut stats)) => {
                stats.updated_at = Utc::now().to_rfc3339();
                logger::info(
                    LogTag::Submissions,
                    &format!("Stats calculated in {:.2}ms", started.elapsed().as_secs_f64() * 1_000.0),
                );

                if let Err(e) = self.db.upsert_stats_row(&stats) {
                    logger::debug(
                        LogTag::Submissions,
                        &format!("Could not update stats cache table: {}", e),
                    );
                }
                self.memory_set("stats", CachedPayload::Stats(stats.clone()));
                Some(stats)
            }
            Ok(None) => None,
            Err(e) => {
                logger::error(LogTag::Submissions, &format!("Error getting stats: {}", e));
                None
            }
        }
    }

    /// Weapons ranked by approved submission count. Empty on error.
    pub fn get_top_weapons(&self, limit: i64, force_refresh: bool) -> Vec<TopWeapon> {
        let limit = limit.clamp(1, MAX_LIST_LIMIT);
        let cache_key = format!("top_weapons_{}", limit);

        if !force_refresh {
            if let Some(CachedPayload::Weapons(weapons)) = self.memory_get(&cache_key, self.ttl_secs) {
                logger::debug(LogTag::Submissions, "Top weapons retrieved from memory cache");
                return weapons;
            }

            match self.db.read_top_weapons(limit, self.persisted_window_secs) {
                Ok(weapons) if !weapons.is_empty() => {
                    self.memory_set(&cache_key, CachedPayload::Weapons(weapons.clone()));
                    logger::debug(LogTag::Submissions, "Top weapons retrieved from database cache");
                    return weapons;
                }
                Ok(_) => {}
                Err(e) => {
                    logger::debug(
                        LogTag::Submissions,
                        &format!("Skipping DB cache for top weapons: {}", e),
                    );
                }
            }
        }

        logger::info(LogTag::Submissions, "Calculating fresh top weapons");
        match self.db.compute_top_weapons(limit) {
            Ok(weapons) => {
                if let Err(e) = self.db.replace_top_weapons(&weapons) {
                    logger::debug(
                        LogTag::Submissions,
                        &format!("Could not refresh top weapons cache: {}", e),
                    );
                }
                self.memory_set(&cache_key, CachedPayload::Weapons(weapons.clone()));
                weapons
            }
            Err(e) => {
                logger::error(LogTag::Submissions, &format!("Error getting top weapons: {}", e));
                Vec::new()
            }
        }
    }

    /// Most active submitters. Empty on error.
    pub fn get_top_users(&self, limit: i64, force_refresh: bool) -> Vec<TopUser> {
        let limit = limit.clamp(1, MAX_LIST_LIMIT);
        let cache_key = format!("top_users_{}", limit);

        if !force_refresh {
            if let Some(CachedPayload::Users(users)) = self.memory_get(&cache_key, self.ttl_secs) {
                logger::debug(LogTag::Submissions, "Top users retrieved from memory cache");
                return users;
            }

            match self.db.read_top_users(limit, self.persisted_window_secs) {
                Ok(users) if !users.is_empty() => {
                    self.memory_set(&cache_key, CachedPayload::Users(users.clone()));
                    logger::debug(LogTag::Submissions, "Top users retrieved from database cache");
                    return users;
                }
                Ok(_) => {}
                Err(e) => {
                    logger::debug(
                        LogTag::Submissions,
                        &format!("Skipping DB cache for top users: {}", e),
                    );
                }
            }
        }

        logger::info(LogTag::Submissions, "Calculating fresh top users");
        match self.db.compute_top_users(limit) {
            Ok(users) => {
                if let Err(e) = self.db.replace_top_users(&users) {
                    logger::debug(
                        LogTag::Submissions,
                        &format!("Could not refresh top users cache: {}", e),
                    );
                }
                self.memory_set(&cache_key, CachedPayload::Users(users.clone()));
                users
            }
            Err(e) => {
                logger::error(LogTag::Submissions, &format!("Error getting top users: {}", e));
                Vec::new()
            }
        }
    }

    /// Submission count for a status, memory-cached for one minute.
    /// Known statuses reuse the stats aggregate instead of a dedicated
    /// query; unknown statuses fall through to a direct count.
    pub fn get_paginated_count(&self, status: &str) -> i64 {
        let cache_key = format!("count_{}", status);

        if let Some(CachedPayload::Count(count)) = self.memory_get(&cache_key, COUNT_WINDOW_SECS) {
            logger::debug(LogTag::Submissions, &format!("Count for {} from memory cache", status));
            return count;
        }

        if let Some(stats) = self.get_stats(false) {
            if let Some(count) = stats.count_for_status(status) {
                self.memory_set(&cache_key, CachedPayload::Count(count));
                return count;
            }
        }

        match self.db.count_by_status(status) {
            Ok(count) => {
                self.memory_set(&cache_key, CachedPayload::Count(count));
                count
            }
            Err(e) => {
                logger::error(
                    LogTag::Submissions,
                    &format!("Error getting count for {}: {}", status, e),
                );
                0
            }
        }
    }

    /// Fetch a set of users in one query, keyed by the sorted id set
    pub fn batch_get_users(&self, user_ids: &[i64]) -> HashMap<i64, UserRecord> {
        if user_ids.is_empty() {
            return HashMap::new();
        }

        let mut sorted: Vec<i64> = user_ids.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let id_parts: Vec<String> = sorted.iter().map(|id| id.to_string()).collect();
        let id_refs: Vec<&str> = id_parts.iter().map(String::as_str).collect();
        let cache_key = format!("users_{}", make_key("batch_get_users", &id_refs, None));

        if let Some(CachedPayload::UserBatch(users)) = self.memory_get(&cache_key, self.ttl_secs) {
            logger::debug(LogTag::Submissions, "Batch users retrieved from cache");
            return users;
        }

        match self.db.fetch_users_by_ids(&sorted) {
            Ok(users) => {
                self.memory_set(&cache_key, CachedPayload::UserBatch(users.clone()));
                users
            }
            Err(e) => {
                logger::error(LogTag::Submissions, &format!("Error batch getting users: {}", e));
                HashMap::new()
            }
        }
    }

    /// Drop memory-tier entries by key prefix (all of them when no kind
    /// is given) and age the persisted stats row so the next read's
    /// freshness check fails. The aging is best-effort.
    pub fn invalidate(&self, cache_type: Option<&str>) {
        {
            let mut memory = self.memory.lock().unwrap();
            match cache_type {
                Some(kind) => {
                    let keys_to_delete: Vec<String> = memory
                        .keys()
                        .filter(|k| k.starts_with(kind))
                        .cloned()
                        .collect();
                    for key in &keys_to_delete {
                        memory.remove(key);
                    }
                    logger::info(
                        LogTag::Submissions,
                        &format!("Invalidated {} {} cache entries", keys_to_delete.len(), kind),
                    );
                }
                None => {
                    memory.clear();
                    logger::info(LogTag::Submissions, "All cache entries invalidated");
                }
            }
        }

        if let Err(e) = self.db.age_stats_row(STATS_ROLLBACK_SECS) {
            logger::error(
                LogTag::Submissions,
                &format!("Error invalidating database cache: {}", e),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.init_schema().unwrap();

        db.add_user(1, Some("alice"), Some("Alice")).unwrap();
        db.add_user(2, Some("bob"), Some("Bob")).unwrap();
        db.add_user(3, None, Some("Carol")).unwrap();

        let a1 = db.submit_attachment(1, "assault_rifle", "AK117", "mp").unwrap();
        let a2 = db.submit_attachment(1, "assault_rifle", "AK117", "br").unwrap();
        let a3 = db.submit_attachment(2, "smg", "QQ9", "mp").unwrap();
        db.submit_attachment(3, "smg", "QQ9", "mp").unwrap();

        db.approve_attachment(a1).unwrap();
        db.approve_attachment(a2).unwrap();
        db.reject_attachment(a3).unwrap();
        db.ban_user(3).unwrap();

        db
    }

    #[test]
    fn stats_reflect_seeded_rows() {
        let cache = SubmissionCache::new(seeded_db(), 300);
        let stats = cache.get_stats(false).unwrap();

        assert_eq!(stats.total_attachments, 4);
        assert_eq!(stats.approved_count, 2);
        assert_eq!(stats.rejected_count, 1);
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.mp_count, 1);
        assert_eq!(stats.br_count, 1);
        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.banned_users, 1);
        assert_eq!(stats.active_users, 2);
        assert!(!stats.updated_at.is_empty());
    }

    #[test]
    fn stats_are_served_stale_until_invalidated() {
        let db = seeded_db();
        let cache = SubmissionCache::new(db.clone(), 300);

        let before = cache.get_stats(false).unwrap();
        assert_eq!(before.approved_count, 2);

        // External mutation: approve the remaining pending submission
        let pending = db.submit_attachment(2, "lmg", "UL736", "mp").unwrap();
        db.approve_attachment(pending).unwrap();

        // Memory tier still answers with the pre-mutation aggregate
        let stale = cache.get_stats(false).unwrap();
        assert_eq!(stale.approved_count, before.approved_count);

        cache.invalidate(None);
        let fresh = cache.get_stats(false).unwrap();
        assert_eq!(fresh.approved_count, 3);
    }

    #[test]
    fn force_refresh_bypasses_both_tiers() {
        let db = seeded_db();
        let cache = SubmissionCache::new(db.clone(), 300);

        cache.get_stats(false).unwrap();
        let pending = db.submit_attachment(2, "lmg", "UL736", "br").unwrap();
        db.approve_attachment(pending).unwrap();

        let fresh = cache.get_stats(true).unwrap();
        assert_eq!(fresh.approved_count, 3);
    }

    #[test]
    fn stats_populate_persisted_tier() {
        let db = seeded_db();
        let cache = SubmissionCache::new(db.clone(), 300);
        cache.get_stats(false).unwrap();

        let row = db.read_stats_row(300).unwrap().unwrap();
        assert_eq!(row.total_attachments, 4);
    }

    #[test]
    fn top_weapons_ranked_and_persisted() {
        let db = seeded_db();
        let cache = SubmissionCache::new(db.clone(), 300);

        let weapons = cache.get_top_weapons(10, false);
        // Two approved AK117 rows, split across modes
        assert_eq!(weapons.len(), 2);
        assert!(weapons.iter().all(|w| w.weapon_name == "AK117"));

        let persisted = db.read_top_weapons(10, 300).unwrap();
        assert_eq!(persisted.len(), 2);
    }

    #[test]
    fn limits_are_clamped() {
        let cache = SubmissionCache::new(seeded_db(), 300);
        // Neither end of the range panics or queries with a bad limit
        assert!(cache.get_top_weapons(0, false).len() <= 1);
        assert!(cache.get_top_users(10_000, false).len() <= 100);
    }

    #[test]
    fn top_users_ordered_by_approvals() {
        let cache = SubmissionCache::new(seeded_db(), 300);
        let users = cache.get_top_users(5, false);

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].user_id, 1);
        assert_eq!(users[0].approved_count, 2);
        assert_eq!(users[0].username.as_deref(), Some("alice"));
    }

    #[test]
    fn known_status_counts_reuse_stats() {
        let cache = SubmissionCache::new(seeded_db(), 300);
        let stats = cache.get_stats(false).unwrap();

        assert_eq!(cache.get_paginated_count("pending"), stats.pending_count);
        assert_eq!(cache.get_paginated_count("approved"), stats.approved_count);
        // Unknown status falls through to a direct count
        assert_eq!(cache.get_paginated_count("archived"), 0);
    }

    #[test]
    fn batch_get_users_single_query() {
        let cache = SubmissionCache::new(seeded_db(), 300);

        let users = cache.batch_get_users(&[2, 1, 1, 99]);
        assert_eq!(users.len(), 2);
        assert_eq!(users[&1].first_name.as_deref(), Some("Alice"));

        // Same set, different order: same cache line
        let again = cache.batch_get_users(&[1, 2, 99]);
        assert_eq!(again, users);

        assert!(cache.batch_get_users(&[]).is_empty());
    }

    #[test]
    fn typed_invalidation_only_clears_matching_prefix() {
        let db = seeded_db();
        let cache = SubmissionCache::new(db.clone(), 300);

        cache.get_stats(false).unwrap();
        cache.get_top_weapons(10, false);

        cache.invalidate(Some("top_weapons"));

        let pending = db.submit_attachment(2, "lmg", "UL736", "mp").unwrap();
        db.approve_attachment(pending).unwrap();

        // Stats still come from the memory tier
        let stats = cache.get_stats(false).unwrap();
        assert_eq!(stats.approved_count, 2);

        // Weapons lost their memory entry; the persisted tier (untouched
        // by typed invalidation) still answers with the old ranking
        let weapons = cache.get_top_weapons(10, false);
        assert_eq!(weapons.iter().map(|w| w.attachment_count).sum::<i64>(), 2);

        // A forced refresh recomputes and sees the new approval
        let weapons = cache.get_top_weapons(10, true);
        assert_eq!(weapons.iter().map(|w| w.attachment_count).sum::<i64>(), 3);
    }

    #[test]
    fn degrades_gracefully_without_schema() {
        // No init_schema: every query the cache issues will fail
        let db = Database::open_in_memory().unwrap();
        let cache = SubmissionCache::new(db, 300);

        assert!(cache.get_stats(false).is_none());
        assert!(cache.get_top_weapons(10, false).is_empty());
        assert!(cache.get_top_users(5, false).is_empty());
        assert_eq!(cache.get_paginated_count("pending"), 0);
        assert!(cache.batch_get_users(&[1, 2]).is_empty());
        // Invalidation's persisted side-effect also fails quietly
        cache.invalidate(None);
    }
}
