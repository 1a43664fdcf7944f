/// Shared constants for the caching core.

/// Default TTL applied when a caller gives no TTL or an unparseable one
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Interval between background sweeps of expired entries
pub const SWEEP_INTERVAL_SECS: u64 = 60;

/// Smart cache entry bound; LRU eviction kicks in above this
pub const MAX_CACHE_SIZE: usize = 10_000;

/// Freshness window for the persisted cache tier (distinct from the
/// memory-tier TTL, see CacheSettings::persisted_window_secs)
pub const PERSISTED_WINDOW_SECS: i64 = 300;

/// Memory window for pagination counts, shorter than the general TTL
pub const COUNT_WINDOW_SECS: i64 = 60;

/// How far back the persisted stats row is aged on invalidation
pub const STATS_ROLLBACK_SECS: i64 = 3_600;

/// Clamp bound for leaderboard limits
pub const MAX_LIST_LIMIT: i64 = 100;

/// Weapon categories used for cache warming at startup
pub const WEAPON_CATEGORIES: [&str; 8] = [
    "assault_rifle",
    "smg",
    "lmg",
    "sniper",
    "marksman",
    "shotgun",
    "pistol",
    "launcher",
];

/// Game modes an attachment loadout can target
pub const GAME_MODES: [&str; 2] = ["mp", "br"];

/// How many weapons per category get their top attachments pre-warmed
pub const WARM_WEAPONS_PER_CATEGORY: usize = 3;
