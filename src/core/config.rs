use crate::core::constants::{DEFAULT_TTL_SECS, MAX_CACHE_SIZE, PERSISTED_WINDOW_SECS};
use crate::core::error::{BotError, BotResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Runtime configuration loaded from configs.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configs {
    #[serde(default = "default_database_path")]
    pub database_path: String,

    #[serde(default)]
    pub cache: CacheSettings,
}

/// Tunables for the caching subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// TTL for basic-store entries set without an explicit TTL (seconds)
    #[serde(default = "default_ttl")]
    pub default_ttl_secs: u64,

    /// Entry bound for the smart store before LRU eviction
    #[serde(default = "default_capacity")]
    pub smart_capacity: usize,

    /// Memory-tier TTL for the submission cache (seconds)
    #[serde(default = "default_ttl")]
    pub submission_ttl_secs: u64,

    /// Freshness window for the persisted tier (seconds). Kept separate
    /// from submission_ttl_secs on purpose; the two tiers may disagree.
    #[serde(default = "default_persisted_window")]
    pub persisted_window_secs: i64,

    /// Pre-populate weapon lists and top attachments at startup
    #[serde(default = "default_true")]
    pub warm_on_startup: bool,
}

fn default_database_path() -> String {
    "attachments.db".to_string()
}

fn default_ttl() -> u64 {
    DEFAULT_TTL_SECS
}

fn default_capacity() -> usize {
    MAX_CACHE_SIZE
}

fn default_persisted_window() -> i64 {
    PERSISTED_WINDOW_SECS
}

fn default_true() -> bool {
    true
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl(),
            smart_capacity: default_capacity(),
            submission_ttl_secs: default_ttl(),
            persisted_window_secs: default_persisted_window(),
            warm_on_startup: true,
        }
    }
}

impl Default for Configs {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            cache: CacheSettings::default(),
        }
    }
}

/// Read configs.json from the given path. A missing file yields the
/// defaults; a malformed file is a hard error.
pub fn read_configs<P: AsRef<Path>>(path: P) -> BotResult<Configs> {
    if !path.as_ref().exists() {
        return Ok(Configs::default());
    }

    let data = fs::read_to_string(&path)?;
    let configs: Configs = serde_json::from_str(&data)
        .map_err(|e| BotError::Config(format!("Failed to parse configs.json: {}", e)))?;
    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let configs = read_configs("does-not-exist.json").unwrap();
        assert_eq!(configs.database_path, "attachments.db");
        assert_eq!(configs.cache.default_ttl_secs, 300);
        assert_eq!(configs.cache.smart_capacity, 10_000);
        assert!(configs.cache.warm_on_startup);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configs.json");
        std::fs::write(&path, r#"{"cache": {"submission_ttl_secs": 60}}"#).unwrap();

        let configs = read_configs(&path).unwrap();
        assert_eq!(configs.cache.submission_ttl_secs, 60);
        assert_eq!(configs.cache.persisted_window_secs, 300);
        assert_eq!(configs.database_path, "attachments.db");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configs.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(read_configs(&path).is_err());
    }
}
