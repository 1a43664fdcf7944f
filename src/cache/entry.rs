use crate::core::constants::DEFAULT_TTL_SECS;
use std::time::{Duration, Instant};

/// TTL as supplied by a caller. Config values sometimes arrive as text;
/// anything unparseable falls back to the default instead of failing.
#[derive(Debug, Clone)]
pub enum TtlValue {
    Seconds(u64),
    Text(String),
}

impl TtlValue {
    pub fn into_secs(self) -> u64 {
        match self {
            TtlValue::Seconds(secs) => secs,
            TtlValue::Text(text) => text.trim().parse().unwrap_or(DEFAULT_TTL_SECS),
        }
    }
}

impl From<u64> for TtlValue {
    fn from(secs: u64) -> Self {
        TtlValue::Seconds(secs)
    }
}

impl From<Duration> for TtlValue {
    fn from(ttl: Duration) -> Self {
        TtlValue::Seconds(ttl.as_secs())
    }
}

impl From<&str> for TtlValue {
    fn from(text: &str) -> Self {
        TtlValue::Text(text.to_string())
    }
}

impl From<String> for TtlValue {
    fn from(text: String) -> Self {
        TtlValue::Text(text)
    }
}

/// A single cached value with its absolute expiry. Entries are replaced,
/// never mutated, on update.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    value: String,
    expiry: Instant,
}

impl CacheEntry {
    pub fn new(value: String, ttl_secs: u64) -> Self {
        Self {
            value,
            expiry: Instant::now() + Duration::from_secs(ttl_secs),
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() > self.expiry
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}
