//! In-memory TTL cache for Canvas responses.
//!
//! Tools cache raw Canvas JSON (before formatting) keyed by tool name and
//! arguments. Concurrent writers to the same key are last-write-wins.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use super::config::CacheConfig;

/// Named cache lifetimes used by the tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTtl {
    /// 3 minutes: assignments, calendar events.
    Short,
    /// 5 minutes: course lists, users, modules, dashboard.
    Medium,
    /// 10 minutes: single courses, syllabi, profiles.
    Long,
    Hour,
    Day,
}

impl CacheTtl {
    pub fn duration(self) -> Duration {
        match self {
            Self::Short => Duration::from_secs(3 * 60),
            Self::Medium => Duration::from_secs(5 * 60),
            Self::Long => Duration::from_secs(10 * 60),
            Self::Hour => Duration::from_secs(60 * 60),
            Self::Day => Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl From<CacheTtl> for Duration {
    fn from(ttl: CacheTtl) -> Self {
        ttl.duration()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) > self.ttl
    }
}

/// Shared, thread-safe response cache.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    enabled: bool,
    default_ttl: Duration,
}

impl ResponseCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            enabled: config.enabled,
            default_ttl: Duration::from_secs(config.ttl_secs),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(&CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Cached value for `key`, unless missing or expired.
    pub fn get(&self, key: &str) -> Option<Value> {
        if !self.enabled {
            return None;
        }

        let now = Instant::now();
        let hit = self.entries.get(key).and_then(|entry| {
            (!entry.is_expired(now)).then(|| entry.value.clone())
        });

        match hit {
            Some(value) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            None => {
                // The read guard is released above; removing here cannot deadlock.
                self.entries
                    .remove_if(key, |_, entry| entry.is_expired(now));
                debug!(key, "Cache miss");
                None
            }
        }
    }

    /// Store `value` under `key` for `ttl`, or the configured default.
    pub fn insert(&self, key: impl Into<String>, value: Value, ttl: Option<Duration>) {
        if !self.enabled {
            return;
        }

        let key = key.into();
        let ttl = ttl.unwrap_or(self.default_ttl);
        debug!(key = %key, ttl_secs = ttl.as_secs(), "Cache store");
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.entries.remove(key).map(|(_, entry)| entry.value)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired ones included until next touched.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cache key for a tool invocation: the tool name plus its arguments.
pub fn cache_key<P: serde::Serialize>(tool: &str, params: &P) -> String {
    let args = serde_json::to_string(params).unwrap_or_default();
    format!("{tool}:{args}")
}
