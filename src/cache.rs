//! In-memory TTL cache for provider and extraction results.
//!
//! Each entry carries its own expiry timestamp. The cache has a single
//! owner and is accessed through `&mut self`, so no locking is involved.
//! Expired entries are evicted when they are read and on every insert.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;

/// Cache entry with TTL
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Mapping from key to `(value, expiry)`.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub valid_entries: usize,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache whose entries live for `ttl_secs` seconds.
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            entries: HashMap::new(),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Get a live value (None if expired or not found). An expired entry
    /// is removed.
    pub fn get(&mut self, key: &K) -> Option<V> {
        self.get_at(key, Utc::now())
    }

    pub(crate) fn get_at(&mut self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let entry = self.entries.get(key)?;
        if entry.is_expired_at(now) {
            self.entries.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    /// Insert or replace a value, restarting its TTL. Expired entries are
    /// cleared first.
    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Utc::now());
    }

    pub(crate) fn insert_at(&mut self, key: K, value: V, now: DateTime<Utc>) {
        self.cleanup_at(now);
        let expires_at = now + self.ttl;
        self.entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Clear expired entries
    pub fn cleanup(&mut self) {
        self.cleanup_at(Utc::now());
    }

    fn cleanup_at(&mut self, now: DateTime<Utc>) {
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
    }

    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let total = self.entries.len();
        let expired = self
            .entries
            .values()
            .filter(|e| e.is_expired_at(now))
            .count();
        CacheStats {
            total_entries: total,
            expired_entries: expired,
            valid_entries: total - expired,
        }
    }
}
