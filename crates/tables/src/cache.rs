//! Read-through cache of decoded table contents.
//!
//! Entries are keyed by table name (`"Sets"`) or by a derived filter key
//! (`"Sets:exerciseId=<id>"`). Any write to a table drops every entry that
//! belongs to it.
//!
//! A per-table generation counter guards fills: a reader records the
//! generation before loading rows and its result is discarded if the table
//! was invalidated in the meantime, so rows read before a write can never be
//! served after it.

use crate::codec::Record;
use dashmap::DashMap;
use liftsheet_core::config::CacheConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Cached rows of one key.
pub type CachedRows = Arc<Vec<Record>>;

struct Entry {
    rows: CachedRows,
    inserted_at: Instant,
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub entries: usize,
}

/// Process-wide table cache. Cloning shares the same entries.
#[derive(Clone)]
pub struct TableCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    enabled: bool,
    ttl: Duration,
    entries: DashMap<String, Entry>,
    generations: DashMap<String, u64>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

/// Cache key for the rows of `table` whose `column` equals `value`.
pub fn derived_key(table: &str, column: &str, value: &str) -> String {
    format!("{table}:{column}={value}")
}

impl TableCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_ttl(config.enabled, config.ttl())
    }

    pub fn with_ttl(enabled: bool, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                enabled,
                ttl,
                entries: DashMap::new(),
                generations: DashMap::new(),
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
                invalidations: AtomicU64::new(0),
            }),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::with_ttl(false, Duration::ZERO)
    }

    /// Current invalidation generation of `table`. Read before loading rows
    /// and hand it back to [`TableCache::insert`].
    pub fn generation(&self, table: &str) -> u64 {
        self.inner.generations.get(table).map(|g| *g).unwrap_or(0)
    }

    /// Look up `key`. Expired entries count as misses and are dropped.
    pub fn get(&self, key: &str) -> Option<CachedRows> {
        let inner = &self.inner;
        if !inner.enabled {
            inner.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let now = Instant::now();
        let found = inner.entries.get(key).and_then(|entry| {
            (now.duration_since(entry.inserted_at) < inner.ttl).then(|| entry.rows.clone())
        });

        match found {
            Some(rows) => {
                inner.hits.fetch_add(1, Ordering::Relaxed);
                Some(rows)
            }
            None => {
                inner
                    .entries
                    .remove_if(key, |_, e| now.duration_since(e.inserted_at) >= inner.ttl);
                inner.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store `rows` under `key` unless `table` was invalidated since
    /// `generation` was read.
    pub fn insert(&self, table: &str, key: &str, rows: CachedRows, generation: u64) {
        let inner = &self.inner;
        if !inner.enabled || self.generation(table) != generation {
            return;
        }
        inner.entries.insert(
            key.to_string(),
            Entry {
                rows,
                inserted_at: Instant::now(),
            },
        );
        // An invalidation may have slipped in between the check and the insert.
        if self.generation(table) != generation {
            inner.entries.remove(key);
        }
    }

    /// Drop the table entry and every derived entry of `table`.
    pub fn invalidate_table(&self, table: &str) {
        let inner = &self.inner;
        *inner.generations.entry(table.to_string()).or_insert(0) += 1;

        let prefix = format!("{table}:");
        inner
            .entries
            .retain(|key, _| key != table && !key.starts_with(&prefix));
        inner.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Remove expired entries. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        let inner = &self.inner;
        let now = Instant::now();
        let before = inner.entries.len();
        inner
            .entries
            .retain(|_, e| now.duration_since(e.inserted_at) < inner.ttl);
        before.saturating_sub(inner.entries.len())
    }

    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let inner = &self.inner;
        CacheStats {
            hits: inner.hits.load(Ordering::Relaxed),
            misses: inner.misses.load(Ordering::Relaxed),
            invalidations: inner.invalidations.load(Ordering::Relaxed),
            entries: inner.entries.len(),
        }
    }
}

/// Spawn a background task that periodically purges expired entries.
pub fn spawn_cleanup_task(cache: TableCache, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let purged = cache.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Table cache sweep removed expired entries");
            }
        }
    })
}
