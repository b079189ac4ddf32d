//! In-memory metadata cache for remote assets.
//!
//! Every delivery of a remote asset needs its metadata, and a page can
//! reference the same asset many times. This module keeps fetched metadata
//! for a configurable time-to-live so repeated lookups do not hit the
//! repository again.
//!
//! # Design
//!
//! - Keyed by asset id (`urn:aaid:aem:...`).
//! - Only successful lookups are stored. An asset whose metadata is not yet
//!   available (404 while it is still being processed) is asked for again
//!   on the next request.
//! - No lock is held across the fetch. Two threads missing on the same id at
//!   the same time may both fetch; the later insert wins. Fetches are
//!   idempotent so this only costs a duplicate request.
//! - An expired entry is replaced when its id is looked up again. Once the
//!   map grows past [`PRUNE_THRESHOLD`] entries, every insert also sweeps
//!   out the expired ones.
//!
//! A TTL of zero disables caching entirely.

use crate::auth::{Clock, SystemClock};
use crate::metadata::AssetMetadata;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tracing::trace;

/// Entry count above which inserts sweep expired entries.
pub const PRUNE_THRESHOLD: usize = 1024;

struct CachedMetadata {
    metadata: Arc<AssetMetadata>,
    fetched_at: Instant,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU32,
    expired: AtomicU32,
    misses: AtomicU32,
    unavailable: AtomicU32,
}

pub struct MetadataCache {
    ttl: Duration,
    clock: Box<dyn Clock>,
    entries: DashMap<String, CachedMetadata>,
    counters: Counters,
}

impl MetadataCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }

    pub fn with_clock(ttl: Duration, clock: impl Clock + 'static) -> Self {
        Self {
            ttl,
            clock: Box::new(clock),
            entries: DashMap::new(),
            counters: Counters::default(),
        }
    }

    /// Cached metadata for `asset_id`, calling `fetch` on a miss or expiry.
    ///
    /// `None` from `fetch` is passed through and not remembered.
    pub fn get_or_fetch<F>(&self, asset_id: &str, fetch: F) -> Option<Arc<AssetMetadata>>
    where
        F: FnOnce(&str) -> Option<AssetMetadata>,
    {
        let now = self.clock.now();
        if let Some(entry) = self.entries.get(asset_id) {
            if self.is_fresh(&entry, now) {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                trace!(asset_id = %asset_id, "metadata cache hit");
                return Some(entry.metadata.clone());
            }
            self.counters.expired.fetch_add(1, Ordering::Relaxed);
        } else {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
        }

        let Some(metadata) = fetch(asset_id) else {
            self.counters.unavailable.fetch_add(1, Ordering::Relaxed);
            // Only drop what is still stale; another thread may have refreshed it.
            self.entries
                .remove_if(asset_id, |_, entry| !self.is_fresh(entry, now));
            return None;
        };
        let metadata = Arc::new(metadata);
        if !self.ttl.is_zero() {
            self.entries.insert(
                asset_id.to_string(),
                CachedMetadata {
                    metadata: metadata.clone(),
                    fetched_at: self.clock.now(),
                },
            );
            if self.entries.len() > PRUNE_THRESHOLD {
                self.prune_expired();
            }
        }
        Some(metadata)
    }

    fn is_fresh(&self, entry: &CachedMetadata, now: Instant) -> bool {
        now.duration_since(entry.fetched_at) < self.ttl
    }

    /// Drop every entry whose TTL has run out.
    pub fn prune_expired(&self) {
        let now = self.clock.now();
        self.entries.retain(|_, entry| self.is_fresh(entry, now));
    }

    pub fn invalidate(&self, asset_id: &str) {
        self.entries.remove(asset_id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the lookup counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            expired: self.counters.expired.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            unavailable: self.counters.unavailable.load(Ordering::Relaxed),
        }
    }
}

/// Summary of cache performance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub expired: u32,
    pub misses: u32,
    /// Fetches that returned no metadata.
    pub unavailable: u32,
}

impl CacheStats {
    pub fn total(&self) -> u32 {
        self.hits + self.expired + self.misses
    }

    pub fn fetched(&self) -> u32 {
        self.expired + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 || self.expired > 0 {
            write!(
                f,
                "{} cached, {} refreshed, {} fetched ({} total)",
                self.hits,
                self.expired,
                self.misses,
                self.total()
            )?;
        } else {
            write!(f, "{} fetched", self.misses)?;
        }
        if self.unavailable > 0 {
            write!(f, ", {} unavailable", self.unavailable)?;
        }
        Ok(())
    }
}
