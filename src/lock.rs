//! Striped per-key locking.
//!
//! [`StripedKeyLock`] maps an unbounded key space (asset paths, asset ids)
//! onto a bounded set of reentrant locks. Two equal keys always land on the
//! same stripe; unequal keys are spread near-uniformly, so unrelated work only
//! rarely serializes.
//!
//! ## Lazy, weakly held stripes
//!
//! Stripes are created on first use and kept only through a [`Weak`]
//! reference. Once every caller has dropped its handle the lock is freed, and
//! the next request for that stripe creates a fresh one. Lock identity is per
//! stripe, never per key, so this only ever trades memory for the chance that
//! two different keys share a lock. It never lets two holders of equal keys
//! run at the same time.
//!
//! Callers that hold more than one key at once are responsible for a
//! consistent acquisition order. Nothing in this crate does so.

use dashmap::DashMap;
use parking_lot::ReentrantMutex;
use std::hash::{BuildHasher, BuildHasherDefault, DefaultHasher, Hash};
use std::sync::{Arc, Weak};

/// Upper bound on the stripe count (largest power of two we allow).
const MAX_STRIPES: usize = 1 << 30;

/// Dead weak entries are pruned whenever the map grows past this many slots.
const PRUNE_THRESHOLD: usize = 1024;

/// A shared handle to one stripe's lock.
pub type StripeLock = Arc<ReentrantMutex<()>>;

pub struct StripedKeyLock {
    mask: usize,
    stripes: DashMap<usize, Weak<ReentrantMutex<()>>>,
    // Fixed-key SipHash so a key's stripe is stable for the process lifetime.
    hasher: BuildHasherDefault<DefaultHasher>,
}

impl StripedKeyLock {
    /// Create a lock set with at least `stripes` stripes.
    ///
    /// The count is rounded up to the next power of two and capped at
    /// `2^30`. A request for zero stripes yields one.
    pub fn new(stripes: usize) -> Self {
        let size = stripe_count(stripes);
        Self {
            mask: size - 1,
            stripes: DashMap::new(),
            hasher: BuildHasherDefault::default(),
        }
    }

    /// Number of stripes keys are spread over.
    pub fn size(&self) -> usize {
        self.mask + 1
    }

    /// Stripe index for `key`.
    pub fn index_for<K: Hash + ?Sized>(&self, key: &K) -> usize {
        let hash = self.hasher.hash_one(key);
        let folded = (hash ^ (hash >> 32)) as u32;
        smear(folded) as usize & self.mask
    }

    /// The lock guarding `key`.
    ///
    /// Equal keys get the same instance for as long as any caller keeps the
    /// returned handle alive.
    pub fn get<K: Hash + ?Sized>(&self, key: &K) -> StripeLock {
        let index = self.index_for(key);
        if let Some(existing) = self.stripes.get(&index).and_then(|w| w.upgrade()) {
            return existing;
        }

        let lock = {
            let mut slot = self.stripes.entry(index).or_default();
            // Another thread may have won the race since the read above.
            match slot.upgrade() {
                Some(existing) => existing,
                None => {
                    let fresh = Arc::new(ReentrantMutex::new(()));
                    *slot = Arc::downgrade(&fresh);
                    fresh
                }
            }
        };

        if self.stripes.len() > PRUNE_THRESHOLD {
            self.stripes.retain(|_, weak| weak.strong_count() > 0);
        }
        lock
    }

    /// Run `f` while holding the lock for `key`.
    pub fn with_lock<K, R, F>(&self, key: &K, f: F) -> R
    where
        K: Hash + ?Sized,
        F: FnOnce() -> R,
    {
        let lock = self.get(key);
        let _guard = lock.lock();
        f()
    }

    /// Number of stripes currently backed by a live lock.
    pub fn live_stripes(&self) -> usize {
        self.stripes
            .iter()
            .filter(|entry| entry.value().strong_count() > 0)
            .count()
    }
}

impl Default for StripedKeyLock {
    fn default() -> Self {
        Self::new(64)
    }
}

fn stripe_count(requested: usize) -> usize {
    if requested >= MAX_STRIPES {
        MAX_STRIPES
    } else {
        requested.max(1).next_power_of_two()
    }
}

/// Spread hash bits so that hashes differing only in their high bits still
/// land on different stripes once masked.
fn smear(mut h: u32) -> u32 {
    h ^= (h >> 20) ^ (h >> 12);
    h ^ (h >> 7) ^ (h >> 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic xorshift so the trials are reproducible.
    fn xorshift(state: &mut u64) -> u64 {
        *state ^= *state << 13;
        *state ^= *state >> 7;
        *state ^= *state << 17;
        *state
    }

    // =========================================================================
    // Sizing
    // =========================================================================

    #[test]
    fn stripe_count_rounds_up_to_power_of_two() {
        assert_eq!(StripedKeyLock::new(0).size(), 1);
        assert_eq!(StripedKeyLock::new(1).size(), 1);
        assert_eq!(StripedKeyLock::new(3).size(), 4);
        assert_eq!(StripedKeyLock::new(64).size(), 64);
        assert_eq!(StripedKeyLock::new(65).size(), 128);
    }

    #[test]
    fn stripe_count_is_capped() {
        assert_eq!(stripe_count(usize::MAX), MAX_STRIPES);
        assert_eq!(stripe_count(MAX_STRIPES + 1), MAX_STRIPES);
    }

    // =========================================================================
    // Determinism
    // =========================================================================

    #[test]
    fn equal_keys_share_a_lock_for_any_stripe_count() {
        let mut state = 0x9E37_79B9_7F4A_7C15;
        for stripes in [1, 2, 7, 64, 1000] {
            let locks = StripedKeyLock::new(stripes);
            for _ in 0..10_000 {
                let key = format!("/content/dam/asset-{}.jpg", xorshift(&mut state) % 50_000);
                let a = locks.get(&key);
                let b = locks.get(&key.clone());
                assert!(Arc::ptr_eq(&a, &b), "key {key} resolved to two locks");
                assert_eq!(locks.index_for(&key), locks.index_for(key.as_str()));
            }
        }
    }

    #[test]
    fn indices_stay_in_range() {
        let locks = StripedKeyLock::new(16);
        for i in 0..1000u64 {
            assert!(locks.index_for(&i) < 16);
        }
    }

    #[test]
    fn keys_spread_over_stripes() {
        let locks = StripedKeyLock::new(16);
        let mut used = std::collections::HashSet::new();
        for i in 0..1000u64 {
            used.insert(locks.index_for(&i));
        }
        assert_eq!(used.len(), 16);
    }

    #[test]
    fn smear_mixes_high_bits_into_low_bits() {
        // Differ only above bit 16: unmasked they would collide at mask 0xF.
        assert_ne!(smear(0x0001_0000) & 0xF, smear(0x0002_0000) & 0xF);
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    #[test]
    fn unreferenced_stripe_is_released() {
        let locks = StripedKeyLock::new(8);
        let lock = locks.get("a");
        assert_eq!(locks.live_stripes(), 1);
        drop(lock);
        assert_eq!(locks.live_stripes(), 0);
        // Recreated on next use.
        let _again = locks.get("a");
        assert_eq!(locks.live_stripes(), 1);
    }

    #[test]
    fn lock_is_reentrant() {
        let locks = StripedKeyLock::new(4);
        let result = locks.with_lock("asset", || locks.with_lock("asset", || 42));
        assert_eq!(result, 42);
    }

    #[test]
    fn equal_keys_never_run_concurrently() {
        let locks = StripedKeyLock::new(4);
        let inside = AtomicUsize::new(0);
        let max_seen = AtomicUsize::new(0);

        (0..200).into_par_iter().for_each(|_| {
            locks.with_lock("same-asset", || {
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                std::thread::yield_now();
                inside.fetch_sub(1, Ordering::SeqCst);
            });
        });

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }
}
