//! Striped per-key locks.

use parking_lot::{Mutex, MutexGuard};
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

/// A fixed set of mutexes; each key maps to one stripe by hash.
///
/// Keys that share a stripe serialize against each other, which is harmless
/// for correctness. Multi-stripe acquisition always goes in ascending stripe
/// order, so two callers locking overlapping sets cannot deadlock.
#[derive(Debug)]
pub(crate) struct StripedLocks {
    stripes: Box<[Mutex<()>]>,
    mask: usize,
    hasher: RandomState,
}

impl StripedLocks {
    /// `count` must be a power of two.
    pub(crate) fn new(count: usize) -> Self {
        debug_assert!(count.is_power_of_two());
        Self {
            stripes: (0..count).map(|_| Mutex::new(())).collect(),
            mask: count - 1,
            hasher: RandomState::new(),
        }
    }

    pub(crate) fn stripe_of<K: Hash + ?Sized>(&self, key: &K) -> usize {
        (self.hasher.hash_one(key) as usize) & self.mask
    }

    pub(crate) fn lock<K: Hash + ?Sized>(&self, key: &K) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe_of(key)].lock()
    }

    /// Lock every stripe in `indices` once, in ascending order.
    pub(crate) fn lock_stripes<I>(&self, indices: I) -> Vec<MutexGuard<'_, ()>>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        indices
            .into_iter()
            .map(|idx| self.stripes[idx & self.mask].lock())
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.stripes.len()
    }
}
