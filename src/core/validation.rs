//! Validation-side bookkeeping for blocks.
//!
//! Blocks are pure values, so "this block already passed full validation"
//! cannot live inside the block itself; it is keyed by identity hash and
//! owned here. Re-decoding a block produces a fresh value whose hash simply
//! re-queries the cache. What "full validation" entails is decided by the
//! layers that insert into it.

use crate::types::hash::Hash;
use dashmap::DashSet;

/// Concurrent set of block hashes that already passed full validation.
///
/// Safe to share across validation threads; entries are only ever added or
/// explicitly forgotten, never mutated.
#[derive(Debug, Default)]
pub struct ValidationCache {
    checked: DashSet<Hash>,
}

impl ValidationCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            checked: DashSet::new(),
        }
    }

    /// Records that the block with this hash passed full validation.
    pub fn mark_checked(&self, hash: Hash) {
        self.checked.insert(hash);
    }

    /// Returns true if this hash was previously marked checked.
    pub fn is_checked(&self, hash: &Hash) -> bool {
        self.checked.contains(hash)
    }

    /// Drops a single memoized result, forcing revalidation.
    pub fn forget(&self, hash: &Hash) {
        self.checked.remove(hash);
    }

    /// Drops every memoized result.
    pub fn clear(&self) {
        self.checked.clear();
    }

    /// Number of memoized hashes.
    pub fn len(&self) -> usize {
        self.checked.len()
    }

    /// Returns true if nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::utils::random_hash;

    #[test]
    fn starts_empty() {
        let cache = ValidationCache::new();
        assert!(cache.is_empty());
        assert!(!cache.is_checked(&random_hash()));
    }

    #[test]
    fn marked_hashes_are_remembered() {
        let cache = ValidationCache::new();
        let hash = random_hash();

        cache.mark_checked(hash);
        assert!(cache.is_checked(&hash));
        assert_eq!(cache.len(), 1);

        // Unrelated hashes stay unchecked.
        assert!(!cache.is_checked(&random_hash()));
    }

    #[test]
    fn forget_is_per_hash() {
        let cache = ValidationCache::new();
        let kept = random_hash();
        let dropped = random_hash();

        cache.mark_checked(kept);
        cache.mark_checked(dropped);
        cache.forget(&dropped);

        assert!(cache.is_checked(&kept));
        assert!(!cache.is_checked(&dropped));
    }

    #[test]
    fn clear_drops_everything() {
        let cache = ValidationCache::new();
        cache.mark_checked(random_hash());
        cache.mark_checked(random_hash());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn marking_twice_is_idempotent() {
        let cache = ValidationCache::new();
        let hash = random_hash();
        cache.mark_checked(hash);
        cache.mark_checked(hash);
        assert_eq!(cache.len(), 1);
    }
}
