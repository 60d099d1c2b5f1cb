//! Instance cache for shared bindings.
//!
//! A pure lookup/store keyed by [`Key`]; no construction logic lives here.
//! The cache is sharded by key hash to reduce contention when several
//! threads populate different shared keys concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use crate::key::Key;
use crate::registration::AnyArc;

/// Number of shards. Powers of 2 work best for hash distribution.
const SHARD_COUNT: usize = 16;

type Slot = Arc<OnceCell<AnyArc>>;
type Shard = RwLock<HashMap<Key, Slot, ahash::RandomState>>;

pub(crate) struct InstanceCache {
    shards: [Shard; SHARD_COUNT],
    hasher: ahash::RandomState,
}

impl Default for InstanceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceCache {
    pub(crate) fn new() -> Self {
        Self {
            shards: std::array::from_fn(|_| RwLock::new(HashMap::default())),
            hasher: ahash::RandomState::new(),
        }
    }

    #[inline]
    fn shard(&self, key: &Key) -> &Shard {
        let index = self.hasher.hash_one(key) as usize % SHARD_COUNT;
        &self.shards[index]
    }

    /// Returns the cached value, if one has been built.
    #[inline]
    pub(crate) fn get(&self, key: &Key) -> Option<AnyArc> {
        self.shard(key).read().get(key).and_then(|slot| slot.get().cloned())
    }

    #[inline]
    pub(crate) fn contains(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    /// Stores `value`, overwriting any prior entry.
    pub(crate) fn put(&self, key: Key, value: AnyArc) {
        self.shard(&key)
            .write()
            .insert(key, Arc::new(OnceCell::with_value(value)));
    }

    /// Stores `value` unless another thread already did; returns whichever
    /// value ends up cached.
    pub(crate) fn publish(&self, key: &Key, value: AnyArc) -> AnyArc {
        let mut shard = self.shard(key).write();
        let slot = shard
            .entry(key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()));
        match slot.set(value.clone()) {
            Ok(()) => value,
            Err(_) => slot.get().cloned().unwrap_or(value),
        }
    }

    /// Returns the slot for `key`, creating an empty one if needed.
    ///
    /// Callers initialize it outside the shard lock; concurrent callers
    /// block on the slot until the first build finishes.
    pub(crate) fn slot(&self, key: &Key) -> Slot {
        if let Some(slot) = self.shard(key).read().get(key) {
            return Arc::clone(slot);
        }
        let mut shard = self.shard(key).write();
        Arc::clone(
            shard
                .entry(key.clone())
                .or_insert_with(|| Arc::new(OnceCell::new())),
        )
    }

    /// Removes the entry for `key`, returning whether a value was cached.
    pub(crate) fn evict(&self, key: &Key) -> bool {
        self.shard(key)
            .write()
            .remove(key)
            .map_or(false, |slot| slot.get().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_evict() {
        let cache = InstanceCache::new();
        let key = Key::named("database");
        assert!(cache.get(&key).is_none());

        let value: AnyArc = Arc::new(5u32);
        cache.put(key.clone(), value.clone());
        assert!(Arc::ptr_eq(&cache.get(&key).unwrap(), &value));

        assert!(cache.evict(&key));
        assert!(!cache.contains(&key));
        assert!(!cache.evict(&key));
    }

    #[test]
    fn publish_keeps_the_first_value() {
        let cache = InstanceCache::new();
        let key = Key::named("database");
        let first: AnyArc = Arc::new(1u32);
        let second: AnyArc = Arc::new(2u32);

        assert!(Arc::ptr_eq(&cache.publish(&key, first.clone()), &first));
        assert!(Arc::ptr_eq(&cache.publish(&key, second), &first));
    }

    #[test]
    fn empty_slot_is_a_miss() {
        let cache = InstanceCache::new();
        let key = Key::of::<u8>();
        let slot = cache.slot(&key);
        assert!(cache.get(&key).is_none());

        slot.set(Arc::new(9u8) as AnyArc).unwrap();
        assert_eq!(*cache.get(&key).unwrap().downcast::<u8>().unwrap(), 9);
        assert!(Arc::ptr_eq(&slot, &cache.slot(&key)));
    }
}
