use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use crate::core::types::DocId;

/// Integer key that can pick the shard it lives in
pub trait ShardKey: Copy + Ord {
    fn shard(self, shard_count: usize) -> usize;
}

impl ShardKey for i32 {
    fn shard(self, shard_count: usize) -> usize {
        self.rem_euclid(shard_count as i32) as usize
    }
}

impl ShardKey for i64 {
    fn shard(self, shard_count: usize) -> usize {
        self.rem_euclid(shard_count as i64) as usize
    }
}

impl ShardKey for u32 {
    fn shard(self, shard_count: usize) -> usize {
        (self as u64 % shard_count as u64) as usize
    }
}

impl ShardKey for u64 {
    fn shard(self, shard_count: usize) -> usize {
        (self % shard_count as u64) as usize
    }
}

impl ShardKey for usize {
    fn shard(self, shard_count: usize) -> usize {
        self % shard_count
    }
}

impl ShardKey for DocId {
    fn shard(self, shard_count: usize) -> usize {
        self.0.shard(shard_count)
    }
}

/// Scoped handle to one stored value.
///
/// Holds the owning shard's lock; the lock is released when the handle
/// goes out of scope on any exit path.
pub struct Access<'a, V> {
    guard: MappedMutexGuard<'a, V>,
}

impl<V> Deref for Access<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.guard
    }
}

impl<V> DerefMut for Access<'_, V> {
    fn deref_mut(&mut self) -> &mut V {
        &mut self.guard
    }
}

/// Sharded ordered map with per-shard mutual exclusion.
///
/// The parallel scorer uses it as its relevance accumulator: writers
/// keyed to different shards never contend, and every critical section is
/// a single map insert or lookup.
pub struct ConcurrentMap<K, V> {
    shards: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: ShardKey, V: Default + Clone> ConcurrentMap<K, V> {
    /// Creates a map striped over `shard_count` shards. Panics if the
    /// count is zero.
    pub fn new(shard_count: usize) -> Self {
        assert!(shard_count > 0, "shard count must be positive");
        ConcurrentMap {
            shards: (0..shard_count).map(|_| Mutex::new(BTreeMap::new())).collect(),
        }
    }

    /// Locks the owning shard and returns a handle to the value,
    /// inserting `V::default()` if the key was absent
    pub fn access(&self, key: K) -> Access<'_, V> {
        let shard = &self.shards[key.shard(self.shards.len())];
        Access {
            guard: MutexGuard::map(shard.lock(), |map| map.entry(key).or_default()),
        }
    }

    /// Removes the entry if present. Safe whenever the caller holds no
    /// outstanding handle for the key.
    pub fn erase(&self, key: K) {
        self.shards[key.shard(self.shards.len())].lock().remove(&key);
    }

    /// Collects every shard into one ordered map, locking shards one at a
    /// time. Not a consistent cross-shard snapshot.
    pub fn build_ordinary_map(&self) -> BTreeMap<K, V> {
        let mut result = BTreeMap::new();
        for shard in &self.shards {
            for (key, value) in shard.lock().iter() {
                result.insert(*key, value.clone());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_access_inserts_default() {
        let map: ConcurrentMap<i32, f64> = ConcurrentMap::new(4);
        assert_eq!(*map.access(7), 0.0);
        *map.access(7) += 1.5;
        assert_eq!(*map.access(7), 1.5);
    }

    #[test]
    fn test_lock_is_released_when_handle_drops() {
        let map: ConcurrentMap<i32, i32> = ConcurrentMap::new(1);
        {
            let mut handle = map.access(1);
            *handle += 1;
        }
        // Same single shard, re-entry would deadlock if the guard leaked
        *map.access(2) += 1;
        assert_eq!(*map.access(1), 1);
    }

    #[test]
    fn test_erase_removes_entry() {
        let map: ConcurrentMap<i32, i32> = ConcurrentMap::new(4);
        *map.access(3) += 9;
        map.erase(3);
        map.erase(100); // absent key is fine
        assert!(!map.build_ordinary_map().contains_key(&3));
    }

    #[test]
    fn test_negative_keys_land_in_valid_shards() {
        let map: ConcurrentMap<i32, i32> = ConcurrentMap::new(5);
        for key in [-11, -5, -1, 0, 1, 7] {
            *map.access(key) += 1;
        }
        assert_eq!(map.build_ordinary_map().len(), 6);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        const WRITERS: usize = 8;
        const INCREMENTS: usize = 1000;
        const KEYS: i32 = 13;

        let map: ConcurrentMap<i32, usize> = ConcurrentMap::new(4);
        thread::scope(|scope| {
            for _ in 0..WRITERS {
                scope.spawn(|| {
                    for i in 0..INCREMENTS {
                        *map.access(i as i32 % KEYS) += 1;
                    }
                });
            }
        });

        let total: usize = map.build_ordinary_map().values().sum();
        assert_eq!(total, WRITERS * INCREMENTS);
    }
}
