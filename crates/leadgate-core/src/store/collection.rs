// ── Generic concurrent record collection ──
//
// Lock-free keyed storage for one record type. Records are stored behind
// `Arc` so readers can hold them without blocking writers.

use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// A concurrent collection for a single record type, keyed by `K`.
pub(crate) struct RecordCollection<K, T>
where
    K: Eq + Hash + Clone,
{
    by_key: DashMap<K, Arc<T>>,

    /// Version counter, bumped on every mutation.
    version: AtomicU64,
}

impl<K, T> RecordCollection<K, T>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            by_key: DashMap::new(),
            version: AtomicU64::new(0),
        }
    }

    /// Insert only if `key` is absent. The check and the insert happen
    /// under the same shard lock, so two racing callers cannot both win.
    /// Hands the record back when the key is taken.
    pub(crate) fn insert_unique(&self, key: K, record: T) -> Result<Arc<T>, T> {
        match self.by_key.entry(key) {
            Entry::Occupied(_) => Err(record),
            Entry::Vacant(slot) => {
                let record = Arc::new(record);
                slot.insert(Arc::clone(&record));
                self.bump_version();
                Ok(record)
            }
        }
    }

    /// Insert or replace. Returns `true` if the key was new.
    pub(crate) fn upsert(&self, key: K, record: T) -> bool {
        let is_new = self.by_key.insert(key, Arc::new(record)).is_none();
        self.bump_version();
        is_new
    }

    pub(crate) fn get(&self, key: &K) -> Option<Arc<T>> {
        self.by_key.get(key).map(|r| Arc::clone(r.value()))
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.by_key.contains_key(key)
    }

    /// Count records matching `predicate` without cloning them.
    pub(crate) fn count_where(&self, predicate: impl Fn(&T) -> bool) -> usize {
        self.by_key.iter().filter(|r| predicate(r.value())).count()
    }

    /// All records, in no particular order.
    pub(crate) fn values(&self) -> Vec<Arc<T>> {
        self.by_key.iter().map(|r| Arc::clone(r.value())).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }

    pub(crate) fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    fn bump_version(&self) {
        self.version.fetch_add(1, Ordering::AcqRel);
    }
}

impl<K, T> Default for RecordCollection<K, T>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
