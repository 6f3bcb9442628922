//! Dictionary: bucketized two-table cuckoo hashing.

use crate::config::{DictionaryConfig, DEFAULT_CAPACITY};
use crate::error::{DictError, InsertError};
use crate::family::{HashFamily, TABLE_COUNT};
use crate::key::DictKey;
use crate::rng::clock_seed;
use crate::table::{Bucket, CuckooTable, Entry, BUCKET_CAPACITY};
use core::borrow::Borrow;
use core::fmt;
use log::{debug, trace, warn};

/// Snapshot of a dictionary's shape and history.
#[derive(Clone, Debug, PartialEq)]
pub struct DictionaryStats {
    pub len: usize,
    pub table_size: usize,
    pub capacity: usize,
    pub load_factor: f64,
    /// Number of hash family reseeds so far.
    pub generation: u64,
    /// Passes that relocated every entry, whether to grow, reseed or shrink
    /// back after a failed insert.
    pub rebuilds: u64,
    pub resizes: u64,
}

/// A hash map with worst-case constant lookups.
///
/// Each key has one candidate bucket in each of two tables; a bucket holds up
/// to four entries. Inserting into two full buckets evicts an occupant to its
/// other table, cascading up to `max_kicks` times. A stuck chain reseeds the
/// hash family (growing the tables when they are loaded) and relocates every
/// entry. The number of such rebuilds per operation is bounded; running out
/// is reported as [`DictError::RehashLimit`].
///
/// Not thread-safe: wrap in a lock if shared.
#[derive(Clone)]
pub struct Dictionary<K, V> {
    tables: [CuckooTable<K, V>; TABLE_COUNT],
    family: HashFamily,
    table_size: usize,
    len: usize,
    config: DictionaryConfig,
    rebuilds: u64,
    resizes: u64,
}

impl<K: DictKey, V> Dictionary<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a dictionary with `capacity` buckets per table, rounded up to a
    /// power of two.
    ///
    /// # Panics
    /// If the rounded capacity overflows `usize`.
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::with_config(DictionaryConfig::default().with_capacity(capacity)) {
            Ok(d) => d,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn with_config(config: DictionaryConfig) -> Result<Self, DictError> {
        config.validate()?;
        let table_size = config.table_size()?;
        let family = HashFamily::new(config.seed.unwrap_or_else(clock_seed));
        Ok(Self {
            tables: core::array::from_fn(|_| CuckooTable::new(table_size)),
            family,
            table_size,
            len: 0,
            config,
            rebuilds: 0,
            resizes: 0,
        })
    }

    /// Insert or update. Returns the previous value for an existing key.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, InsertError<K, V>> {
        if let Some((t, b, s)) = self.find(&key) {
            let slot = &mut self.tables[t].bucket_mut(b).get_mut(s).value;
            return Ok(Some(core::mem::replace(slot, value)));
        }

        let entry = Entry { key, value };
        if self.len >= self.capacity() {
            let grown = match self.table_size.checked_mul(2) {
                Some(n) => n,
                None => {
                    return Err(InsertError::new(
                        DictError::CapacityOverflow,
                        vec![(entry.key, entry.value)],
                    ))
                }
            };
            self.rebuild(grown, vec![entry], false)?;
            return Ok(None);
        }

        match self.place(entry) {
            Ok(()) => {
                self.len += 1;
                Ok(None)
            }
            Err(homeless) => {
                trace!(
                    "eviction chain exhausted after {} kicks (len {}, table size {})",
                    self.config.max_kicks,
                    self.len,
                    self.table_size
                );
                // The chain swapped the new entry in for `homeless`; len is unchanged.
                let size = self.next_size(1).unwrap_or(self.table_size);
                self.rebuild(size, vec![homeless], true)?;
                Ok(None)
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + DictKey,
    {
        self.find(key)
            .map(|(t, b, s)| &self.tables[t].bucket(b).get(s).value)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + DictKey,
    {
        self.find(key).map(|(t, b, s)| {
            let e = self.tables[t].bucket(b).get(s);
            (&e.key, &e.value)
        })
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + DictKey,
    {
        let (t, b, s) = self.find(key)?;
        Some(&mut self.tables[t].bucket_mut(b).get_mut(s).value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + DictKey,
    {
        self.find(key).is_some()
    }

    /// Remove `key`, failing with [`DictError::KeyNotFound`] if absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, DictError>
    where
        K: Borrow<Q>,
        Q: ?Sized + DictKey,
    {
        self.take(key)
            .map(|e| e.value)
            .ok_or(DictError::KeyNotFound)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + DictKey,
    {
        self.take(key).map(|e| (e.key, e.value))
    }

    /// Grow so that `additional` more entries fit without exceeding capacity.
    pub fn reserve(&mut self, additional: usize) -> Result<(), InsertError<K, V>> {
        let per_bucket_row = TABLE_COUNT * BUCKET_CAPACITY;
        let wanted = self
            .len
            .checked_add(additional)
            .map(|n| n.div_ceil(per_bucket_row).max(1))
            .and_then(usize::checked_next_power_of_two)
            .ok_or_else(|| InsertError::new(DictError::CapacityOverflow, Vec::new()))?;
        if wanted <= self.table_size {
            return Ok(());
        }
        self.rebuild(wanted, Vec::new(), false)
    }

    /// Reseed the hash family and relocate every entry at the current size.
    pub fn rehash(&mut self) -> Result<(), InsertError<K, V>> {
        self.rebuild(self.table_size, Vec::new(), true)
    }

    #[inline]
    fn mask(&self) -> usize {
        self.table_size - 1
    }

    /// `(table, bucket, slot)` of `key`, probing table 0 then table 1.
    fn find<Q>(&self, key: &Q) -> Option<(usize, usize, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + DictKey,
    {
        let idx = self.family.locate(key.repr(), self.mask());
        (0..TABLE_COUNT).find_map(|t| {
            self.tables[t]
                .bucket(idx[t])
                .position(key)
                .map(|s| (t, idx[t], s))
        })
    }

    fn take<Q>(&mut self, key: &Q) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + DictKey,
    {
        let (t, b, s) = self.find(key)?;
        let entry = self.tables[t].bucket_mut(b).swap_remove(s);
        self.len -= 1;
        Some(entry)
    }

    /// Run one bounded eviction chain. On failure the entry left without a
    /// slot is handed back; it may not be the one passed in.
    fn place(&mut self, mut entry: Entry<K, V>) -> Result<(), Entry<K, V>> {
        let mask = self.mask();
        let mut victim_table = TABLE_COUNT - 1;
        for step in 0..self.config.max_kicks {
            let idx = self.family.locate(entry.key.repr(), mask);
            for (t, &b) in idx.iter().enumerate() {
                let bucket = self.tables[t].bucket_mut(b);
                if bucket.has_room() {
                    bucket.push(entry);
                    return Ok(());
                }
            }
            let slot = step % BUCKET_CAPACITY;
            entry = self.tables[victim_table]
                .bucket_mut(idx[victim_table])
                .replace(slot, entry);
            victim_table = (victim_table + 1) % TABLE_COUNT;
        }
        Err(entry)
    }

    /// Doubled table size if `pending` more entries would push the load past
    /// the configured maximum, `None` otherwise.
    fn next_size(&self, pending: usize) -> Option<usize> {
        let load = (self.len + pending) as f64 / self.capacity() as f64;
        if load >= self.config.max_load_factor {
            self.table_size.checked_mul(2)
        } else {
            None
        }
    }

    /// Move every entry, plus `stash`, into tables of `table_size` buckets.
    ///
    /// The first pass reseeds only if `reseed` is set; every retry reseeds.
    /// Retries grow the tables when the load calls for it, and at most once
    /// more after two failures in a row. Retries are bounded by
    /// `max_rehashes`. Running out shrinks the tables back to the size the
    /// load calls for before reporting the entries left over.
    fn rebuild(
        &mut self,
        mut table_size: usize,
        stash: Vec<Entry<K, V>>,
        mut reseed: bool,
    ) -> Result<(), InsertError<K, V>> {
        let mut settled = table_size;
        let mut grew_on_failure = false;
        let mut attempts = 0;
        let mut homeless = self.relocate(table_size, stash, reseed);
        while !homeless.is_empty() {
            attempts += 1;
            if attempts > self.config.max_rehashes {
                if self.table_size > settled {
                    debug!(
                        "shrinking tables from {} back to {} buckets",
                        self.table_size, settled
                    );
                    homeless = self.relocate(settled, homeless, false);
                }
                warn!(
                    "giving up after {} rebuilds; {} entries could not be placed",
                    attempts,
                    homeless.len()
                );
                return Err(InsertError::new(
                    DictError::RehashLimit {
                        attempts,
                        table_size: self.table_size,
                    },
                    homeless.into_iter().map(|e| (e.key, e.value)).collect(),
                ));
            }
            match self.next_size(homeless.len()) {
                Some(n) => {
                    table_size = n;
                    settled = n;
                }
                // Two failures in a row at one size: try one doubling.
                None if attempts >= 2 && !grew_on_failure => {
                    if let Some(n) = self.table_size.checked_mul(2) {
                        table_size = n;
                    }
                    grew_on_failure = true;
                }
                None => {}
            }
            reseed = true;
            homeless = self.relocate(table_size, homeless, reseed);
        }
        Ok(())
    }

    /// One relocation pass: drain the tables, optionally resize and reseed,
    /// then place everything. Returns the entries that found no slot.
    fn relocate(
        &mut self,
        table_size: usize,
        mut stash: Vec<Entry<K, V>>,
        reseed: bool,
    ) -> Vec<Entry<K, V>> {
        for t in self.tables.iter_mut() {
            t.drain_into(&mut stash);
        }
        if table_size != self.table_size {
            debug!("resizing tables from {} to {} buckets", self.table_size, table_size);
            self.tables = core::array::from_fn(|_| CuckooTable::new(table_size));
            self.table_size = table_size;
            self.resizes += 1;
        }
        if reseed {
            self.family.reseed();
            debug!(
                "rehashing {} entries into generation {}",
                stash.len(),
                self.family.generation()
            );
        }
        self.rebuilds += 1;

        self.len = 0;
        let mut homeless = Vec::new();
        for entry in stash.drain(..) {
            match self.place(entry) {
                Ok(()) => self.len += 1,
                Err(e) => homeless.push(e),
            }
        }
        homeless
    }

    /// Panic unless every structural invariant holds.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert!(self.table_size.is_power_of_two());
        let mut count = 0;
        for (t, table) in self.tables.iter().enumerate() {
            assert_eq!(table.buckets().len(), self.table_size);
            for (b, bucket) in table.buckets().iter().enumerate() {
                assert!(bucket.len() <= BUCKET_CAPACITY);
                for e in bucket.iter() {
                    let idx = self.family.locate(e.key.repr(), self.mask());
                    assert_eq!(idx[t], b, "entry stored away from its candidate bucket");
                    count += 1;
                }
            }
        }
        assert_eq!(count, self.len);
        assert!(self.len <= self.capacity());
    }
}

impl<K, V> Dictionary<K, V> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Buckets per table; always a power of two.
    pub fn table_size(&self) -> usize {
        self.table_size
    }

    /// Total entry slots across all tables.
    #[inline]
    pub fn capacity(&self) -> usize {
        TABLE_COUNT * self.table_size * BUCKET_CAPACITY
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    /// Drop every entry. The tables keep their size.
    pub fn clear(&mut self) {
        for t in self.tables.iter_mut() {
            t.clear();
        }
        self.len = 0;
    }

    pub fn stats(&self) -> DictionaryStats {
        DictionaryStats {
            len: self.len,
            table_size: self.table_size,
            capacity: self.capacity(),
            load_factor: self.load_factor(),
            generation: self.family.generation(),
            rebuilds: self.rebuilds,
            resizes: self.resizes,
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        let [a, b] = &self.tables;
        Iter {
            buckets: a.buckets().iter().chain(b.buckets().iter()),
            current: Default::default(),
            remaining: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let remaining = self.len;
        let [a, b] = &mut self.tables;
        IterMut {
            buckets: a.buckets_mut().iter_mut().chain(b.buckets_mut().iter_mut()),
            current: Default::default(),
            remaining,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

impl<K: DictKey, V> Default for Dictionary<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Dictionary<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

type BucketChain<'a, K, V> =
    core::iter::Chain<core::slice::Iter<'a, Bucket<K, V>>, core::slice::Iter<'a, Bucket<K, V>>>;
type BucketChainMut<'a, K, V> = core::iter::Chain<
    core::slice::IterMut<'a, Bucket<K, V>>,
    core::slice::IterMut<'a, Bucket<K, V>>,
>;

/// Iterator over `(&K, &V)` in unspecified order.
pub struct Iter<'a, K, V> {
    buckets: BucketChain<'a, K, V>,
    current: core::slice::Iter<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.current.next() {
                self.remaining -= 1;
                return Some((&e.key, &e.value));
            }
            self.current = self.buckets.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over `(&K, &mut V)` in unspecified order.
pub struct IterMut<'a, K, V> {
    buckets: BucketChainMut<'a, K, V>,
    current: core::slice::IterMut<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.current.next() {
                self.remaining -= 1;
                return Some((&e.key, &mut e.value));
            }
            self.current = self.buckets.next()?.iter_mut();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a Dictionary<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut Dictionary<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
