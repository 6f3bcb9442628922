//! Bucket storage for one physical cuckoo table.

use core::borrow::Borrow;

/// Entries per bucket.
pub const BUCKET_CAPACITY: usize = 4;

#[derive(Clone, Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

/// Up to [`BUCKET_CAPACITY`] entries. Order is irrelevant; removal compacts.
#[derive(Clone, Debug)]
pub(crate) struct Bucket<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Bucket<K, V> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn has_room(&self) -> bool {
        self.entries.len() < BUCKET_CAPACITY
    }

    pub(crate) fn push(&mut self, entry: Entry<K, V>) {
        debug_assert!(self.has_room());
        if self.entries.capacity() == 0 {
            self.entries.reserve_exact(BUCKET_CAPACITY);
        }
        self.entries.push(entry);
    }

    pub(crate) fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.entries.iter().position(|e| e.key.borrow() == key)
    }

    #[inline]
    pub(crate) fn get(&self, slot: usize) -> &Entry<K, V> {
        &self.entries[slot]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, slot: usize) -> &mut Entry<K, V> {
        &mut self.entries[slot]
    }

    /// Put `entry` in `slot` of a full bucket and hand back the occupant.
    pub(crate) fn replace(&mut self, slot: usize, entry: Entry<K, V>) -> Entry<K, V> {
        core::mem::replace(&mut self.entries[slot], entry)
    }

    pub(crate) fn swap_remove(&mut self, slot: usize) -> Entry<K, V> {
        self.entries.swap_remove(slot)
    }

    pub(crate) fn iter(&self) -> core::slice::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> core::slice::IterMut<'_, Entry<K, V>> {
        self.entries.iter_mut()
    }
}

/// A fixed-length array of buckets. The length is a power of two and only
/// changes by replacing the whole table.
#[derive(Clone, Debug)]
pub(crate) struct CuckooTable<K, V> {
    buckets: Vec<Bucket<K, V>>,
}

impl<K, V> CuckooTable<K, V> {
    pub(crate) fn new(table_size: usize) -> Self {
        debug_assert!(table_size.is_power_of_two());
        let mut buckets = Vec::with_capacity(table_size);
        buckets.resize_with(table_size, Bucket::new);
        Self { buckets }
    }

    #[inline]
    pub(crate) fn bucket(&self, index: usize) -> &Bucket<K, V> {
        &self.buckets[index]
    }

    #[inline]
    pub(crate) fn bucket_mut(&mut self, index: usize) -> &mut Bucket<K, V> {
        &mut self.buckets[index]
    }

    pub(crate) fn buckets(&self) -> &[Bucket<K, V>] {
        &self.buckets
    }

    pub(crate) fn buckets_mut(&mut self) -> &mut [Bucket<K, V>] {
        &mut self.buckets
    }

    /// Move every entry out, leaving empty buckets behind.
    pub(crate) fn drain_into(&mut self, out: &mut Vec<Entry<K, V>>) {
        for b in self.buckets.iter_mut() {
            out.append(&mut b.entries);
        }
    }

    /// Drop every entry, keeping the bucket array.
    pub(crate) fn clear(&mut self) {
        for b in self.buckets.iter_mut() {
            b.entries.clear();
        }
    }
}
