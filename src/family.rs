//! HashFamily: one independently seeded hash function per physical table.

use crate::hasher::{HashFunction, IntHasher, TabulationHasher};
use crate::key::KeyRepr;
use crate::rng::split_seed;

/// Number of physical tables, and therefore candidate buckets per key.
pub const TABLE_COUNT: usize = 2;

/// The per-table hash function: dispatches a [`KeyRepr`] to the hasher for
/// its kind. Custom codes go through the integer hasher so every table sees
/// a different function of the caller's code.
#[derive(Clone, Debug)]
pub struct TableHasher {
    bytes: TabulationHasher,
    ints: IntHasher,
}

impl TableHasher {
    pub fn new(seed: u64) -> Self {
        let seeds = split_seed(seed, 2);
        Self {
            bytes: TabulationHasher::new(seeds[0]),
            ints: IntHasher::new(seeds[1]),
        }
    }

    #[inline]
    pub fn hash(&self, repr: KeyRepr<'_>) -> u64 {
        match repr {
            KeyRepr::Int(x) | KeyRepr::Custom(x) => self.ints.hash(&x),
            KeyRepr::Bytes(b) => self.bytes.hash(b),
        }
    }

    pub fn reseed(&mut self) {
        self.bytes.reseed();
        self.ints.reseed();
    }
}

/// Exactly [`TABLE_COUNT`] hash functions, one per table.
///
/// Every candidate location is recomputable from the key and the family
/// state alone. `generation` counts reseeds.
#[derive(Clone, Debug)]
pub struct HashFamily {
    hashers: [TableHasher; TABLE_COUNT],
    generation: u64,
}

impl HashFamily {
    pub fn new(seed: u64) -> Self {
        let seeds = split_seed(seed, TABLE_COUNT);
        Self {
            hashers: [TableHasher::new(seeds[0]), TableHasher::new(seeds[1])],
            generation: 0,
        }
    }

    /// Candidate bucket index in each table. `mask` is `table_size - 1`.
    #[inline]
    pub fn locate(&self, repr: KeyRepr<'_>, mask: usize) -> [usize; TABLE_COUNT] {
        let mut out = [0usize; TABLE_COUNT];
        for (slot, hasher) in out.iter_mut().zip(self.hashers.iter()) {
            *slot = (hasher.hash(repr) as usize) & mask;
        }
        out
    }

    /// Regenerate every table's function. Callers must relocate all stored
    /// entries before the next lookup.
    pub fn reseed(&mut self) {
        for h in self.hashers.iter_mut() {
            h.reseed();
        }
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
