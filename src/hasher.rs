//! Reseedable hash functions.
//!
//! Both hashers return an unreduced `u64`; range reduction to a bucket index is
//! always done by the dictionary. `reseed` replaces the function in place
//! without reallocating, which invalidates every location computed before it.

use crate::rng::{split_seed, XorShift32};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Bytes consumed per tabulation chunk, one lookup table per position.
pub const CHUNK_WIDTH: usize = 4;
const BYTE_VALUES: usize = 256;
/// Rotation applied to the tail hash before it is folded into the head chunk.
const TAIL_ROTATION: u32 = 7;

type Tables = [[u32; BYTE_VALUES]; CHUNK_WIDTH];

/// A hash function whose randomness can be regenerated in place.
pub trait HashFunction {
    type Input: ?Sized;

    fn hash(&self, input: &Self::Input) -> u64;

    /// Replace the function with a fresh one of the same kind.
    fn reseed(&mut self);
}

/// Simple tabulation hashing over byte strings.
///
/// Each of the [`CHUNK_WIDTH`] byte positions owns a table of 256 random
/// `u32` words. A chunk hashes to the XOR of the per-position lookups. Longer
/// inputs are hashed as `chunk(head) ^ rotl(hash(tail))`.
#[derive(Clone)]
pub struct TabulationHasher {
    tables: Box<Tables>,
    shuffle: XorShift32,
}

impl TabulationHasher {
    /// Build the lookup tables from `seed`, one rayon task per table.
    pub fn new(seed: u64) -> Self {
        let seeds = split_seed(seed, CHUNK_WIDTH + 1);
        let mut tables: Box<Tables> = Box::new([[0u32; BYTE_VALUES]; CHUNK_WIDTH]);
        tables
            .as_mut_slice()
            .par_iter_mut()
            .zip(seeds[..CHUNK_WIDTH].par_iter())
            .for_each(|(table, &table_seed)| {
                let mut rng = StdRng::seed_from_u64(table_seed);
                rng.fill(&mut table[..]);
            });
        Self {
            tables,
            shuffle: XorShift32::new(seeds[CHUNK_WIDTH] as u32),
        }
    }

    #[inline]
    fn chunk(&self, chunk: &[u8]) -> u32 {
        debug_assert!(chunk.len() <= CHUNK_WIDTH);
        chunk
            .iter()
            .enumerate()
            .fold(0, |acc, (pos, &b)| acc ^ self.tables[pos][b as usize])
    }
}

impl HashFunction for TabulationHasher {
    type Input = [u8];

    fn hash(&self, input: &[u8]) -> u64 {
        // Tail first so each head sees the already-combined remainder.
        let h = input
            .chunks(CHUNK_WIDTH)
            .rev()
            .fold(0u32, |tail, head| self.chunk(head) ^ tail.rotate_left(TAIL_ROTATION));
        h as u64
    }

    /// Fisher–Yates shuffle of every position table.
    fn reseed(&mut self) {
        for table in self.tables.iter_mut() {
            for i in (1..BYTE_VALUES).rev() {
                let j = self.shuffle.next_below(i as u32 + 1) as usize;
                table.swap(i, j);
            }
        }
    }
}

impl core::fmt::Debug for TabulationHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TabulationHasher")
            .field("chunk_width", &CHUNK_WIDTH)
            .finish_non_exhaustive()
    }
}

/// Multiplicative hashing for integer keys.
///
/// `hash(x)` is `factor * x` with its bits reversed, so a power-of-two mask
/// selects the high bits of the product (multiply-shift) instead of the low
/// bits, which only depend on the low bits of `x`.
#[derive(Clone, Debug)]
pub struct IntHasher {
    factor: u64,
    rng: XorShift32,
}

impl IntHasher {
    pub fn new(seed: u64) -> Self {
        let mut rng = XorShift32::new((seed ^ (seed >> 32)) as u32);
        let factor = rng.next_u64() | 1;
        Self { factor, rng }
    }

    pub fn factor(&self) -> u64 {
        self.factor
    }
}

impl HashFunction for IntHasher {
    type Input = u64;

    #[inline]
    fn hash(&self, x: &u64) -> u64 {
        x.wrapping_mul(self.factor).reverse_bits()
    }

    fn reseed(&mut self) {
        // Odd keeps the multiplication a bijection.
        self.factor = self.rng.next_u64() | 1;
    }
}
