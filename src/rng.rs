//! Small pseudo-random helpers owned by individual hashers.
//!
//! Every hasher carries its own generator; nothing here is process-global.
//! A dictionary built from a fixed seed is fully deterministic.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Replacement state for a generator that would otherwise be stuck at zero.
const NONZERO_FALLBACK: u32 = 0x9E37_79B9;

/// Marsaglia xorshift generator with the (13, 17, 5) triple.
///
/// Used to drive in-place reseeding. The state evolves on every draw, so two
/// consecutive reseeds of the same hasher never replay the same sequence.
#[derive(Clone, Debug)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { NONZERO_FALLBACK } else { seed };
        Self { state }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    /// Uniform-ish draw in `0..bound`. `bound` must be nonzero.
    #[inline]
    pub fn next_below(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0);
        // Multiply-high reduction; bias is negligible for the small bounds used here.
        ((self.next_u32() as u64 * bound as u64) >> 32) as u32
    }
}

/// Derive a seed from the wall clock when the caller did not supply one.
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED_0F_C0C0)
}

/// Expand one master seed into `n` independent child seeds.
pub fn split_seed(seed: u64, n: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen::<u64>()).collect()
}
