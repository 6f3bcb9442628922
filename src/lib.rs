//! cuckoo-dict: a single-threaded dictionary with worst-case constant
//! lookups, built on bucketized cuckoo hashing and reseedable tabulation
//! hash functions.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a hash map for large data sets whose `get`/`remove` probe a fixed
//!   number of slots regardless of load, while `insert` stays amortized O(1).
//! - Layers:
//!   - TabulationHasher / IntHasher: reseedable hash functions returning an
//!     unreduced `u64`. Reseeding happens in place.
//!   - HashFamily: one independently seeded hasher per table (T = 2).
//!   - CuckooTable: `table_size` buckets of at most C = 4 entries.
//!   - Dictionary: probing, bounded eviction chains, and rebuilds (reseed,
//!     and grow when loaded) with a bounded retry budget.
//!
//! Constraints
//! - Single-threaded: no internal locking. Mutation takes `&mut self`, so
//!   user code (`Eq`, `Hashable::hash_code`) cannot reach the dictionary it
//!   runs inside.
//! - `table_size` is a power of two, identical across tables; bucket index
//!   is `hash & (table_size - 1)`.
//! - Locations are never stored. Every entry sits in the bucket its key maps
//!   to under the live hash family; a reseed is always followed by
//!   relocating every entry.
//! - Duplicate inserts update the stored value in place.
//!
//! Hash family
//! - Strings are hashed with simple tabulation over 4-byte chunks (4 tables
//!   of 256 random words, one per byte position). Longer strings fold a
//!   rotated tail hash into the head chunk. For keys of at most 4 bytes this
//!   is 3-independent.
//! - Integers use multiply-shift with a random odd 64-bit factor.
//! - `Hashable` codes are routed through the integer hasher, so each table
//!   sees a different function of the caller's code.
//! - The two tables use separately seeded hashers rather than deriving the
//!   second index from the first.
//!
//! Failure handling
//! - An eviction chain runs at most `max_kicks` steps.
//! - A stuck chain triggers a rebuild. Rebuild attempts within one operation
//!   are capped by `max_rehashes`; exhausting them returns
//!   [`DictError::RehashLimit`] together with the entries that could not be
//!   placed, so nothing is dropped silently.
//! - Retries grow the tables when the load calls for it, plus at most one
//!   extra doubling per operation. A failed operation shrinks back to the
//!   size the load calls for.
//!
//! Notes and non-goals
//! - No concurrent access, no persistence, no shrinking on removal.
//! - Key kinds are integers, strings, and [`Hashable`] types; anything else
//!   fails the [`DictKey`] bound at compile time.

mod config;
mod dictionary;
mod dictionary_proptest;
mod error;
pub mod family;
pub mod hasher;
mod key;
mod rng;
mod table;

// Public surface
pub use config::DictionaryConfig;
pub use dictionary::{Dictionary, DictionaryStats, Iter, IterMut};
pub use error::{DictError, InsertError};
pub use key::{DictKey, Hashable, KeyRepr};
pub use rng::XorShift32;
pub use table::BUCKET_CAPACITY;
