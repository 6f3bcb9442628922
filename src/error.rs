//! Error types.

use core::fmt;

/// Failures reported by dictionary operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DictError {
    #[error("key not found")]
    KeyNotFound,

    #[error("insert failed: rehash budget exhausted after {attempts} attempts (table size {table_size})")]
    RehashLimit { attempts: usize, table_size: usize },

    #[error("capacity overflow")]
    CapacityOverflow,

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl DictError {
    /// Misses are expected in normal use; the other variants are not.
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::KeyNotFound)
    }
}

/// An insert that could not complete.
///
/// Entries are never dropped silently: `displaced` holds every pair the
/// dictionary could not place. It may include a pair that was stored before
/// this call, in which case the pair being inserted is in the dictionary.
pub struct InsertError<K, V> {
    pub error: DictError,
    pub displaced: Vec<(K, V)>,
}

impl<K, V> InsertError<K, V> {
    pub(crate) fn new(error: DictError, displaced: Vec<(K, V)>) -> Self {
        Self { error, displaced }
    }

    pub fn into_displaced(self) -> Vec<(K, V)> {
        self.displaced
    }
}

impl<K, V> fmt::Debug for InsertError<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertError")
            .field("error", &self.error)
            .field("displaced", &self.displaced.len())
            .finish()
    }
}

impl<K, V> fmt::Display for InsertError<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<K, V> std::error::Error for InsertError<K, V> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
