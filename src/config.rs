//! Dictionary configuration.

use crate::error::DictError;

pub const DEFAULT_CAPACITY: usize = 16;
/// Eviction steps before an insertion chain is declared stuck.
pub const DEFAULT_MAX_KICKS: usize = 1000;
/// Failed rebuilds tolerated within one operation.
pub const DEFAULT_MAX_REHASHES: usize = 16;
/// Above this load a stuck chain grows the tables instead of only reseeding.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.9;

#[derive(Clone, Debug, PartialEq)]
pub struct DictionaryConfig {
    /// Requested buckets per table, rounded up to a power of two.
    pub initial_capacity: usize,
    pub max_kicks: usize,
    pub max_rehashes: usize,
    pub max_load_factor: f64,
    /// Fixed seed for reproducible placement; `None` derives one from the clock.
    pub seed: Option<u64>,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_kicks: DEFAULT_MAX_KICKS,
            max_rehashes: DEFAULT_MAX_REHASHES,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            seed: None,
        }
    }
}

impl DictionaryConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_max_kicks(mut self, max_kicks: usize) -> Self {
        self.max_kicks = max_kicks;
        self
    }

    pub fn with_max_rehashes(mut self, max_rehashes: usize) -> Self {
        self.max_rehashes = max_rehashes;
        self
    }

    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Buckets per table actually allocated for `initial_capacity`.
    pub fn table_size(&self) -> Result<usize, DictError> {
        self.initial_capacity
            .max(1)
            .checked_next_power_of_two()
            .ok_or(DictError::CapacityOverflow)
    }

    pub fn validate(&self) -> Result<(), DictError> {
        if self.max_kicks == 0 {
            return Err(DictError::InvalidConfig {
                reason: "max_kicks must be at least 1".to_string(),
            });
        }
        if !(self.max_load_factor > 0.0 && self.max_load_factor <= 1.0) {
            return Err(DictError::InvalidConfig {
                reason: format!(
                    "max_load_factor must be in (0, 1], got {}",
                    self.max_load_factor
                ),
            });
        }
        self.table_size().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: realized table size is the smallest power of two >= request.
    #[test]
    fn table_size_rounds_up() {
        for (req, want) in [(0, 1), (1, 1), (2, 2), (3, 4), (4, 4), (30, 32), (234, 256)] {
            let cfg = DictionaryConfig::default().with_capacity(req);
            assert_eq!(cfg.table_size().unwrap(), want, "request {req}");
        }
    }

    #[test]
    fn oversized_capacity_overflows() {
        let cfg = DictionaryConfig::default().with_capacity(usize::MAX);
        assert_eq!(cfg.table_size(), Err(DictError::CapacityOverflow));
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(DictionaryConfig::default().validate().is_ok());
        assert!(DictionaryConfig::default().with_max_kicks(0).validate().is_err());
        assert!(DictionaryConfig::default()
            .with_max_load_factor(0.0)
            .validate()
            .is_err());
        assert!(DictionaryConfig::default()
            .with_max_load_factor(f64::NAN)
            .validate()
            .is_err());
    }
}
