//! Bounded integer chromosome segments.

use crate::error::ConfigError;
use rand::Rng;

/// A fixed-length block of integers, each within `min..=max`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntegerSegment {
    values: Vec<i64>,
    min: i64,
    max: i64,
}

impl IntegerSegment {
    /// Wraps explicit values, checking them against the range.
    pub fn new(values: Vec<i64>, min: i64, max: i64) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidIntegerRange { min, max });
        }
        if let Some(&value) = values.iter().find(|&&v| v < min || v > max) {
            return Err(ConfigError::AlleleOutOfRange { value, min, max });
        }
        Ok(Self { values, min, max })
    }

    /// Uniformly random values. Callers guarantee `min <= max`.
    pub fn random<R: Rng + ?Sized>(len: usize, min: i64, max: i64, rng: &mut R) -> Self {
        Self {
            values: (0..len).map(|_| rng.random_range(min..=max)).collect(),
            min,
            max,
        }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Random-reset mutation: replaces the value at `index` with a different
    /// value from the range.
    ///
    /// Returns `false` when the range holds a single value.
    pub fn reset<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) -> bool {
        if self.min == self.max {
            return false;
        }
        let current = self.values[index];
        // Draw from a range one smaller and skip over the current value.
        let mut v = rng.random_range(self.min..self.max);
        if v >= current {
            v += 1;
        }
        self.values[index] = v;
        true
    }

    pub(crate) fn with_values(&self, values: Vec<i64>) -> Self {
        Self {
            values,
            min: self.min,
            max: self.max,
        }
    }
}
