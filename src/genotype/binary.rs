//! Binary (bit-string) chromosome segments.

use rand::Rng;

/// A fixed-length block of bits.
///
/// Besides acting as a plain bit string, a segment of up to 64 bits can be
/// read as an unsigned integer via [`to_uint`](Self::to_uint) (bit 0 is the
/// least significant).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinarySegment {
    bits: Vec<bool>,
}

impl BinarySegment {
    /// Wraps an explicit bit vector.
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// All bits cleared.
    pub fn zeros(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    /// Uniformly random bits.
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        Self {
            bits: (0..len).map(|_| rng.random_bool(0.5)).collect(),
        }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Flips the bit at `index`. Always changes the segment.
    pub fn flip(&mut self, index: usize) {
        self.bits[index] = !self.bits[index];
    }

    /// Largest value representable by this segment: `2^len - 1`.
    ///
    /// Saturates at `u64::MAX` for segments longer than 64 bits.
    pub fn max_value(&self) -> u64 {
        if self.bits.len() >= 64 {
            u64::MAX
        } else {
            (1u64 << self.bits.len()) - 1
        }
    }

    /// Reads the segment as an unsigned integer, bit 0 least significant.
    ///
    /// Bits beyond the 64th are ignored.
    pub fn to_uint(&self) -> u64 {
        self.bits
            .iter()
            .take(64)
            .enumerate()
            .filter(|(_, &b)| b)
            .fold(0u64, |acc, (i, _)| acc | (1u64 << i))
    }
}

impl std::fmt::Display for BinarySegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("0b")?;
        for &b in self.bits.iter().rev() {
            f.write_str(if b { "1" } else { "0" })?;
        }
        Ok(())
    }
}
