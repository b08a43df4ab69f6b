//! Seedable random number generation.
//!
//! Every run owns a single [`GaRng`] created from the configured seed.
//! Work that may execute out of order (parallel fitness evaluation) draws from
//! [`substream`] generators instead, so the main stream is never consumed in a
//! thread-dependent order.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// The generator type threaded through every operator.
pub type GaRng = StdRng;

/// Creates the main generator for a run.
pub fn create_rng(seed: u64) -> GaRng {
    StdRng::seed_from_u64(seed)
}

/// Derives an independent generator for one `(generation, index)` slot.
///
/// The same triple always yields the same stream.
pub fn substream(seed: u64, generation: usize, index: usize) -> GaRng {
    let mixed = splitmix64(splitmix64(seed ^ splitmix64(generation as u64)) ^ index as u64);
    StdRng::seed_from_u64(mixed)
}

/// SplitMix64 finalizer (Steele, Lea & Flood, 2014).
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
