//! Ready-made problem strategies.
//!
//! Each problem supplies only an encoding (a [`GenotypeShape`] and, where
//! needed, a [`Decoder`]) and an [`Evaluator`]. The engine is unchanged.
//!
//! - [`OneMax`]: count of set bits, the classic smoke test
//! - [`Knapsack`]: 0-1 knapsack with a relaxed volume penalty
//! - [`Graph`] + [`TourLength`]: closed tours over a complete weighted graph,
//!   encoded either as a permutation or through [`InsertionDecoder`]
//!
//! [`GenotypeShape`]: crate::genotype::GenotypeShape
//! [`Decoder`]: crate::genotype::Decoder
//! [`Evaluator`]: crate::evaluation::Evaluator

mod graph;
mod knapsack;
mod onemax;

pub use graph::{Graph, InsertionDecoder, TourLength};
pub use knapsack::Knapsack;
pub use onemax::OneMax;
