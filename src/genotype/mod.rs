//! Genotype data model.
//!
//! A [`Genotype`] is an ordered list of [`Segment`]s. Each segment is a
//! fixed-length block of alleles with one representation:
//!
//! - [`BinarySegment`]: bit strings, bit-flip mutation
//! - [`IntegerSegment`]: bounded integers, random-reset mutation
//! - [`PermutationSegment`]: orderings, OX/PMX crossover and
//!   swap/inversion/insertion mutation
//!
//! Binary and integer segments share the position-wise
//! [`VectorCrossover`] methods (single-point, multi-point, uniform).
//!
//! A [`GenotypeShape`] describes the layout every member of a population must
//! share; recombining segments of different shape fails with
//! [`GaError::ShapeMismatch`](crate::GaError::ShapeMismatch).
//!
//! Phenotypes are produced by [`Decoder`] strategies supplied by the problem.

mod binary;
pub mod decode;
mod integer;
mod permutation;
mod segment;
mod types;
mod vector;

pub use binary::BinarySegment;
pub use decode::{AlleleDecoder, Decoder, PermutationDecoder, UintDecoder};
pub use integer::IntegerSegment;
pub use permutation::{is_permutation, PermutationCrossover, PermutationMutation, PermutationSegment};
pub use segment::{CrossoverScheme, Segment, SegmentKind, SegmentShape};
pub use types::{Genotype, GenotypeShape};
pub use vector::VectorCrossover;
