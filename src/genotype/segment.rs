//! The chromosome segment variant and its shape descriptor.

use super::binary::BinarySegment;
use super::integer::IntegerSegment;
use super::permutation::{PermutationCrossover, PermutationMutation, PermutationSegment};
use super::vector::VectorCrossover;
use crate::error::{ConfigError, GaError};
use rand::Rng;
use std::fmt;

/// Representation kind of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SegmentKind {
    Binary,
    Integer { min: i64, max: i64 },
    Permutation,
}

/// Kind plus length. Two segments can only be recombined when their shapes
/// are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentShape {
    pub kind: SegmentKind,
    pub len: usize,
}

impl SegmentShape {
    pub fn binary(len: usize) -> Self {
        Self {
            kind: SegmentKind::Binary,
            len,
        }
    }

    pub fn integer(len: usize, min: i64, max: i64) -> Self {
        Self {
            kind: SegmentKind::Integer { min, max },
            len,
        }
    }

    pub fn permutation(len: usize) -> Self {
        Self {
            kind: SegmentKind::Permutation,
            len,
        }
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.len == 0 {
            return Err(ConfigError::EmptySegment { index });
        }
        if let SegmentKind::Integer { min, max } = self.kind {
            if min > max {
                return Err(ConfigError::InvalidIntegerRange { min, max });
            }
        }
        Ok(())
    }

    /// Creates a random segment of this shape.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Segment {
        match self.kind {
            SegmentKind::Binary => Segment::Binary(BinarySegment::random(self.len, rng)),
            SegmentKind::Integer { min, max } => {
                Segment::Integer(IntegerSegment::random(self.len, min, max, rng))
            }
            SegmentKind::Permutation => {
                Segment::Permutation(PermutationSegment::random(self.len, rng))
            }
        }
    }
}

impl fmt::Display for SegmentShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SegmentKind::Binary => write!(f, "binary[{}]", self.len),
            SegmentKind::Integer { min, max } => write!(f, "integer[{}; {min}..={max}]", self.len),
            SegmentKind::Permutation => write!(f, "permutation[{}]", self.len),
        }
    }
}

/// Per-representation crossover methods, applied segment by segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossoverScheme {
    /// Used for binary and integer segments.
    pub vector: VectorCrossover,
    /// Used for permutation segments.
    pub permutation: PermutationCrossover,
}

/// A contiguous block of alleles with a single representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Binary(BinarySegment),
    Integer(IntegerSegment),
    Permutation(PermutationSegment),
}

impl Segment {
    pub fn shape(&self) -> SegmentShape {
        match self {
            Segment::Binary(s) => SegmentShape::binary(s.len()),
            Segment::Integer(s) => SegmentShape::integer(s.len(), s.min(), s.max()),
            Segment::Permutation(s) => SegmentShape::permutation(s.len()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Segment::Binary(s) => s.len(),
            Segment::Integer(s) => s.len(),
            Segment::Permutation(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Applies this segment's mutation primitive at `index`.
    ///
    /// Binary segments flip the bit, integer segments reset the value,
    /// permutation segments rearrange according to `style`. Returns whether
    /// the segment changed.
    pub fn mutate_allele<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        style: PermutationMutation,
        rng: &mut R,
    ) -> Result<bool, GaError> {
        if index >= self.len() {
            return Err(GaError::Operator {
                operator: "mutate_allele".into(),
                message: format!("allele index {index} out of range for {}", self.shape()),
            });
        }
        Ok(match self {
            Segment::Binary(s) => {
                s.flip(index);
                true
            }
            Segment::Integer(s) => s.reset(index, rng),
            Segment::Permutation(s) => s.mutate_at(index, style, rng),
        })
    }

    /// Recombines two segments of identical shape into two children.
    ///
    /// # Errors
    /// [`GaError::ShapeMismatch`] when kind or length differ.
    pub fn crossover_with<R: Rng + ?Sized>(
        &self,
        other: &Segment,
        scheme: &CrossoverScheme,
        rng: &mut R,
    ) -> Result<(Segment, Segment), GaError> {
        if self.shape() != other.shape() {
            return Err(GaError::shape_mismatch(self.shape(), other.shape()));
        }
        Ok(match (self, other) {
            (Segment::Binary(a), Segment::Binary(b)) => {
                let (c1, c2) = scheme.vector.apply(a.bits(), b.bits(), rng);
                (
                    Segment::Binary(BinarySegment::new(c1)),
                    Segment::Binary(BinarySegment::new(c2)),
                )
            }
            (Segment::Integer(a), Segment::Integer(b)) => {
                let (c1, c2) = scheme.vector.apply(a.values(), b.values(), rng);
                (
                    Segment::Integer(a.with_values(c1)),
                    Segment::Integer(a.with_values(c2)),
                )
            }
            (Segment::Permutation(a), Segment::Permutation(b)) => {
                let (c1, c2) = a.crossover(b, scheme.permutation, rng);
                (Segment::Permutation(c1), Segment::Permutation(c2))
            }
            _ => unreachable!("equal shapes imply equal kinds"),
        })
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Binary(s) => write!(f, "{s}"),
            Segment::Integer(s) => write!(f, "{:?}", s.values()),
            Segment::Permutation(s) => write!(f, "{:?}", s.order()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_crossover_shape_mismatch_length() {
        let mut rng = create_rng(1);
        let a = SegmentShape::binary(8).random(&mut rng);
        let b = SegmentShape::binary(9).random(&mut rng);
        let err = a
            .crossover_with(&b, &CrossoverScheme::default(), &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            GaError::ShapeMismatch {
                expected: "binary[8]".into(),
                found: "binary[9]".into()
            }
        );
    }

    #[test]
    fn test_crossover_shape_mismatch_kind() {
        let mut rng = create_rng(1);
        let a = SegmentShape::binary(5).random(&mut rng);
        let b = SegmentShape::permutation(5).random(&mut rng);
        assert!(matches!(
            a.crossover_with(&b, &CrossoverScheme::default(), &mut rng),
            Err(GaError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_integer_crossover_keeps_range() {
        let mut rng = create_rng(4);
        let shape = SegmentShape::integer(12, -2, 2);
        let a = shape.random(&mut rng);
        let b = shape.random(&mut rng);
        let (c1, c2) = a
            .crossover_with(&b, &CrossoverScheme::default(), &mut rng)
            .expect("same shape");
        assert_eq!(c1.shape(), shape);
        assert_eq!(c2.shape(), shape);
    }

    #[test]
    fn test_mutate_allele_binary_flips() {
        let mut rng = create_rng(1);
        let mut seg = Segment::Binary(BinarySegment::zeros(4));
        assert!(seg
            .mutate_allele(2, PermutationMutation::Swap, &mut rng)
            .expect("in range"));
        assert_eq!(seg, Segment::Binary(BinarySegment::new(vec![false, false, true, false])));
    }

    #[test]
    fn test_mutate_allele_out_of_range() {
        let mut rng = create_rng(1);
        let mut seg = Segment::Binary(BinarySegment::zeros(4));
        assert!(seg
            .mutate_allele(4, PermutationMutation::Swap, &mut rng)
            .is_err());
    }

    #[test]
    fn test_shape_validate() {
        assert_eq!(
            SegmentShape::binary(0).validate(3),
            Err(ConfigError::EmptySegment { index: 3 })
        );
        assert!(SegmentShape::integer(2, 5, 1).validate(0).is_err());
        assert!(SegmentShape::permutation(4).validate(0).is_ok());
    }

    #[test]
    fn test_shape_display() {
        assert_eq!(SegmentShape::integer(3, 0, 9).to_string(), "integer[3; 0..=9]");
        assert_eq!(SegmentShape::permutation(7).to_string(), "permutation[7]");
    }
}
