//! Genotypes and genotype shapes.

use super::segment::{CrossoverScheme, Segment, SegmentShape};
use super::decode::Decoder;
use crate::error::{ConfigError, GaError};
use rand::Rng;
use std::fmt;

/// Layout shared by every genotype in a population: one [`SegmentShape`]
/// per segment, in order.
///
/// # Examples
///
/// ```
/// use u_evolve::genotype::{GenotypeShape, SegmentShape};
///
/// // 20-bit string
/// let onemax = GenotypeShape::single(SegmentShape::binary(20));
///
/// // an ordering of 8 cities followed by a 4-bit flag block
/// let mixed = GenotypeShape::new(vec![
///     SegmentShape::permutation(8),
///     SegmentShape::binary(4),
/// ]);
/// assert_eq!(mixed.allele_count(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenotypeShape {
    segments: Vec<SegmentShape>,
}

impl GenotypeShape {
    pub fn new(segments: Vec<SegmentShape>) -> Self {
        Self { segments }
    }

    pub fn single(segment: SegmentShape) -> Self {
        Self::new(vec![segment])
    }

    /// `count` segments of the same shape, e.g. one small binary block per
    /// decision variable.
    pub fn repeated(segment: SegmentShape, count: usize) -> Self {
        Self::new(vec![segment; count])
    }

    pub fn segments(&self) -> &[SegmentShape] {
        &self.segments
    }

    /// Total number of alleles over all segments.
    pub fn allele_count(&self) -> usize {
        self.segments.iter().map(|s| s.len).sum()
    }

    /// Checks that the shape is non-empty and every segment is well formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segments.is_empty() {
            return Err(ConfigError::EmptyShape);
        }
        for (i, s) in self.segments.iter().enumerate() {
            s.validate(i)?;
        }
        Ok(())
    }

    /// Creates a random genotype of this shape.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Genotype {
        Genotype {
            segments: self.segments.iter().map(|s| s.random(rng)).collect(),
        }
    }
}

impl fmt::Display for GenotypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, s) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{s}")?;
        }
        f.write_str("]")
    }
}

/// An encoded candidate solution: an ordered list of segments.
///
/// Equality and hashing are structural (alleles only), never fitness based.
/// `Clone` is a deep copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Genotype {
    segments: Vec<Segment>,
}

impl Genotype {
    /// Builds a genotype from explicit segments.
    pub fn new(segments: Vec<Segment>) -> Result<Self, ConfigError> {
        if segments.is_empty() {
            return Err(ConfigError::EmptyShape);
        }
        Ok(Self { segments })
    }

    /// Convenience for single-segment genotypes.
    pub fn single(segment: Segment) -> Self {
        Self {
            segments: vec![segment],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    pub fn shape(&self) -> GenotypeShape {
        GenotypeShape::new(self.segments.iter().map(Segment::shape).collect())
    }

    /// Whether this genotype has exactly the given layout.
    pub fn conforms_to(&self, shape: &GenotypeShape) -> bool {
        self.segments.len() == shape.segments.len()
            && self
                .segments
                .iter()
                .zip(&shape.segments)
                .all(|(seg, s)| seg.shape() == *s)
    }

    pub fn allele_count(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    /// Maps the raw alleles to a domain phenotype.
    pub fn decode<D: Decoder + ?Sized>(&self, decoder: &D) -> D::Phenotype {
        decoder.decode(self)
    }

    /// Recombines two genotypes segment by segment.
    ///
    /// # Errors
    /// [`GaError::ShapeMismatch`] when the segment counts or any pair of
    /// segment shapes differ.
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        other: &Genotype,
        scheme: &CrossoverScheme,
        rng: &mut R,
    ) -> Result<(Genotype, Genotype), GaError> {
        if self.segments.len() != other.segments.len() {
            return Err(GaError::shape_mismatch(self.shape(), other.shape()));
        }
        let mut c1 = Vec::with_capacity(self.segments.len());
        let mut c2 = Vec::with_capacity(self.segments.len());
        for (a, b) in self.segments.iter().zip(&other.segments) {
            let (x, y) = a.crossover_with(b, scheme, rng)?;
            c1.push(x);
            c2.push(y);
        }
        Ok((Genotype { segments: c1 }, Genotype { segments: c2 }))
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, s) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{s}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::{BinarySegment, PermutationSegment};
    use crate::random::create_rng;

    fn mixed_shape() -> GenotypeShape {
        GenotypeShape::new(vec![
            SegmentShape::permutation(6),
            SegmentShape::binary(4),
            SegmentShape::integer(3, 0, 9),
        ])
    }

    #[test]
    fn test_random_conforms() {
        let mut rng = create_rng(42);
        let shape = mixed_shape();
        let g = shape.random(&mut rng);
        assert!(g.conforms_to(&shape));
        assert_eq!(g.shape(), shape);
        assert_eq!(g.allele_count(), 13);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Genotype::single(Segment::Binary(BinarySegment::zeros(3)));
        let mut copy = original.clone();
        if let Segment::Binary(b) = &mut copy.segments_mut()[0] {
            b.flip(0);
        }
        assert_ne!(original, copy);
        assert_eq!(original, Genotype::single(Segment::Binary(BinarySegment::zeros(3))));
    }

    #[test]
    fn test_crossover_segment_count_mismatch() {
        let mut rng = create_rng(1);
        let a = mixed_shape().random(&mut rng);
        let b = GenotypeShape::single(SegmentShape::permutation(6)).random(&mut rng);
        assert!(matches!(
            a.crossover(&b, &CrossoverScheme::default(), &mut rng),
            Err(GaError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_crossover_preserves_shape() {
        let mut rng = create_rng(5);
        let shape = mixed_shape();
        let a = shape.random(&mut rng);
        let b = shape.random(&mut rng);
        let (c1, c2) = a
            .crossover(&b, &CrossoverScheme::default(), &mut rng)
            .expect("same shape");
        assert!(c1.conforms_to(&shape));
        assert!(c2.conforms_to(&shape));
    }

    #[test]
    fn test_validate_shape() {
        assert_eq!(GenotypeShape::new(vec![]).validate(), Err(ConfigError::EmptyShape));
        assert!(mixed_shape().validate().is_ok());
        assert!(Genotype::new(vec![]).is_err());
    }

    #[test]
    fn test_display() {
        let g = Genotype::new(vec![
            Segment::Permutation(PermutationSegment::identity(3)),
            Segment::Binary(BinarySegment::new(vec![true, false])),
        ])
        .expect("non-empty");
        assert_eq!(g.to_string(), "[[0, 1, 2], 0b01]");
        assert_eq!(
            g.shape().to_string(),
            "[permutation[3], binary[2]]"
        );
    }
}
