//! Genotype to phenotype decoding.
//!
//! A [`Decoder`] is the encoding half of a problem definition: it turns raw
//! alleles into whatever the fitness function wants to look at. Decoders are
//! strategy objects supplied by the problem domain; the engine itself never
//! inspects phenotypes.

use super::segment::Segment;
use super::types::Genotype;

/// Maps a [`Genotype`] to a domain phenotype.
///
/// Must be a pure function of the alleles.
pub trait Decoder: Send + Sync {
    type Phenotype;

    fn decode(&self, genotype: &Genotype) -> Self::Phenotype;
}

/// Adapts a closure into a [`Decoder`].
///
/// ```
/// use u_evolve::genotype::{decode, Decoder, GenotypeShape, Segment, SegmentShape};
/// use u_evolve::random::create_rng;
///
/// let ones = decode::from_fn(|g| match &g.segments()[0] {
///     Segment::Binary(b) => b.count_ones(),
///     _ => 0,
/// });
/// let mut rng = create_rng(1);
/// let g = GenotypeShape::single(SegmentShape::binary(8)).random(&mut rng);
/// assert!(ones.decode(&g) <= 8);
/// ```
pub fn from_fn<P, F>(f: F) -> FnDecoder<F>
where
    F: Fn(&Genotype) -> P + Send + Sync,
{
    FnDecoder(f)
}

/// See [`from_fn`].
#[derive(Clone)]
pub struct FnDecoder<F>(F);

impl<P, F> Decoder for FnDecoder<F>
where
    F: Fn(&Genotype) -> P + Send + Sync,
{
    type Phenotype = P;

    fn decode(&self, genotype: &Genotype) -> P {
        (self.0)(genotype)
    }
}

/// Flattens every allele into one integer vector: bits as 0/1, integers as is,
/// permutation elements as their index values.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlleleDecoder;

impl Decoder for AlleleDecoder {
    type Phenotype = Vec<i64>;

    fn decode(&self, genotype: &Genotype) -> Vec<i64> {
        let mut out = Vec::with_capacity(genotype.allele_count());
        for seg in genotype.segments() {
            match seg {
                Segment::Binary(b) => out.extend(b.bits().iter().map(|&x| i64::from(x))),
                Segment::Integer(s) => out.extend_from_slice(s.values()),
                Segment::Permutation(p) => out.extend(p.order().iter().map(|&x| x as i64)),
            }
        }
        out
    }
}

/// Reads the first permutation segment as an ordering.
///
/// Yields an empty vector if the genotype has no permutation segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermutationDecoder;

impl Decoder for PermutationDecoder {
    type Phenotype = Vec<usize>;

    fn decode(&self, genotype: &Genotype) -> Vec<usize> {
        genotype
            .segments()
            .iter()
            .find_map(|seg| match seg {
                Segment::Permutation(p) => Some(p.order().to_vec()),
                _ => None,
            })
            .unwrap_or_default()
    }
}

/// Reads each binary segment as one unsigned integer, as in "one gene per
/// `n`-bit block" encodings. Integer segments contribute their values
/// (negative values clamp to zero).
#[derive(Debug, Clone, Copy, Default)]
pub struct UintDecoder;

impl Decoder for UintDecoder {
    type Phenotype = Vec<u64>;

    fn decode(&self, genotype: &Genotype) -> Vec<u64> {
        let mut out = Vec::new();
        for seg in genotype.segments() {
            match seg {
                Segment::Binary(b) => out.push(b.to_uint()),
                Segment::Integer(s) => out.extend(s.values().iter().map(|&v| v.max(0) as u64)),
                Segment::Permutation(_) => {}
            }
        }
        out
    }
}
