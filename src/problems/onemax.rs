//! OneMax.

use crate::evaluation::{EvalContext, EvalError, Evaluator};
use crate::genotype::{Genotype, GenotypeShape, Segment, SegmentShape};

/// Fitness is the number of set bits across all binary segments.
///
/// Maximize; the optimum equals the bit count.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneMax;

impl OneMax {
    /// A single binary segment of `bits` alleles.
    pub fn shape(bits: usize) -> GenotypeShape {
        GenotypeShape::single(SegmentShape::binary(bits))
    }

    pub fn count(genotype: &Genotype) -> usize {
        genotype
            .segments()
            .iter()
            .map(|seg| match seg {
                Segment::Binary(b) => b.count_ones(),
                _ => 0,
            })
            .sum()
    }
}

impl Evaluator for OneMax {
    fn evaluate(&self, genotype: &Genotype, _ctx: &mut EvalContext) -> Result<f64, EvalError> {
        Ok(Self::count(genotype) as f64)
    }

    fn name(&self) -> &str {
        "onemax"
    }
}
