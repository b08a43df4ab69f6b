//! Per-allele mutation.

use super::{GeneticOperator, OperatorContext, Stage};
use crate::error::GaError;
use crate::genotype::PermutationMutation;
use crate::individual::Individual;
use crate::population::Population;
use rand::Rng;

/// Mutates every allele independently with probability `rate`.
///
/// Targets the offspring produced this generation. When there are none (a
/// pipeline without crossover) the members themselves are mutated in place.
/// An individual's fitness is invalidated only if at least one allele
/// actually changed.
#[derive(Debug, Clone)]
pub struct Mutate {
    rate: f64,
    permutation: PermutationMutation,
}

impl Mutate {
    /// `rate` is clamped to `[0, 1]`.
    pub fn new(rate: f64) -> Self {
        Self {
            rate: rate.clamp(0.0, 1.0),
            permutation: PermutationMutation::default(),
        }
    }

    /// Rearrangement applied to permutation segments.
    pub fn with_permutation_style(mut self, style: PermutationMutation) -> Self {
        self.permutation = style;
        self
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    fn mutate_one<R: Rng + ?Sized>(
        &self,
        individual: &mut Individual,
        rng: &mut R,
    ) -> Result<bool, GaError> {
        let (rate, style) = (self.rate, self.permutation);
        individual.mutate_with(|genotype| {
            let mut changed = false;
            for segment in genotype.segments_mut() {
                for index in 0..segment.len() {
                    if rng.random_range(0.0..1.0) < rate {
                        changed |= segment.mutate_allele(index, style, rng)?;
                    }
                }
            }
            Ok(changed)
        })
    }
}

impl GeneticOperator for Mutate {
    fn name(&self) -> &str {
        "mutate"
    }

    fn stage(&self) -> Stage {
        Stage::Mutation
    }

    fn apply(
        &mut self,
        population: &mut Population,
        ctx: &mut OperatorContext<'_>,
    ) -> Result<(), GaError> {
        if self.rate == 0.0 {
            return Ok(());
        }
        let rng = ctx.rng();
        let targets = if population.offspring().is_empty() {
            population.members_mut()
        } else {
            population.offspring_mut()
        };
        for individual in targets {
            self.mutate_one(individual, rng)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::{BinarySegment, Genotype, GenotypeShape, Segment, SegmentShape};
    use crate::individual::Objective;
    use crate::operators::testing::permutation_population;
    use crate::operators::Warning;
    use crate::random::create_rng;

    fn apply(op: &mut Mutate, pop: &mut Population, seed: u64) {
        let mut rng = create_rng(seed);
        let mut warnings: Vec<Warning> = Vec::new();
        let mut ctx = OperatorContext::new(1, &mut rng, &mut warnings);
        op.apply(pop, &mut ctx).expect("mutation");
    }

    fn random_population(n: usize, seed: u64) -> Population {
        let shape = GenotypeShape::new(vec![
            SegmentShape::binary(12),
            SegmentShape::integer(4, 0, 9),
            SegmentShape::permutation(6),
        ]);
        let mut rng = create_rng(seed);
        let members = (0..n)
            .map(|i| Individual::with_fitness(shape.random(&mut rng), i as f64))
            .collect();
        Population::new(members, Objective::Maximize)
    }

    #[test]
    fn test_rate_zero_never_changes() {
        let mut pop = random_population(20, 1);
        let before = pop.clone();
        apply(&mut Mutate::new(0.0), &mut pop, 2);
        assert_eq!(pop.individuals(), before.individuals());
    }

    #[test]
    fn test_rate_one_flips_every_bit() {
        let g = Genotype::single(Segment::Binary(BinarySegment::new(vec![
            true, false, false, true, true,
        ])));
        let mut pop = Population::new(vec![Individual::with_fitness(g, 3.0)], Objective::Maximize);
        apply(&mut Mutate::new(1.0), &mut pop, 7);

        let ind = &pop.individuals()[0];
        assert!(!ind.is_valid());
        match &ind.genotype().segments()[0] {
            Segment::Binary(b) => assert_eq!(b.bits(), &[false, true, true, false, false]),
            other => panic!("unexpected segment {other}"),
        }
    }

    #[test]
    fn test_targets_offspring_when_present() {
        let mut pop = random_population(4, 3);
        let members_before: Vec<Individual> = pop.individuals().to_vec();
        let child = pop.individuals()[0].clone();
        pop.push_offspring(child);

        apply(&mut Mutate::new(1.0), &mut pop, 4);
        assert_eq!(pop.individuals(), members_before.as_slice());
        assert!(!pop.offspring()[0].is_valid());
    }

    #[test]
    fn test_keeps_shape_and_validity() {
        let mut pop = random_population(30, 5);
        let shape = pop.individuals()[0].genotype().shape();
        apply(&mut Mutate::new(0.3), &mut pop, 6);
        for ind in pop.individuals() {
            assert!(ind.genotype().conforms_to(&shape));
        }

        let mut perms = permutation_population(10, 8);
        let mut op = Mutate::new(0.5).with_permutation_style(PermutationMutation::Insertion);
        apply(&mut op, &mut perms, 8);
        for ind in perms.individuals() {
            match &ind.genotype().segments()[0] {
                Segment::Permutation(p) => assert!(crate::genotype::is_permutation(p.order())),
                other => panic!("unexpected segment {other}"),
            }
        }
    }

    #[test]
    fn test_rate_is_clamped() {
        assert_eq!(Mutate::new(2.0).rate(), 1.0);
        assert_eq!(Mutate::new(-1.0).rate(), 0.0);
    }
}
