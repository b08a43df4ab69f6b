//! Recombination of the mating pool into offspring.

use super::{GeneticOperator, OperatorContext, Stage};
use crate::error::GaError;
use crate::genotype::CrossoverScheme;
use crate::individual::Individual;
use crate::population::Population;
use rand::seq::SliceRandom;
use rand::Rng;

/// How mating-pool entries are grouped into parent pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pairing {
    /// Pool entries `(0, 1)`, `(2, 3)`, ...
    #[default]
    Consecutive,
    /// The pool is shuffled before consecutive pairing.
    Random,
}

/// Crossover with probability `rate` per parent pair.
///
/// Consumes the mating pool and pushes one offspring per pool entry: two
/// recombined children when `u < rate`, copies of the parents otherwise. An
/// odd last entry is copied through. Copies keep their parents' fitness, so
/// they are not re-evaluated unless mutated.
#[derive(Debug, Clone)]
pub struct Crossover {
    rate: f64,
    pairing: Pairing,
    scheme: CrossoverScheme,
}

impl Crossover {
    /// `rate` is clamped to `[0, 1]`.
    pub fn new(rate: f64) -> Self {
        Self {
            rate: rate.clamp(0.0, 1.0),
            pairing: Pairing::default(),
            scheme: CrossoverScheme::default(),
        }
    }

    pub fn with_pairing(mut self, pairing: Pairing) -> Self {
        self.pairing = pairing;
        self
    }

    pub fn with_scheme(mut self, scheme: CrossoverScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl GeneticOperator for Crossover {
    fn name(&self) -> &str {
        "crossover"
    }

    fn stage(&self) -> Stage {
        Stage::Recombination
    }

    fn apply(
        &mut self,
        population: &mut Population,
        ctx: &mut OperatorContext<'_>,
    ) -> Result<(), GaError> {
        let mut pool = population.take_mating_pool();
        if pool.is_empty() {
            return Err(GaError::EmptyMatingPool {
                operator: self.name().to_string(),
            });
        }
        let rng = ctx.rng();
        if self.pairing == Pairing::Random {
            pool.shuffle(rng);
        }

        let mut offspring = Vec::with_capacity(pool.len());
        for pair in pool.chunks(2) {
            let a = &population.individuals()[pair[0]];
            let Some(&second) = pair.get(1) else {
                offspring.push(a.clone());
                continue;
            };
            let b = &population.individuals()[second];
            if rng.random_range(0.0..1.0) < self.rate {
                let (c1, c2) = a.genotype().crossover(b.genotype(), &self.scheme, rng)?;
                offspring.push(Individual::new(c1));
                offspring.push(Individual::new(c2));
            } else {
                offspring.push(a.clone());
                offspring.push(b.clone());
            }
        }

        for child in offspring {
            population.push_offspring(child);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::{
        is_permutation, BinarySegment, Genotype, PermutationCrossover, Segment, VectorCrossover,
    };
    use crate::individual::Objective;
    use crate::operators::testing::{permutation_population, population};
    use crate::operators::Warning;
    use crate::random::create_rng;

    fn apply(op: &mut Crossover, pop: &mut Population, seed: u64) -> Result<(), GaError> {
        let mut rng = create_rng(seed);
        let mut warnings: Vec<Warning> = Vec::new();
        let mut ctx = OperatorContext::new(1, &mut rng, &mut warnings);
        op.apply(pop, &mut ctx)
    }

    #[test]
    fn test_requires_mating_pool() {
        let mut pop = population(&[1.0, 2.0], Objective::Maximize);
        let err = apply(&mut Crossover::new(0.8), &mut pop, 1).unwrap_err();
        assert!(matches!(err, GaError::EmptyMatingPool { .. }));
    }

    #[test]
    fn test_rate_zero_copies_parents() {
        let mut pop = population(&[1.0, 2.0, 3.0], Objective::Maximize);
        pop.set_mating_pool(vec![2, 0, 1]).expect("valid pool");
        apply(&mut Crossover::new(0.0), &mut pop, 1).expect("crossover");

        let offspring = pop.offspring();
        assert_eq!(offspring.len(), 3);
        assert_eq!(offspring[0], pop.individuals()[2]);
        assert_eq!(offspring[1], pop.individuals()[0]);
        // odd tail copied through
        assert_eq!(offspring[2], pop.individuals()[1]);
        assert!(offspring.iter().all(Individual::is_valid));
        assert!(pop.mating_pool().is_empty());
    }

    #[test]
    fn test_rate_one_recombines() {
        let zeros = Genotype::single(Segment::Binary(BinarySegment::zeros(16)));
        let ones = Genotype::single(Segment::Binary(BinarySegment::new(vec![true; 16])));
        let mut pop = Population::new(
            vec![
                Individual::with_fitness(zeros, 0.0),
                Individual::with_fitness(ones, 16.0),
            ],
            Objective::Maximize,
        );
        pop.set_mating_pool(vec![0, 1]).expect("valid pool");
        let mut op = Crossover::new(1.0).with_scheme(CrossoverScheme {
            vector: VectorCrossover::SinglePoint,
            ..CrossoverScheme::default()
        });
        apply(&mut op, &mut pop, 3).expect("crossover");

        let offspring = pop.offspring();
        assert_eq!(offspring.len(), 2);
        assert!(offspring.iter().all(|c| !c.is_valid()));
        // complementary children: every position holds exactly one 1
        let ones_total: usize = offspring
            .iter()
            .map(|c| match &c.genotype().segments()[0] {
                Segment::Binary(b) => b.count_ones(),
                _ => 0,
            })
            .sum();
        assert_eq!(ones_total, 16);
    }

    #[test]
    fn test_permutation_offspring_are_valid() {
        let mut pop = permutation_population(10, 9);
        pop.set_mating_pool((0..10).collect()).expect("valid pool");
        let mut op = Crossover::new(1.0)
            .with_pairing(Pairing::Random)
            .with_scheme(CrossoverScheme {
                permutation: PermutationCrossover::PartiallyMapped,
                ..CrossoverScheme::default()
            });
        apply(&mut op, &mut pop, 9).expect("crossover");
        assert_eq!(pop.offspring().len(), 10);
        for child in pop.offspring() {
            match &child.genotype().segments()[0] {
                Segment::Permutation(p) => assert!(is_permutation(p.order())),
                other => panic!("unexpected segment {other}"),
            }
        }
    }

    #[test]
    fn test_shape_mismatch_surfaces() {
        let a = Genotype::single(Segment::Binary(BinarySegment::zeros(4)));
        let b = Genotype::single(Segment::Binary(BinarySegment::zeros(5)));
        let mut pop = Population::new(
            vec![Individual::with_fitness(a, 1.0), Individual::with_fitness(b, 1.0)],
            Objective::Maximize,
        );
        pop.set_mating_pool(vec![0, 1]).expect("valid pool");
        let err = apply(&mut Crossover::new(1.0), &mut pop, 1).unwrap_err();
        assert!(matches!(err, GaError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_rate_is_clamped() {
        assert_eq!(Crossover::new(1.5).rate(), 1.0);
        assert_eq!(Crossover::new(-0.1).rate(), 0.0);
    }
}
