//! Genetic operators and the pipeline that orders them.
//!
//! Each generation the scheduler hands the [`Population`] to every operator in
//! pipeline order. Operators talk to each other only through the population's
//! mating pool and offspring buffers:
//!
//! ```text
//! selection ──mating pool──▶ crossover ──offspring──▶ mutate ──▶ replacement
//! ```
//!
//! Evaluation is not an operator in this list. The scheduler evaluates every
//! individual with a stale fitness before each [`Stage::Selection`] and
//! [`Stage::Replacement`] operator and once more after the last operator.

mod crossover;
mod lethals;
mod mutation;
mod pipeline;
mod selection;

pub use crossover::{Crossover, Pairing};
pub use lethals::{LethalCount, Replacement, SelectLethals};
pub use mutation::Mutate;
pub use pipeline::Pipeline;
pub use selection::{FitnessScaling, KTournament, SelectionMethod, SusSelection};

use crate::error::GaError;
use crate::population::Population;
use crate::random::GaRng;
use std::fmt;

/// Position of an operator within a generation.
///
/// A pipeline's stages must never decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Fills the mating pool from evaluated members.
    Selection,
    /// Turns the mating pool into offspring.
    Recombination,
    /// Edits offspring (or members, when there are none) in place.
    Mutation,
    /// Folds offspring back and restores population bounds.
    Replacement,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Selection => "selection",
            Stage::Recombination => "recombination",
            Stage::Mutation => "mutation",
            Stage::Replacement => "replacement",
        };
        f.write_str(name)
    }
}

/// Non-fatal condition recorded during a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Warning {
    /// The population ended a replacement step outside `min..=max`.
    PopulationBounds {
        generation: usize,
        size: usize,
        min: usize,
        max: usize,
    },
    /// Evaluations that ran past the timeout and received the worst fitness.
    EvaluationTimeouts { generation: usize, count: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::PopulationBounds {
                generation,
                size,
                min,
                max,
            } => write!(
                f,
                "generation {generation}: population size {size} outside {min}..={max}"
            ),
            Warning::EvaluationTimeouts { generation, count } => {
                write!(f, "generation {generation}: {count} evaluation(s) timed out")
            }
        }
    }
}

/// Mutable run state lent to an operator for one invocation.
pub struct OperatorContext<'a> {
    generation: usize,
    rng: &'a mut GaRng,
    warnings: &'a mut Vec<Warning>,
}

impl<'a> OperatorContext<'a> {
    pub fn new(generation: usize, rng: &'a mut GaRng, warnings: &'a mut Vec<Warning>) -> Self {
        Self {
            generation,
            rng,
            warnings,
        }
    }

    /// The generation being built (1-based).
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The scheduler's generator.
    pub fn rng(&mut self) -> &mut GaRng {
        &mut *self.rng
    }

    pub fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}

/// A unit of work applied to the population once per generation.
///
/// Operators are configuration objects: they are built once, reused across
/// generations and only borrow the population while they run.
pub trait GeneticOperator: Send {
    fn name(&self) -> &str;

    fn stage(&self) -> Stage;

    /// Called once with the seeded population, before the first generation.
    fn initialize(&mut self, _population: &Population) -> Result<(), GaError> {
        Ok(())
    }

    fn apply(
        &mut self,
        population: &mut Population,
        ctx: &mut OperatorContext<'_>,
    ) -> Result<(), GaError>;

    /// Called once after the run reaches a terminal state.
    fn finalize(&mut self, _population: &Population) {}
}

impl fmt::Debug for dyn GeneticOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.stage())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::genotype::{BinarySegment, Genotype, PermutationSegment, Segment};
    use crate::individual::{Individual, Objective};
    use crate::population::Population;

    /// Individuals with distinct 8-bit genotypes and the given fitness values.
    pub fn population(fitnesses: &[f64], objective: Objective) -> Population {
        let members = fitnesses
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let bits = (0..8).map(|b| (i >> b) & 1 == 1).collect();
                Individual::with_fitness(Genotype::single(Segment::Binary(BinarySegment::new(bits))), f)
            })
            .collect();
        Population::new(members, objective)
    }

    pub fn permutation_population(n: usize, len: usize) -> Population {
        let members = (0..n)
            .map(|i| {
                let mut order: Vec<usize> = (0..len).collect();
                order.rotate_left(i % len);
                let seg = PermutationSegment::new(order).expect("rotation is a permutation");
                Individual::with_fitness(Genotype::single(Segment::Permutation(seg)), i as f64)
            })
            .collect();
        Population::new(members, Objective::Maximize)
    }
}
