//! Replacement: folding offspring back and culling the worst.

use super::{GeneticOperator, OperatorContext, Stage, Warning};
use crate::error::GaError;
use crate::population::Population;
use log::warn;

/// How offspring enter the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Replacement {
    /// Offspring join the members; culling then removes the worst of the
    /// union. Elitist: the best individual always survives.
    #[default]
    Append,
    /// Offspring replace the members outright.
    Generational,
}

/// How many individuals [`SelectLethals`] removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LethalCount {
    /// Whatever exceeds the population's maximum size.
    #[default]
    ToCapacity,
    /// Exactly `k` (or everyone, if fewer remain).
    Fixed(usize),
}

/// Removes the worst individuals after offspring insertion.
///
/// Ranking is stable, so among equal fitness the later position dies first.
/// Never removes more than requested. If the population ends outside its
/// bounds a [`Warning::PopulationBounds`] is recorded and the run continues.
#[derive(Debug, Clone, Default)]
pub struct SelectLethals {
    replacement: Replacement,
    count: LethalCount,
}

impl SelectLethals {
    pub fn new(replacement: Replacement) -> Self {
        Self {
            replacement,
            count: LethalCount::default(),
        }
    }

    pub fn with_count(mut self, count: LethalCount) -> Self {
        self.count = count;
        self
    }

    pub fn replacement(&self) -> Replacement {
        self.replacement
    }
}

impl GeneticOperator for SelectLethals {
    fn name(&self) -> &str {
        "select_lethals"
    }

    fn stage(&self) -> Stage {
        Stage::Replacement
    }

    fn apply(
        &mut self,
        population: &mut Population,
        ctx: &mut OperatorContext<'_>,
    ) -> Result<(), GaError> {
        match self.replacement {
            Replacement::Append => population.absorb_offspring(),
            Replacement::Generational => population.replace_with_offspring(),
        }

        let excess = match self.count {
            LethalCount::ToCapacity => population.len().saturating_sub(population.max_size()),
            LethalCount::Fixed(k) => k,
        };
        population.remove_worst(excess);

        let (size, min, max) = (population.len(), population.min_size(), population.max_size());
        if size < min || size > max {
            let generation = ctx.generation();
            warn!("generation {generation}: population size {size} outside {min}..={max}");
            ctx.warn(Warning::PopulationBounds {
                generation,
                size,
                min,
                max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::{Individual, Objective};
    use crate::operators::testing::population;
    use crate::random::create_rng;

    fn apply(op: &mut SelectLethals, pop: &mut Population) -> Vec<Warning> {
        let mut rng = create_rng(0);
        let mut warnings = Vec::new();
        let mut ctx = OperatorContext::new(4, &mut rng, &mut warnings);
        op.apply(pop, &mut ctx).expect("replacement");
        warnings
    }

    fn fitnesses(pop: &Population) -> Vec<f64> {
        pop.individuals().iter().filter_map(Individual::fitness).collect()
    }

    #[test]
    fn test_append_keeps_best_of_union() {
        let mut pop = population(&[5.0, 1.0, 3.0], Objective::Maximize);
        let extra = population(&[4.0, 0.5, 9.0], Objective::Maximize);
        for ind in extra.individuals() {
            pop.push_offspring(ind.clone());
        }
        let warnings = apply(&mut SelectLethals::new(Replacement::Append), &mut pop);
        assert!(warnings.is_empty());
        assert_eq!(fitnesses(&pop), vec![5.0, 4.0, 9.0]);
        assert!(pop.offspring().is_empty());
    }

    #[test]
    fn test_generational_replaces_members() {
        let mut pop = population(&[5.0, 1.0], Objective::Maximize);
        for ind in population(&[2.0, 7.0, 6.0], Objective::Maximize).individuals() {
            pop.push_offspring(ind.clone());
        }
        apply(&mut SelectLethals::new(Replacement::Generational), &mut pop);
        assert_eq!(fitnesses(&pop), vec![7.0, 6.0]);
    }

    #[test]
    fn test_fixed_count_below_minimum_warns() {
        let mut pop = population(&[1.0, 2.0, 3.0, 4.0], Objective::Minimize).with_bounds(3, 4);
        let mut op = SelectLethals::default().with_count(LethalCount::Fixed(2));
        let warnings = apply(&mut op, &mut pop);

        assert_eq!(fitnesses(&pop), vec![1.0, 2.0]);
        assert_eq!(
            warnings,
            vec![Warning::PopulationBounds {
                generation: 4,
                size: 2,
                min: 3,
                max: 4
            }]
        );
    }

    #[test]
    fn test_never_removes_more_than_requested() {
        let mut pop = population(&[1.0, 2.0], Objective::Maximize).with_bounds(1, 5);
        pop.push_offspring(pop.individuals()[0].clone());
        let warnings = apply(&mut SelectLethals::default(), &mut pop);
        assert_eq!(pop.len(), 3);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_ties_remove_later_position() {
        let pop = population(&[2.0, 2.0, 2.0], Objective::Maximize);
        let keep = pop.individuals()[..2].to_vec();
        let mut pop = pop.with_bounds(2, 2);
        apply(&mut SelectLethals::new(Replacement::Append), &mut pop);
        assert_eq!(pop.individuals(), keep.as_slice());
    }
}
