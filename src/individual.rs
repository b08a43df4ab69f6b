//! Individuals and fitness ordering.

use crate::genotype::Genotype;
use std::cmp::Ordering;

/// Optimization direction.
///
/// Every fitness comparison in the engine goes through this type, so
/// operators never hard-code "higher is better".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Objective {
    #[default]
    Maximize,
    Minimize,
}

impl Objective {
    /// The worst possible fitness, assigned to individuals whose evaluation
    /// timed out.
    pub fn worst(self) -> f64 {
        match self {
            Objective::Maximize => f64::NEG_INFINITY,
            Objective::Minimize => f64::INFINITY,
        }
    }

    /// Whether `a` is strictly better than `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Objective::Maximize => a > b,
            Objective::Minimize => a < b,
        }
    }

    /// Whether `fitness` meets or beats `target`.
    pub fn reached(self, fitness: f64, target: f64) -> bool {
        match self {
            Objective::Maximize => fitness >= target,
            Objective::Minimize => fitness <= target,
        }
    }

    /// Orders two (possibly undefined) fitness values best first.
    ///
    /// Undefined and NaN values rank after every defined value.
    pub fn compare(self, a: Option<f64>, b: Option<f64>) -> Ordering {
        let a = a.filter(|v| !v.is_nan());
        let b = b.filter(|v| !v.is_nan());
        match (a, b) {
            (Some(x), Some(y)) => {
                let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                match self {
                    Objective::Maximize => ord.reverse(),
                    Objective::Minimize => ord,
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// A candidate solution: a genotype plus its cached evaluation.
///
/// The fitness is `None` until the individual is evaluated and again after
/// anything touches its genotype through [`mutate_with`](Self::mutate_with)
/// or [`genotype_mut`](Self::genotype_mut).
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    genotype: Genotype,
    fitness: Option<f64>,
    timed_out: bool,
}

impl Individual {
    /// A fresh, unevaluated individual.
    pub fn new(genotype: Genotype) -> Self {
        Self {
            genotype,
            fitness: None,
            timed_out: false,
        }
    }

    /// An individual with a known fitness.
    pub fn with_fitness(genotype: Genotype, fitness: f64) -> Self {
        Self {
            genotype,
            fitness: Some(fitness),
            timed_out: false,
        }
    }

    pub fn genotype(&self) -> &Genotype {
        &self.genotype
    }

    /// Mutable genotype access. Invalidates the cached fitness.
    pub fn genotype_mut(&mut self) -> &mut Genotype {
        self.invalidate_fitness();
        &mut self.genotype
    }

    /// Runs `edit` on the genotype and invalidates the fitness only if it
    /// reports a change.
    pub fn mutate_with<E, F>(&mut self, edit: F) -> Result<bool, E>
    where
        F: FnOnce(&mut Genotype) -> Result<bool, E>,
    {
        let changed = edit(&mut self.genotype)?;
        if changed {
            self.invalidate_fitness();
        }
        Ok(changed)
    }

    pub fn into_genotype(self) -> Genotype {
        self.genotype
    }

    /// `None` while undefined or stale.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Whether the cached fitness is current.
    pub fn is_valid(&self) -> bool {
        self.fitness.is_some()
    }

    /// Whether the last evaluation timed out.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
        self.timed_out = false;
    }

    pub(crate) fn mark_timed_out(&mut self, worst: f64) {
        self.fitness = Some(worst);
        self.timed_out = true;
    }

    pub fn invalidate_fitness(&mut self) {
        self.fitness = None;
        self.timed_out = false;
    }
}
