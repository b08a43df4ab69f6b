//! The population: the single piece of mutable state shared by the operator
//! pipeline.
//!
//! Besides its members a [`Population`] carries the two hand-off buffers
//! operators communicate through:
//!
//! - the **mating pool**, indices into the members written by selection and
//!   consumed by crossover;
//! - the **offspring**, new individuals written by crossover, edited by
//!   mutation and folded back into the members by replacement.

mod stats;

pub use stats::PopulationStats;

use crate::error::GaError;
use crate::individual::{Individual, Objective};

/// Ordered collection of individuals with size bounds and an objective.
#[derive(Debug, Clone)]
pub struct Population {
    members: Vec<Individual>,
    offspring: Vec<Individual>,
    mating_pool: Vec<usize>,
    objective: Objective,
    min_size: usize,
    max_size: usize,
}

impl Population {
    /// Wraps `members`. Bounds default to exactly the current size.
    pub fn new(members: Vec<Individual>, objective: Objective) -> Self {
        let n = members.len();
        Self {
            members,
            offspring: Vec::new(),
            mating_pool: Vec::new(),
            objective,
            min_size: n,
            max_size: n,
        }
    }

    /// Sets the size bounds enforced by replacement.
    pub fn with_bounds(mut self, min_size: usize, max_size: usize) -> Self {
        self.min_size = min_size;
        self.max_size = max_size.max(min_size);
        self
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.members
    }

    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.members.get(index)
    }

    pub fn members_mut(&mut self) -> &mut [Individual] {
        &mut self.members
    }

    pub fn push(&mut self, individual: Individual) {
        self.members.push(individual);
    }

    /// Index of the best member; ties go to the earliest position.
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, ind) in self.members.iter().enumerate() {
            let better = match best {
                None => true,
                Some(b) => self
                    .objective
                    .compare(ind.fitness(), self.members[b].fitness())
                    .is_lt(),
            };
            if better {
                best = Some(i);
            }
        }
        best
    }

    pub fn best(&self) -> Option<&Individual> {
        self.best_index().map(|i| &self.members[i])
    }

    /// Member indices ordered best first. Equal fitness keeps population
    /// order, so the ranking is deterministic.
    pub fn ranked(&self) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.members.len()).collect();
        idx.sort_by(|&a, &b| {
            self.objective
                .compare(self.members[a].fitness(), self.members[b].fitness())
        });
        idx
    }

    /// Statistics over the current members.
    pub fn stats(&self) -> PopulationStats {
        PopulationStats::compute(&self.members, self.objective)
    }

    // ---- mating pool ----

    pub fn mating_pool(&self) -> &[usize] {
        &self.mating_pool
    }

    /// Replaces the mating pool.
    ///
    /// # Errors
    /// [`GaError::Operator`] if any index is out of range.
    pub fn set_mating_pool(&mut self, pool: Vec<usize>) -> Result<(), GaError> {
        if let Some(&bad) = pool.iter().find(|&&i| i >= self.members.len()) {
            return Err(GaError::Operator {
                operator: "set_mating_pool".into(),
                message: format!(
                    "index {bad} out of range for population of {}",
                    self.members.len()
                ),
            });
        }
        self.mating_pool = pool;
        Ok(())
    }

    pub fn take_mating_pool(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.mating_pool)
    }

    // ---- offspring ----

    pub fn offspring(&self) -> &[Individual] {
        &self.offspring
    }

    pub fn offspring_mut(&mut self) -> &mut [Individual] {
        &mut self.offspring
    }

    pub fn push_offspring(&mut self, individual: Individual) {
        self.offspring.push(individual);
    }

    pub fn take_offspring(&mut self) -> Vec<Individual> {
        std::mem::take(&mut self.offspring)
    }

    /// Moves all offspring behind the current members.
    pub fn absorb_offspring(&mut self) {
        let offspring = self.take_offspring();
        self.members.extend(offspring);
    }

    /// Replaces the members with the offspring. Keeps the members when there
    /// are no offspring.
    pub fn replace_with_offspring(&mut self) {
        if !self.offspring.is_empty() {
            self.members = self.take_offspring();
        }
    }

    /// Removes the `count` worst members, ties resolved against the later
    /// position. Returns the number removed.
    pub fn remove_worst(&mut self, count: usize) -> usize {
        let count = count.min(self.members.len());
        if count == 0 {
            return 0;
        }
        let ranked = self.ranked();
        let mut doomed = vec![false; self.members.len()];
        for &i in &ranked[ranked.len() - count..] {
            doomed[i] = true;
        }
        let mut pos = 0;
        self.members.retain(|_| {
            let keep = !doomed[pos];
            pos += 1;
            keep
        });
        self.mating_pool.clear();
        count
    }

    // ---- evaluation bookkeeping ----

    /// Members and offspring without a current fitness.
    pub fn pending(&self) -> usize {
        self.members
            .iter()
            .chain(&self.offspring)
            .filter(|i| !i.is_valid())
            .count()
    }

    /// Slots awaiting evaluation, in position order. A slot addresses the
    /// members first and then the offspring, see [`slot`](Self::slot).
    pub(crate) fn pending_slots(&self) -> Vec<usize> {
        self.members
            .iter()
            .chain(&self.offspring)
            .enumerate()
            .filter(|(_, i)| !i.is_valid())
            .map(|(slot, _)| slot)
            .collect()
    }

    pub(crate) fn slot(&self, slot: usize) -> Option<&Individual> {
        if slot < self.members.len() {
            self.members.get(slot)
        } else {
            self.offspring.get(slot - self.members.len())
        }
    }

    pub(crate) fn slot_mut(&mut self, slot: usize) -> Option<&mut Individual> {
        let n = self.members.len();
        if slot < n {
            self.members.get_mut(slot)
        } else {
            self.offspring.get_mut(slot - n)
        }
    }

    pub(crate) fn invalidate_all(&mut self) {
        for ind in self.members.iter_mut().chain(self.offspring.iter_mut()) {
            ind.invalidate_fitness();
        }
    }
}
