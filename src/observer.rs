//! Read-only generation hooks.
//!
//! Observers run after every other operator of a generation and see the
//! population through a [`PopulationSnapshot`]. They cannot modify it and
//! never influence termination.

use crate::genotype::{Decoder, Genotype};
use crate::individual::{Individual, Objective};
use crate::population::{Population, PopulationStats};
use log::info;
use std::sync::{Arc, Mutex, PoisonError};

/// Immutable view of the population handed to observers.
#[derive(Debug, Clone, Copy)]
pub struct PopulationSnapshot<'a> {
    population: &'a Population,
    generation: usize,
    evaluations: usize,
}

impl<'a> PopulationSnapshot<'a> {
    pub(crate) fn new(population: &'a Population, generation: usize, evaluations: usize) -> Self {
        Self {
            population,
            generation,
            evaluations,
        }
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Evaluations performed since the run started.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn objective(&self) -> Objective {
        self.population.objective()
    }

    pub fn individuals(&self) -> &'a [Individual] {
        self.population.individuals()
    }

    pub fn fitnesses(&self) -> Vec<Option<f64>> {
        self.individuals().iter().map(Individual::fitness).collect()
    }

    /// Decoded phenotype of every member, in population order.
    pub fn decode<D: Decoder + ?Sized>(&self, decoder: &D) -> Vec<D::Phenotype> {
        self.individuals()
            .iter()
            .map(|ind| ind.genotype().decode(decoder))
            .collect()
    }

    pub fn best(&self) -> Option<&'a Individual> {
        self.population.best()
    }

    pub fn stats(&self) -> PopulationStats {
        self.population.stats()
    }
}

/// Hook invoked once per generation.
pub trait Observer: Send {
    fn on_generation(&mut self, generation: usize, snapshot: &PopulationSnapshot<'_>);

    /// Called once with the final population.
    fn finalize(&mut self, _snapshot: &PopulationSnapshot<'_>) {}
}

/// Adapts a closure into an [`Observer`].
pub fn from_fn<F>(f: F) -> FnObserver<F>
where
    F: FnMut(usize, &PopulationSnapshot<'_>) + Send,
{
    FnObserver(f)
}

/// See [`from_fn`].
pub struct FnObserver<F>(F);

impl<F> Observer for FnObserver<F>
where
    F: FnMut(usize, &PopulationSnapshot<'_>) + Send,
{
    fn on_generation(&mut self, generation: usize, snapshot: &PopulationSnapshot<'_>) {
        (self.0)(generation, snapshot)
    }
}

/// Fires the wrapped observer every `interval` generations.
///
/// ```
/// use u_evolve::observer::{self, Periodic};
///
/// let every_ten = Periodic::new(10, observer::from_fn(|generation, snapshot| {
///     println!("{generation}: {:?}", snapshot.stats().best);
/// }));
/// # let _ = every_ten;
/// ```
pub struct Periodic<O> {
    interval: usize,
    inner: O,
}

impl<O: Observer> Periodic<O> {
    /// `interval = 0` is treated as 1.
    pub fn new(interval: usize, inner: O) -> Self {
        Self {
            interval: interval.max(1),
            inner,
        }
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: Observer> Observer for Periodic<O> {
    fn on_generation(&mut self, generation: usize, snapshot: &PopulationSnapshot<'_>) {
        if generation % self.interval == 0 {
            self.inner.on_generation(generation, snapshot);
        }
    }

    fn finalize(&mut self, snapshot: &PopulationSnapshot<'_>) {
        self.inner.finalize(snapshot);
    }
}

/// One improvement of the best individual.
#[derive(Debug, Clone, PartialEq)]
pub struct BestRecord {
    pub generation: usize,
    /// Evaluations performed when the improvement was seen.
    pub evaluations: usize,
    pub fitness: f64,
    pub genotype: Genotype,
}

/// Shared handle to the records written by a [`BestLogger`].
#[derive(Debug, Clone, Default)]
pub struct BestLog(Arc<Mutex<Vec<BestRecord>>>);

impl BestLog {
    pub fn records(&self) -> Vec<BestRecord> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn last(&self) -> Option<BestRecord> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    fn push(&self, record: BestRecord) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}

/// Records the best individual every time it improves.
///
/// ```
/// use u_evolve::observer::BestLogger;
///
/// let logger = BestLogger::new();
/// let log = logger.log();
/// // hand `logger` to a pipeline, read `log.records()` after the run
/// assert!(log.records().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct BestLogger {
    log: BestLog,
    best: Option<f64>,
}

impl BestLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> BestLog {
        self.log.clone()
    }
}

impl Observer for BestLogger {
    fn on_generation(&mut self, generation: usize, snapshot: &PopulationSnapshot<'_>) {
        let Some(best) = snapshot.best() else {
            return;
        };
        let Some(fitness) = best.fitness() else {
            return;
        };
        let improved = self
            .best
            .map_or(true, |b| snapshot.objective().is_better(fitness, b));
        if !improved {
            return;
        }
        self.best = Some(fitness);
        info!(
            "generation {generation}: new best {fitness} after {} evaluations",
            snapshot.evaluations()
        );
        self.log.push(BestRecord {
            generation,
            evaluations: snapshot.evaluations(),
            fitness,
            genotype: best.genotype().clone(),
        });
    }

    fn finalize(&mut self, _snapshot: &PopulationSnapshot<'_>) {
        for r in self.log.records() {
            info!("{:>6} evals  {:<12} {}", r.evaluations, r.fitness, r.genotype);
        }
    }
}
