//! Aggregate population statistics.

use crate::individual::{Individual, Objective};
use std::collections::HashSet;

/// Summary of one population at one point in time.
///
/// `mean` and `std_dev` only cover finite fitness values, so a timed-out
/// individual (infinite sentinel) does not poison them. `best`/`worst` cover
/// every defined value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationStats {
    pub size: usize,
    /// Individuals with a current fitness.
    pub evaluated: usize,
    pub best: Option<f64>,
    pub worst: Option<f64>,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    /// Fraction of structurally distinct genotypes, in `(0, 1]` for a
    /// non-empty population.
    pub diversity: f64,
    /// Individuals carrying the timeout sentinel.
    pub timed_out: usize,
}

impl PopulationStats {
    pub fn compute(individuals: &[Individual], objective: Objective) -> Self {
        let size = individuals.len();
        let defined: Vec<f64> = individuals
            .iter()
            .filter_map(Individual::fitness)
            .filter(|f| !f.is_nan())
            .collect();

        let mut best: Option<f64> = None;
        let mut worst: Option<f64> = None;
        for &f in &defined {
            if best.map_or(true, |b| objective.is_better(f, b)) {
                best = Some(f);
            }
            if worst.map_or(true, |w| objective.is_better(w, f)) {
                worst = Some(f);
            }
        }

        let finite: Vec<f64> = defined.iter().copied().filter(|f| f.is_finite()).collect();
        let (mean, std_dev) = if finite.is_empty() {
            (None, None)
        } else {
            let n = finite.len() as f64;
            let mean = finite.iter().sum::<f64>() / n;
            let var = finite.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / n;
            (Some(mean), Some(var.sqrt()))
        };

        let diversity = if size == 0 {
            0.0
        } else {
            let distinct: HashSet<_> = individuals.iter().map(Individual::genotype).collect();
            distinct.len() as f64 / size as f64
        };

        Self {
            size,
            evaluated: individuals.iter().filter(|i| i.is_valid()).count(),
            best,
            worst,
            mean,
            std_dev,
            diversity,
            timed_out: individuals.iter().filter(|i| i.timed_out()).count(),
        }
    }
}
