//! Parent selection.
//!
//! Selection fills the population's mating pool with `M` member indices.
//! Different strategies provide different selection pressure.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1987), "Reducing Bias and Inefficiency in the Selection
//!   Algorithm"

use super::{GeneticOperator, OperatorContext, Stage};
use crate::error::GaError;
use crate::individual::Objective;
use crate::population::Population;
use rand::seq::SliceRandom;
use rand::Rng;

/// Selection strategy, as named in [`GaConfig`](crate::scheduler::GaConfig).
///
/// # Examples
///
/// ```
/// use u_evolve::operators::SelectionMethod;
///
/// // Tournament with size 3 (moderate selection pressure)
/// let sel = SelectionMethod::Tournament(3);
///
/// // Stochastic universal sampling (fitness-proportionate)
/// let sel = SelectionMethod::Sus;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionMethod {
    /// Tournament of `k` contestants drawn with replacement.
    ///
    /// Higher `k` = stronger selection pressure.
    /// - k=2: light pressure (good for diversity)
    /// - k=3-5: moderate pressure (typical default)
    /// - k>5: strong pressure (risk of premature convergence)
    Tournament(usize),

    /// Tournament of `k` distinct contestants.
    TournamentDistinct(usize),

    /// Stochastic universal sampling.
    ///
    /// Expected copies of each member are proportional to its share of the
    /// total fitness, and the actual count never deviates from the
    /// expectation by more than one.
    Sus,
}

impl Default for SelectionMethod {
    fn default() -> Self {
        SelectionMethod::Tournament(3)
    }
}

/// What proportional selection does with fitness values that cannot be
/// used as wheel weights directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FitnessScaling {
    /// Fail with [`GaError::InvalidFitness`].
    #[default]
    Reject,
    /// Shift every weight by `1 - min` so the smallest becomes 1.
    ShiftToPositive,
}

/// Index of the winner among `contestants`; ties go to the lower index.
fn tournament_winner(population: &Population, contestants: impl Iterator<Item = usize>) -> usize {
    let members = population.individuals();
    let objective = population.objective();
    let mut best: Option<usize> = None;
    for idx in contestants {
        best = Some(match best {
            None => idx,
            Some(b) => {
                let ord = objective.compare(members[idx].fitness(), members[b].fitness());
                if ord.is_lt() || (ord.is_eq() && idx < b) {
                    idx
                } else {
                    b
                }
            }
        });
    }
    best.unwrap_or(0)
}

fn empty_population(operator: &str) -> GaError {
    GaError::Operator {
        operator: operator.to_string(),
        message: "cannot select from an empty population".into(),
    }
}

/// K-tournament selection.
///
/// Runs `M` independent tournaments of `k` contestants each and writes the
/// winners to the mating pool. `M` defaults to the population size.
///
/// # Complexity
/// O(M·k) per generation
#[derive(Debug, Clone)]
pub struct KTournament {
    k: usize,
    with_replacement: bool,
    pool_size: Option<usize>,
}

impl KTournament {
    /// Tournament of `k` contestants drawn with replacement. `k = 0` is
    /// treated as 1.
    pub fn new(k: usize) -> Self {
        Self {
            k: k.max(1),
            with_replacement: true,
            pool_size: None,
        }
    }

    /// Tournament of `k` distinct contestants.
    pub fn distinct(k: usize) -> Self {
        Self {
            with_replacement: false,
            ..Self::new(k)
        }
    }

    pub fn with_pool_size(mut self, m: usize) -> Self {
        self.pool_size = Some(m);
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Selects one parent index.
    pub fn select<R: Rng + ?Sized>(&self, population: &Population, rng: &mut R) -> usize {
        let n = population.len();
        if self.with_replacement {
            tournament_winner(population, (0..self.k).map(|_| rng.random_range(0..n)))
        } else {
            let k = self.k.min(n);
            tournament_winner(population, rand::seq::index::sample(rng, n, k).into_iter())
        }
    }
}

impl GeneticOperator for KTournament {
    fn name(&self) -> &str {
        "k_tournament"
    }

    fn stage(&self) -> Stage {
        Stage::Selection
    }

    fn apply(
        &mut self,
        population: &mut Population,
        ctx: &mut OperatorContext<'_>,
    ) -> Result<(), GaError> {
        if population.is_empty() {
            return Err(empty_population(self.name()));
        }
        let m = self.pool_size.unwrap_or(population.len());
        let rng = ctx.rng();
        let pool: Vec<usize> = (0..m).map(|_| self.select(population, rng)).collect();
        population.set_mating_pool(pool)
    }
}

/// Stochastic universal sampling.
///
/// Lays `M` equally spaced pointers over the cumulative fitness wheel after a
/// single random offset, then shuffles the resulting pool so consecutive
/// pairing mixes parents.
///
/// Wheel weights are the fitness values when maximizing and `max + 1 - f`
/// when minimizing. Individuals without a finite fitness get weight 0.
#[derive(Debug, Clone)]
pub struct SusSelection {
    pool_size: Option<usize>,
    scaling: FitnessScaling,
}

impl SusSelection {
    pub fn new() -> Self {
        Self {
            pool_size: None,
            scaling: FitnessScaling::default(),
        }
    }

    pub fn with_pool_size(mut self, m: usize) -> Self {
        self.pool_size = Some(m);
        self
    }

    pub fn with_scaling(mut self, scaling: FitnessScaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// Wheel weights for every member.
    ///
    /// # Errors
    /// [`GaError::InvalidFitness`] when the total overflows, or when it is not
    /// positive (or some weight is negative) and no scaling policy repairs it.
    pub fn weights(&self, population: &Population) -> Result<Vec<f64>, GaError> {
        let fitness: Vec<Option<f64>> = population
            .individuals()
            .iter()
            .map(|ind| ind.fitness().filter(|f| f.is_finite()))
            .collect();

        let mut weights: Vec<f64> = match population.objective() {
            Objective::Maximize => fitness.iter().map(|f| f.unwrap_or(0.0)).collect(),
            Objective::Minimize => {
                let max = fitness
                    .iter()
                    .flatten()
                    .copied()
                    .fold(f64::NEG_INFINITY, f64::max);
                fitness
                    .iter()
                    .map(|f| f.map_or(0.0, |f| max + 1.0 - f))
                    .collect()
            }
        };

        let total: f64 = weights.iter().sum();
        let negative = weights.iter().any(|&w| w < 0.0);
        if !total.is_finite() {
            return Err(GaError::InvalidFitness { total });
        }
        if total > 0.0 && !negative {
            return Ok(weights);
        }

        match self.scaling {
            FitnessScaling::Reject => Err(GaError::InvalidFitness { total }),
            FitnessScaling::ShiftToPositive => {
                let min = fitness
                    .iter()
                    .zip(&weights)
                    .filter(|(f, _)| f.is_some())
                    .map(|(_, &w)| w)
                    .fold(f64::INFINITY, f64::min);
                if !min.is_finite() {
                    // nothing finite to shift
                    return Err(GaError::InvalidFitness { total });
                }
                for (w, f) in weights.iter_mut().zip(&fitness) {
                    if f.is_some() {
                        *w = *w - min + 1.0;
                    }
                }
                let shifted: f64 = weights.iter().sum();
                if !shifted.is_finite() {
                    return Err(GaError::InvalidFitness { total: shifted });
                }
                Ok(weights)
            }
        }
    }

    /// Draws `m` indices with one spin of an `m`-pointer wheel. Indices come
    /// out in wheel order. Empty when the weights do not form a usable wheel.
    pub fn sample<R: Rng + ?Sized>(weights: &[f64], m: usize, rng: &mut R) -> Vec<usize> {
        let total: f64 = weights.iter().sum();
        if m == 0 || weights.is_empty() || !(total > 0.0 && total.is_finite()) {
            return Vec::new();
        }
        let spacing = total / m as f64;
        if spacing <= 0.0 {
            return Vec::new();
        }
        let start = rng.random_range(0.0..spacing);
        let last_positive = weights.iter().rposition(|&w| w > 0.0).unwrap_or(0);

        let mut pool = Vec::with_capacity(m);
        let mut idx = 0;
        let mut cumulative = weights[0];
        for i in 0..m {
            let pointer = start + i as f64 * spacing;
            while cumulative <= pointer && idx < last_positive {
                idx += 1;
                cumulative += weights[idx];
            }
            pool.push(idx);
        }
        pool
    }
}

impl Default for SusSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneticOperator for SusSelection {
    fn name(&self) -> &str {
        "sus_selection"
    }

    fn stage(&self) -> Stage {
        Stage::Selection
    }

    fn apply(
        &mut self,
        population: &mut Population,
        ctx: &mut OperatorContext<'_>,
    ) -> Result<(), GaError> {
        if population.is_empty() {
            return Err(empty_population(self.name()));
        }
        let m = self.pool_size.unwrap_or(population.len());
        let weights = self.weights(population)?;
        let rng = ctx.rng();
        let mut pool = Self::sample(&weights, m, rng);
        pool.shuffle(rng);
        population.set_mating_pool(pool)
    }
}
