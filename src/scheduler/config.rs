//! Run configuration.
//!
//! [`GaConfig`] holds all parameters that control the generation loop.

use crate::error::ConfigError;
use crate::genotype::{CrossoverScheme, PermutationMutation};
use crate::individual::Objective;
use crate::operators::{FitnessScaling, Pairing, Replacement, SelectionMethod};
use std::time::Duration;

/// Parameters of one evolutionary run.
///
/// Every field is public; the `with_*` builders are shorthands that also
/// clamp rates into `[0, 1]`.
///
/// ```
/// use u_evolve::individual::Objective;
/// use u_evolve::operators::SelectionMethod;
/// use u_evolve::scheduler::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_objective(Objective::Minimize)
///     .with_selection(SelectionMethod::Tournament(5))
///     .with_mutation_rate(0.02);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.pool_size(), 200);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Capacity N: the population size restored after every generation.
    pub population_size: usize,

    /// Lower bound below which replacement records a bounds warning.
    ///
    /// `None` means `population_size`.
    pub min_population_size: Option<usize>,

    /// Size M of the mating pool, which is also the number of offspring per
    /// generation. `None` means `population_size`.
    pub mating_pool_size: Option<usize>,

    /// Hard cap on completed generations.
    pub max_generations: usize,

    /// Whether larger or smaller fitness is better.
    pub objective: Objective,

    /// Selection strategy for filling the mating pool.
    pub selection: SelectionMethod,

    /// What SUS does with fitness values that cannot be used as weights.
    pub fitness_scaling: FitnessScaling,

    /// Probability of recombining a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, the parents are copied.
    pub crossover_rate: f64,

    /// How the mating pool is grouped into pairs.
    pub pairing: Pairing,

    /// Crossover methods per segment representation.
    pub crossover: CrossoverScheme,

    /// Per-allele mutation probability (0.0–1.0).
    pub mutation_rate: f64,

    /// Rearrangement used when mutating permutation segments.
    pub permutation_mutation: PermutationMutation,

    /// How offspring enter the population.
    pub replacement: Replacement,

    /// Generations without significant improvement that count as
    /// convergence. 0 disables the check.
    pub stagnation_limit: usize,

    /// Relative improvement `|old - new| / |old|` a new best must reach to
    /// reset the stagnation counter. Smaller improvements still move the
    /// best-so-far but count as stagnant generations.
    pub convergence_threshold: f64,

    /// Stop as soon as the best fitness reaches this value.
    pub target_fitness: Option<f64>,

    /// Worker threads for fitness evaluation. 1 evaluates on the calling
    /// thread.
    pub workers: usize,

    /// Per-evaluation timeout in milliseconds.
    ///
    /// An evaluation that takes longer is a failure for that individual
    /// only: it receives the worst possible fitness and the run continues.
    pub evaluation_timeout_ms: Option<u64>,

    /// Emit a `debug!` generation summary every this many generations.
    pub log_interval: usize,

    /// Seed of the run generator; `None` draws one. The seed in use is
    /// reported in [`GaResult`](super::GaResult).
    pub seed: Option<u64>,

    /// Wall-clock budget in milliseconds, checked between generations, so a
    /// run may overshoot by up to one generation.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            min_population_size: None,
            mating_pool_size: None,
            max_generations: 500,
            objective: Objective::default(),
            selection: SelectionMethod::default(),
            fitness_scaling: FitnessScaling::default(),
            crossover_rate: 0.9,
            pairing: Pairing::default(),
            crossover: CrossoverScheme::default(),
            mutation_rate: 0.01,
            permutation_mutation: PermutationMutation::default(),
            replacement: Replacement::default(),
            stagnation_limit: 50,
            convergence_threshold: 0.0,
            target_fitness: None,
            workers: 1,
            evaluation_timeout_ms: None,
            log_interval: 10,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the minimum population size tolerated without a warning.
    pub fn with_min_population_size(mut self, n: usize) -> Self {
        self.min_population_size = Some(n);
        self
    }

    /// Sets the mating pool size (offspring per generation).
    pub fn with_mating_pool_size(mut self, m: usize) -> Self {
        self.mating_pool_size = Some(m);
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_selection(mut self, sel: SelectionMethod) -> Self {
        self.selection = sel;
        self
    }

    pub fn with_fitness_scaling(mut self, scaling: FitnessScaling) -> Self {
        self.fitness_scaling = scaling;
        self
    }

    /// Clamped to `[0, 1]`.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_pairing(mut self, pairing: Pairing) -> Self {
        self.pairing = pairing;
        self
    }

    pub fn with_crossover(mut self, scheme: CrossoverScheme) -> Self {
        self.crossover = scheme;
        self
    }

    /// Clamped to `[0, 1]`.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_permutation_mutation(mut self, style: PermutationMutation) -> Self {
        self.permutation_mutation = style;
        self
    }

    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = replacement;
        self
    }

    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Negative values become 0.
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold.max(0.0);
        self
    }

    /// Stops the run once the best fitness reaches `target`.
    pub fn with_target_fitness(mut self, target: f64) -> Self {
        self.target_fitness = Some(target);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_evaluation_timeout_ms(mut self, ms: u64) -> Self {
        self.evaluation_timeout_ms = Some(ms);
        self
    }

    pub fn with_log_interval(mut self, generations: usize) -> Self {
        self.log_interval = generations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// N = 50, 100 generations, stagnation after 20, 10 s budget.
    pub fn fast() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            stagnation_limit: 20,
            convergence_threshold: 0.001,
            time_limit_ms: Some(10_000),
            ..Self::default()
        }
    }

    /// N = 100, 300 generations, stagnation after 50, 30 s budget.
    pub fn balanced() -> Self {
        Self {
            population_size: 100,
            max_generations: 300,
            stagnation_limit: 50,
            convergence_threshold: 0.001,
            time_limit_ms: Some(30_000),
            ..Self::default()
        }
    }

    /// N = 150, 500 generations, stagnation after 80 with a finer
    /// threshold, 60 s budget.
    pub fn quality() -> Self {
        Self {
            population_size: 150,
            max_generations: 500,
            stagnation_limit: 80,
            convergence_threshold: 0.0005,
            time_limit_ms: Some(60_000),
            ..Self::default()
        }
    }

    /// Picks a preset from the number of alleles per genotype:
    ///
    /// - `allele_count < 50` → [`fast()`](Self::fast)
    /// - `50 ≤ allele_count < 200` → [`balanced()`](Self::balanced)
    /// - `allele_count ≥ 200` → [`quality()`](Self::quality)
    pub fn auto_select(allele_count: usize) -> Self {
        if allele_count < 50 {
            Self::fast()
        } else if allele_count < 200 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Shorthand for `with_selection(SelectionMethod::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(SelectionMethod::Tournament(k))
    }

    /// Effective mating pool size M.
    pub fn pool_size(&self) -> usize {
        self.mating_pool_size.unwrap_or(self.population_size)
    }

    /// Effective lower population bound.
    pub fn min_size(&self) -> usize {
        self.min_population_size.unwrap_or(self.population_size)
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    pub fn evaluation_timeout(&self) -> Option<Duration> {
        self.evaluation_timeout_ms.map(Duration::from_millis)
    }

    /// Rejects parameter combinations a run cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall);
        }
        if let Some(min) = self.min_population_size {
            if min == 0 || min > self.population_size {
                return Err(ConfigError::InvalidBounds {
                    min,
                    max: self.population_size,
                });
            }
        }
        if self.mating_pool_size == Some(0) {
            return Err(ConfigError::EmptyMatingPool);
        }
        if self.max_generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        match self.selection {
            SelectionMethod::Tournament(0) | SelectionMethod::TournamentDistinct(0) => {
                return Err(ConfigError::InvalidTournamentSize);
            }
            SelectionMethod::TournamentDistinct(k) if k > self.population_size => {
                return Err(ConfigError::TournamentTooLarge {
                    k,
                    population: self.population_size,
                });
            }
            _ => {}
        }
        if self.convergence_threshold.is_nan() || self.convergence_threshold < 0.0 {
            return Err(ConfigError::NegativeThreshold);
        }
        if self.target_fitness.is_some_and(|t| !t.is_finite()) {
            return Err(ConfigError::NonFiniteTarget);
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        if self.evaluation_timeout_ms == Some(0) {
            return Err(ConfigError::ZeroEvaluationTimeout);
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.log_interval == 0 {
            return Err(ConfigError::ZeroLogInterval);
        }
        Ok(())
    }
}
