//! Error taxonomy for the evolution engine.
//!
//! Two layers:
//!
//! - [`ConfigError`]: problems detected while building a
//!   [`Scheduler`](crate::scheduler::Scheduler) or its inputs. Always fatal.
//! - [`GaError`]: everything that can go wrong at runtime. Any error that
//!   escapes an operator aborts the run.
//!
//! Evaluation timeouts and population-bounds violations are *not* errors;
//! they are recovered locally and reported through
//! [`Warning`](crate::operators::Warning) and the run statistics.

use crate::scheduler::SchedulerState;

/// Construction-time validation failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population_size must be at least 2")]
    PopulationTooSmall,
    #[error("min_population_size ({min}) must be between 1 and population_size ({max})")]
    InvalidBounds { min: usize, max: usize },
    #[error("mating_pool_size must be at least 1")]
    EmptyMatingPool,
    #[error("max_generations must be at least 1")]
    ZeroGenerations,
    #[error("tournament size must be at least 1")]
    InvalidTournamentSize,
    #[error("tournament of {k} without replacement needs at least {k} individuals, population_size is {population}")]
    TournamentTooLarge { k: usize, population: usize },
    #[error("convergence_threshold must be non-negative")]
    NegativeThreshold,
    #[error("time_limit_ms must be positive or None")]
    ZeroTimeLimit,
    #[error("evaluation_timeout_ms must be positive or None")]
    ZeroEvaluationTimeout,
    #[error("workers must be at least 1")]
    ZeroWorkers,
    #[error("log_interval must be at least 1")]
    ZeroLogInterval,
    #[error("target_fitness must be finite")]
    NonFiniteTarget,
    #[error("pipeline has no operators")]
    EmptyPipeline,
    #[error("pipeline has no evaluation operator")]
    MissingEvaluator,
    #[error("operator `{operator}` requires a preceding selection operator")]
    MissingSelection { operator: String },
    #[error("operator `{operator}` produces offspring but the pipeline has no replacement operator")]
    MissingReplacement { operator: String },
    #[error("operator `{later}` cannot run after `{earlier}`")]
    OperatorOrder { earlier: String, later: String },
    #[error("genotype shape has no segments")]
    EmptyShape,
    #[error("segment {index} has zero length")]
    EmptySegment { index: usize },
    #[error("integer range {min}..={max} is empty")]
    InvalidIntegerRange { min: i64, max: i64 },
    #[error("allele value {value} is outside {min}..={max}")]
    AlleleOutOfRange { value: i64, min: i64, max: i64 },
    #[error("alleles do not form a permutation of 0..{len}")]
    InvalidPermutation { len: usize },
    #[error("initial genotype {index} does not match the configured shape")]
    InconsistentShape { index: usize },
    #[error("{count} initial genotypes supplied but population_size is {capacity}")]
    TooManyInitialGenotypes { count: usize, capacity: usize },
    #[error("{what} has {found} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("failed to build evaluation thread pool: {0}")]
    ThreadPool(String),
}

/// Runtime failures raised by operators and the scheduler.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GaError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Crossover or mutation across incompatible segments.
    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },

    /// Proportional selection over a non-positive fitness total.
    #[error("proportional selection needs a positive fitness total, got {total}")]
    InvalidFitness { total: f64 },

    #[error("evaluation of individual {index} failed: {message}")]
    Evaluation { index: usize, message: String },

    #[error("operator `{operator}` failed: {message}")]
    Operator { operator: String, message: String },

    #[error("mating pool is empty when `{operator}` ran; a selection operator must come first")]
    EmptyMatingPool { operator: String },

    #[error("cannot {action} while the scheduler is {state}")]
    InvalidState {
        action: &'static str,
        state: SchedulerState,
    },
}

impl GaError {
    pub(crate) fn shape_mismatch(
        expected: impl std::fmt::Display,
        found: impl std::fmt::Display,
    ) -> Self {
        GaError::ShapeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}
