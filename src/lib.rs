//! Domain-agnostic evolutionary computation engine.
//!
//! A run evolves a [`Population`] of [`Individual`]s, each carrying a
//! segmented [`Genotype`](genotype::Genotype) and a cached fitness, through an
//! ordered pipeline of genetic operators:
//!
//! - **Genotypes**: binary, bounded-integer and permutation segments with
//!   representation-aware crossover and mutation.
//! - **Operators**: k-tournament and stochastic universal sampling selection,
//!   pairwise crossover, per-allele mutation, and lethal selection that trims
//!   the population back to its bounds.
//! - **Evaluation**: user-supplied [`Evaluator`](evaluation::Evaluator)s run
//!   at evaluation barriers, optionally on a rayon worker pool, with
//!   per-evaluation timeouts.
//! - **Scheduler**: the generation loop, its lifecycle states and its
//!   termination policy (generation cap, target fitness, stagnation, time
//!   limit, cancellation).
//! - **Problems**: ready-made OneMax, knapsack and graph-tour strategies.
//!
//! # Architecture
//!
//! The engine contains no domain concepts. A problem plugs in a
//! [`GenotypeShape`](genotype::GenotypeShape), an optional
//! [`Decoder`](genotype::Decoder) and an evaluator; everything else is
//! generic. Fitness direction is a property of the population
//! ([`Objective`]) and every comparison goes through it.
//!
//! # Example
//!
//! ```
//! use u_evolve::problems::OneMax;
//! use u_evolve::{GaConfig, Scheduler};
//!
//! let config = GaConfig::default()
//!     .with_population_size(40)
//!     .with_max_generations(60)
//!     .with_seed(7);
//! let mut scheduler = Scheduler::standard(config, OneMax::shape(20), OneMax).unwrap();
//! let result = scheduler.run().unwrap();
//! assert!(result.best_fitness >= 15.0);
//! assert!(result.state.is_terminal());
//! ```

pub mod error;
pub mod evaluation;
pub mod genotype;
pub mod individual;
pub mod observer;
pub mod operators;
pub mod population;
pub mod problems;
pub mod random;
pub mod scheduler;

pub use error::{ConfigError, GaError};
pub use evaluation::{EvalContext, EvalError, Evaluator};
pub use individual::{Individual, Objective};
pub use operators::{GeneticOperator, OperatorContext, Pipeline, Stage, Warning};
pub use population::{Population, PopulationStats};
pub use scheduler::{GaConfig, GaResult, Scheduler, SchedulerState, StopReason};
