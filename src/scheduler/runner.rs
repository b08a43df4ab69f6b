//! Generation loop execution.
//!
//! [`Scheduler`] orchestrates the complete evolutionary process:
//! seeding → evaluation → selection → crossover → mutation → evaluation →
//! replacement → observers → termination check → repeat.

use super::config::GaConfig;
use super::state::{SchedulerState, StopReason};
use super::termination::Termination;
use crate::error::{ConfigError, GaError};
use crate::evaluation::{evaluate_pending, BatchSettings, Evaluator, Executor};
use crate::genotype::{Genotype, GenotypeShape};
use crate::individual::Individual;
use crate::observer::{Observer, PopulationSnapshot};
use crate::operators::{OperatorContext, Pipeline, Stage, Warning};
use crate::population::Population;
use crate::random::{create_rng, GaRng};
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Per-generation summary kept in the run history.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    pub generation: usize,
    pub population_size: usize,
    /// Whether the size ended inside the configured bounds.
    pub within_bounds: bool,
    /// Best fitness in the population at the end of the generation.
    pub best: Option<f64>,
    /// Best fitness seen since the run started.
    pub best_so_far: Option<f64>,
    pub mean: Option<f64>,
    pub diversity: f64,
    /// Cumulative evaluation count.
    pub evaluations: usize,
    /// Cumulative timeout count.
    pub timeouts: usize,
}

/// Result of a finished run.
///
/// Contains the best solution found, along with statistics about the
/// evolutionary process.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The best individual found during the entire run.
    pub best: Individual,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: f64,

    /// Total number of generations executed.
    pub generations: usize,

    pub state: SchedulerState,

    pub stop_reason: StopReason,

    pub evaluations: usize,

    /// Evaluations that timed out and received the worst fitness.
    pub timeouts: usize,

    /// Best-so-far fitness after seeding and after each generation.
    pub fitness_history: Vec<f64>,

    pub history: Vec<GenerationStats>,

    pub warnings: Vec<Warning>,

    /// Seed actually used, so a run can be replayed.
    pub seed: u64,
}

impl GaResult {
    /// Whether the run was terminated due to stagnation.
    pub fn stagnated(&self) -> bool {
        self.stop_reason == StopReason::Stagnation
    }

    /// Whether the run was cancelled externally.
    pub fn cancelled(&self) -> bool {
        self.stop_reason == StopReason::Cancelled
    }
}

/// Drives a population through the operator pipeline.
///
/// # Usage
///
/// ```
/// use u_evolve::evaluation;
/// use u_evolve::genotype::{GenotypeShape, Segment, SegmentShape};
/// use u_evolve::scheduler::{GaConfig, Scheduler};
///
/// let onemax = evaluation::from_fn(|g| match &g.segments()[0] {
///     Segment::Binary(b) => b.count_ones() as f64,
///     _ => 0.0,
/// });
/// let config = GaConfig::default()
///     .with_population_size(30)
///     .with_max_generations(40)
///     .with_seed(42);
/// let shape = GenotypeShape::single(SegmentShape::binary(16));
///
/// let mut scheduler = Scheduler::standard(config, shape, onemax).unwrap();
/// let result = scheduler.run().unwrap();
/// assert!(result.best_fitness >= 8.0);
/// ```
pub struct Scheduler {
    config: GaConfig,
    shape: GenotypeShape,
    pipeline: Pipeline,
    evaluator: Arc<dyn Evaluator>,
    executor: Executor,
    seed: u64,
    rng: GaRng,
    state: SchedulerState,
    population: Population,
    initial: Vec<Genotype>,
    generation: usize,
    evaluations: usize,
    timeouts: usize,
    warnings: Vec<Warning>,
    termination: Termination,
    best: Option<Individual>,
    fitness_history: Vec<f64>,
    history: Vec<GenerationStats>,
    stop_reason: Option<StopReason>,
    error: Option<GaError>,
    cancel: Arc<AtomicBool>,
}

impl Scheduler {
    /// Builds a scheduler around a custom pipeline.
    ///
    /// # Errors
    /// [`GaError::Configuration`] if the configuration, shape or pipeline is
    /// invalid, or the evaluation thread pool cannot be built.
    pub fn new(
        config: GaConfig,
        shape: GenotypeShape,
        mut pipeline: Pipeline,
    ) -> Result<Self, GaError> {
        config.validate()?;
        shape.validate()?;
        pipeline.validate()?;
        let evaluator: Arc<dyn Evaluator> = pipeline
            .evaluator
            .take()
            .ok_or(ConfigError::MissingEvaluator)?
            .into();
        let executor = Executor::new(config.workers)?;

        let seed = config.seed.unwrap_or_else(rand::random);
        info!(
            "scheduler ready: N={}, shape {shape}, pipeline {:?}, seed {seed}",
            config.population_size,
            pipeline.names()
        );

        Ok(Self {
            population: Population::new(Vec::new(), config.objective),
            termination: Termination::new(&config),
            rng: create_rng(seed),
            seed,
            config,
            shape,
            pipeline,
            evaluator,
            executor,
            state: SchedulerState::Uninitialized,
            initial: Vec::new(),
            generation: 0,
            evaluations: 0,
            timeouts: 0,
            warnings: Vec::new(),
            best: None,
            fitness_history: Vec::new(),
            history: Vec::new(),
            stop_reason: None,
            error: None,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Builds a scheduler with the standard pipeline described by `config`.
    pub fn standard<E: Evaluator + 'static>(
        config: GaConfig,
        shape: GenotypeShape,
        evaluator: E,
    ) -> Result<Self, GaError> {
        let pipeline = Pipeline::standard(&config, evaluator);
        Self::new(config, shape, pipeline)
    }

    pub fn with_observer<O: Observer + 'static>(mut self, observer: O) -> Self {
        self.pipeline.observers.push(Box::new(observer));
        self
    }

    /// Seeds the population with known genotypes. The rest is filled with
    /// random ones.
    ///
    /// # Errors
    /// [`ConfigError::TooManyInitialGenotypes`] or
    /// [`ConfigError::InconsistentShape`].
    pub fn with_initial_population(mut self, genotypes: Vec<Genotype>) -> Result<Self, GaError> {
        if genotypes.len() > self.config.population_size {
            return Err(ConfigError::TooManyInitialGenotypes {
                count: genotypes.len(),
                capacity: self.config.population_size,
            }
            .into());
        }
        if let Some(index) = genotypes.iter().position(|g| !g.conforms_to(&self.shape)) {
            return Err(ConfigError::InconsistentShape { index }.into());
        }
        self.initial = genotypes;
        Ok(self)
    }

    /// Uses an external cancellation token.
    ///
    /// When the flag is set the run stops before the next generation and
    /// ends in [`SchedulerState::Aborted`].
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Best individual seen since the run started.
    pub fn best(&self) -> Option<&Individual> {
        self.best.as_ref()
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn timeouts(&self) -> usize {
        self.timeouts
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// The failure that aborted the run, if any.
    pub fn error(&self) -> Option<&GaError> {
        self.error.as_ref()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Seeds and evaluates the population: `Uninitialized → Running`.
    ///
    /// A seeded population that already meets the target ends the run here.
    pub fn initialize(&mut self) -> Result<(), GaError> {
        if self.state != SchedulerState::Uninitialized {
            return Err(GaError::InvalidState {
                action: "initialize",
                state: self.state,
            });
        }
        self.seed_population();
        if let Err(e) = self.prepare() {
            return Err(self.abort(e));
        }
        self.state = SchedulerState::Running;
        info!(
            "running: initial best {:?} after {} evaluations",
            self.termination.best(),
            self.evaluations
        );
        if let Some(reason) = self.termination.check(0) {
            self.finish(reason);
        }
        Ok(())
    }

    /// Runs one generation. Initializes first if needed.
    ///
    /// Returns the state after the generation.
    ///
    /// # Errors
    /// [`GaError::InvalidState`] in a terminal state. Any operator or
    /// evaluation failure aborts the run and is returned.
    pub fn step(&mut self) -> Result<SchedulerState, GaError> {
        match self.state {
            SchedulerState::Uninitialized => {
                self.initialize()?;
                if self.state.is_terminal() {
                    return Ok(self.state);
                }
            }
            SchedulerState::Running => {}
            state => {
                return Err(GaError::InvalidState {
                    action: "step",
                    state,
                })
            }
        }

        if self.cancel.load(Ordering::Relaxed) {
            self.finish(StopReason::Cancelled);
            return Ok(self.state);
        }

        if let Err(e) = self.advance() {
            return Err(self.abort(e));
        }
        if let Some(reason) = self.termination.check(self.generation) {
            self.finish(reason);
        }
        Ok(self.state)
    }

    /// Runs until a terminal state is reached.
    pub fn run(&mut self) -> Result<GaResult, GaError> {
        if self.state.is_terminal() {
            return Err(GaError::InvalidState {
                action: "run",
                state: self.state,
            });
        }
        while !self.state.is_terminal() {
            self.step()?;
        }
        self.result().ok_or(GaError::InvalidState {
            action: "collect a result",
            state: self.state,
        })
    }

    /// Snapshot of the run so far. `None` before initialization.
    pub fn result(&self) -> Option<GaResult> {
        let best = self.best.clone()?;
        Some(GaResult {
            best_fitness: best.fitness().unwrap_or(self.config.objective.worst()),
            best,
            generations: self.generation,
            state: self.state,
            stop_reason: self.stop_reason.unwrap_or(StopReason::MaxGenerations),
            evaluations: self.evaluations,
            timeouts: self.timeouts,
            fitness_history: self.fitness_history.clone(),
            history: self.history.clone(),
            warnings: self.warnings.clone(),
            seed: self.seed,
        })
    }

    fn seed_population(&mut self) {
        let n = self.config.population_size;
        let mut members: Vec<Individual> = self.initial.drain(..).map(Individual::new).collect();
        while members.len() < n {
            members.push(Individual::new(self.shape.random(&mut self.rng)));
        }
        self.population =
            Population::new(members, self.config.objective).with_bounds(self.config.min_size(), n);
    }

    fn prepare(&mut self) -> Result<(), GaError> {
        self.termination.start();
        for op in &mut self.pipeline.operators {
            op.initialize(&self.population)?;
        }
        self.evaluate(0)?;
        self.record_generation();
        Ok(())
    }

    fn advance(&mut self) -> Result<(), GaError> {
        let generation = self.generation + 1;
        if !self.evaluator.is_deterministic() {
            self.population.invalidate_all();
        }
        self.evaluate(generation)?;

        for i in 0..self.pipeline.operators.len() {
            if matches!(
                self.pipeline.operators[i].stage(),
                Stage::Selection | Stage::Replacement
            ) {
                self.evaluate(generation)?;
            }
            let mut ctx = OperatorContext::new(generation, &mut self.rng, &mut self.warnings);
            self.pipeline.operators[i].apply(&mut self.population, &mut ctx)?;
        }
        self.evaluate(generation)?;

        self.generation = generation;
        self.record_generation();

        let snapshot = PopulationSnapshot::new(&self.population, generation, self.evaluations);
        for observer in &mut self.pipeline.observers {
            observer.on_generation(generation, &snapshot);
        }

        if generation % self.config.log_interval == 0 {
            let last = self.history.last();
            debug!(
                "generation {generation}: best {:?}, mean {:?}, diversity {:.3}, evaluations {}, stagnation {}",
                last.and_then(|s| s.best),
                last.and_then(|s| s.mean),
                last.map_or(0.0, |s| s.diversity),
                self.evaluations,
                self.termination.stagnation()
            );
        }
        Ok(())
    }

    /// Evaluation barrier: scores every individual with a stale fitness.
    fn evaluate(&mut self, generation: usize) -> Result<(), GaError> {
        let settings = BatchSettings {
            seed: self.seed,
            generation,
            timeout: self.config.evaluation_timeout(),
            objective: self.config.objective,
        };
        let outcome = evaluate_pending(
            &mut self.population,
            &self.evaluator,
            &self.executor,
            &settings,
        )?;
        self.evaluations += outcome.evaluated;
        self.timeouts += outcome.timed_out;
        if outcome.timed_out > 0 {
            self.warnings.push(Warning::EvaluationTimeouts {
                generation,
                count: outcome.timed_out,
            });
        }
        Ok(())
    }

    fn record_generation(&mut self) {
        let stats = self.population.stats();
        if let Some(candidate) = self.population.best() {
            let better = match &self.best {
                None => true,
                Some(best) => self
                    .config
                    .objective
                    .compare(candidate.fitness(), best.fitness())
                    .is_lt(),
            };
            if better {
                self.best = Some(candidate.clone());
            }
        }
        self.termination.observe(stats.best);

        let best_so_far = self.best.as_ref().and_then(Individual::fitness);
        self.fitness_history
            .push(best_so_far.unwrap_or(self.config.objective.worst()));
        self.history.push(GenerationStats {
            generation: self.generation,
            population_size: stats.size,
            within_bounds: (self.population.min_size()..=self.population.max_size())
                .contains(&stats.size),
            best: stats.best,
            best_so_far,
            mean: stats.mean,
            diversity: stats.diversity,
            evaluations: self.evaluations,
            timeouts: self.timeouts,
        });
    }

    fn finish(&mut self, reason: StopReason) {
        self.state = reason.state();
        self.stop_reason = Some(reason);
        for op in &mut self.pipeline.operators {
            op.finalize(&self.population);
        }
        let snapshot = PopulationSnapshot::new(&self.population, self.generation, self.evaluations);
        for observer in &mut self.pipeline.observers {
            observer.finalize(&snapshot);
        }
        info!(
            "{}: {reason} after {} generations, best {:?}, {} evaluations",
            self.state,
            self.generation,
            self.best.as_ref().and_then(Individual::fitness),
            self.evaluations
        );
    }

    fn abort(&mut self, e: GaError) -> GaError {
        error!("generation {}: {e}", self.generation + 1);
        self.error = Some(e.clone());
        self.finish(StopReason::Error);
        e
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("shape", &self.shape.to_string())
            .field("pipeline", &self.pipeline)
            .field("seed", &self.seed)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{self, EvalError};
    use crate::genotype::{BinarySegment, Segment, SegmentShape};
    use crate::individual::Objective;
    use crate::observer;
    use crate::operators::{KTournament, Mutate, SelectionMethod};
    use std::sync::Mutex;

    fn ones(g: &Genotype) -> f64 {
        g.segments()
            .iter()
            .map(|s| match s {
                Segment::Binary(b) => b.count_ones() as f64,
                _ => 0.0,
            })
            .sum()
    }

    fn onemax(bits: usize, config: GaConfig) -> Scheduler {
        Scheduler::standard(
            config,
            GenotypeShape::single(SegmentShape::binary(bits)),
            evaluation::from_fn(ones),
        )
        .expect("valid setup")
    }

    fn small() -> GaConfig {
        GaConfig::default()
            .with_population_size(20)
            .with_max_generations(30)
            .with_stagnation_limit(0)
            .with_seed(42)
    }

    #[test]
    fn test_onemax_convergence() {
        let config = small()
            .with_population_size(50)
            .with_max_generations(200)
            .with_crossover_rate(0.8)
            .with_mutation_rate(0.01);
        let result = onemax(20, config).run().expect("run");

        assert!(
            result.best_fitness >= 18.0,
            "expected fitness >= 18 for 20-bit OneMax, got {}",
            result.best_fitness
        );
        assert_eq!(result.state, SchedulerState::MaxGenerationsReached);
    }

    #[test]
    fn test_fitness_history() {
        let result = onemax(10, small()).run().expect("run");

        // initial + each generation
        assert_eq!(result.fitness_history.len(), 31);
        assert_eq!(result.history.len(), 31);
        assert_eq!(result.generations, 30);
        for window in result.fitness_history.windows(2) {
            assert!(window[1] >= window[0], "best-so-far must never drop");
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let a = onemax(16, small()).run().expect("run a");
        let b = onemax(16, small()).run().expect("run b");
        assert_eq!(a.fitness_history, b.fitness_history);
        assert_eq!(a.best, b.best);
        assert_eq!(a.evaluations, b.evaluations);
    }

    #[test]
    fn test_stagnation_termination() {
        let config = small()
            .with_max_generations(1000)
            .with_stagnation_limit(10);
        let result = onemax(5, config).run().expect("run");

        assert!(result.stagnated(), "expected stagnation, got {:?}", result.stop_reason);
        assert_eq!(result.state, SchedulerState::Converged);
        assert!(result.generations < 1000);
    }

    #[test]
    fn test_target_fitness() {
        let config = small().with_max_generations(500).with_target_fitness(12.0);
        let result = onemax(12, config).run().expect("run");
        assert_eq!(result.stop_reason, StopReason::TargetReached);
        assert_eq!(result.best_fitness, 12.0);
    }

    #[test]
    fn test_minimize() {
        let config = small().with_objective(Objective::Minimize);
        let result = onemax(12, config).run().expect("run");
        assert!(result.best_fitness <= 3.0, "got {}", result.best_fitness);
    }

    #[test]
    fn test_cancellation() {
        let mut scheduler = onemax(8, small());
        scheduler.cancel_handle().store(true, Ordering::Relaxed);
        let result = scheduler.run().expect("cancelled runs still report");

        assert!(result.cancelled());
        assert_eq!(result.state, SchedulerState::Aborted);
        assert_eq!(result.generations, 0);
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut scheduler = onemax(8, small().with_max_generations(2));
        scheduler.run().expect("run");
        assert!(matches!(
            scheduler.step(),
            Err(GaError::InvalidState {
                action: "step",
                state: SchedulerState::MaxGenerationsReached
            })
        ));
        assert!(scheduler.run().is_err());
        assert!(scheduler.initialize().is_err());
    }

    #[test]
    fn test_step_by_step() {
        let mut scheduler = onemax(8, small().with_max_generations(3));
        assert_eq!(scheduler.state(), SchedulerState::Uninitialized);
        assert!(scheduler.result().is_none());
        assert_eq!(scheduler.step().expect("gen 1"), SchedulerState::Running);
        assert_eq!(scheduler.generation(), 1);
        assert_eq!(scheduler.population().len(), 20);
        scheduler.step().expect("gen 2");
        assert_eq!(
            scheduler.step().expect("gen 3"),
            SchedulerState::MaxGenerationsReached
        );
    }

    #[test]
    fn test_invalid_setup_is_configuration_error() {
        let err = Scheduler::standard(
            small().with_population_size(1),
            GenotypeShape::single(SegmentShape::binary(4)),
            evaluation::from_fn(ones),
        )
        .unwrap_err();
        assert_eq!(err, GaError::Configuration(ConfigError::PopulationTooSmall));

        let err = Scheduler::new(
            small(),
            GenotypeShape::single(SegmentShape::binary(4)),
            Pipeline::new().with_operator(Mutate::new(0.1)),
        )
        .unwrap_err();
        assert_eq!(err, GaError::Configuration(ConfigError::MissingEvaluator));

        let err = Scheduler::standard(
            small(),
            GenotypeShape::new(Vec::new()),
            evaluation::from_fn(ones),
        )
        .unwrap_err();
        assert_eq!(err, GaError::Configuration(ConfigError::EmptyShape));
    }

    #[test]
    fn test_initial_population() {
        let all_ones = Genotype::single(Segment::Binary(BinarySegment::new(vec![true; 8])));
        let mut scheduler = onemax(8, small().with_max_generations(1))
            .with_initial_population(vec![all_ones.clone()])
            .expect("conforming genotype");
        scheduler.initialize().expect("init");
        assert_eq!(scheduler.population().individuals()[0].genotype(), &all_ones);
        assert_eq!(scheduler.best().and_then(Individual::fitness), Some(8.0));

        let wrong = Genotype::single(Segment::Binary(BinarySegment::zeros(3)));
        let err = onemax(8, small()).with_initial_population(vec![wrong]).unwrap_err();
        assert_eq!(
            err,
            GaError::Configuration(ConfigError::InconsistentShape { index: 0 })
        );
    }

    #[test]
    fn test_seeded_optimum_converges_at_initialization() {
        let all_ones = Genotype::single(Segment::Binary(BinarySegment::new(vec![true; 8])));
        let mut scheduler = onemax(8, small().with_target_fitness(8.0))
            .with_initial_population(vec![all_ones])
            .expect("conforming genotype");
        scheduler.initialize().expect("init");
        assert_eq!(scheduler.state(), SchedulerState::Converged);
        assert_eq!(scheduler.stop_reason(), Some(StopReason::TargetReached));
        assert!(matches!(
            scheduler.step(),
            Err(GaError::InvalidState { .. })
        ));

        let result = scheduler.result().expect("initialized");
        assert_eq!(result.generations, 0);
        assert_eq!(result.fitness_history, vec![8.0]);
        assert_eq!(result.evaluations, 20);
    }

    #[test]
    fn test_evaluation_failure_aborts() {
        let failing = evaluation::try_from_fn(|_, ctx| {
            if ctx.generation() == 2 {
                Err(EvalError::Failed("sensor offline".into()))
            } else {
                Ok(1.0)
            }
        })
        .nondeterministic();
        let mut scheduler = Scheduler::standard(
            small(),
            GenotypeShape::single(SegmentShape::binary(4)),
            failing,
        )
        .expect("valid setup");

        let err = scheduler.run().unwrap_err();
        assert!(matches!(err, GaError::Evaluation { .. }));
        assert_eq!(scheduler.state(), SchedulerState::Aborted);
        assert_eq!(scheduler.stop_reason(), Some(StopReason::Error));
        assert_eq!(scheduler.error(), Some(&err));
        assert_eq!(scheduler.generation(), 1);
    }

    #[test]
    fn test_nondeterministic_evaluator_reevaluates() {
        let noisy = evaluation::try_from_fn(|g, _| Ok(ones(g))).nondeterministic();
        let config = small().with_max_generations(2).with_mating_pool_size(10);
        let mut scheduler = Scheduler::standard(
            config,
            GenotypeShape::single(SegmentShape::binary(6)),
            noisy,
        )
        .expect("valid setup");
        let result = scheduler.run().expect("run");
        // seeding: 20; each generation: 20 members + at most 10 offspring
        assert!(result.evaluations >= 20 + 2 * 20);
        assert!(result.evaluations <= 20 + 2 * 30);
    }

    #[test]
    fn test_observers_see_every_generation() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut scheduler = onemax(8, small().with_max_generations(5)).with_observer(
            observer::from_fn(move |generation, snapshot| {
                sink.lock()
                    .expect("observer lock")
                    .push((generation, snapshot.individuals().len()));
            }),
        );
        scheduler.run().expect("run");
        let seen = seen.lock().expect("observer lock").clone();
        assert_eq!(seen, (1..=5).map(|g| (g, 20)).collect::<Vec<_>>());
    }

    #[test]
    fn test_operator_lifecycle_hooks() {
        #[derive(Default)]
        struct Counts {
            init: usize,
            apply: usize,
            fin: usize,
        }
        struct HookCounter(Arc<Mutex<Counts>>);
        impl crate::operators::GeneticOperator for HookCounter {
            fn name(&self) -> &str {
                "hook_counter"
            }
            fn stage(&self) -> Stage {
                Stage::Mutation
            }
            fn initialize(&mut self, population: &Population) -> Result<(), GaError> {
                assert_eq!(population.len(), 20);
                self.0.lock().expect("lock").init += 1;
                Ok(())
            }
            fn apply(
                &mut self,
                _population: &mut Population,
                _ctx: &mut OperatorContext<'_>,
            ) -> Result<(), GaError> {
                self.0.lock().expect("lock").apply += 1;
                Ok(())
            }
            fn finalize(&mut self, _population: &Population) {
                self.0.lock().expect("lock").fin += 1;
            }
        }

        let counts = Arc::new(Mutex::new(Counts::default()));
        let pipeline = Pipeline::new()
            .with_evaluator(evaluation::from_fn(ones))
            .with_operator(KTournament::new(2))
            .with_operator(HookCounter(Arc::clone(&counts)));
        let mut scheduler = Scheduler::new(
            small().with_max_generations(4),
            GenotypeShape::single(SegmentShape::binary(4)),
            pipeline,
        )
        .expect("valid setup");
        scheduler.run().expect("run");

        let c = counts.lock().expect("lock");
        assert_eq!((c.init, c.apply, c.fin), (1, 4, 1));
    }

    #[test]
    fn test_sus_pipeline_runs() {
        let config = small().with_selection(SelectionMethod::Sus);
        let result = onemax(10, config).run().expect("run");
        assert!(result.best_fitness >= 7.0, "got {}", result.best_fitness);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_worker_count_does_not_change_result() {
        let a = onemax(16, small()).run().expect("sequential");
        let b = onemax(16, small().with_workers(4)).run().expect("parallel");
        assert_eq!(a.fitness_history, b.fitness_history);
        assert_eq!(a.best, b.best);
    }
}
