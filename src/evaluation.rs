//! Fitness evaluation.
//!
//! An [`Evaluator`] is the problem-specific half of a run: it scores a
//! genotype (usually through a [`Decoder`]). The scheduler calls it for every
//! individual whose fitness is undefined or stale, in one batch per barrier.
//!
//! Batches run on a dedicated rayon pool when more than one worker is
//! configured. Each call receives its own random sub-stream derived from
//! `(seed, generation, slot)` and results are applied in population order, so
//! the outcome does not depend on the worker count.

use crate::error::GaError;
use crate::genotype::{Decoder, Genotype};
use crate::individual::Objective;
use crate::population::Population;
use crate::random::{substream, GaRng};
use log::warn;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Per-call evaluation failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// The call ran out of time. The individual receives the worst fitness
    /// and the run continues.
    #[error("evaluation timed out")]
    Timeout,
    /// Any other failure. Aborts the run.
    #[error("{0}")]
    Failed(String),
}

/// Context handed to one evaluation call.
pub struct EvalContext {
    generation: usize,
    index: usize,
    rng: GaRng,
    deadline: Option<Instant>,
}

impl EvalContext {
    pub(crate) fn new(seed: u64, generation: usize, index: usize, timeout: Option<Duration>) -> Self {
        Self {
            generation,
            index,
            rng: substream(seed, generation, index),
            deadline: timeout.map(|t| Instant::now() + t),
        }
    }

    /// Generation being evaluated (0 for the initial population).
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Population slot of the individual: members first, then offspring.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Private random stream for this call.
    pub fn rng(&mut self) -> &mut GaRng {
        &mut self.rng
    }

    /// Whether the evaluation timeout has passed. Long-running evaluators
    /// may poll this and return [`EvalError::Timeout`] early.
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Scores genotypes.
///
/// Implementations must be thread-safe: a batch may call `evaluate`
/// concurrently for different individuals.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, genotype: &Genotype, ctx: &mut EvalContext) -> Result<f64, EvalError>;

    /// Deterministic evaluators are called once per genotype and their
    /// result is cached. Non-deterministic ones are re-run every generation.
    fn is_deterministic(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "evaluator"
    }
}

/// Adapts an infallible closure over the genotype.
///
/// ```
/// use u_evolve::evaluation;
/// use u_evolve::genotype::Segment;
///
/// let onemax = evaluation::from_fn(|g| match &g.segments()[0] {
///     Segment::Binary(b) => b.count_ones() as f64,
///     _ => 0.0,
/// });
/// # let _ = onemax;
/// ```
pub fn from_fn<F>(f: F) -> FnEvaluator<F>
where
    F: Fn(&Genotype) -> f64 + Send + Sync,
{
    FnEvaluator(f)
}

/// See [`from_fn`].
#[derive(Clone)]
pub struct FnEvaluator<F>(F);

impl<F> Evaluator for FnEvaluator<F>
where
    F: Fn(&Genotype) -> f64 + Send + Sync,
{
    fn evaluate(&self, genotype: &Genotype, _ctx: &mut EvalContext) -> Result<f64, EvalError> {
        Ok((self.0)(genotype))
    }
}

/// Scores the decoded phenotype: `f(decoder.decode(genotype))`.
pub fn decoded<D, F>(decoder: D, f: F) -> DecodedEvaluator<D, F>
where
    D: Decoder,
    F: Fn(&D::Phenotype) -> f64 + Send + Sync,
{
    DecodedEvaluator { decoder, f }
}

/// See [`decoded`].
#[derive(Clone)]
pub struct DecodedEvaluator<D, F> {
    decoder: D,
    f: F,
}

impl<D, F> Evaluator for DecodedEvaluator<D, F>
where
    D: Decoder,
    F: Fn(&D::Phenotype) -> f64 + Send + Sync,
{
    fn evaluate(&self, genotype: &Genotype, _ctx: &mut EvalContext) -> Result<f64, EvalError> {
        Ok((self.f)(&genotype.decode(&self.decoder)))
    }
}

/// Adapts a fallible closure that may use the call context.
pub fn try_from_fn<F>(f: F) -> TryFnEvaluator<F>
where
    F: Fn(&Genotype, &mut EvalContext) -> Result<f64, EvalError> + Send + Sync,
{
    TryFnEvaluator {
        f,
        deterministic: true,
    }
}

/// See [`try_from_fn`].
#[derive(Clone)]
pub struct TryFnEvaluator<F> {
    f: F,
    deterministic: bool,
}

impl<F> TryFnEvaluator<F> {
    /// Marks the evaluator as noisy, disabling fitness caching.
    pub fn nondeterministic(mut self) -> Self {
        self.deterministic = false;
        self
    }
}

impl<F> Evaluator for TryFnEvaluator<F>
where
    F: Fn(&Genotype, &mut EvalContext) -> Result<f64, EvalError> + Send + Sync,
{
    fn evaluate(&self, genotype: &Genotype, ctx: &mut EvalContext) -> Result<f64, EvalError> {
        (self.f)(genotype, ctx)
    }

    fn is_deterministic(&self) -> bool {
        self.deterministic
    }
}

/// Knobs for one evaluation batch.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BatchSettings {
    pub seed: u64,
    pub generation: usize,
    pub timeout: Option<Duration>,
    pub objective: Objective,
}

/// Outcome of one evaluation batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BatchOutcome {
    pub evaluated: usize,
    pub timed_out: usize,
}

enum Scored {
    Fitness(f64),
    TimedOut,
}

fn score_one(
    evaluator: &Arc<dyn Evaluator>,
    genotype: &Genotype,
    slot: usize,
    settings: &BatchSettings,
) -> Result<Scored, GaError> {
    let mut ctx = EvalContext::new(settings.seed, settings.generation, slot, settings.timeout);
    let result = match settings.timeout {
        Some(timeout) => call_with_deadline(evaluator, genotype, ctx, timeout),
        None => evaluator.evaluate(genotype, &mut ctx),
    };
    match result {
        Err(EvalError::Timeout) => Ok(Scored::TimedOut),
        Ok(f) if f.is_nan() => Err(GaError::Evaluation {
            index: slot,
            message: format!("`{}` returned NaN", evaluator.name()),
        }),
        Ok(f) => Ok(Scored::Fitness(f)),
        Err(EvalError::Failed(message)) => Err(GaError::Evaluation {
            index: slot,
            message,
        }),
    }
}

/// Runs one call on its own thread and waits at most `timeout` for it.
///
/// A call that misses the deadline is abandoned: it keeps running detached
/// and its late result is discarded.
fn call_with_deadline(
    evaluator: &Arc<dyn Evaluator>,
    genotype: &Genotype,
    mut ctx: EvalContext,
    timeout: Duration,
) -> Result<f64, EvalError> {
    let (tx, rx) = mpsc::sync_channel(1);
    let evaluator = Arc::clone(evaluator);
    let genotype = genotype.clone();
    thread::Builder::new()
        .name(format!("u-evolve-eval-slot-{}", ctx.index()))
        .spawn(move || {
            let result = evaluator.evaluate(&genotype, &mut ctx);
            let _ = tx.send(result);
        })
        .map_err(|e| EvalError::Failed(format!("cannot spawn evaluation thread: {e}")))?;
    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(EvalError::Timeout),
        Err(RecvTimeoutError::Disconnected) => {
            Err(EvalError::Failed("evaluation thread panicked".into()))
        }
    }
}

/// Where a batch runs.
pub(crate) enum Executor {
    Sequential,
    #[cfg(feature = "parallel")]
    Pool(rayon::ThreadPool),
}

impl Executor {
    /// A dedicated pool for `workers > 1`, sequential otherwise.
    pub(crate) fn new(workers: usize) -> Result<Self, crate::error::ConfigError> {
        #[cfg(feature = "parallel")]
        if workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("u-evolve-eval-{i}"))
                .build()
                .map_err(|e| crate::error::ConfigError::ThreadPool(e.to_string()))?;
            return Ok(Executor::Pool(pool));
        }
        let _ = workers;
        Ok(Executor::Sequential)
    }

    fn score(
        &self,
        evaluator: &Arc<dyn Evaluator>,
        population: &Population,
        slots: &[usize],
        settings: &BatchSettings,
    ) -> Vec<Result<Scored, GaError>> {
        let run = |&slot: &usize| match population.slot(slot) {
            Some(ind) => score_one(evaluator, ind.genotype(), slot, settings),
            None => Err(GaError::Evaluation {
                index: slot,
                message: "slot out of range".into(),
            }),
        };
        match self {
            Executor::Sequential => slots.iter().map(run).collect(),
            #[cfg(feature = "parallel")]
            Executor::Pool(pool) => {
                use rayon::prelude::*;
                pool.install(|| slots.par_iter().map(run).collect())
            }
        }
    }
}

/// Evaluates every individual without a current fitness.
///
/// With a timeout configured each call runs on its own thread and the batch
/// stops waiting for it at the deadline. Timeouts are recovered locally: the
/// individual gets [`Objective::worst`] and is flagged. The first other failure, in
/// population order, aborts the batch.
pub(crate) fn evaluate_pending(
    population: &mut Population,
    evaluator: &Arc<dyn Evaluator>,
    executor: &Executor,
    settings: &BatchSettings,
) -> Result<BatchOutcome, GaError> {
    let slots = population.pending_slots();
    if slots.is_empty() {
        return Ok(BatchOutcome::default());
    }
    let scores = executor.score(evaluator, population, &slots, settings);

    let mut outcome = BatchOutcome::default();
    for (slot, score) in slots.into_iter().zip(scores) {
        let scored = score?;
        let Some(ind) = population.slot_mut(slot) else {
            continue;
        };
        outcome.evaluated += 1;
        match scored {
            Scored::Fitness(f) => ind.set_fitness(f),
            Scored::TimedOut => {
                warn!(
                    "generation {}: evaluation of slot {slot} timed out",
                    settings.generation
                );
                ind.mark_timed_out(settings.objective.worst());
                outcome.timed_out += 1;
            }
        }
    }
    Ok(outcome)
}
