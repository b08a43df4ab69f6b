//! Termination policy.

use super::config::GaConfig;
use super::state::StopReason;
use crate::individual::Objective;
use std::time::{Duration, Instant};

/// Tracks the best-so-far fitness and decides when a run is over.
#[derive(Debug, Clone)]
pub(crate) struct Termination {
    objective: Objective,
    max_generations: usize,
    target: Option<f64>,
    stagnation_limit: usize,
    threshold: f64,
    time_limit: Option<Duration>,
    started: Instant,
    best: Option<f64>,
    stagnation: usize,
}

impl Termination {
    pub(crate) fn new(config: &GaConfig) -> Self {
        Self {
            objective: config.objective,
            max_generations: config.max_generations,
            target: config.target_fitness,
            stagnation_limit: config.stagnation_limit,
            threshold: config.convergence_threshold,
            time_limit: config.time_limit(),
            started: Instant::now(),
            best: None,
            stagnation: 0,
        }
    }

    /// Restarts the wall clock.
    pub(crate) fn start(&mut self) {
        self.started = Instant::now();
    }

    pub(crate) fn best(&self) -> Option<f64> {
        self.best
    }

    pub(crate) fn stagnation(&self) -> usize {
        self.stagnation
    }

    /// Records a generation's best fitness. Returns whether the best-so-far
    /// improved.
    ///
    /// The stagnation counter only resets when the relative improvement
    /// `|old - new| / |old|` reaches the convergence threshold.
    pub(crate) fn observe(&mut self, generation_best: Option<f64>) -> bool {
        let Some(new) = generation_best.filter(|f| !f.is_nan()) else {
            self.stagnation += 1;
            return false;
        };
        let Some(old) = self.best else {
            self.best = Some(new);
            self.stagnation = 0;
            return true;
        };
        if !self.objective.is_better(new, old) {
            self.stagnation += 1;
            return false;
        }
        let significant = if self.threshold > 0.0 && old.is_finite() && old != 0.0 {
            (old - new).abs() / old.abs() >= self.threshold
        } else {
            true
        };
        self.best = Some(new);
        if significant {
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }
        true
    }

    /// Whether the run should stop after `generation` completed generations.
    pub(crate) fn check(&self, generation: usize) -> Option<StopReason> {
        if let (Some(target), Some(best)) = (self.target, self.best) {
            if self.objective.reached(best, target) {
                return Some(StopReason::TargetReached);
            }
        }
        if generation >= self.max_generations {
            return Some(StopReason::MaxGenerations);
        }
        if self.stagnation_limit > 0 && self.stagnation >= self.stagnation_limit {
            return Some(StopReason::Stagnation);
        }
        if self.time_limit.is_some_and(|limit| self.started.elapsed() >= limit) {
            return Some(StopReason::TimeLimit);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_generations() {
        let t = Termination::new(&GaConfig::default().with_max_generations(5));
        assert_eq!(t.check(4), None);
        assert_eq!(t.check(5), Some(StopReason::MaxGenerations));
    }

    #[test]
    fn test_target_beats_max_generations() {
        let mut t = Termination::new(
            &GaConfig::default()
                .with_max_generations(3)
                .with_target_fitness(10.0),
        );
        t.observe(Some(10.0));
        assert_eq!(t.check(3), Some(StopReason::TargetReached));
    }

    #[test]
    fn test_target_minimize() {
        let mut t = Termination::new(
            &GaConfig::default()
                .with_objective(Objective::Minimize)
                .with_target_fitness(1.0),
        );
        t.observe(Some(3.0));
        assert_eq!(t.check(1), None);
        t.observe(Some(0.5));
        assert_eq!(t.check(2), Some(StopReason::TargetReached));
    }

    #[test]
    fn test_stagnation_counter() {
        let mut t = Termination::new(&GaConfig::default().with_stagnation_limit(2));
        assert!(t.observe(Some(1.0)));
        assert!(!t.observe(Some(1.0)));
        assert_eq!(t.check(2), None);
        assert!(!t.observe(Some(0.5)));
        assert_eq!(t.stagnation(), 2);
        assert_eq!(t.check(3), Some(StopReason::Stagnation));
        assert!(t.observe(Some(2.0)));
        assert_eq!(t.stagnation(), 0);
    }

    #[test]
    fn test_convergence_threshold() {
        let mut t = Termination::new(&GaConfig::default().with_convergence_threshold(0.1));
        t.observe(Some(100.0));
        // 5% improvement: best moves but still counts as stagnating
        assert!(t.observe(Some(105.0)));
        assert_eq!(t.best(), Some(105.0));
        assert_eq!(t.stagnation(), 1);
        // 20% improvement resets
        t.observe(Some(126.0));
        assert_eq!(t.stagnation(), 0);
    }

    #[test]
    fn test_stagnation_disabled() {
        let mut t = Termination::new(&GaConfig::default().with_stagnation_limit(0));
        t.observe(Some(1.0));
        for _ in 0..100 {
            t.observe(Some(1.0));
        }
        assert_eq!(t.check(10), None);
    }

    #[test]
    fn test_time_limit() {
        let mut t = Termination::new(&GaConfig::default().with_time_limit_ms(1));
        t.start();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(t.check(1), Some(StopReason::TimeLimit));
    }
}
