//! Ordered operator pipeline.

use super::{
    Crossover, GeneticOperator, KTournament, Mutate, SelectLethals, SelectionMethod, Stage,
    SusSelection,
};
use crate::error::ConfigError;
use crate::evaluation::Evaluator;
use crate::observer::Observer;
use crate::scheduler::GaConfig;

/// Evaluator, operators and observers of one run, in execution order.
///
/// # Examples
///
/// ```
/// use u_evolve::evaluation;
/// use u_evolve::operators::{Crossover, KTournament, Mutate, Pipeline, Replacement, SelectLethals};
///
/// let pipeline = Pipeline::new()
///     .with_evaluator(evaluation::from_fn(|g| g.allele_count() as f64))
///     .with_operator(KTournament::new(3))
///     .with_operator(Crossover::new(0.8))
///     .with_operator(Mutate::new(0.01))
///     .with_operator(SelectLethals::new(Replacement::Append));
/// assert!(pipeline.validate().is_ok());
/// ```
#[derive(Default)]
pub struct Pipeline {
    pub(crate) evaluator: Option<Box<dyn Evaluator>>,
    pub(crate) operators: Vec<Box<dyn GeneticOperator>>,
    pub(crate) observers: Vec<Box<dyn Observer>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard generational loop described by `config`:
    /// selection, crossover, mutation, replacement.
    pub fn standard<E: Evaluator + 'static>(config: &GaConfig, evaluator: E) -> Self {
        let pool = config.pool_size();
        let pipeline = Self::new().with_evaluator(evaluator);
        let pipeline = match config.selection {
            SelectionMethod::Tournament(k) => {
                pipeline.with_operator(KTournament::new(k).with_pool_size(pool))
            }
            SelectionMethod::TournamentDistinct(k) => {
                pipeline.with_operator(KTournament::distinct(k).with_pool_size(pool))
            }
            SelectionMethod::Sus => pipeline.with_operator(
                SusSelection::new()
                    .with_pool_size(pool)
                    .with_scaling(config.fitness_scaling),
            ),
        };
        pipeline
            .with_operator(
                Crossover::new(config.crossover_rate)
                    .with_pairing(config.pairing)
                    .with_scheme(config.crossover),
            )
            .with_operator(
                Mutate::new(config.mutation_rate)
                    .with_permutation_style(config.permutation_mutation),
            )
            .with_operator(SelectLethals::new(config.replacement))
    }

    pub fn with_evaluator<E: Evaluator + 'static>(mut self, evaluator: E) -> Self {
        self.evaluator = Some(Box::new(evaluator));
        self
    }

    pub fn with_operator<O: GeneticOperator + 'static>(mut self, operator: O) -> Self {
        self.operators.push(Box::new(operator));
        self
    }

    pub fn with_observer<O: Observer + 'static>(mut self, observer: O) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Operator names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.operators.iter().map(|op| op.name()).collect()
    }

    /// Checks that the pipeline can run.
    ///
    /// - at least one operator and an evaluator
    /// - stages never decrease
    /// - recombination has a selection operator before it and a replacement
    ///   operator after it
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.operators.is_empty() {
            return Err(ConfigError::EmptyPipeline);
        }
        if self.evaluator.is_none() {
            return Err(ConfigError::MissingEvaluator);
        }
        for pair in self.operators.windows(2) {
            if pair[1].stage() < pair[0].stage() {
                return Err(ConfigError::OperatorOrder {
                    earlier: pair[0].name().to_string(),
                    later: pair[1].name().to_string(),
                });
            }
        }
        for (i, op) in self.operators.iter().enumerate() {
            if op.stage() != Stage::Recombination {
                continue;
            }
            let (before, after) = self.operators.split_at(i);
            if !before.iter().any(|o| o.stage() == Stage::Selection) {
                return Err(ConfigError::MissingSelection {
                    operator: op.name().to_string(),
                });
            }
            if !after.iter().any(|o| o.stage() == Stage::Replacement) {
                return Err(ConfigError::MissingReplacement {
                    operator: op.name().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("evaluator", &self.evaluator.as_ref().map(|e| e.name()))
            .field("operators", &self.names())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation;
    use crate::operators::Replacement;

    fn eval() -> impl Evaluator {
        evaluation::from_fn(|_| 0.0)
    }

    #[test]
    fn test_standard_pipeline_is_valid() {
        let p = Pipeline::standard(&GaConfig::default(), eval());
        assert!(p.validate().is_ok());
        assert_eq!(
            p.names(),
            vec!["k_tournament", "crossover", "mutate", "select_lethals"]
        );

        let sus = GaConfig::default().with_selection(SelectionMethod::Sus);
        assert_eq!(Pipeline::standard(&sus, eval()).names()[0], "sus_selection");
    }

    #[test]
    fn test_empty_and_missing_evaluator() {
        assert_eq!(Pipeline::new().validate(), Err(ConfigError::EmptyPipeline));
        let p = Pipeline::new().with_operator(Mutate::new(0.1));
        assert_eq!(p.validate(), Err(ConfigError::MissingEvaluator));
    }

    #[test]
    fn test_mutation_only_pipeline_is_valid() {
        let p = Pipeline::new()
            .with_evaluator(eval())
            .with_operator(Mutate::new(0.1));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_crossover_needs_selection() {
        let p = Pipeline::new()
            .with_evaluator(eval())
            .with_operator(Crossover::new(0.9))
            .with_operator(SelectLethals::default());
        assert_eq!(
            p.validate(),
            Err(ConfigError::MissingSelection {
                operator: "crossover".into()
            })
        );
    }

    #[test]
    fn test_crossover_needs_replacement() {
        let p = Pipeline::new()
            .with_evaluator(eval())
            .with_operator(KTournament::new(2))
            .with_operator(Crossover::new(0.9));
        assert!(matches!(
            p.validate(),
            Err(ConfigError::MissingReplacement { .. })
        ));
    }

    #[test]
    fn test_stage_order() {
        let p = Pipeline::new()
            .with_evaluator(eval())
            .with_operator(KTournament::new(2))
            .with_operator(SelectLethals::new(Replacement::Generational))
            .with_operator(Mutate::new(0.1));
        assert_eq!(
            p.validate(),
            Err(ConfigError::OperatorOrder {
                earlier: "select_lethals".into(),
                later: "mutate".into()
            })
        );
    }
}
