//! 0-1 knapsack.

use crate::error::ConfigError;
use crate::evaluation::{EvalContext, EvalError, Evaluator};
use crate::genotype::{Genotype, GenotypeShape, Segment, SegmentShape};

/// 0-1 knapsack scored with a relaxed objective.
///
/// ```text
/// f(s) = c·s + λ · min(0, V - v·s)
/// ```
///
/// Feasible selections score their plain value; overfull ones lose `λ` per
/// unit of excess volume. The selection vector is read from the bits of all
/// binary segments in order, so both one segment of `n` bits and `n`
/// one-bit segments work.
///
/// # Examples
///
/// ```
/// use u_evolve::problems::Knapsack;
///
/// let k = Knapsack::new(vec![10.0, 6.0], vec![5.0, 4.0], 8.0, 3.0).unwrap();
/// assert_eq!(k.fitness(&[true, false]), 10.0);
/// // one unit over capacity
/// assert_eq!(k.fitness(&[true, true]), 16.0 - 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Knapsack {
    costs: Vec<f64>,
    volumes: Vec<f64>,
    capacity: f64,
    penalty: f64,
}

impl Knapsack {
    /// # Errors
    /// [`ConfigError::LengthMismatch`] if `costs` and `volumes` differ in
    /// length.
    pub fn new(
        costs: Vec<f64>,
        volumes: Vec<f64>,
        capacity: f64,
        penalty: f64,
    ) -> Result<Self, ConfigError> {
        if costs.len() != volumes.len() {
            return Err(ConfigError::LengthMismatch {
                what: "volumes",
                expected: costs.len(),
                found: volumes.len(),
            });
        }
        Ok(Self {
            costs,
            volumes,
            capacity,
            penalty,
        })
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// One bit per object.
    pub fn shape(&self) -> GenotypeShape {
        GenotypeShape::single(SegmentShape::binary(self.len()))
    }

    pub fn value(&self, selection: &[bool]) -> f64 {
        dot(&self.costs, selection)
    }

    pub fn volume(&self, selection: &[bool]) -> f64 {
        dot(&self.volumes, selection)
    }

    pub fn is_feasible(&self, selection: &[bool]) -> bool {
        self.volume(selection) <= self.capacity
    }

    /// Relaxed objective of a selection vector.
    pub fn fitness(&self, selection: &[bool]) -> f64 {
        let residual = self.capacity - self.volume(selection);
        self.value(selection) + self.penalty * residual.min(0.0)
    }

    /// Selection vector carried by `genotype`.
    pub fn selection(genotype: &Genotype) -> Vec<bool> {
        genotype
            .segments()
            .iter()
            .filter_map(|seg| match seg {
                Segment::Binary(b) => Some(b.bits()),
                _ => None,
            })
            .flatten()
            .copied()
            .collect()
    }
}

fn dot(weights: &[f64], selection: &[bool]) -> f64 {
    weights
        .iter()
        .zip(selection)
        .filter(|(_, &taken)| taken)
        .map(|(w, _)| w)
        .sum()
}

impl Evaluator for Knapsack {
    fn evaluate(&self, genotype: &Genotype, _ctx: &mut EvalContext) -> Result<f64, EvalError> {
        let selection = Self::selection(genotype);
        if selection.len() != self.len() {
            return Err(EvalError::Failed(format!(
                "knapsack has {} objects, genotype carries {} bits",
                self.len(),
                selection.len()
            )));
        }
        Ok(self.fitness(&selection))
    }

    fn name(&self) -> &str {
        "knapsack"
    }
}
