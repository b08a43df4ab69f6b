//! Permutation chromosome segments.
//!
//! A permutation segment of length `n` holds every element of `0..n` exactly
//! once. Position-wise crossover would break that invariant, so these segments
//! use order-preserving recombination and rearranging mutations only.
//!
//! # Crossover
//!
//! - [`PermutationCrossover::Order`] (OX): Davis (1985), keeps relative order
//! - [`PermutationCrossover::PartiallyMapped`] (PMX): Goldberg & Lingle (1985),
//!   keeps absolute positions where possible
//!
//! # Mutation
//!
//! - [`PermutationMutation::Swap`]: exchange two positions
//! - [`PermutationMutation::Inversion`]: reverse the stretch between two positions
//! - [`PermutationMutation::Insertion`]: move one element elsewhere
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use crate::error::ConfigError;
use rand::seq::SliceRandom;
use rand::Rng;

/// Crossover method for permutation segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PermutationCrossover {
    #[default]
    Order,
    PartiallyMapped,
}

/// Mutation primitive for permutation segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PermutationMutation {
    #[default]
    Swap,
    Inversion,
    Insertion,
}

/// An ordering of `0..len`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermutationSegment {
    order: Vec<usize>,
}

impl PermutationSegment {
    /// Wraps an explicit ordering, rejecting anything that is not a
    /// permutation of `0..order.len()`.
    pub fn new(order: Vec<usize>) -> Result<Self, ConfigError> {
        if !is_permutation(&order) {
            return Err(ConfigError::InvalidPermutation { len: order.len() });
        }
        Ok(Self { order })
    }

    /// `0, 1, ..., len - 1`.
    pub fn identity(len: usize) -> Self {
        Self {
            order: (0..len).collect(),
        }
    }

    /// A uniformly random permutation.
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(rng);
        Self { order }
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Recombines two equal-length permutations. Callers check the lengths.
    pub(crate) fn crossover<R: Rng + ?Sized>(
        &self,
        other: &Self,
        method: PermutationCrossover,
        rng: &mut R,
    ) -> (Self, Self) {
        let n = self.order.len();
        if n < 2 {
            return (self.clone(), other.clone());
        }
        let (start, end) = random_segment(n, rng);
        match method {
            PermutationCrossover::Order => (
                self.order_child(other, start, end),
                other.order_child(self, start, end),
            ),
            PermutationCrossover::PartiallyMapped => (
                self.mapped_child(other, start, end),
                other.mapped_child(self, start, end),
            ),
        }
    }

    /// OX: the child keeps `self[start..=end]`. The free positions, taken
    /// cyclically from `end + 1`, receive the genes missing from that slice
    /// in the order `donor` lists them from `end + 1` on.
    fn order_child(&self, donor: &Self, start: usize, end: usize) -> Self {
        let n = self.order.len();
        let mut used = vec![false; n];
        for &gene in &self.order[start..=end] {
            used[gene] = true;
        }
        let mut missing = donor.order[end + 1..]
            .iter()
            .chain(&donor.order[..=end])
            .copied()
            .filter(|&gene| !used[gene]);

        let mut order = self.order.clone();
        for pos in (end + 1..n).chain(0..start) {
            if let Some(gene) = missing.next() {
                order[pos] = gene;
            }
        }
        Self { order }
    }

    /// PMX by successive swaps: starting from `donor`, each position of the
    /// kept slice swaps in the gene `self` has there. Genes outside the slice
    /// move only when the slice displaces them.
    fn mapped_child(&self, donor: &Self, start: usize, end: usize) -> Self {
        let mut order = donor.order.clone();
        let mut position = vec![0usize; order.len()];
        for (i, &gene) in order.iter().enumerate() {
            position[gene] = i;
        }
        for i in start..=end {
            let wanted = self.order[i];
            let j = position[wanted];
            if j != i {
                let displaced = order[i];
                order.swap(i, j);
                position[displaced] = j;
                position[wanted] = i;
            }
        }
        Self { order }
    }

    /// Applies `style` anchored at position `index`, pairing it with a
    /// different random position.
    ///
    /// Returns `false` only for segments shorter than two elements.
    pub(crate) fn mutate_at<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        style: PermutationMutation,
        rng: &mut R,
    ) -> bool {
        let n = self.order.len();
        if n < 2 {
            return false;
        }
        let mut other = rng.random_range(0..n - 1);
        if other >= index {
            other += 1;
        }
        match style {
            PermutationMutation::Swap => self.order.swap(index, other),
            PermutationMutation::Inversion => {
                let (lo, hi) = (index.min(other), index.max(other));
                self.order[lo..=hi].reverse();
            }
            PermutationMutation::Insertion => {
                let item = self.order.remove(index);
                self.order.insert(other, item);
            }
        }
        true
    }
}

/// Checks that `values` holds every element of `0..values.len()` once.
pub fn is_permutation(values: &[usize]) -> bool {
    let n = values.len();
    let mut seen = vec![false; n];
    for &v in values {
        if v >= n || seen[v] {
            return false;
        }
        seen[v] = true;
    }
    true
}

/// A random inclusive range `[start, end]` within `0..n`.
fn random_segment<R: Rng + ?Sized>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    (a.min(b), a.max(b))
}
