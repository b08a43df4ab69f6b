//! Position-wise crossover for fixed-length allele vectors.
//!
//! Shared by binary and integer segments. Any allele may sit at any position
//! in these encodings, so exchanging aligned slices always yields valid
//! offspring.

use rand::Rng;

/// Crossover method for binary and integer segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VectorCrossover {
    /// One cut point; tails are exchanged.
    #[default]
    SinglePoint,
    /// `n` distinct cut points; alternate stretches are exchanged.
    MultiPoint(usize),
    /// Every position is exchanged independently with probability 0.5.
    Uniform,
}

impl VectorCrossover {
    /// Recombines two equal-length allele vectors into two children.
    ///
    /// Callers guarantee `a.len() == b.len()`.
    pub(crate) fn apply<T: Clone, R: Rng + ?Sized>(
        &self,
        a: &[T],
        b: &[T],
        rng: &mut R,
    ) -> (Vec<T>, Vec<T>) {
        debug_assert_eq!(a.len(), b.len());
        match self {
            VectorCrossover::SinglePoint => n_point(a, b, 1, rng),
            VectorCrossover::MultiPoint(n) => n_point(a, b, *n, rng),
            VectorCrossover::Uniform => uniform(a, b, rng),
        }
    }
}

/// Cut points are drawn from `1..len` so both sides of every cut are non-empty.
fn n_point<T: Clone, R: Rng + ?Sized>(
    a: &[T],
    b: &[T],
    points: usize,
    rng: &mut R,
) -> (Vec<T>, Vec<T>) {
    let n = a.len();
    if n < 2 || points == 0 {
        return (a.to_vec(), b.to_vec());
    }

    let points = points.min(n - 1);
    let mut cuts: Vec<usize> = rand::seq::index::sample(rng, n - 1, points)
        .into_iter()
        .map(|c| c + 1)
        .collect();
    cuts.sort_unstable();

    let mut c1 = Vec::with_capacity(n);
    let mut c2 = Vec::with_capacity(n);
    let mut swapped = false;
    let mut next_cut = cuts.iter().peekable();
    for i in 0..n {
        while next_cut.peek().is_some_and(|&&c| c == i) {
            swapped = !swapped;
            next_cut.next();
        }
        if swapped {
            c1.push(b[i].clone());
            c2.push(a[i].clone());
        } else {
            c1.push(a[i].clone());
            c2.push(b[i].clone());
        }
    }
    (c1, c2)
}

fn uniform<T: Clone, R: Rng + ?Sized>(a: &[T], b: &[T], rng: &mut R) -> (Vec<T>, Vec<T>) {
    let mut c1 = Vec::with_capacity(a.len());
    let mut c2 = Vec::with_capacity(a.len());
    for (x, y) in a.iter().zip(b) {
        if rng.random_bool(0.5) {
            c1.push(y.clone());
            c2.push(x.clone());
        } else {
            c1.push(x.clone());
            c2.push(y.clone());
        }
    }
    (c1, c2)
}
