//! Tours over a complete weighted graph.

use crate::error::ConfigError;
use crate::evaluation::{EvalContext, EvalError, Evaluator};
use crate::genotype::{Decoder, Genotype, GenotypeShape, SegmentShape, UintDecoder};
use rand::Rng;

/// Complete weighted graph. `weight(from, to)` is the cost of the edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    points: Vec<Vec<f64>>,
    weights: Vec<Vec<f64>>,
}

impl Graph {
    /// Symmetric graph whose weights are euclidean distances between
    /// `points`.
    pub fn euclidean(points: Vec<Vec<f64>>) -> Self {
        let n = points.len();
        let mut weights = vec![vec![0.0; n]; n];
        for j in 0..n {
            for i in (j + 1)..n {
                let d = distance(&points[j], &points[i]);
                weights[j][i] = d;
                weights[i][j] = d;
            }
        }
        Self { points, weights }
    }

    /// Graph from an explicit `n × n` weight matrix.
    ///
    /// # Errors
    /// [`ConfigError::LengthMismatch`] if the matrix is not square.
    pub fn from_weights(weights: Vec<Vec<f64>>) -> Result<Self, ConfigError> {
        let n = weights.len();
        if let Some(row) = weights.iter().find(|row| row.len() != n) {
            return Err(ConfigError::LengthMismatch {
                what: "weight matrix row",
                expected: n,
                found: row.len(),
            });
        }
        Ok(Self {
            points: Vec::new(),
            weights,
        })
    }

    /// `n` nodes placed uniformly in the unit hypercube of `dims` dimensions.
    pub fn random<R: Rng + ?Sized>(n: usize, dims: usize, rng: &mut R) -> Self {
        let points = (0..n)
            .map(|_| (0..dims).map(|_| rng.random::<f64>()).collect())
            .collect();
        Self::euclidean(points)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Node coordinates. Empty for graphs built from a weight matrix.
    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    pub fn weight(&self, from: usize, to: usize) -> f64 {
        self.weights[from][to]
    }

    /// Sum of edge weights along `path`, without returning to the start.
    pub fn path_length(&self, path: &[usize]) -> f64 {
        path.windows(2).map(|w| self.weights[w[0]][w[1]]).sum()
    }

    /// Length of the closed tour through `tour`.
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        match (tour.first(), tour.last()) {
            (Some(&first), Some(&last)) if tour.len() > 1 => {
                self.path_length(tour) + self.weights[last][first]
            }
            _ => 0.0,
        }
    }
}

fn distance(u: &[f64], v: &[f64]) -> f64 {
    u.iter()
        .zip(v)
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}

/// Decodes integer genes into a Hamiltonian cycle by insertion.
///
/// Starts from `[0]`; gene `j` inserts node `j + 1` at position
/// `gene_j mod (j + 2)`. Any gene values yield a valid permutation of
/// `0..=genes.len()`, so plain binary or integer segments can encode tours
/// without permutation-aware operators.
///
/// Genes are read with [`UintDecoder`]: one gene per binary segment, one per
/// integer allele.
///
/// ```
/// use u_evolve::genotype::{Decoder, Genotype, IntegerSegment, Segment};
/// use u_evolve::problems::InsertionDecoder;
///
/// let genes = IntegerSegment::new(vec![0, 2, 1], 0, 3).unwrap();
/// let g = Genotype::single(Segment::Integer(genes));
/// assert_eq!(InsertionDecoder.decode(&g), vec![1, 3, 0, 2]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionDecoder;

impl InsertionDecoder {
    /// One integer gene per node after the first.
    ///
    /// `nodes` must be at least 2.
    pub fn integer_shape(nodes: usize) -> GenotypeShape {
        let genes = nodes.saturating_sub(1);
        GenotypeShape::single(SegmentShape::integer(genes, 0, genes as i64))
    }

    /// One `bits`-wide binary segment per node after the first.
    pub fn binary_shape(nodes: usize, bits: usize) -> GenotypeShape {
        GenotypeShape::repeated(SegmentShape::binary(bits), nodes.saturating_sub(1))
    }

    pub fn insert(genes: &[u64]) -> Vec<usize> {
        let mut tour = Vec::with_capacity(genes.len() + 1);
        tour.push(0);
        for (j, &gene) in genes.iter().enumerate() {
            let position = (gene % (j as u64 + 2)) as usize;
            tour.insert(position, j + 1);
        }
        tour
    }
}

impl Decoder for InsertionDecoder {
    type Phenotype = Vec<usize>;

    fn decode(&self, genotype: &Genotype) -> Vec<usize> {
        Self::insert(&UintDecoder.decode(genotype))
    }
}

/// Closed tour length of the decoded genotype. Minimize.
///
/// Works with [`PermutationDecoder`](crate::genotype::PermutationDecoder) or
/// [`InsertionDecoder`].
#[derive(Debug, Clone)]
pub struct TourLength<D> {
    graph: Graph,
    decoder: D,
}

impl<D> TourLength<D>
where
    D: Decoder<Phenotype = Vec<usize>>,
{
    pub fn new(graph: Graph, decoder: D) -> Self {
        Self { graph, decoder }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn tour(&self, genotype: &Genotype) -> Vec<usize> {
        self.decoder.decode(genotype)
    }
}

impl<D> Evaluator for TourLength<D>
where
    D: Decoder<Phenotype = Vec<usize>>,
{
    fn evaluate(&self, genotype: &Genotype, _ctx: &mut EvalContext) -> Result<f64, EvalError> {
        let tour = self.decoder.decode(genotype);
        if let Some(&node) = tour.iter().find(|&&node| node >= self.graph.len()) {
            return Err(EvalError::Failed(format!(
                "tour visits node {node} but the graph has {} nodes",
                self.graph.len()
            )));
        }
        Ok(self.graph.tour_length(&tour))
    }

    fn name(&self) -> &str {
        "tour_length"
    }
}
