//! Fixed-topology feed-forward network with genetic operators.
//!
//! The network has exactly one hidden layer with ReLU activation and a
//! linear output layer. Only output unit 0 is used to derive the binary
//! decision returned by [`FeedForwardNetwork::predict`].

use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::{NeatError, Result};

/// Probability that a single weight or bias changes during [`FeedForwardNetwork::mutate`].
///
/// Independent of the population-level `mutation_rate`, which only decides
/// whether `mutate` is called on a network at all.
pub const ENTRY_MUTATION_PROBABILITY: f64 = 0.1;

/// Width of the uniform perturbation added to a mutated entry, centred on zero.
pub const MUTATION_SPREAD: f32 = 0.5;

/// Output activation above which the network decides to act.
pub const DECISION_THRESHOLD: f32 = 0.5;

/// A small input → hidden → output network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedForwardNetwork {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    /// Weight matrix (`input_size` × `hidden_size`).
    weights_input_hidden: Array2<f32>,
    /// Weight matrix (`hidden_size` × `output_size`).
    weights_hidden_output: Array2<f32>,
    bias_hidden: Array1<f32>,
    bias_output: Array1<f32>,
    pub(crate) fitness: f32,
    pub(crate) score: f32,
}

impl FeedForwardNetwork {
    /// Creates a network with every weight and bias drawn uniformly from `[-1, 1]`.
    pub fn new_random<R: Rng>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Self {
        let mut uniform = || rng.random_range(-1.0f32..=1.0);
        let weights_input_hidden = Array2::from_shape_fn((input_size, hidden_size), |_| uniform());
        let weights_hidden_output =
            Array2::from_shape_fn((hidden_size, output_size), |_| uniform());
        let bias_hidden = Array1::from_shape_fn(hidden_size, |_| uniform());
        let bias_output = Array1::from_shape_fn(output_size, |_| uniform());

        Self {
            input_size,
            hidden_size,
            output_size,
            weights_input_hidden,
            weights_hidden_output,
            bias_hidden,
            bias_output,
            fitness: 0.0,
            score: 0.0,
        }
    }

    /// Builds a network from explicit parameters.
    ///
    /// The layer sizes are inferred from `weights_input_hidden`; every other
    /// array must agree with them.
    pub fn from_parts(
        weights_input_hidden: Array2<f32>,
        bias_hidden: Array1<f32>,
        weights_hidden_output: Array2<f32>,
        bias_output: Array1<f32>,
    ) -> Result<Self> {
        let (input_size, hidden_size) = weights_input_hidden.dim();
        let output_size = weights_hidden_output.ncols();

        let network = Self {
            input_size,
            hidden_size,
            output_size,
            weights_input_hidden,
            weights_hidden_output,
            bias_hidden,
            bias_output,
            fitness: 0.0,
            score: 0.0,
        };
        network.check_integrity()?;
        Ok(network)
    }

    /// Verifies that array shapes match the stored sizes and every value is finite.
    pub(crate) fn check_integrity(&self) -> Result<()> {
        if self.input_size == 0 || self.hidden_size == 0 || self.output_size == 0 {
            return Err(NeatError::InvalidConfig(
                "network layers must be non-empty".to_string(),
            ));
        }

        let shapes = [
            (self.input_size, self.weights_input_hidden.nrows()),
            (self.hidden_size, self.weights_input_hidden.ncols()),
            (self.hidden_size, self.weights_hidden_output.nrows()),
            (self.output_size, self.weights_hidden_output.ncols()),
            (self.hidden_size, self.bias_hidden.len()),
            (self.output_size, self.bias_output.len()),
        ];
        for (expected, actual) in shapes {
            if expected != actual {
                return Err(NeatError::DimensionMismatch { expected, actual });
            }
        }

        if !self.parameters().all(f32::is_finite) {
            return Err(NeatError::InvalidConfig(
                "network parameters must be finite".to_string(),
            ));
        }

        Ok(())
    }

    /// Runs a forward pass and returns the raw output layer.
    pub fn activate(&self, inputs: &[f32]) -> Result<Array1<f32>> {
        if inputs.len() != self.input_size {
            return Err(NeatError::DimensionMismatch {
                expected: self.input_size,
                actual: inputs.len(),
            });
        }

        let inputs = ArrayView1::from(inputs);
        let mut hidden = inputs.dot(&self.weights_input_hidden);
        hidden += &self.bias_hidden;
        hidden.mapv_inplace(|x| x.max(0.0));

        let mut output = hidden.dot(&self.weights_hidden_output);
        output += &self.bias_output;
        Ok(output)
    }

    /// Returns `1` when output unit 0 exceeds [`DECISION_THRESHOLD`], `0` otherwise.
    #[inline]
    pub fn predict(&self, inputs: &[f32]) -> Result<u8> {
        let output = self.activate(inputs)?;
        Ok(if output[0] > DECISION_THRESHOLD { 1 } else { 0 })
    }

    /// Creates a child whose every entry is copied from `self` or `other` with equal odds.
    pub fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> Result<Self> {
        self.check_same_shape(other)?;
        Ok(self.inherit(other, rng))
    }

    /// Uniform crossover for parents already known to share a topology.
    pub(crate) fn inherit<R: Rng>(&self, other: &Self, rng: &mut R) -> Self {
        Self {
            input_size: self.input_size,
            hidden_size: self.hidden_size,
            output_size: self.output_size,
            weights_input_hidden: pick_matrix(
                &self.weights_input_hidden,
                &other.weights_input_hidden,
                rng,
            ),
            weights_hidden_output: pick_matrix(
                &self.weights_hidden_output,
                &other.weights_hidden_output,
                rng,
            ),
            bias_hidden: pick_vector(&self.bias_hidden, &other.bias_hidden, rng),
            bias_output: pick_vector(&self.bias_output, &other.bias_output, rng),
            fitness: 0.0,
            score: 0.0,
        }
    }

    /// Perturbs each entry with probability [`ENTRY_MUTATION_PROBABILITY`].
    ///
    /// A selected entry moves by a uniform amount in
    /// `[-MUTATION_SPREAD / 2, MUTATION_SPREAD / 2)`; the rest stay bit-identical.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R) {
        let mut perturb = |value: &mut f32| {
            if rng.random_bool(ENTRY_MUTATION_PROBABILITY) {
                *value += (rng.random::<f32>() - 0.5) * MUTATION_SPREAD;
            }
        };

        self.weights_input_hidden.iter_mut().for_each(&mut perturb);
        self.bias_hidden.iter_mut().for_each(&mut perturb);
        self.weights_hidden_output.iter_mut().for_each(&mut perturb);
        self.bias_output.iter_mut().for_each(&mut perturb);
    }

    fn check_same_shape(&self, other: &Self) -> Result<()> {
        let pairs = [
            (self.input_size, other.input_size),
            (self.hidden_size, other.hidden_size),
            (self.output_size, other.output_size),
        ];
        for (expected, actual) in pairs {
            if expected != actual {
                return Err(NeatError::DimensionMismatch { expected, actual });
            }
        }
        Ok(())
    }

    /// Iterates all weights and biases: input→hidden weights, hidden biases,
    /// hidden→output weights, output biases.
    pub fn parameters(&self) -> impl Iterator<Item = f32> + '_ {
        self.weights_input_hidden
            .iter()
            .chain(self.bias_hidden.iter())
            .chain(self.weights_hidden_output.iter())
            .chain(self.bias_output.iter())
            .copied()
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        (self.input_size + 1) * self.hidden_size + (self.hidden_size + 1) * self.output_size
    }

    /// Number of inputs expected by [`predict`](Self::predict).
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Width of the hidden layer.
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Number of output units.
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Input → hidden weights.
    pub fn weights_input_hidden(&self) -> &Array2<f32> {
        &self.weights_input_hidden
    }

    /// Hidden → output weights.
    pub fn weights_hidden_output(&self) -> &Array2<f32> {
        &self.weights_hidden_output
    }

    /// Hidden layer biases.
    pub fn bias_hidden(&self) -> &Array1<f32> {
        &self.bias_hidden
    }

    /// Output layer biases.
    pub fn bias_output(&self) -> &Array1<f32> {
        &self.bias_output
    }

    /// Ranking value assigned by the last fitness update.
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Raw episode score from the last report.
    pub fn score(&self) -> f32 {
        self.score
    }
}

fn pick_matrix<R: Rng>(a: &Array2<f32>, b: &Array2<f32>, rng: &mut R) -> Array2<f32> {
    Array2::from_shape_fn(a.dim(), |idx| if rng.random_bool(0.5) { a[idx] } else { b[idx] })
}

fn pick_vector<R: Rng>(a: &Array1<f32>, b: &Array1<f32>, rng: &mut R) -> Array1<f32> {
    Array1::from_shape_fn(a.len(), |i| if rng.random_bool(0.5) { a[i] } else { b[i] })
}
