//! Logistic neurons on a graph.
//!
//! Each cell is a unit with its own bias and one weight per incoming
//! neighbour (in adjacency order). On compute the unit takes the
//! weighted sum of its neighbours' activations plus its bias and squashes
//! it through a logistic curve.

use std::io::{Read, Write};

use gyre_core::{Codec, FileFormatError, RuleError};
use gyre_engine::{Neighbors, UpdateRule};

/// A neuron's activation and parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeuronState {
    /// Output in `(0, 1)` after the first compute.
    pub activation: f64,
    /// Added to the weighted input before squashing.
    pub bias: f64,
    /// Weight of the `i`-th neighbour. Neighbours without a weight
    /// contribute nothing.
    pub weights: Vec<f64>,
}

impl NeuronState {
    /// A unit at `activation` with the given parameters.
    pub fn new(activation: f64, bias: f64, weights: Vec<f64>) -> Self {
        Self {
            activation,
            bias,
            weights,
        }
    }
}

impl Codec for NeuronState {
    fn encode(&self, w: &mut dyn Write) -> Result<(), FileFormatError> {
        self.activation.encode(w)?;
        self.bias.encode(w)?;
        self.weights.encode(w)
    }

    fn decode(r: &mut dyn Read) -> Result<Self, FileFormatError> {
        Ok(Self {
            activation: f64::decode(r)?,
            bias: f64::decode(r)?,
            weights: Vec::decode(r)?,
        })
    }
}

/// Logistic update: `activation' = 1 / (1 + e^(-k · (bias + Σ wᵢ·aᵢ)))`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neuron {
    steepness: f64,
}

impl Neuron {
    /// A rule with logistic steepness `k`.
    pub fn new(steepness: f64) -> Self {
        Self { steepness }
    }

    /// The logistic steepness `k`.
    pub fn steepness(&self) -> f64 {
        self.steepness
    }

    fn squash(&self, x: f64) -> f64 {
        1.0 / (1.0 + (-self.steepness * x).exp())
    }
}

impl Default for Neuron {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl UpdateRule<NeuronState> for Neuron {
    fn update(
        &self,
        previous: &NeuronState,
        neighbors: &Neighbors<'_, NeuronState>,
    ) -> Result<NeuronState, RuleError> {
        let input: f64 = neighbors
            .iter()
            .zip(&previous.weights)
            .map(|(n, w)| w * n.activation)
            .sum();
        let activation = self.squash(previous.bias + input);
        if activation.is_nan() {
            return Err(RuleError::ConstraintViolation {
                constraint: format!("activation is NaN (bias {}, input {input})", previous.bias),
            });
        }
        Ok(NeuronState {
            activation,
            bias: previous.bias,
            weights: previous.weights.clone(),
        })
    }
}
