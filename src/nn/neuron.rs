//! A single neuron: weighted sum of its inputs plus a bias, optionally rectified.

use std::fmt;
use std::str::FromStr;

use log::trace;
use rand::Rng;

use crate::autograd::{add, leaf, multiply, ScalarNode, ValueRef};

use super::{Init, NnError};

/// How a rectifying neuron clamps negative sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rectifier {
    /// Overwrites a negative sum with 0 in place. The node keeps its `Add` tag,
    /// so backward differentiates it as the unclamped sum.
    #[default]
    Clamp,
    /// Wraps the sum in a `Rectify` node whose gradient is gated to 0 when the
    /// sum is not positive.
    Gate,
}

impl fmt::Display for Rectifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rectifier::Clamp => f.write_str("clamp"),
            Rectifier::Gate => f.write_str("gate"),
        }
    }
}

impl FromStr for Rectifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(Rectifier::Clamp),
            "gate" => Ok(Rectifier::Gate),
            other => Err(format!("unknown rectifier {other:?} (expected clamp or gate)")),
        }
    }
}

/// One weight per input plus a bias, all leaf nodes.
#[derive(Clone, Debug)]
pub struct Neuron {
    weights: Vec<ValueRef>,
    bias: ValueRef,
    rectify: bool,
    rectifier: Rectifier,
}

impl Neuron {
    /// Creates a rectifying neuron with `input_count` weights and a bias drawn from `init`.
    ///
    /// Weights are drawn first, in input order, then the bias.
    pub fn new<R: Rng + ?Sized>(input_count: usize, rng: &mut R, init: &Init) -> Self {
        let weights = (0..input_count)
            .map(|_| ValueRef::new(init.sample(rng)))
            .collect();
        let bias = ValueRef::new(init.sample(rng));
        Self {
            weights,
            bias,
            rectify: true,
            rectifier: Rectifier::default(),
        }
    }

    /// Creates a neuron with fixed parameter values.
    #[must_use]
    pub fn from_parameters(weights: &[f64], bias: f64, rectify: bool) -> Self {
        Self {
            weights: weights.iter().copied().map(ValueRef::new).collect(),
            bias: ValueRef::new(bias),
            rectify,
            rectifier: Rectifier::default(),
        }
    }

    /// Same neuron, clamping with `rectifier`.
    #[must_use]
    pub fn with_rectifier(mut self, rectifier: Rectifier) -> Self {
        self.rectifier = rectifier;
        self
    }

    pub(crate) fn set_rectify(&mut self, rectify: bool) {
        self.rectify = rectify;
    }

    pub(crate) fn set_rectifier(&mut self, rectifier: Rectifier) {
        self.rectifier = rectifier;
    }

    /// Number of inputs (and weights).
    #[must_use]
    pub fn input_count(&self) -> usize {
        self.weights.len()
    }

    /// Weight leaves, one per input.
    #[must_use]
    pub fn weights(&self) -> &[ValueRef] {
        &self.weights
    }

    /// Bias leaf.
    #[must_use]
    pub fn bias(&self) -> &ValueRef {
        &self.bias
    }

    /// Whether negative sums are rectified.
    #[must_use]
    pub fn is_rectifying(&self) -> bool {
        self.rectify
    }

    /// Clamping mode used when [`is_rectifying`](Self::is_rectifying) is true.
    #[must_use]
    pub fn rectifier(&self) -> Rectifier {
        self.rectifier
    }

    /// Weights in input order, then the bias.
    #[must_use]
    pub fn parameters(&self) -> Vec<ValueRef> {
        let mut params = self.weights.clone();
        params.push(self.bias.clone());
        params
    }

    /// Builds `bias + x[0]*w[0] + x[1]*w[1] + ...` as a left fold, then rectifies.
    ///
    /// A neuron without inputs yields `bias + 0`, a fresh node, so clamping
    /// never writes into the bias leaf.
    pub fn forward(&self, inputs: &[ValueRef]) -> Result<ValueRef, NnError> {
        if inputs.len() != self.weights.len() {
            return Err(NnError::InputArity {
                expected: self.weights.len(),
                got: inputs.len(),
            });
        }
        let mut total = if self.weights.is_empty() {
            add(&self.bias, &leaf(0.0))
        } else {
            self.bias.clone()
        };
        for (x, w) in inputs.iter().zip(&self.weights) {
            total = add(&total, &multiply(x, w));
        }
        if !self.rectify {
            return Ok(total);
        }
        match self.rectifier {
            Rectifier::Clamp => {
                // total is always an Add node here, never the bias leaf.
                if total.data() < 0.0 {
                    trace!("neuron: clamping {} to 0", total.data());
                    total.set_data(0.0);
                }
                Ok(total)
            }
            Rectifier::Gate => Ok(total.rectify()),
        }
    }
}

impl fmt::Display for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.rectify {
            format!("rectify={}", self.rectifier)
        } else {
            "linear".to_string()
        };
        writeln!(f, "Neuron({kind}) bias: {}", self.bias)?;
        for (i, w) in self.weights.iter().enumerate() {
            writeln!(f, "  w[{i}]: {w}")?;
        }
        Ok(())
    }
}
