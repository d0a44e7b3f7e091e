//! A layer: neurons that all read the same inputs.

use std::fmt;

use rand::Rng;

use crate::autograd::ValueRef;

use super::{Init, Neuron, NnError, Rectifier};

/// Ordered neurons sharing one input arity.
#[derive(Clone, Debug)]
pub struct Layer {
    neurons: Vec<Neuron>,
}

impl Layer {
    /// Creates `output_count` rectifying neurons, each with `input_count` inputs.
    pub fn new<R: Rng + ?Sized>(
        input_count: usize,
        output_count: usize,
        rng: &mut R,
        init: &Init,
    ) -> Result<Self, NnError> {
        if output_count == 0 {
            return Err(NnError::EmptyLayer);
        }
        let neurons = (0..output_count)
            .map(|_| Neuron::new(input_count, rng, init))
            .collect();
        Ok(Self { neurons })
    }

    /// Wraps existing neurons; they must all take the same number of inputs.
    pub fn from_neurons(neurons: Vec<Neuron>) -> Result<Self, NnError> {
        let expected = neurons.first().ok_or(NnError::EmptyLayer)?.input_count();
        if let Some((index, n)) = neurons
            .iter()
            .enumerate()
            .find(|(_, n)| n.input_count() != expected)
        {
            return Err(NnError::ArityMismatch {
                index,
                expected,
                got: n.input_count(),
            });
        }
        Ok(Self { neurons })
    }

    /// Neurons in output order.
    #[must_use]
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// Number of inputs every neuron takes.
    #[must_use]
    pub fn input_count(&self) -> usize {
        self.neurons[0].input_count()
    }

    /// Number of neurons, i.e. outputs.
    #[must_use]
    pub fn output_count(&self) -> usize {
        self.neurons.len()
    }

    pub(crate) fn set_rectify(&mut self, rectify: bool) {
        for n in &mut self.neurons {
            n.set_rectify(rectify);
        }
    }

    pub(crate) fn set_rectifier(&mut self, rectifier: Rectifier) {
        for n in &mut self.neurons {
            n.set_rectifier(rectifier);
        }
    }

    /// Parameters of every neuron, in neuron order.
    #[must_use]
    pub fn parameters(&self) -> Vec<ValueRef> {
        self.neurons.iter().flat_map(Neuron::parameters).collect()
    }

    /// One output per neuron, in neuron order.
    pub fn forward(&self, inputs: &[ValueRef]) -> Result<Vec<ValueRef>, NnError> {
        self.neurons.iter().map(|n| n.forward(inputs)).collect()
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for n in &self.neurons {
            write!(f, "{n}")?;
        }
        Ok(())
    }
}
