//! Multi-layer perceptron: layers chained output-to-input.

use std::fmt;

use log::debug;
use rand::Rng;

use crate::autograd::{ScalarNode, ValueRef};

use super::{Init, Layer, NnError, Rectifier};

/// Ordered layers where layer `i`'s width is layer `i + 1`'s input count.
///
/// Hidden layers rectify; the final layer is always linear.
#[derive(Clone, Debug)]
pub struct Mlp {
    layers: Vec<Layer>,
}

impl Mlp {
    /// Builds a network taking `input_count` inputs with `layer_sizes[i]` neurons in layer `i`.
    pub fn new<R: Rng + ?Sized>(
        input_count: usize,
        layer_sizes: &[usize],
        rng: &mut R,
        init: &Init,
    ) -> Result<Self, NnError> {
        if layer_sizes.is_empty() {
            return Err(NnError::EmptyLayerSizes);
        }
        if let Some(index) = layer_sizes.iter().position(|&s| s == 0) {
            return Err(NnError::ZeroWidthLayer { index });
        }
        let mut layers = Vec::with_capacity(layer_sizes.len());
        let mut fan_in = input_count;
        for &size in layer_sizes {
            layers.push(Layer::new(fan_in, size, rng, init)?);
            fan_in = size;
        }
        debug!(
            "mlp: built {} layers for {} inputs, sizes {:?}",
            layers.len(),
            input_count,
            layer_sizes
        );
        Self::from_layers(layers)
    }

    /// Chains existing layers. The final layer is switched to linear output.
    pub fn from_layers(mut layers: Vec<Layer>) -> Result<Self, NnError> {
        for (index, pair) in layers.windows(2).enumerate() {
            if pair[1].input_count() != pair[0].output_count() {
                return Err(NnError::ArityMismatch {
                    index: index + 1,
                    expected: pair[0].output_count(),
                    got: pair[1].input_count(),
                });
            }
        }
        layers
            .last_mut()
            .ok_or(NnError::EmptyLayerSizes)?
            .set_rectify(false);
        Ok(Self { layers })
    }

    /// Same network, clamping hidden layers with `rectifier`.
    #[must_use]
    pub fn with_rectifier(mut self, rectifier: Rectifier) -> Self {
        for layer in &mut self.layers {
            layer.set_rectifier(rectifier);
        }
        self
    }

    /// Layers from input to output.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of inputs the first layer takes.
    #[must_use]
    pub fn input_count(&self) -> usize {
        self.layers[0].input_count()
    }

    /// Width of the final layer.
    #[must_use]
    pub fn output_count(&self) -> usize {
        self.layers[self.layers.len() - 1].output_count()
    }

    /// Every weight and bias, layer by layer.
    #[must_use]
    pub fn parameters(&self) -> Vec<ValueRef> {
        self.layers.iter().flat_map(Layer::parameters).collect()
    }

    /// Zeros the gradient of every parameter.
    pub fn zero_grad(&self) {
        for p in self.parameters() {
            p.zero_grad();
        }
    }

    /// Feeds `inputs` through every layer and returns the final layer's outputs.
    pub fn forward(&self, inputs: &[ValueRef]) -> Result<Vec<ValueRef>, NnError> {
        let mut activations = inputs.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations)?;
        }
        Ok(activations)
    }
}

impl fmt::Display for Mlp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, layer) in self.layers.iter().enumerate() {
            writeln!(f, "Layer {i}")?;
            write!(f, "{layer}")?;
        }
        Ok(())
    }
}
