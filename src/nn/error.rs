//! Errors produced when building or evaluating networks.

use thiserror::Error;

/// Errors produced by the `nn` module.
///
/// Every variant is an invalid-input condition: the operation that returned
/// it produced no partial result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NnError {
    /// A layer was built without neurons.
    #[error("a layer needs at least one neuron")]
    EmptyLayer,

    /// `forward` got a different number of inputs than there are weights.
    #[error("expected {expected} inputs, got {got}")]
    InputArity { expected: usize, got: usize },

    /// Predictions and targets passed to a loss differ in length.
    #[error("loss: {predicted} predictions but {target} targets")]
    LengthMismatch { predicted: usize, target: usize },

    /// A network was requested with no layers.
    #[error("layer sizes must not be empty")]
    EmptyLayerSizes,

    /// A layer size of zero was requested.
    #[error("layer {index} has zero width")]
    ZeroWidthLayer { index: usize },

    /// A neuron or layer at `index` does not take the input count its position requires.
    #[error("element {index} takes {got} inputs, expected {expected}")]
    ArityMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// The weight initializer could not be built (e.g. negative standard deviation).
    #[error("weight init: {0}")]
    Init(String),
}
