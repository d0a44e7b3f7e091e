//! Feed-forward networks built from autograd primitives.
//!
//! [`Neuron`], [`Layer`] and [`Mlp`] hold their parameters as leaf nodes;
//! `forward` builds new graph nodes on every call, and
//! [`sum_squared_error`] reduces predictions to one node that
//! [`backward`](crate::autograd::backward) can start from.

mod error;
mod init;
mod layer;
mod loss;
mod mlp;
mod neuron;
#[cfg(test)]
mod tests;

pub use error::NnError;
pub use init::Init;
pub use layer::Layer;
pub use loss::sum_squared_error;
pub use mlp::Mlp;
pub use neuron::{Neuron, Rectifier};
