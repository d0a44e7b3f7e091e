//! Autograd: scalar computation graph with reverse-mode differentiation.
//!
//! Every arithmetic call builds a new node that remembers its operands and an
//! [`Operation`] tag. [`backward`] orders the ancestors of a root node
//! topologically and walks them in reverse, accumulating gradients with the
//! local rule of each operation.

mod graph;
pub mod impls;

pub use graph::{backward, reset_gradients, topological_order};
pub use impls::scalar::{add, leaf, multiply, power, NodeId, Operation, ValueRef};

/// Trait for raising a node to a power (e.g. `(&a).pow(2.0)` or `(&a).pow(&c)`).
pub trait Pow<Rhs> {
    /// Result of the power operation.
    type Output;

    /// Returns `self^exp` with gradient tracking on the base.
    #[must_use]
    fn pow(self, exp: Rhs) -> Self::Output;
}

/// A differentiable scalar node in the computation graph.
///
/// Use [`ScalarNode::data`] for the forward value and [`ScalarNode::grad`]
/// after [`ScalarNode::backward`].
pub trait ScalarNode: Clone {
    /// Returns the forward pass value.
    fn data(&self) -> f64;

    /// Returns the accumulated gradient of the last backward root with respect to this node.
    fn grad(&self) -> f64;

    /// Runs backpropagation from this node to every ancestor.
    fn backward(&self);

    /// Zeros the gradient of this node and of every node it was computed from.
    fn zero_grad(&self);
}
