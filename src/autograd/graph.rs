//! Graph traversals: topological ordering, backward pass and gradient reset.
//!
//! All traversals use an explicit stack so deep graphs cannot exhaust the call
//! stack, and track visited nodes by identity rather than by value.

use std::collections::HashSet;

use log::{debug, trace};

use super::impls::scalar::{Edges, NodeId, ValueRef};
use super::ScalarNode;

/// Linearizes the ancestors of `root` so that every node comes after its operands.
///
/// Post-order depth-first search: operand1 is fully traversed before operand2,
/// and a node is emitted only once both are done. Nodes reachable through
/// several paths appear exactly once. `root` is always the last element.
#[must_use]
pub fn topological_order(root: &ValueRef) -> Vec<ValueRef> {
    let mut order = Vec::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    // (node, operands already pushed)
    let mut stack = vec![(root.clone(), false)];

    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            order.push(node);
            continue;
        }
        if !visited.insert(node.id()) {
            continue;
        }
        let operands = node.operands();
        stack.push((node, true));
        for operand in operands.into_iter().rev() {
            if !visited.contains(&operand.id()) {
                stack.push((operand, false));
            }
        }
    }
    order
}

/// Runs backpropagation from `root`.
///
/// Seeds `root`'s gradient with 1 and applies each node's local rule in
/// reverse topological order, adding into the operands' gradients. Operand
/// values are read at this point, not when the node was built.
pub fn backward(root: &ValueRef) {
    root.set_grad(1.0);
    let order = topological_order(root);
    debug!("backward: {} nodes in topological order", order.len());

    for node in order.iter().rev() {
        trace!("backward: {node}");
        let g = node.grad();
        match node.edges() {
            Edges::Leaf => {}
            Edges::Add(a, b) => {
                a.add_grad(g);
                b.add_grad(g);
            }
            Edges::Mul(a, b) => {
                let (a_val, b_val) = (a.data(), b.data());
                a.add_grad(b_val * g);
                b.add_grad(a_val * g);
            }
            Edges::Pow(base, exp) => {
                let (x, e) = (base.data(), exp.data());
                base.add_grad(e * x.powf(e - 1.0) * g);
            }
            Edges::Rectify(a) => {
                let gate = if a.data() > 0.0 { 1.0 } else { 0.0 };
                a.add_grad(gate * g);
            }
        }
    }
}

/// Sets the gradient of `root` and of every node it depends on to zero.
pub fn reset_gradients(root: &ValueRef) {
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if !visited.insert(node.id()) {
            continue;
        }
        node.set_grad(0.0);
        stack.extend(node.operands());
    }
    trace!("reset_gradients: cleared {} nodes", visited.len());
}
