//! Scalar autograd: computation graph of single float values with backpropagation.

use crate::autograd::{graph, Pow, ScalarNode};
use std::cell::RefCell;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::rc::Rc;

/// Tag naming the derivative rule that applies to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// No operands: a literal or a trainable parameter.
    Leaf,
    /// `operand1 + operand2`.
    Add,
    /// `operand1 * operand2`.
    Mul,
    /// `operand1 ^ operand2`; no gradient flows to the exponent.
    Pow,
    /// `max(0, operand)` with a 0/1 gradient gate.
    Rectify,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Leaf => "leaf",
            Operation::Add => "add",
            Operation::Mul => "mul",
            Operation::Pow => "pow",
            Operation::Rectify => "rectify",
        };
        f.write_str(name)
    }
}

/// Operation together with the operands it was applied to.
///
/// Keeping the operands inside the variant makes "leaf" and "has operands"
/// mutually exclusive.
#[derive(Clone)]
pub(crate) enum Edges {
    Leaf,
    Add(ValueRef, ValueRef),
    Mul(ValueRef, ValueRef),
    Pow(ValueRef, ValueRef),
    Rectify(ValueRef),
}

impl Edges {
    fn operation(&self) -> Operation {
        match self {
            Edges::Leaf => Operation::Leaf,
            Edges::Add(..) => Operation::Add,
            Edges::Mul(..) => Operation::Mul,
            Edges::Pow(..) => Operation::Pow,
            Edges::Rectify(_) => Operation::Rectify,
        }
    }

    fn operands(&self) -> Vec<ValueRef> {
        self.clone().into_operands()
    }

    fn into_operands(self) -> Vec<ValueRef> {
        match self {
            Edges::Leaf => Vec::new(),
            Edges::Add(a, b) | Edges::Mul(a, b) | Edges::Pow(a, b) => vec![a, b],
            Edges::Rectify(a) => vec![a],
        }
    }
}

/// Internal scalar node: forward value, gradient, and graph edges for backprop.
struct Value {
    /// Forward pass value.
    data: f64,
    /// Accumulated gradient; valid after a backward pass that reached this node.
    grad: f64,
    /// Producing operation and its operands. Never changes after construction.
    edges: Edges,
}

impl Drop for Value {
    // Releases operands through a worklist so long chains never recurse.
    fn drop(&mut self) {
        let mut pending = std::mem::replace(&mut self.edges, Edges::Leaf).into_operands();
        while let Some(ValueRef(node)) = pending.pop() {
            if let Ok(cell) = Rc::try_unwrap(node) {
                let mut value = cell.into_inner();
                pending.extend(std::mem::replace(&mut value.edges, Edges::Leaf).into_operands());
            }
        }
    }
}

/// Stable identity of a node, independent of its numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Handle to a scalar node in the autograd computation graph.
///
/// Wraps the node state in `Rc<RefCell<_>>` so that one node can feed any
/// number of consumers and gradients can be accumulated during backward.
/// Cloning the handle shares the node; it does not copy it.
#[derive(Clone)]
pub struct ValueRef(Rc<RefCell<Value>>);

impl ValueRef {
    /// Creates a leaf node (no operands) with the given value and zero gradient.
    #[must_use]
    pub fn new(data: f64) -> Self {
        ValueRef::with_edges(data, Edges::Leaf)
    }

    fn with_edges(data: f64, edges: Edges) -> Self {
        ValueRef(Rc::new(RefCell::new(Value {
            data,
            grad: 0.0,
            edges,
        })))
    }

    /// Identity of this node; equal only for handles to the same node.
    #[must_use]
    pub fn id(&self) -> NodeId {
        NodeId(Rc::as_ptr(&self.0) as usize)
    }

    /// Returns true if both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &ValueRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The operation that produced this node.
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.0.borrow().edges.operation()
    }

    /// The operands this node was computed from, in order (empty for leaves).
    #[must_use]
    pub fn operands(&self) -> Vec<ValueRef> {
        self.0.borrow().edges.operands()
    }

    pub(crate) fn edges(&self) -> Edges {
        self.0.borrow().edges.clone()
    }

    /// Overwrites the forward value in place. Operand links are left untouched.
    pub(crate) fn set_data(&self, data: f64) {
        self.0.borrow_mut().data = data;
    }

    /// Sets this node's gradient (e.g. to 1.0 at the root).
    pub(crate) fn set_grad(&self, g: f64) {
        self.0.borrow_mut().grad = g;
    }

    /// Adds to this node's gradient (for accumulation when a value is used multiple times).
    pub(crate) fn add_grad(&self, g: f64) {
        self.0.borrow_mut().grad += g;
    }

    /// Rectifier: `0` if `self < 0`, else `self`. Local grad is 1 if `self > 0`, else 0.
    #[must_use]
    pub fn rectify(&self) -> ValueRef {
        let x = self.data();
        let data = if x < 0.0 { 0.0 } else { x };
        ValueRef::with_edges(data, Edges::Rectify(self.clone()))
    }
}

/// Creates a leaf node holding `x`.
#[must_use]
pub fn leaf(x: f64) -> ValueRef {
    ValueRef::new(x)
}

/// `a + b`. Neither operand is modified.
#[must_use]
pub fn add(a: &ValueRef, b: &ValueRef) -> ValueRef {
    ValueRef::with_edges(a.data() + b.data(), Edges::Add(a.clone(), b.clone()))
}

/// `a * b`. Neither operand is modified.
#[must_use]
pub fn multiply(a: &ValueRef, b: &ValueRef) -> ValueRef {
    ValueRef::with_edges(a.data() * b.data(), Edges::Mul(a.clone(), b.clone()))
}

/// `base ^ exponent` with IEEE `powf` semantics: a negative base with a
/// fractional exponent gives NaN, zero to a negative power gives infinity.
#[must_use]
pub fn power(base: &ValueRef, exponent: &ValueRef) -> ValueRef {
    ValueRef::with_edges(
        base.data().powf(exponent.data()),
        Edges::Pow(base.clone(), exponent.clone()),
    )
}

// -----------------------------------------------------------------------------
// std::ops — x + y, x * y, x - y, -x
// -----------------------------------------------------------------------------

impl Add for &ValueRef {
    type Output = ValueRef;

    fn add(self, rhs: Self) -> ValueRef {
        add(self, rhs)
    }
}

impl Mul for &ValueRef {
    type Output = ValueRef;

    fn mul(self, rhs: Self) -> ValueRef {
        multiply(self, rhs)
    }
}

impl Neg for &ValueRef {
    type Output = ValueRef;

    fn neg(self) -> ValueRef {
        multiply(&ValueRef::new(-1.0), self)
    }
}

impl Sub for &ValueRef {
    type Output = ValueRef;

    fn sub(self, rhs: Self) -> ValueRef {
        add(self, &(-rhs))
    }
}

// -----------------------------------------------------------------------------
// Pow — (&a).pow(&c), (&a).pow(2.0)
// -----------------------------------------------------------------------------

impl Pow<&ValueRef> for &ValueRef {
    type Output = ValueRef;

    fn pow(self, exp: &ValueRef) -> ValueRef {
        power(self, exp)
    }
}

impl Pow<f64> for &ValueRef {
    type Output = ValueRef;

    fn pow(self, exp: f64) -> ValueRef {
        power(self, &ValueRef::new(exp))
    }
}

impl ScalarNode for ValueRef {
    fn data(&self) -> f64 {
        self.0.borrow().data
    }

    fn grad(&self) -> f64 {
        self.0.borrow().grad
    }

    fn backward(&self) {
        graph::backward(self);
    }

    fn zero_grad(&self) {
        graph::reset_gradients(self);
    }
}

impl fmt::Debug for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0.borrow();
        f.debug_struct("Value")
            .field("data", &v.data)
            .field("grad", &v.grad)
            .field("op", &v.edges.operation())
            .finish()
    }
}

impl fmt::Display for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0.borrow();
        write!(
            f,
            "Value(data={}, grad={}, op={})",
            v.data,
            v.grad,
            v.edges.operation()
        )
    }
}
