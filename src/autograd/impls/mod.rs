//! Implementations of [`ScalarNode`](super::ScalarNode).
//!
//! One file per implementation: [`scalar`] holds the reference-counted graph node.

pub mod scalar;
