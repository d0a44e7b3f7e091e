//! Losses built from graph operations, so backward reaches every parameter.

use crate::autograd::{add, leaf, multiply, power, ValueRef};

use super::NnError;

/// `sum_i (predicted[i] - target[i])^2` as a single graph node.
///
/// The difference is built as `predicted + (-1 * target)` and squared with
/// [`power`]; one `-1` leaf and one `2` leaf are shared by every term.
/// An empty pair of slices gives a leaf holding 0.
pub fn sum_squared_error(predicted: &[ValueRef], target: &[ValueRef]) -> Result<ValueRef, NnError> {
    if predicted.len() != target.len() {
        return Err(NnError::LengthMismatch {
            predicted: predicted.len(),
            target: target.len(),
        });
    }
    let neg_one = leaf(-1.0);
    let two = leaf(2.0);
    let loss = predicted
        .iter()
        .zip(target)
        .fold(leaf(0.0), |acc, (p, t)| {
            let diff = add(p, &multiply(&neg_one, t));
            add(&acc, &power(&diff, &two))
        });
    Ok(loss)
}
