pub mod naive;
pub mod vectorized;
pub mod strategy;
pub mod predict;

pub use naive::softmax_loss_naive;
pub use vectorized::{softmax_loss_vectorized, softmax_loss_vectorized_array};
pub use strategy::{Strategy, softmax_loss};
pub use predict::{class_probabilities, predict};

use crate::error::{Result, SoftmaxError};
use crate::math::matrix::Matrix;

/// `validate_inputs` for `Matrix` arguments, after checking that each
/// matrix's data really has its declared shape.
pub(crate) fn validate_matrices(
    weights: &Matrix,
    inputs: &Matrix,
    labels: &[usize],
    reg: f64,
) -> Result<()> {
    weights.check_consistent()?;
    inputs.check_consistent()?;
    validate_inputs(weights.shape(), inputs.shape(), labels, reg)
}

/// Checks the shared preconditions of every loss entry point.
///
/// `weights` is (D, C), `inputs` is (N, D), `labels` has N entries in
/// [0, C) and `reg` is a finite non-negative number.
pub(crate) fn validate_inputs(
    weights: (usize, usize),
    inputs: (usize, usize),
    labels: &[usize],
    reg: f64,
) -> Result<()> {
    let (d, c) = weights;
    let (n, x_d) = inputs;

    if x_d != d {
        return Err(SoftmaxError::ShapeMismatch(format!(
            "weights are {d}x{c} but inputs have {x_d} features"
        )));
    }
    if labels.len() != n {
        return Err(SoftmaxError::ShapeMismatch(format!(
            "{} labels for {n} examples",
            labels.len()
        )));
    }
    if n == 0 {
        return Err(SoftmaxError::EmptyBatch);
    }
    if c == 0 {
        return Err(SoftmaxError::NoClasses);
    }
    if let Some((index, &label)) = labels.iter().enumerate().find(|&(_, &l)| l >= c) {
        return Err(SoftmaxError::LabelOutOfRange { index, label, classes: c });
    }
    if !reg.is_finite() || reg < 0.0 {
        return Err(SoftmaxError::InvalidRegularization(reg));
    }
    Ok(())
}

/// Checks only the shapes needed to score `inputs` against `weights`.
pub(crate) fn validate_scoring(weights: (usize, usize), inputs: (usize, usize)) -> Result<()> {
    let (d, c) = weights;
    if inputs.1 != d {
        return Err(SoftmaxError::ShapeMismatch(format!(
            "weights are {d}x{c} but inputs have {} features",
            inputs.1
        )));
    }
    if c == 0 {
        return Err(SoftmaxError::NoClasses);
    }
    Ok(())
}
