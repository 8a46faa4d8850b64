use ndarray::{Array2, ArrayView2, Axis};

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::softmax::{validate_inputs, validate_matrices};

/// Softmax loss and weight gradient, computed with whole-matrix operations.
///
/// Same inputs, outputs and errors as `softmax_loss_naive`.
pub fn softmax_loss_vectorized(
    weights: &Matrix,
    inputs: &Matrix,
    labels: &[usize],
    reg: f64,
) -> Result<(f64, Matrix)> {
    validate_matrices(weights, inputs, labels, reg)?;
    let w = weights.to_array();
    let x = inputs.to_array();
    let (loss, grad) = loss_and_grad(w.view(), x.view(), labels, reg);
    Ok((loss, Matrix::from_array(grad.view())))
}

/// `softmax_loss_vectorized` on `ndarray` views, skipping the `Matrix`
/// conversion.
///
/// `weights` is (D, C), `inputs` is (N, D); the gradient comes back as a
/// (D, C) array.
pub fn softmax_loss_vectorized_array(
    weights: ArrayView2<f64>,
    inputs: ArrayView2<f64>,
    labels: &[usize],
    reg: f64,
) -> Result<(f64, Array2<f64>)> {
    validate_inputs(weights.dim(), inputs.dim(), labels, reg)?;
    Ok(loss_and_grad(weights, inputs, labels, reg))
}

/// Row-wise softmax of a score matrix, shifted by each row's maximum.
/// Also returns the shifted scores and the per-row exponent sums.
pub(crate) fn stable_softmax(scores: &Array2<f64>) -> (Array2<f64>, Array2<f64>, Array2<f64>) {
    let row_max = scores
        .map_axis(Axis(1), |row| row.fold(f64::NEG_INFINITY, |m, &s| m.max(s)))
        .insert_axis(Axis(1));
    let shifted = scores - &row_max;
    let exp = shifted.mapv(f64::exp);
    let exp_sum = exp.sum_axis(Axis(1)).insert_axis(Axis(1));
    let probs = &exp / &exp_sum;
    (probs, shifted, exp_sum)
}

fn loss_and_grad(
    weights: ArrayView2<f64>,
    inputs: ArrayView2<f64>,
    labels: &[usize],
    reg: f64,
) -> (f64, Array2<f64>) {
    let (num_train, _) = inputs.dim();
    let (num_features, num_classes) = weights.dim();
    log::debug!(
        "softmax_loss_vectorized(N={}, D={}, C={}, reg={})",
        num_train, num_features, num_classes, reg
    );

    let scores = inputs.dot(&weights);
    let (probs, shifted, exp_sum) = stable_softmax(&scores);

    let mut one_hot = Array2::<f64>::zeros((num_train, num_classes));
    for (mut row, &label) in one_hot.outer_iter_mut().zip(labels) {
        row[label] = 1.0;
    }

    // -ln p = ln(sum_k e^{s_k}) - s, picked out at the labels by the one-hot mask.
    let neg_log_probs = &exp_sum.mapv(f64::ln) - &shifted;
    let data_loss = (&one_hot * &neg_log_probs).sum();

    let inv_n = 1.0 / num_train as f64;
    let loss = data_loss * inv_n + 0.5 * reg * weights.mapv(|w| w * w).sum();
    let grad = inputs.t().dot(&(probs - &one_hot)) * inv_n + &weights * reg;

    (loss, grad)
}
