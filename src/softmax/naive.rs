use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::softmax::validate_matrices;

/// Softmax loss and weight gradient, computed one example at a time.
///
/// Inputs have dimension D, there are C classes and the minibatch holds N
/// examples:
/// - `weights` — (D, C)
/// - `inputs`  — (N, D), one example per row
/// - `labels`  — N class indices, `labels[i] = c` means row i belongs to class c
/// - `reg`     — L2 regularization strength
///
/// Returns `(loss, dW)` where `dW` has the shape of `weights`.
///
/// This is the reference against which `softmax_loss_vectorized` is checked,
/// so it sticks to scalar loops.
///
/// # Errors
/// Fails before computing anything if a matrix's data does not have its
/// declared shape, the shapes disagree, the batch is empty, there are no
/// classes, a label is not in [0, C), or `reg` is negative or not finite.
pub fn softmax_loss_naive(
    weights: &Matrix,
    inputs: &Matrix,
    labels: &[usize],
    reg: f64,
) -> Result<(f64, Matrix)> {
    validate_matrices(weights, inputs, labels, reg)?;

    let num_train = inputs.rows;
    let num_classes = weights.cols;
    let num_features = weights.rows;
    log::debug!(
        "softmax_loss_naive(N={}, D={}, C={}, reg={})",
        num_train, num_features, num_classes, reg
    );

    let mut data_loss = 0.0;
    let mut grad = Matrix::zeros(num_features, num_classes);
    let mut scores = vec![0.0; num_classes];

    for (i, &label) in labels.iter().enumerate() {
        let x = inputs.row(i);

        // s = x · W
        for (c, score) in scores.iter_mut().enumerate() {
            let mut sum = 0.0;
            for d in 0..num_features {
                sum += x[d] * weights.data[d][c];
            }
            *score = sum;
        }

        // Shift so the largest score is 0; exp() can then only underflow.
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut exp_sum = 0.0;
        for score in scores.iter_mut() {
            *score -= max;
            exp_sum += score.exp();
        }

        // -ln(p_y) = ln(sum_k e^{s_k}) - s_y
        data_loss += exp_sum.ln() - scores[label];

        for (c, &score) in scores.iter().enumerate() {
            let indicator = if c == label { 1.0 } else { 0.0 };
            let coeff = score.exp() / exp_sum - indicator;
            for d in 0..num_features {
                grad.data[d][c] += coeff * x[d];
            }
        }
    }

    let inv_n = 1.0 / num_train as f64;
    let loss = data_loss * inv_n + 0.5 * reg * weights.sum_squares();
    let grad = grad.map(|g| g * inv_n) + weights.map(|w| w * reg);

    Ok((loss, grad))
}
