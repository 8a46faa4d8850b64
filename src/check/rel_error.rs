use crate::error::{Result, SoftmaxError};
use crate::math::matrix::Matrix;

/// Floor on the denominator so two values near zero do not blow up.
const DENOM_FLOOR: f64 = 1e-8;

/// Relative error `|a - b| / max(1e-8, |a| + |b|)`.
pub fn rel_error(a: f64, b: f64) -> f64 {
    (a - b).abs() / DENOM_FLOOR.max(a.abs() + b.abs())
}

/// Largest elementwise `rel_error` between two same-shape matrices.
pub fn matrix_rel_error(a: &Matrix, b: &Matrix) -> Result<f64> {
    if a.shape() != b.shape() {
        return Err(SoftmaxError::ShapeMismatch(format!(
            "cannot compare {}x{} with {}x{}",
            a.rows, a.cols, b.rows, b.cols
        )));
    }
    Ok(a.data.iter().flatten()
        .zip(b.data.iter().flatten())
        .map(|(&x, &y)| rel_error(x, y))
        .fold(0.0, f64::max))
}
