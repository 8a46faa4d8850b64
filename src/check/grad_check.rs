use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::check::rel_error::rel_error;
use crate::error::{Result, SoftmaxError};
use crate::math::matrix::Matrix;

/// One sampled entry of a sparse gradient check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradCheckSample {
    pub row: usize,
    pub col: usize,
    pub numerical: f64,
    pub analytic: f64,
    pub rel_error: f64,
}

/// Centered difference `(f(w + h e_ij) - f(w - h e_ij)) / 2h` at one entry.
fn centered_difference<F>(f: &mut F, w: &mut Matrix, row: usize, col: usize, h: f64) -> Result<f64>
where
    F: FnMut(&Matrix) -> Result<f64>,
{
    let old = w.data[row][col];
    w.data[row][col] = old + h;
    let plus = f(&*w);
    w.data[row][col] = old - h;
    let minus = f(&*w);
    w.data[row][col] = old;
    Ok((plus? - minus?) / (2.0 * h))
}

/// Finite-difference gradient of `f` at `w`, one entry at a time.
///
/// Costs two evaluations of `f` per entry of `w`; use `grad_check_sparse`
/// when `w` is large.
pub fn numerical_gradient<F>(mut f: F, w: &Matrix, h: f64) -> Result<Matrix>
where
    F: FnMut(&Matrix) -> Result<f64>,
{
    let mut probe = w.clone();
    let mut grad = Matrix::zeros(w.rows, w.cols);
    for i in 0..w.rows {
        for j in 0..w.cols {
            grad.data[i][j] = centered_difference(&mut f, &mut probe, i, j, h)?;
        }
    }
    Ok(grad)
}

/// Compares `analytic` against finite differences of `f` at `num_checks`
/// randomly chosen entries of `w`.
pub fn grad_check_sparse<F, R>(
    mut f: F,
    w: &Matrix,
    analytic: &Matrix,
    num_checks: usize,
    h: f64,
    rng: &mut R,
) -> Result<Vec<GradCheckSample>>
where
    F: FnMut(&Matrix) -> Result<f64>,
    R: Rng + ?Sized,
{
    if analytic.shape() != w.shape() {
        return Err(SoftmaxError::ShapeMismatch(format!(
            "gradient is {}x{} but weights are {}x{}",
            analytic.rows, analytic.cols, w.rows, w.cols
        )));
    }
    if w.rows == 0 || w.cols == 0 {
        return Ok(Vec::new());
    }

    let mut probe = w.clone();
    let mut samples = Vec::with_capacity(num_checks);
    for _ in 0..num_checks {
        let row = rng.gen_range(0..w.rows);
        let col = rng.gen_range(0..w.cols);
        let numerical = centered_difference(&mut f, &mut probe, row, col, h)?;
        let analytic = analytic.data[row][col];
        let sample = GradCheckSample {
            row,
            col,
            numerical,
            analytic,
            rel_error: rel_error(numerical, analytic),
        };
        log::trace!(
            "grad check ({}, {}): numerical {:e} analytic {:e} rel error {:e}",
            row, col, numerical, analytic, sample.rel_error
        );
        samples.push(sample);
    }
    Ok(samples)
}
