use std::time::Instant;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::check::check_config::CheckConfig;
use crate::check::grad_check::{grad_check_sparse, GradCheckSample};
use crate::check::problem::SoftmaxProblem;
use crate::check::rel_error::{matrix_rel_error, rel_error};
use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::softmax::{softmax_loss, Strategy};

/// Result of one strategy on the problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRun {
    pub strategy: Strategy,
    pub loss: f64,
    /// Wall-clock time of the single loss/gradient call in microseconds.
    pub elapsed_us: u64,
}

/// Everything `run_check` measured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub samples: usize,
    pub features: usize,
    pub classes: usize,
    pub reg: f64,
    pub naive: StrategyRun,
    pub vectorized: StrategyRun,
    /// Relative error between the two losses.
    pub loss_rel_error: f64,
    /// Largest elementwise relative error between the two gradients.
    pub grad_rel_error: f64,
    /// Sparse gradient check of the naive gradient at the problem's `reg`.
    pub grad_check: Vec<GradCheckSample>,
    /// Same check with `reg = 0`.
    pub grad_check_unregularized: Vec<GradCheckSample>,
    pub tolerance: f64,
    pub grad_tolerance: f64,
}

impl CheckReport {
    /// Whether both implementations agree on loss and gradient within tolerance.
    pub fn agrees(&self) -> bool {
        self.loss_rel_error < self.tolerance && self.grad_rel_error < self.tolerance
    }

    /// Whether every probed entry of the analytic gradient matches finite
    /// differences within `grad_tolerance`.
    pub fn gradient_checks(&self) -> bool {
        self.max_grad_check_error() < self.grad_tolerance
    }

    pub fn passed(&self) -> bool {
        self.agrees() && self.gradient_checks()
    }

    /// How many times faster the vectorized call was.
    pub fn speedup(&self) -> f64 {
        self.naive.elapsed_us as f64 / (self.vectorized.elapsed_us.max(1)) as f64
    }

    /// Worst relative error over both sparse gradient checks.
    pub fn max_grad_check_error(&self) -> f64 {
        self.grad_check.iter()
            .chain(&self.grad_check_unregularized)
            .map(|s| s.rel_error)
            .fold(0.0, f64::max)
    }
}

/// Runs both implementations on `problem`, times and compares them, and
/// grad-checks the reference gradient with and without regularization.
///
/// # Errors
/// Returns the validation error if `problem` is not a valid set of loss inputs.
pub fn run_check(problem: &SoftmaxProblem, config: &CheckConfig) -> Result<CheckReport> {
    problem.validate()?;
    let (samples, features, classes) = problem.dims();

    // ── Both implementations, timed ───────────────────────────────────────
    let (naive, naive_grad) = timed_run(problem, Strategy::Naive)?;
    let (vectorized, vectorized_grad) = timed_run(problem, Strategy::Vectorized)?;
    log::debug!(
        "naive loss {:e} in {}us, vectorized loss {:e} in {}us",
        naive.loss, naive.elapsed_us, vectorized.loss, vectorized.elapsed_us
    );

    let loss_rel_error = rel_error(naive.loss, vectorized.loss);
    let grad_rel_error = matrix_rel_error(&naive_grad, &vectorized_grad)?;

    // ── Finite-difference checks of the reference gradient ───────────────
    let mut rng = StdRng::seed_from_u64(config.seed);
    let grad_check = grad_check_sparse(
        |w| problem.loss_at(Strategy::Naive, w),
        &problem.weights,
        &naive_grad,
        config.num_checks,
        config.step,
        &mut rng,
    )?;

    let unregularized = SoftmaxProblem { reg: 0.0, ..problem.clone() };
    let (_, unregularized_grad) = unregularized.loss(Strategy::Naive)?;
    let grad_check_unregularized = grad_check_sparse(
        |w| unregularized.loss_at(Strategy::Naive, w),
        &unregularized.weights,
        &unregularized_grad,
        config.num_checks,
        config.step,
        &mut rng,
    )?;

    let report = CheckReport {
        samples,
        features,
        classes,
        reg: problem.reg,
        naive,
        vectorized,
        loss_rel_error,
        grad_rel_error,
        grad_check,
        grad_check_unregularized,
        tolerance: config.tolerance,
        grad_tolerance: config.grad_tolerance,
    };

    if !report.agrees() {
        log::warn!(
            "implementations disagree: loss rel error {:e}, gradient rel error {:e} (tolerance {:e})",
            report.loss_rel_error, report.grad_rel_error, report.tolerance
        );
    }
    if !report.gradient_checks() {
        log::warn!(
            "gradient check failed: worst rel error {:e} (tolerance {:e})",
            report.max_grad_check_error(), report.grad_tolerance
        );
    }

    Ok(report)
}

fn timed_run(problem: &SoftmaxProblem, strategy: Strategy) -> Result<(StrategyRun, Matrix)> {
    let t_start = Instant::now();
    let (loss, grad) = softmax_loss(
        strategy,
        &problem.weights,
        &problem.inputs,
        &problem.labels,
        problem.reg,
    )?;
    let elapsed_us = t_start.elapsed().as_micros() as u64;
    Ok((StrategyRun { strategy, loss, elapsed_us }, grad))
}
