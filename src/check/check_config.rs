use serde::{Serialize, Deserialize};

/// Settings for a `run_check` pass.
///
/// # Fields
/// - `num_checks` — random entries of W probed by each sparse gradient check
/// - `step`       — finite-difference step `h`
/// - `tolerance`  — largest relative error accepted between the two
///                  implementations, for both loss and gradient
/// - `grad_tolerance` — largest relative error accepted between the analytic
///                  gradient and finite differences at any probed entry
/// - `seed`       — seeds the choice of probed entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    pub num_checks: usize,
    pub step: f64,
    pub tolerance: f64,
    pub grad_tolerance: f64,
    pub seed: u64,
}

impl CheckConfig {
    pub fn new(num_checks: usize, step: f64, tolerance: f64, grad_tolerance: f64, seed: u64) -> Self {
        CheckConfig {
            num_checks,
            step,
            tolerance,
            grad_tolerance,
            seed,
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig::new(10, 1e-5, 1e-7, 1e-5, 0)
    }
}
