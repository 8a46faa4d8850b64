use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::softmax::{naive::softmax_loss_naive, vectorized::softmax_loss_vectorized};

/// Selects how the softmax loss is computed.
///
/// - `Naive`      — explicit loops over examples and classes; the reference.
/// - `Vectorized` — whole-matrix `ndarray` operations; the fast path.
///
/// Both return the same `(loss, dW)` up to floating-point rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Naive,
    Vectorized,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Naive, Strategy::Vectorized];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Naive => write!(f, "naive"),
            Strategy::Vectorized => write!(f, "vectorized"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "naive" => Ok(Strategy::Naive),
            "vectorized" => Ok(Strategy::Vectorized),
            other => Err(format!("unknown strategy `{other}` (expected naive or vectorized)")),
        }
    }
}

/// Softmax loss and gradient with the chosen strategy.
pub fn softmax_loss(
    strategy: Strategy,
    weights: &Matrix,
    inputs: &Matrix,
    labels: &[usize],
    reg: f64,
) -> Result<(f64, Matrix)> {
    match strategy {
        Strategy::Naive      => softmax_loss_naive(weights, inputs, labels, reg),
        Strategy::Vectorized => softmax_loss_vectorized(weights, inputs, labels, reg),
    }
}
