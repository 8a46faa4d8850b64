use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::softmax::validate_scoring;
use crate::softmax::vectorized::stable_softmax;

/// Class probabilities for every row of `inputs`, shape (N, C).
pub fn class_probabilities(weights: &Matrix, inputs: &Matrix) -> Result<Matrix> {
    check_scoring(weights, inputs)?;
    let scores = inputs.to_array().dot(&weights.to_array());
    let (probs, _, _) = stable_softmax(&scores);
    Ok(Matrix::from_array(probs.view()))
}

/// Highest-scoring class for every row of `inputs`.
///
/// Softmax is monotonic, so this is the argmax of the raw scores `X · W`.
pub fn predict(weights: &Matrix, inputs: &Matrix) -> Result<Vec<usize>> {
    check_scoring(weights, inputs)?;
    let scores = inputs * weights;
    Ok(scores.data.iter().map(|row| argmax(row)).collect())
}

fn check_scoring(weights: &Matrix, inputs: &Matrix) -> Result<()> {
    weights.check_consistent()?;
    inputs.check_consistent()?;
    validate_scoring(weights.shape(), inputs.shape())
}

/// Index of the maximum element in a slice; the first one wins ties.
fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(bi, bv), (i, &x)| if x > bv { (i, x) } else { (bi, bv) })
        .0
}
