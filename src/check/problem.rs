use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::softmax::{softmax_loss, validate_matrices, Strategy};

/// Scale applied to N(0, 1) samples for generated weights, so initial
/// scores are near zero and the loss starts near ln(C).
const WEIGHT_SCALE: f64 = 1e-4;

/// One complete set of inputs to the softmax loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxProblem {
    /// (D, C)
    pub weights: Matrix,
    /// (N, D)
    pub inputs: Matrix,
    /// N class indices in [0, C)
    pub labels: Vec<usize>,
    pub reg: f64,
}

impl SoftmaxProblem {
    /// Random problem with N examples, D features and C classes.
    ///
    /// Inputs are N(0, 1), weights N(0, 1) * 1e-4, labels uniform over the
    /// classes. The same seed always yields the same problem.
    pub fn random(n: usize, d: usize, c: usize, reg: f64, seed: u64) -> SoftmaxProblem {
        let mut rng = StdRng::seed_from_u64(seed);
        let weights = Matrix::gaussian(d, c, WEIGHT_SCALE, &mut rng);
        let inputs = Matrix::gaussian(n, d, 1.0, &mut rng);
        let labels = (0..n)
            .map(|_| if c == 0 { 0 } else { rng.gen_range(0..c) })
            .collect();
        SoftmaxProblem { weights, inputs, labels, reg }
    }

    /// (N, D, C)
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.inputs.rows, self.weights.rows, self.weights.cols)
    }

    /// Checks that the matrices, labels and `reg` form valid loss inputs.
    pub fn validate(&self) -> Result<()> {
        validate_matrices(&self.weights, &self.inputs, &self.labels, self.reg)
    }

    /// Loss and gradient at the problem's own weights.
    pub fn loss(&self, strategy: Strategy) -> Result<(f64, Matrix)> {
        softmax_loss(strategy, &self.weights, &self.inputs, &self.labels, self.reg)
    }

    /// Loss at arbitrary weights, keeping the problem's data and `reg`.
    pub fn loss_at(&self, strategy: Strategy, weights: &Matrix) -> Result<f64> {
        softmax_loss(strategy, weights, &self.inputs, &self.labels, self.reg).map(|(loss, _)| loss)
    }

    /// Serializes the problem to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a problem written by `save_json` and validates it.
    pub fn load_json(path: &str) -> Result<SoftmaxProblem> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let problem: SoftmaxProblem = serde_json::from_reader(reader)?;
        problem.validate()?;
        Ok(problem)
    }
}
